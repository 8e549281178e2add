//! In-memory store implementing every persistence port.
//!
//! Mirrors the constraints of the Postgres schema closely enough for
//! lifecycle tests: unique identifiers and usernames, one bar per user, bar
//! and token foreign keys to users. Each insert call stages its rows and
//! commits them only if every row passes, like a rolled-back transaction.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    SessionTokenError, SessionTokenRepository, StateExportError, StateExporter,
    StateImportError, StateImporter, StateInventory, StateInventoryError,
};
use crate::domain::{Cocktail, FamilyState, SnapshotFamily, User, UserBar};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    bars: Vec<UserBar>,
    cocktails: Vec<Cocktail>,
    tokens: Vec<(Uuid, String)>,
}

/// Thread-safe in-memory state store.
#[derive(Debug, Default)]
pub struct InMemoryState {
    tables: Mutex<Tables>,
    unavailable: Mutex<bool>,
}

impl InMemoryState {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated without going through the import ports.
    pub fn seeded(users: Vec<User>, bars: Vec<UserBar>, cocktails: Vec<Cocktail>) -> Self {
        let state = Self::new();
        {
            let mut tables = state.lock();
            tables.users = users;
            tables.bars = bars;
            tables.cocktails = cocktails;
        }
        state
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self
            .unavailable
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = unavailable;
    }

    /// Issue a session token for an existing user.
    ///
    /// # Errors
    /// Returns the token value back when the user does not exist.
    pub fn issue_token(&self, user_id: Uuid, value: impl Into<String>) -> Result<(), String> {
        let value = value.into();
        let mut tables = self.lock();
        if !tables.users.iter().any(|user| user.id == user_id) {
            return Err(value);
        }
        tables.tokens.push((user_id, value));
        Ok(())
    }

    /// Number of stored session tokens.
    pub fn token_count(&self) -> usize {
        self.lock().tokens.len()
    }

    /// Snapshot of the stored users.
    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    /// Snapshot of the stored bars.
    pub fn bars(&self) -> Vec<UserBar> {
        self.lock().bars.clone()
    }

    /// Snapshot of the stored cocktails.
    pub fn cocktails(&self) -> Vec<Cocktail> {
        self.lock().cocktails.clone()
    }

    /// Total ingredient rows across all cocktails.
    pub fn ingredient_count(&self) -> usize {
        self.lock()
            .cocktails
            .iter()
            .map(Cocktail::ingredient_count)
            .sum()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_unavailable(&self) -> bool {
        *self
            .unavailable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_unique<T, K, F>(existing: &[T], staged: &[T], key: F, what: &str) -> Result<(), String>
where
    K: Eq + std::hash::Hash + std::fmt::Display,
    F: Fn(&T) -> K,
{
    let mut seen: HashSet<K> = existing.iter().map(&key).collect();
    for row in staged {
        let value = key(row);
        let message = format!("duplicate key value violates unique constraint on {what}: {value}");
        if !seen.insert(value) {
            return Err(message);
        }
    }
    Ok(())
}

#[async_trait]
impl StateInventory for InMemoryState {
    async fn count(&self, family: SnapshotFamily) -> Result<u64, StateInventoryError> {
        if self.is_unavailable() {
            return Err(StateInventoryError::connection("store unavailable"));
        }
        let tables = self.lock();
        let rows = match family {
            SnapshotFamily::Users => tables.users.len(),
            SnapshotFamily::Bars => tables.bars.len(),
            SnapshotFamily::Cocktails => tables.cocktails.len(),
        };
        Ok(rows as u64)
    }
}

#[async_trait]
impl StateExporter for InMemoryState {
    async fn load(&self, family: SnapshotFamily) -> Result<FamilyState, StateExportError> {
        if self.is_unavailable() {
            return Err(StateExportError::connection("store unavailable"));
        }
        let tables = self.lock();
        Ok(match family {
            SnapshotFamily::Users => FamilyState::Users(tables.users.clone()),
            SnapshotFamily::Bars => FamilyState::Bars(tables.bars.clone()),
            SnapshotFamily::Cocktails => {
                let mut cocktails = tables.cocktails.clone();
                for cocktail in &mut cocktails {
                    cocktail
                        .ingredients
                        .sort_by_key(|ingredient| ingredient.order_index);
                }
                FamilyState::Cocktails(cocktails)
            }
        })
    }
}

#[async_trait]
impl StateImporter for InMemoryState {
    async fn insert_users(&self, users: &[User]) -> Result<usize, StateImportError> {
        if self.is_unavailable() {
            return Err(StateImportError::connection("store unavailable"));
        }
        let mut tables = self.lock();
        ensure_unique(&tables.users, users, |user| user.id, "users.id")
            .and_then(|()| {
                ensure_unique(
                    &tables.users,
                    users,
                    |user| user.username.clone(),
                    "users.username",
                )
            })
            .map_err(StateImportError::constraint)?;
        tables.users.extend_from_slice(users);
        Ok(users.len())
    }

    async fn insert_bars(&self, bars: &[UserBar]) -> Result<usize, StateImportError> {
        if self.is_unavailable() {
            return Err(StateImportError::connection("store unavailable"));
        }
        let mut tables = self.lock();
        if let Some(orphan) = bars
            .iter()
            .find(|bar| !tables.users.iter().any(|user| user.id == bar.user_id))
        {
            return Err(StateImportError::constraint(format!(
                "bars.user_id {} violates foreign key constraint on users",
                orphan.user_id
            )));
        }
        ensure_unique(&tables.bars, bars, |bar| bar.id, "bars.id")
            .and_then(|()| ensure_unique(&tables.bars, bars, |bar| bar.user_id, "bars.user_id"))
            .map_err(StateImportError::constraint)?;
        tables.bars.extend_from_slice(bars);
        Ok(bars.len())
    }

    async fn insert_cocktails(&self, cocktails: &[Cocktail]) -> Result<usize, StateImportError> {
        if self.is_unavailable() {
            return Err(StateImportError::connection("store unavailable"));
        }
        let mut tables = self.lock();
        ensure_unique(&tables.cocktails, cocktails, |cocktail| cocktail.id, "cocktails.id")
            .map_err(StateImportError::constraint)?;
        let mut ingredient_ids: HashSet<Uuid> = tables
            .cocktails
            .iter()
            .flat_map(|cocktail| cocktail.ingredients.iter().map(|ingredient| ingredient.id))
            .collect();
        for ingredient in cocktails.iter().flat_map(|cocktail| &cocktail.ingredients) {
            if !ingredient_ids.insert(ingredient.id) {
                return Err(StateImportError::constraint(format!(
                    "duplicate key value violates unique constraint on ingredients.id: {}",
                    ingredient.id
                )));
            }
        }
        tables.cocktails.extend_from_slice(cocktails);
        Ok(cocktails.len())
    }
}

#[async_trait]
impl SessionTokenRepository for InMemoryState {
    async fn purge_all(&self) -> Result<u64, SessionTokenError> {
        if self.is_unavailable() {
            return Err(SessionTokenError::connection("store unavailable"));
        }
        let mut tables = self.lock();
        let purged = tables.tokens.len() as u64;
        tables.tokens.clear();
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_support::fixtures;

    #[rstest]
    #[tokio::test]
    async fn orphan_bars_are_rejected_whole() {
        let state = InMemoryState::new();

        let err = state
            .insert_bars(&fixtures::bars())
            .await
            .expect_err("no users yet");

        assert!(matches!(err, StateImportError::Constraint { .. }));
        assert!(state.bars().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn a_duplicate_in_the_batch_commits_nothing() {
        let state = InMemoryState::new();
        let mut cocktails = fixtures::cocktails();
        cocktails.push(cocktails[0].clone());

        let err = state
            .insert_cocktails(&cocktails)
            .await
            .expect_err("duplicate id");

        assert!(matches!(err, StateImportError::Constraint { .. }));
        assert_eq!(state.count(SnapshotFamily::Cocktails).await, Ok(0));
    }

    #[rstest]
    #[tokio::test]
    async fn tokens_require_an_existing_user() {
        let state = InMemoryState::seeded(fixtures::users(), Vec::new(), Vec::new());

        assert!(state.issue_token(fixtures::ADA_ID, "t-1").is_ok());
        assert!(state.issue_token(Uuid::nil(), "t-2").is_err());
        assert_eq!(state.purge_all().await, Ok(1));
        assert_eq!(state.token_count(), 0);
    }
}
