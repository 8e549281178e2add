//! Per-user bar state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user's bar. Each user owns at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBar {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Items the user has in stock.
    pub items: Vec<BarItem>,
    /// Favourite cocktail identifiers. Not enforced as foreign keys.
    pub favourites: Vec<String>,
    /// Cocktails the user removed, kept as copies.
    pub removed: Vec<RemovedCocktail>,
}

/// An item stocked in a bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarItem {
    /// Item name.
    pub name: String,
    /// Item category.
    pub category: String,
}

/// Copy of a cocktail taken when it was removed from a bar.
///
/// The copy is independent of the cocktail row and survives its deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedCocktail {
    /// Identifier of the original cocktail.
    pub id: String,
    /// Name at removal time.
    pub name: String,
    /// Creator at removal time.
    pub creator: String,
    /// Removal time.
    pub removed_at: DateTime<Utc>,
}
