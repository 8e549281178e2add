//! PostgreSQL-backed snapshot lifecycle adapters.
//!
//! One repository implements the inventory, export and import ports so the
//! lifecycle context can share a single pool handle. Every bulk insert runs
//! inside its own transaction; reads of one family share a transaction so a
//! snapshot sees a single MVCC view.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    StateExportError, StateExporter, StateImportError, StateImporter, StateInventory,
    StateInventoryError,
};
use crate::domain::{Cocktail, FamilyState, Ingredient, SnapshotFamily, User, UserBar};

use super::error_mapping::{map_diesel_error, map_insert_error, map_pool_error};
use super::models::{BarRow, CocktailRow, IngredientRow, UserRow};
use super::pool::DbPool;
use super::schema::{bars, cocktails, ingredients, users};

/// Rows per multi-row `INSERT`, keeping bind parameters well under the
/// PostgreSQL limit of 65535.
const INSERT_CHUNK: usize = 1000;

/// Diesel-backed implementation of the state inventory, export and import
/// ports.
#[derive(Clone)]
pub struct DieselStateRepository {
    pool: DbPool,
}

impl DieselStateRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_import_error(error: diesel::result::Error) -> StateImportError {
    map_insert_error(
        error,
        StateImportError::query,
        StateImportError::connection,
        StateImportError::constraint,
    )
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl StateInventory for DieselStateRepository {
    async fn count(&self, family: SnapshotFamily) -> Result<u64, StateInventoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StateInventoryError::connection))?;
        let count: i64 = match family {
            SnapshotFamily::Users => users::table.count().get_result(&mut conn).await,
            SnapshotFamily::Bars => bars::table.count().get_result(&mut conn).await,
            SnapshotFamily::Cocktails => cocktails::table.count().get_result(&mut conn).await,
        }
        .map_err(|err| {
            map_diesel_error(
                err,
                StateInventoryError::query,
                StateInventoryError::connection,
            )
        })?;
        Ok(to_count(count))
    }
}

type CocktailRows = (Vec<CocktailRow>, Vec<IngredientRow>);

async fn load_cocktail_rows(
    conn: &mut AsyncPgConnection,
) -> Result<CocktailRows, diesel::result::Error> {
    conn.transaction(|conn| {
        async move {
            let cocktail_rows: Vec<CocktailRow> = cocktails::table
                .select(CocktailRow::as_select())
                .order_by((cocktails::name, cocktails::id))
                .load(conn)
                .await?;
            let ingredient_rows: Vec<IngredientRow> = ingredients::table
                .select(IngredientRow::as_select())
                .order_by((
                    ingredients::cocktail_id,
                    ingredients::order_index,
                    ingredients::id,
                ))
                .load(conn)
                .await?;
            Ok((cocktail_rows, ingredient_rows))
        }
        .scope_boxed()
    })
    .await
}

fn assemble_cocktails(
    cocktail_rows: Vec<CocktailRow>,
    ingredient_rows: Vec<IngredientRow>,
) -> Vec<Cocktail> {
    let mut by_cocktail: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
    for row in ingredient_rows {
        by_cocktail
            .entry(row.cocktail_id)
            .or_default()
            .push(Ingredient::from(row));
    }
    cocktail_rows
        .into_iter()
        .map(|row| {
            let owned = by_cocktail.remove(&row.id).unwrap_or_default();
            row.into_domain(owned)
        })
        .collect()
}

#[async_trait]
impl StateExporter for DieselStateRepository {
    async fn load(&self, family: SnapshotFamily) -> Result<FamilyState, StateExportError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StateExportError::connection))?;
        let map_err =
            |err| map_diesel_error(err, StateExportError::query, StateExportError::connection);

        match family {
            SnapshotFamily::Users => {
                let rows: Vec<UserRow> = users::table
                    .select(UserRow::as_select())
                    .order_by(users::username)
                    .load(&mut conn)
                    .await
                    .map_err(map_err)?;
                Ok(FamilyState::Users(rows.into_iter().map(User::from).collect()))
            }
            SnapshotFamily::Bars => {
                let rows: Vec<BarRow> = bars::table
                    .select(BarRow::as_select())
                    .order_by(bars::id)
                    .load(&mut conn)
                    .await
                    .map_err(map_err)?;
                let bars = rows
                    .into_iter()
                    .map(BarRow::into_domain)
                    .collect::<Result<Vec<UserBar>, _>>()
                    .map_err(|err| StateExportError::corrupt(format!("bar payload: {err}")))?;
                Ok(FamilyState::Bars(bars))
            }
            SnapshotFamily::Cocktails => {
                let (cocktail_rows, ingredient_rows) =
                    load_cocktail_rows(&mut conn).await.map_err(map_err)?;
                Ok(FamilyState::Cocktails(assemble_cocktails(
                    cocktail_rows,
                    ingredient_rows,
                )))
            }
        }
    }
}

#[async_trait]
impl StateImporter for DieselStateRepository {
    async fn insert_users(&self, users: &[User]) -> Result<usize, StateImportError> {
        let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StateImportError::connection))?;

        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK) {
                    inserted += diesel::insert_into(users::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_import_error)
    }

    async fn insert_bars(&self, bars: &[UserBar]) -> Result<usize, StateImportError> {
        let rows = bars
            .iter()
            .map(BarRow::from_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| StateImportError::query(format!("serialise bar payload: {err}")))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StateImportError::connection))?;

        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK) {
                    inserted += diesel::insert_into(bars::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_import_error)
    }

    async fn insert_cocktails(&self, cocktails: &[Cocktail]) -> Result<usize, StateImportError> {
        let batches: Vec<(CocktailRow, Vec<IngredientRow>)> = cocktails
            .iter()
            .map(|cocktail| {
                let ingredient_rows = cocktail
                    .ingredients
                    .iter()
                    .map(|ingredient| IngredientRow::from_domain(cocktail.id, ingredient))
                    .collect();
                (CocktailRow::from(cocktail), ingredient_rows)
            })
            .collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StateImportError::connection))?;

        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for (cocktail_row, ingredient_rows) in &batches {
                    inserted += diesel::insert_into(cocktails::table)
                        .values(cocktail_row)
                        .execute(conn)
                        .await?;
                    if !ingredient_rows.is_empty() {
                        diesel::insert_into(ingredients::table)
                            .values(ingredient_rows)
                            .execute(conn)
                            .await?;
                    }
                }
                Ok(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_import_error)
    }
}

#[cfg(test)]
mod tests {
    //! Row assembly without a database.

    use rstest::rstest;

    use super::*;
    use crate::test_support::fixtures;

    #[rstest]
    fn ingredients_are_grouped_under_their_cocktail() {
        let expected = fixtures::cocktails();
        let cocktail_rows = expected.iter().map(CocktailRow::from).collect();
        let ingredient_rows = expected
            .iter()
            .rev()
            .flat_map(|cocktail| {
                cocktail
                    .ingredients
                    .iter()
                    .map(|ingredient| IngredientRow::from_domain(cocktail.id, ingredient))
            })
            .collect();

        assert_eq!(assemble_cocktails(cocktail_rows, ingredient_rows), expected);
    }

    #[rstest]
    fn cocktails_without_ingredients_get_an_empty_list() {
        let mut cocktail = fixtures::cocktails().remove(0);
        cocktail.ingredients.clear();

        let assembled = assemble_cocktails(vec![CocktailRow::from(&cocktail)], Vec::new());

        assert_eq!(assembled, vec![cocktail]);
    }

    #[rstest]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(to_count(-1), 0);
        assert_eq!(to_count(42), 42);
    }
}
