//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Conversions to and from
//! domain entities live here so adapters stay thin.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BarItem, Cocktail, Ingredient, RemovedCocktail, Role, User, UserBar};

use super::schema::{bars, cocktails, ingredients, users};

/// Row of the `users` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role: Role::from_stored(&row.role),
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.as_str().to_owned(),
        }
    }
}

/// Row of the `bars` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BarRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bar_items: serde_json::Value,
    pub favorite_cocktails: Vec<String>,
    pub deleted_cocktails: serde_json::Value,
}

/// JSON element stored in `bars.bar_items`.
#[derive(Debug, Serialize, Deserialize)]
struct BarItemJson {
    name: String,
    category: String,
}

/// JSON element stored in `bars.deleted_cocktails`.
#[derive(Debug, Serialize, Deserialize)]
struct RemovedCocktailJson {
    id: String,
    name: String,
    creator: String,
    date: DateTime<Utc>,
}

impl BarRow {
    pub(crate) fn from_domain(bar: &UserBar) -> Result<Self, serde_json::Error> {
        let items: Vec<BarItemJson> = bar
            .items
            .iter()
            .map(|item| BarItemJson {
                name: item.name.clone(),
                category: item.category.clone(),
            })
            .collect();
        let removed: Vec<RemovedCocktailJson> = bar
            .removed
            .iter()
            .map(|removed| RemovedCocktailJson {
                id: removed.id.clone(),
                name: removed.name.clone(),
                creator: removed.creator.clone(),
                date: removed.removed_at,
            })
            .collect();
        Ok(Self {
            id: bar.id,
            user_id: bar.user_id,
            bar_items: serde_json::to_value(items)?,
            favorite_cocktails: bar.favourites.clone(),
            deleted_cocktails: serde_json::to_value(removed)?,
        })
    }

    pub(crate) fn into_domain(self) -> Result<UserBar, serde_json::Error> {
        let items: Vec<BarItemJson> = serde_json::from_value(self.bar_items)?;
        let removed: Vec<RemovedCocktailJson> = serde_json::from_value(self.deleted_cocktails)?;
        Ok(UserBar {
            id: self.id,
            user_id: self.user_id,
            items: items
                .into_iter()
                .map(|item| BarItem {
                    name: item.name,
                    category: item.category,
                })
                .collect(),
            favourites: self.favorite_cocktails,
            removed: removed
                .into_iter()
                .map(|removed| RemovedCocktail {
                    id: removed.id,
                    name: removed.name,
                    creator: removed.creator,
                    removed_at: removed.date,
                })
                .collect(),
        })
    }
}

/// Row of the `cocktails` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = cocktails)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CocktailRow {
    pub id: Uuid,
    pub name: String,
    pub creator: String,
    pub style: String,
    pub comment: String,
    pub cocktail_category: String,
    pub image_url: Option<String>,
}

impl From<&Cocktail> for CocktailRow {
    fn from(cocktail: &Cocktail) -> Self {
        Self {
            id: cocktail.id,
            name: cocktail.name.clone(),
            creator: cocktail.creator.clone(),
            style: cocktail.style.clone(),
            comment: cocktail.comment.clone(),
            cocktail_category: cocktail.category.clone(),
            image_url: cocktail.image_url.clone(),
        }
    }
}

impl CocktailRow {
    pub(crate) fn into_domain(self, ingredients: Vec<Ingredient>) -> Cocktail {
        Cocktail {
            id: self.id,
            name: self.name,
            creator: self.creator,
            style: self.style,
            comment: self.comment,
            category: self.cocktail_category,
            image_url: self.image_url,
            ingredients,
        }
    }
}

/// Row of the `ingredients` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: Uuid,
    pub cocktail_id: Uuid,
    pub volume: f64,
    pub unit: String,
    pub name: String,
    pub tag: Option<String>,
    pub order_index: i32,
}

impl IngredientRow {
    pub(crate) fn from_domain(cocktail_id: Uuid, ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            cocktail_id,
            volume: ingredient.volume,
            unit: ingredient.unit.clone(),
            name: ingredient.name.clone(),
            tag: ingredient.tag.clone(),
            order_index: ingredient.order_index,
        }
    }
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            volume: row.volume,
            unit: row.unit,
            name: row.name,
            tag: row.tag,
            order_index: row.order_index,
        }
    }
}
