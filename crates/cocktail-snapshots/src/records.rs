//! Serialisable snapshot records for the three entity families.
//!
//! Field names follow the camelCase keys used by the snapshot files. Unknown
//! keys are ignored on decode so newer writers stay readable by older
//! readers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A cocktail together with its ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CocktailRecord {
    /// Stable cocktail identifier, preserved across restore.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Person or venue credited with the recipe.
    pub creator: String,
    /// Preparation style such as "Shaken" or "Stirred".
    pub style: String,
    /// Free-form tasting or preparation note.
    pub comment: String,
    /// Menu category.
    pub cocktail_category: String,
    /// Optional image reference; encoded as `null` when absent.
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    /// Ingredients in display order.
    pub ingredients: Vec<IngredientRecord>,
}

/// One ingredient line of a cocktail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRecord {
    /// Stable ingredient identifier, preserved across restore.
    pub id: Uuid,
    /// Measured amount.
    pub volume: f64,
    /// Unit of [`IngredientRecord::volume`], e.g. "ml".
    pub unit: String,
    /// Ingredient name.
    pub name: String,
    /// Optional spirit classification; encoded as `null` when absent.
    #[serde(default)]
    pub tag: Option<String>,
    /// Position of the ingredient within its cocktail.
    pub order_index: i32,
}

/// Account role as stored in user snapshots.
///
/// Decoding never fails on an unfamiliar role string: anything that is not a
/// known role becomes [`RoleRecord::Guest`], the least privileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoleRecord {
    /// Read-only access.
    #[default]
    Guest,
    /// May add and edit cocktails.
    Creator,
    /// Full administrative access.
    Admin,
}

impl RoleRecord {
    /// Return the lowercase wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Creator => "creator",
            Self::Admin => "admin",
        }
    }

    /// Map a wire name onto a role, falling back to [`RoleRecord::Guest`].
    ///
    /// # Example
    ///
    /// ```
    /// use cocktail_snapshots::RoleRecord;
    ///
    /// assert_eq!(RoleRecord::from_wire("Admin"), RoleRecord::Admin);
    /// assert_eq!(RoleRecord::from_wire("superadmin"), RoleRecord::Guest);
    /// ```
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else if trimmed.eq_ignore_ascii_case("creator") {
            Self::Creator
        } else {
            Self::Guest
        }
    }
}

impl Serialize for RoleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoleRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Stable user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Opaque password hash, copied verbatim.
    pub password_hash: String,
    /// Account role.
    pub role: RoleRecord,
}

/// A user's bar: stocked items, favourites and removed cocktails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarRecord {
    /// Stable bar identifier.
    pub id: Uuid,
    /// Owning user; each user has at most one bar.
    pub user_id: Uuid,
    /// Bottles and other items the user has at hand.
    pub bar_items: Vec<BarItemRecord>,
    /// Identifiers of favourite cocktails.
    pub favorite_cocktails: Vec<String>,
    /// Copies of cocktails the user removed from their bar.
    pub deleted_cocktails: Vec<RemovedCocktailRecord>,
}

/// An item stocked in a bar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarItemRecord {
    /// Item name.
    pub name: String,
    /// Item category.
    pub category: String,
}

/// A denormalised copy of a cocktail that was removed from a bar.
///
/// The copy outlives the original cocktail row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedCocktailRecord {
    /// Identifier of the removed cocktail.
    pub id: String,
    /// Cocktail name at removal time.
    pub name: String,
    /// Cocktail creator at removal time.
    pub creator: String,
    /// When the cocktail was removed, in RFC 3339.
    pub date: DateTime<Utc>,
}
