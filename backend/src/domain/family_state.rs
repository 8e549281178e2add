//! Full state of one snapshot family and its snapshot encoding.
//!
//! Domain entities are converted to the `cocktail_snapshots` records at this
//! boundary; the records define the file format.

use cocktail_snapshots::{
    BarItemRecord, BarRecord, CocktailRecord, CodecError, IngredientRecord, RemovedCocktailRecord,
    RoleRecord, UserRecord, decode, encode,
};

use super::{BarItem, Cocktail, Ingredient, RemovedCocktail, Role, SnapshotFamily, User, UserBar};

/// Every row of one family, as captured by or restored from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum FamilyState {
    /// All users.
    Users(Vec<User>),
    /// All bars.
    Bars(Vec<UserBar>),
    /// All cocktails with their ingredients.
    Cocktails(Vec<Cocktail>),
}

impl FamilyState {
    /// Family this state belongs to.
    pub const fn family(&self) -> SnapshotFamily {
        match self {
            Self::Users(_) => SnapshotFamily::Users,
            Self::Bars(_) => SnapshotFamily::Bars,
            Self::Cocktails(_) => SnapshotFamily::Cocktails,
        }
    }

    /// Number of top-level entities (users, bars or cocktails).
    pub fn len(&self) -> usize {
        match self {
            Self::Users(users) => users.len(),
            Self::Bars(bars) => bars.len(),
            Self::Cocktails(cocktails) => cocktails.len(),
        }
    }

    /// True when the family holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode as a canonical snapshot file.
    ///
    /// # Errors
    /// Returns [`CodecError::Encode`] when a value cannot be represented.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Users(users) => {
                encode(&users.iter().map(user_record).collect::<Vec<_>>())
            }
            Self::Bars(bars) => encode(&bars.iter().map(bar_record).collect::<Vec<_>>()),
            Self::Cocktails(cocktails) => {
                encode(&cocktails.iter().map(cocktail_record).collect::<Vec<_>>())
            }
        }
    }

    /// Decode a snapshot file of `family`.
    ///
    /// # Errors
    /// Returns [`CodecError::Decode`] when the bytes are not a valid snapshot
    /// of that family.
    ///
    /// # Examples
    /// ```
    /// use cocktails::domain::{FamilyState, Role, SnapshotFamily};
    ///
    /// let json = br#"[{"id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
    ///                  "username": "ada", "passwordHash": "x", "role": "superadmin"}]"#;
    /// let FamilyState::Users(users) = FamilyState::decode(SnapshotFamily::Users, json).unwrap()
    /// else {
    ///     unreachable!()
    /// };
    /// assert_eq!(users[0].role, Role::Guest);
    /// ```
    pub fn decode(family: SnapshotFamily, bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(match family {
            SnapshotFamily::Users => Self::Users(
                decode::<UserRecord>(bytes)?
                    .into_iter()
                    .map(User::from)
                    .collect(),
            ),
            SnapshotFamily::Bars => Self::Bars(
                decode::<BarRecord>(bytes)?
                    .into_iter()
                    .map(UserBar::from)
                    .collect(),
            ),
            SnapshotFamily::Cocktails => Self::Cocktails(decode_cocktails(bytes)?),
        })
    }
}

/// Decode a cocktail snapshot or import file.
///
/// # Errors
/// Returns [`CodecError::Decode`] when the bytes do not match the cocktail
/// schema.
pub fn decode_cocktails(bytes: &[u8]) -> Result<Vec<Cocktail>, CodecError> {
    Ok(decode::<CocktailRecord>(bytes)?
        .into_iter()
        .map(Cocktail::from)
        .collect())
}

/// Encode cocktails in the snapshot format.
///
/// # Errors
/// Returns [`CodecError::Encode`] when a value cannot be represented.
pub fn encode_cocktails(cocktails: &[Cocktail]) -> Result<Vec<u8>, CodecError> {
    FamilyState::Cocktails(cocktails.to_vec()).encode()
}

fn user_record(user: &User) -> UserRecord {
    UserRecord {
        id: user.id,
        username: user.username.clone(),
        password_hash: user.password_hash.clone(),
        role: match user.role {
            Role::Guest => RoleRecord::Guest,
            Role::Creator => RoleRecord::Creator,
            Role::Admin => RoleRecord::Admin,
        },
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            password_hash: record.password_hash,
            role: match record.role {
                RoleRecord::Guest => Role::Guest,
                RoleRecord::Creator => Role::Creator,
                RoleRecord::Admin => Role::Admin,
            },
        }
    }
}

fn bar_record(bar: &UserBar) -> BarRecord {
    BarRecord {
        id: bar.id,
        user_id: bar.user_id,
        bar_items: bar
            .items
            .iter()
            .map(|item| BarItemRecord {
                name: item.name.clone(),
                category: item.category.clone(),
            })
            .collect(),
        favorite_cocktails: bar.favourites.clone(),
        deleted_cocktails: bar
            .removed
            .iter()
            .map(|removed| RemovedCocktailRecord {
                id: removed.id.clone(),
                name: removed.name.clone(),
                creator: removed.creator.clone(),
                date: removed.removed_at,
            })
            .collect(),
    }
}

impl From<BarRecord> for UserBar {
    fn from(record: BarRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            items: record
                .bar_items
                .into_iter()
                .map(|item| BarItem {
                    name: item.name,
                    category: item.category,
                })
                .collect(),
            favourites: record.favorite_cocktails,
            removed: record
                .deleted_cocktails
                .into_iter()
                .map(|removed| RemovedCocktail {
                    id: removed.id,
                    name: removed.name,
                    creator: removed.creator,
                    removed_at: removed.date,
                })
                .collect(),
        }
    }
}

fn cocktail_record(cocktail: &Cocktail) -> CocktailRecord {
    CocktailRecord {
        id: cocktail.id,
        name: cocktail.name.clone(),
        creator: cocktail.creator.clone(),
        style: cocktail.style.clone(),
        comment: cocktail.comment.clone(),
        cocktail_category: cocktail.category.clone(),
        image_url: cocktail.image_url.clone(),
        ingredients: cocktail
            .ingredients
            .iter()
            .map(|ingredient| IngredientRecord {
                id: ingredient.id,
                volume: ingredient.volume,
                unit: ingredient.unit.clone(),
                name: ingredient.name.clone(),
                tag: ingredient.tag.clone(),
                order_index: ingredient.order_index,
            })
            .collect(),
    }
}

impl From<CocktailRecord> for Cocktail {
    fn from(record: CocktailRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            creator: record.creator,
            style: record.style,
            comment: record.comment,
            category: record.cocktail_category,
            image_url: record.image_url,
            ingredients: record
                .ingredients
                .into_iter()
                .map(|ingredient| Ingredient {
                    id: ingredient.id,
                    volume: ingredient.volume,
                    unit: ingredient.unit,
                    name: ingredient.name,
                    tag: ingredient.tag,
                    order_index: ingredient.order_index,
                })
                .collect(),
        }
    }
}
