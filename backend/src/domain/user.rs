//! User accounts as seen by the snapshot lifecycle.
//!
//! Password hashes are opaque strings; this crate never derives or verifies
//! them.

use std::fmt;

use uuid::Uuid;

/// Account role, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Read-only access.
    #[default]
    Guest,
    /// May add and edit cocktails.
    Creator,
    /// Full administrative access.
    Admin,
}

impl Role {
    /// Stable lowercase name used in storage and snapshots.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Creator => "creator",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role name. Unrecognised names map to [`Role::Guest`].
    ///
    /// # Examples
    /// ```
    /// use cocktails::domain::Role;
    ///
    /// assert_eq!(Role::from_stored("creator"), Role::Creator);
    /// assert_eq!(Role::from_stored("superadmin"), Role::Guest);
    /// ```
    pub fn from_stored(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "creator" => Self::Creator,
            _ => Self::Guest,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Opaque password hash.
    pub password_hash: String,
    /// Account role.
    pub role: Role,
}
