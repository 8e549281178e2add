//! Snapshot file records and canonical JSON encoding for the cocktails service.
//!
//! This crate owns the on-disk shape of cocktail, bar and user snapshots. It
//! is deliberately independent of the backend domain types so the record
//! format can be reused by operator tooling without pulling in persistence
//! or HTTP dependencies.
//!
//! # Overview
//!
//! - [`records`] holds the serialisable record types for each entity family.
//! - [`encode`] and [`decode`] produce and consume pretty-printed JSON arrays
//!   whose object keys are sorted at every nesting level.
//! - [`write_new`] and [`write_replace`] publish files through a temporary
//!   file and rename so readers never observe a partially written snapshot.
//! - [`parse_notes`] converts the plain-text cocktail notes format into
//!   import-ready [`CocktailRecord`] values.
//!
//! # Example
//!
//! ```
//! use cocktail_snapshots::{RoleRecord, UserRecord, decode};
//!
//! let json = br#"[{
//!     "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!     "username": "ada",
//!     "passwordHash": "$2b$12$opaque",
//!     "role": "superadmin"
//! }]"#;
//!
//! let users: Vec<UserRecord> = decode(json).expect("valid user snapshot");
//! assert_eq!(users.len(), 1);
//! assert_eq!(users.first().map(|user| user.role), Some(RoleRecord::Guest));
//! ```

mod atomic_io;
mod codec;
mod error;
mod notes;
pub mod notes_cli;
pub mod records;

pub use atomic_io::{write_new, write_replace};
pub use codec::{decode, encode};
pub use error::{CodecError, WriteError};
pub use notes::{TagKeywords, parse_notes};
pub use records::{
    BarItemRecord, BarRecord, CocktailRecord, IngredientRecord, RemovedCocktailRecord,
    RoleRecord, UserRecord,
};
