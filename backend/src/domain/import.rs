//! Operator-triggered bulk import of cocktails.
//!
//! The whole file is decoded before anything is written, then every cocktail
//! and ingredient is inserted in one transaction. Runs regardless of what the
//! store already holds.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cocktail_snapshots::CodecError;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::decode_cocktails;
use crate::domain::ports::{SnapshotStore, SnapshotStoreError, StateImportError, StateImporter};

/// Errors reported to the operator. The store is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The import file could not be read.
    #[error("failed to read import file {path:?}: {source}")]
    Read {
        /// File requested.
        path: PathBuf,
        /// Underlying store error.
        #[source]
        source: SnapshotStoreError,
    },
    /// The file does not match the cocktail schema.
    #[error("import file {path:?} is malformed: {source}")]
    Decode {
        /// File requested.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: CodecError,
    },
    /// An insert failed and the transaction was rolled back.
    #[error("import transaction rolled back: {0}")]
    Transaction(#[from] StateImportError),
}

/// Summary of a committed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// File imported.
    pub path: PathBuf,
    /// Cocktails committed.
    pub cocktails: usize,
    /// Ingredients committed across all cocktails.
    pub ingredients: usize,
}

/// Service replaying a cocktail file into the store.
pub struct BulkImportService<S, M> {
    store: Arc<S>,
    importer: Arc<M>,
    default_path: PathBuf,
}

impl<S, M> BulkImportService<S, M> {
    /// Create an import service reading `default_path` when no file is given.
    pub fn new(store: Arc<S>, importer: Arc<M>, default_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            importer,
            default_path: default_path.into(),
        }
    }

    /// File read when the operator names none.
    pub fn default_path(&self) -> &Path {
        &self.default_path
    }
}

impl<S, M> BulkImportService<S, M>
where
    S: SnapshotStore,
    M: StateImporter,
{
    /// Import `path`, or the default import file.
    ///
    /// # Errors
    /// Returns [`ImportError`]; nothing has been committed when it does.
    pub async fn import(&self, path: Option<&Path>) -> Result<ImportReport, ImportError> {
        let path = path.unwrap_or(&self.default_path).to_path_buf();
        match self.import_from(&path).await {
            Ok(report) => {
                info!(
                    path = %path.display(),
                    count = report.cocktails,
                    ingredients = report.ingredients,
                    "cocktail import committed"
                );
                Ok(report)
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "cocktail import failed");
                Err(err)
            }
        }
    }

    async fn import_from(&self, path: &Path) -> Result<ImportReport, ImportError> {
        let bytes = self
            .store
            .read(path)
            .await
            .map_err(|source| ImportError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let cocktails = decode_cocktails(&bytes).map_err(|source| ImportError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let committed = self.importer.insert_cocktails(&cocktails).await?;
        Ok(ImportReport {
            path: path.to_path_buf(),
            cocktails: committed,
            ingredients: cocktails.iter().map(|cocktail| cocktail.ingredient_count()).sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Import behaviour against mocked ports.

    use rstest::rstest;

    use super::*;
    use crate::domain::encode_cocktails;
    use crate::domain::ports::{MockSnapshotStore, MockStateImporter};
    use crate::test_support::fixtures;

    const DEFAULT: &str = "Resources/snapshots/Cocktails/cocktailsOutput.json";

    fn service(
        store: MockSnapshotStore,
        importer: MockStateImporter,
    ) -> BulkImportService<MockSnapshotStore, MockStateImporter> {
        BulkImportService::new(Arc::new(store), Arc::new(importer), DEFAULT)
    }

    fn three_valid_then_malformed() -> Vec<u8> {
        let valid = String::from_utf8(
            encode_cocktails(&fixtures::cocktails()[..3]).expect("fixtures encode"),
        )
        .expect("utf-8");
        let trimmed = valid.trim_end().trim_end_matches(']');
        format!("{trimmed}, {{\"id\": \"broken\", \"name\": 7}}]").into_bytes()
    }

    #[rstest]
    #[tokio::test]
    async fn default_path_is_used_when_none_given() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_read()
            .withf(|path| path == Path::new(DEFAULT))
            .times(1)
            .returning(|_| Ok(encode_cocktails(&fixtures::cocktails()).expect("encode")));
        let mut importer = MockStateImporter::new();
        importer
            .expect_insert_cocktails()
            .times(1)
            .returning(|cocktails| Ok(cocktails.len()));

        let report = service(store, importer)
            .import(None)
            .await
            .expect("import succeeds");

        let expected_ingredients: usize = fixtures::cocktails()
            .iter()
            .map(|cocktail| cocktail.ingredients.len())
            .sum();
        assert_eq!(report.path, PathBuf::from(DEFAULT));
        assert_eq!(report.cocktails, fixtures::cocktails().len());
        assert_eq!(report.ingredients, expected_ingredients);
    }

    #[rstest]
    #[tokio::test]
    async fn a_malformed_entry_commits_nothing() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_read()
            .returning(|_| Ok(three_valid_then_malformed()));
        let mut importer = MockStateImporter::new();
        importer.expect_insert_cocktails().times(0);

        let err = service(store, importer)
            .import(Some(Path::new("upload.json")))
            .await
            .expect_err("decode fails");

        assert!(matches!(err, ImportError::Decode { path, .. } if path == Path::new("upload.json")));
    }

    #[rstest]
    #[tokio::test]
    async fn unreadable_file_is_a_read_error() {
        let mut store = MockSnapshotStore::new();
        store.expect_read().returning(|path| {
            Err(SnapshotStoreError::io(path, "No such file or directory (os error 2)"))
        });
        let mut importer = MockStateImporter::new();
        importer.expect_insert_cocktails().times(0);

        let err = service(store, importer)
            .import(Some(Path::new("missing.json")))
            .await
            .expect_err("read fails");

        assert!(matches!(err, ImportError::Read { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn rolled_back_transaction_is_reported() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_read()
            .returning(|_| Ok(encode_cocktails(&fixtures::cocktails()).expect("encode")));
        let mut importer = MockStateImporter::new();
        importer.expect_insert_cocktails().returning(|_| {
            Err(StateImportError::constraint(
                "duplicate key value violates unique constraint \"cocktails_pkey\"",
            ))
        });

        let err = service(store, importer)
            .import(None)
            .await
            .expect_err("insert fails");

        assert!(matches!(
            err,
            ImportError::Transaction(StateImportError::Constraint { .. })
        ));
    }
}
