//! Tests for the restore gates and orchestrator.

use std::path::{Path, PathBuf};

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockSnapshotStore, MockStateImporter, MockStateInventory};
use crate::test_support::fixtures;

fn inventory_with(users: u64, bars: u64, cocktails: u64) -> MockStateInventory {
    let mut inventory = MockStateInventory::new();
    inventory.expect_count().returning(move |family| {
        Ok(match family {
            SnapshotFamily::Users => users,
            SnapshotFamily::Bars => bars,
            SnapshotFamily::Cocktails => cocktails,
        })
    });
    inventory
}

fn snapshot_bytes(family: SnapshotFamily) -> Vec<u8> {
    let state = match family {
        SnapshotFamily::Users => FamilyState::Users(fixtures::users()),
        SnapshotFamily::Bars => FamilyState::Bars(fixtures::bars()),
        SnapshotFamily::Cocktails => FamilyState::Cocktails(fixtures::cocktails()),
    };
    state.encode().expect("fixtures encode")
}

fn family_of(path: &Path) -> SnapshotFamily {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("utf-8 file name");
    SnapshotFamily::RESTORE_ORDER
        .into_iter()
        .find(|family| name.starts_with(&format!("{}-", family.as_str())))
        .expect("known family prefix")
}

/// Store holding one snapshot per state series and one cocktail export.
fn full_store() -> MockSnapshotStore {
    let mut store = MockSnapshotStore::new();
    store.expect_latest().returning(|series| {
        Ok(Some(PathBuf::from(series.family().directory()).join(format!(
            "{}-2024-06-01T00:00:00Z.json",
            series.stem()
        ))))
    });
    store
        .expect_read()
        .returning(|path| Ok(snapshot_bytes(family_of(path))));
    store
}

fn orchestrator(
    inventory: MockStateInventory,
    store: MockSnapshotStore,
    importer: MockStateImporter,
) -> RestoreOrchestrator<MockStateInventory, MockSnapshotStore, MockStateImporter> {
    RestoreOrchestrator::new(Arc::new(inventory), Arc::new(store), Arc::new(importer))
}

#[rstest]
#[case(0, 0, 0, true)]
#[case(1, 0, 0, false)]
#[case(0, 4, 0, false)]
#[case(0, 0, 12, false)]
#[tokio::test]
async fn whole_store_gate_requires_every_family_empty(
    #[case] users: u64,
    #[case] bars: u64,
    #[case] cocktails: u64,
    #[case] expected: bool,
) {
    let inventory = inventory_with(users, bars, cocktails);

    let empty = whole_store_is_empty(&inventory)
        .await
        .expect("count succeeds");

    assert_eq!(empty, expected);
}

#[rstest]
#[case(5, 5, 0, true)]
#[case(0, 0, 3, false)]
#[tokio::test]
async fn cocktail_gate_ignores_users_and_bars(
    #[case] users: u64,
    #[case] bars: u64,
    #[case] cocktails: u64,
    #[case] expected: bool,
) {
    let inventory = inventory_with(users, bars, cocktails);

    let empty = cocktails_are_empty(&inventory)
        .await
        .expect("count succeeds");

    assert_eq!(empty, expected);
}

#[rstest]
#[case(1, 0, 0)]
#[case(0, 1, 0)]
#[case(0, 0, 1)]
#[tokio::test]
async fn populated_store_is_skipped_without_writes(
    #[case] users: u64,
    #[case] bars: u64,
    #[case] cocktails: u64,
) {
    let mut store = MockSnapshotStore::new();
    store.expect_latest().times(0);
    store.expect_read().times(0);
    let mut importer = MockStateImporter::new();
    importer.expect_insert_users().times(0);
    importer.expect_insert_bars().times(0);
    importer.expect_insert_cocktails().times(0);

    let report = orchestrator(inventory_with(users, bars, cocktails), store, importer)
        .restore_if_empty()
        .await;

    assert_eq!(
        report.trail,
        [RestoreState::CheckingEmpty, RestoreState::Skipped]
    );
    assert!(report.families.is_empty());
}

#[rstest]
#[tokio::test]
async fn empty_store_restores_parents_first() {
    let mut seq = mockall::Sequence::new();
    let mut importer = MockStateImporter::new();
    importer
        .expect_insert_users()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|users| Ok(users.len()));
    importer
        .expect_insert_bars()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|bars| Ok(bars.len()));
    importer
        .expect_insert_cocktails()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|cocktails| Ok(cocktails.len()));

    let report = orchestrator(inventory_with(0, 0, 0), full_store(), importer)
        .restore_if_empty()
        .await;

    assert_eq!(
        report.trail,
        [
            RestoreState::CheckingEmpty,
            RestoreState::Restoring(SnapshotFamily::Users),
            RestoreState::Restoring(SnapshotFamily::Bars),
            RestoreState::Restoring(SnapshotFamily::Cocktails),
            RestoreState::Done,
        ]
    );
    assert_eq!(report.restored(SnapshotFamily::Users), fixtures::users().len());
    assert_eq!(report.restored(SnapshotFamily::Bars), fixtures::bars().len());
    assert_eq!(
        report.restored(SnapshotFamily::Cocktails),
        fixtures::cocktails().len()
    );
}

#[rstest]
#[tokio::test]
async fn a_missing_snapshot_skips_only_that_family() {
    let mut store = MockSnapshotStore::new();
    store
        .expect_latest()
        .returning(|series| match series.family() {
            SnapshotFamily::Bars => Ok(None),
            family => Ok(Some(PathBuf::from(format!(
                "{}-2024-06-01T00:00:00Z.json",
                family.as_str()
            )))),
        });
    store
        .expect_read()
        .returning(|path| Ok(snapshot_bytes(family_of(path))));
    let mut importer = MockStateImporter::new();
    importer
        .expect_insert_users()
        .times(1)
        .returning(|users| Ok(users.len()));
    importer.expect_insert_bars().times(0);
    importer
        .expect_insert_cocktails()
        .times(1)
        .returning(|cocktails| Ok(cocktails.len()));

    let report = orchestrator(inventory_with(0, 0, 0), store, importer)
        .restore_if_empty()
        .await;

    assert_eq!(report.outcome(), RestoreState::Done);
    assert!(matches!(
        report.families.get(1).map(|entry| &entry.status),
        Some(FamilyRestoreStatus::NoSnapshot)
    ));
}

#[rstest]
#[tokio::test]
async fn a_failed_family_does_not_stop_later_families() {
    let mut importer = MockStateImporter::new();
    importer
        .expect_insert_users()
        .returning(|users| Ok(users.len()));
    importer.expect_insert_bars().returning(|_| {
        Err(StateImportError::constraint(
            "insert or update on table \"bars\" violates foreign key constraint",
        ))
    });
    importer
        .expect_insert_cocktails()
        .times(1)
        .returning(|cocktails| Ok(cocktails.len()));

    let report = orchestrator(inventory_with(0, 0, 0), full_store(), importer)
        .restore_if_empty()
        .await;

    assert_eq!(report.outcome(), RestoreState::Failed);
    assert_eq!(report.restored(SnapshotFamily::Bars), 0);
    assert!(matches!(
        report.families.get(1).map(|entry| &entry.status),
        Some(FamilyRestoreStatus::Failed(RestoreError::Transaction(
            StateImportError::Constraint { .. }
        )))
    ));
    assert_eq!(
        report.restored(SnapshotFamily::Cocktails),
        fixtures::cocktails().len()
    );
}

#[rstest]
#[tokio::test]
async fn malformed_snapshot_is_a_decode_failure() {
    let mut store = MockSnapshotStore::new();
    store
        .expect_latest()
        .returning(|series| Ok(Some(PathBuf::from(format!("{}-x.json", series.stem())))));
    store
        .expect_read()
        .returning(|_| Ok(b"[{\"id\": \"not-a-uuid\"}]".to_vec()));
    let mut importer = MockStateImporter::new();
    importer.expect_insert_users().times(0);
    importer.expect_insert_bars().times(0);
    importer.expect_insert_cocktails().times(0);

    let report = orchestrator(inventory_with(0, 0, 0), store, importer)
        .restore_if_empty()
        .await;

    assert_eq!(report.outcome(), RestoreState::Failed);
    assert!(report.families.iter().all(|entry| matches!(
        entry.status,
        FamilyRestoreStatus::Failed(RestoreError::Decode { .. })
    )));
}

#[rstest]
#[tokio::test]
async fn failed_count_abandons_the_restore() {
    let mut inventory = MockStateInventory::new();
    inventory
        .expect_count()
        .returning(|_| Err(StateInventoryError::connection("pool timed out")));
    let mut store = MockSnapshotStore::new();
    store.expect_latest().times(0);

    let report = orchestrator(inventory, store, MockStateImporter::new())
        .restore_if_empty()
        .await;

    assert_eq!(
        report.trail,
        [RestoreState::CheckingEmpty, RestoreState::Failed]
    );
    assert!(matches!(
        report.gate_error,
        Some(RestoreError::EmptyCheck(StateInventoryError::Connection { .. }))
    ));
}

#[rstest]
#[tokio::test]
async fn bootstrap_reads_the_export_series_only() {
    let mut store = MockSnapshotStore::new();
    store
        .expect_latest()
        .with(eq(SnapshotSeries::COCKTAIL_EXPORT))
        .times(1)
        .returning(|_| {
            Ok(Some(PathBuf::from(
                "Cocktails/cocktails-json-2024-06-01T00:00:00Z.json",
            )))
        });
    store
        .expect_read()
        .returning(|_| Ok(snapshot_bytes(SnapshotFamily::Cocktails)));
    let mut importer = MockStateImporter::new();
    importer.expect_insert_users().times(0);
    importer.expect_insert_bars().times(0);
    importer
        .expect_insert_cocktails()
        .times(1)
        .returning(|cocktails| Ok(cocktails.len()));

    let report = orchestrator(inventory_with(2, 2, 0), store, importer)
        .bootstrap_cocktails_if_empty()
        .await;

    assert_eq!(
        report.trail,
        [
            RestoreState::CheckingEmpty,
            RestoreState::Restoring(SnapshotFamily::Cocktails),
            RestoreState::Done,
        ]
    );
}

#[rstest]
#[tokio::test]
async fn bootstrap_skips_when_cocktails_exist() {
    let mut store = MockSnapshotStore::new();
    store.expect_latest().times(0);

    let report = orchestrator(inventory_with(0, 0, 7), store, MockStateImporter::new())
        .bootstrap_cocktails_if_empty()
        .await;

    assert_eq!(report.outcome(), RestoreState::Skipped);
}
