use super::*;
use crate::test_utils::{failing, stmts, RecordingSink};
use chrono::Utc;

fn record(ordinal: usize, migration: &Migration) -> AppliedRecord {
    AppliedRecord {
        ordinal,
        name: migration.name().to_string(),
        hash: pure_digest(migration),
        applied_at: Utc::now(),
    }
}

#[test]
fn test_pure_digest_matches_collector() {
    let migration = stmts("create", &["CREATE TABLE a (id INTEGER)", "CREATE INDEX i ON a (id)"]);
    let mut collector = FingerprintCollector::new();
    collector.execute("CREATE TABLE a (id INTEGER)").unwrap();
    collector.execute("CREATE INDEX i ON a (id)").unwrap();
    assert_eq!(pure_digest(&migration), collector.digest());
}

#[test]
fn test_pure_digest_ignores_step_error() {
    let migration = failing("broken", "CREATE TABLE a (id INTEGER)");
    let mut collector = FingerprintCollector::new();
    collector.execute("CREATE TABLE a (id INTEGER)").unwrap();
    assert_eq!(pure_digest(&migration), collector.digest());
}

#[test]
fn test_one_statement_equals_concatenated_pieces() {
    let whole = stmts("m", &["CREATE TABLE a (id INTEGER);CREATE TABLE b (id INTEGER);"]);
    let split = stmts("m", &["CREATE TABLE a (id INTEGER);", "CREATE TABLE b (id INTEGER);"]);
    assert_eq!(pure_digest(&whole), pure_digest(&split));
}

#[test]
fn test_verify_all_match() {
    let supplied = vec![
        stmts("create_accounts", &["CREATE TABLE accounts (id INTEGER)"]),
        stmts("create_sessions", &["CREATE TABLE sessions (id INTEGER)"]),
    ];
    let applied = vec![record(0, &supplied[0])];
    let sink = RecordingSink::default();
    assert_eq!(verify_history(&applied, &supplied, &sink).unwrap(), 1);
    assert_eq!(
        sink.events(),
        vec![MigrationEvent::Verified {
            ordinal: 0,
            name: "create_accounts".to_string()
        }]
    );
}

#[test]
fn test_verify_empty_history() {
    let supplied = vec![stmts("a", &["SELECT 1"])];
    assert_eq!(verify_history(&[], &supplied, &crate::NullSink).unwrap(), 0);
}

#[test]
fn test_history_overrun() {
    let a = stmts("a", &["SELECT 1"]);
    let b = stmts("b", &["SELECT 2"]);
    let applied = vec![record(0, &a), record(1, &b)];
    let err = verify_history(&applied, &[], &crate::NullSink).unwrap_err();
    assert!(matches!(
        err,
        MigrateError::HistoryOverrun {
            applied: 2,
            supplied: 0
        }
    ));
    assert!(err.to_string().contains("2 applied, 0 supplied"));
}

#[test]
fn test_hash_drift_on_changed_statement() {
    let original = stmts("create_accounts", &["CREATE TABLE accounts (id INTEGER)"]);
    let applied = vec![record(0, &original)];
    let changed = vec![stmts("create_accounts", &["CREATE TABLE accounts (id BIGINT)"])];

    let sink = RecordingSink::default();
    let err = verify_history(&applied, &changed, &sink).unwrap_err();
    match &err {
        MigrateError::HashDrift {
            ordinal,
            name,
            expected,
            actual,
        } => {
            assert_eq!(*ordinal, 0);
            assert_eq!(name, "create_accounts");
            assert_eq!(expected, &applied[0].hash);
            assert_eq!(actual, &pure_digest(&changed[0]));
        }
        other => panic!("expected HashDrift, got {other:?}"),
    }
    assert!(matches!(
        sink.events().as_slice(),
        [MigrationEvent::VerificationFailed { ordinal: 0, .. }]
    ));
}

#[test]
fn test_hash_drift_on_reordered_statements() {
    let original = stmts("two_tables", &["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]);
    let applied = vec![record(0, &original)];
    let reordered = vec![stmts("two_tables", &["CREATE TABLE b (id INT)", "CREATE TABLE a (id INT)"])];
    let err = verify_history(&applied, &reordered, &crate::NullSink).unwrap_err();
    assert!(matches!(err, MigrateError::HashDrift { ordinal: 0, .. }));
}

#[test]
fn test_name_drift_reported_before_hash() {
    let original = stmts("create_accounts", &["CREATE TABLE accounts (id INTEGER)"]);
    let applied = vec![record(0, &original)];
    // Renamed and modified: the rename wins
    let renamed = vec![stmts("add_accounts", &["CREATE TABLE accounts (id BIGINT)"])];
    let err = verify_history(&applied, &renamed, &crate::NullSink).unwrap_err();
    match err {
        MigrateError::NameDrift {
            ordinal,
            current,
            applied,
        } => {
            assert_eq!(ordinal, 0);
            assert_eq!(current, "add_accounts");
            assert_eq!(applied, "create_accounts");
        }
        other => panic!("expected NameDrift, got {other:?}"),
    }
}

#[test]
fn test_drift_stops_at_first_bad_ordinal() {
    let a = stmts("a", &["SELECT 1"]);
    let b = stmts("b", &["SELECT 2"]);
    let c = stmts("c", &["SELECT 3"]);
    let applied = vec![record(0, &a), record(1, &b), record(2, &c)];
    let supplied = vec![
        stmts("a", &["SELECT 1"]),
        stmts("b", &["SELECT 22"]),
        stmts("c", &["SELECT 33"]),
    ];
    let sink = RecordingSink::default();
    let err = verify_history(&applied, &supplied, &sink).unwrap_err();
    assert_eq!(err.ordinal(), Some(1));
    assert!(err.is_drift());
    assert_eq!(sink.events().len(), 2);
}

#[test]
fn test_gap_in_history_ids_is_rejected() {
    let supplied = vec![
        stmts("a", &["SELECT 1"]),
        stmts("b", &["SELECT 2"]),
        stmts("c", &["SELECT 3"]),
    ];
    // Names and hashes match positionally, but id 1 is missing.
    let applied = vec![record(0, &supplied[0]), record(5, &supplied[1])];
    let sink = RecordingSink::default();
    let err = verify_history(&applied, &supplied, &sink).unwrap_err();
    assert!(
        matches!(
            err,
            MigrateError::HistoryGap {
                ordinal: 1,
                found: 5,
                ..
            }
        ),
        "{err}"
    );
    assert!(err.is_drift());
    assert!(matches!(
        sink.events().as_slice(),
        [
            MigrationEvent::Verified { ordinal: 0, .. },
            MigrationEvent::VerificationFailed { ordinal: 1, .. }
        ]
    ));
}
