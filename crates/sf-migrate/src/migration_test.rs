use super::*;
use crate::verifier::FingerprintCollector;

#[test]
fn test_try_new_rejects_empty_name() {
    assert!(Migration::try_new("", |tx| tx.execute("SELECT 1")).is_none());
}

#[test]
fn test_try_new_accepts_name() {
    let migration = Migration::try_new("create_accounts", |tx| tx.execute("SELECT 1")).unwrap();
    assert_eq!(migration.name(), "create_accounts");
}

#[test]
#[should_panic]
fn test_new_panics_on_empty_name() {
    let _ = Migration::new("", |tx| tx.execute("SELECT 1"));
}

#[test]
fn test_sql_migration_issues_whole_text_once() {
    let sql = "CREATE TABLE a (id INTEGER);\nCREATE TABLE b (id INTEGER);";
    let migration = Migration::sql(MigrationName::new("tables"), sql);
    let mut collector = FingerprintCollector::new();
    migration.run(&mut collector).unwrap();

    let mut expected = FingerprintCollector::new();
    expected.execute(sql).unwrap();
    assert_eq!(collector.digest(), expected.digest());
}
