//! End-to-end behaviour of the migrator against DuckDB

use ratchet_core::{MigrationName, LEDGER_TABLE};
use ratchet_db::{DatabaseCore, DuckDbBackend};
use ratchet_engine::{EngineError, MigrationContext, Migrator, StateStore};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const INIT: &str = "2024_01_01_00_0000_init";
const ADD_COL: &str = "2024_01_02_00_0000_add_col";

fn write_pair(dir: &Path, name: &str, up: &str, down: &str) {
    fs::write(dir.join(format!("{name}.up.sql")), up).unwrap();
    fs::write(dir.join(format!("{name}.down.sql")), down).unwrap();
}

/// Write `count` independent table migrations named `<prefix>_tN`
fn write_tables(dir: &Path, day: u32, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let name = format!("2024_02_{:02}_00_{:04}_t{}_{}", day, i, day, i);
            write_pair(
                dir,
                &name,
                &format!("CREATE TABLE t{day}_{i} (id INTEGER);"),
                &format!("DROP TABLE t{day}_{i};"),
            );
            name
        })
        .collect()
}

fn batches(db: &DuckDbBackend) -> Vec<(String, i64)> {
    StateStore::new(db)
        .list_records(false)
        .unwrap()
        .into_iter()
        .map(|r| (r.name.into_inner(), r.batch))
        .collect()
}

#[test]
fn up_with_n_pending_advances_version_by_one() {
    let dir = TempDir::new().unwrap();
    let db = DuckDbBackend::in_memory("app").unwrap();
    let migrator = Migrator::new(&db, MigrationContext::new(dir.path())).unwrap();

    for (round, n) in [(1u32, 3usize), (2, 1), (3, 5)] {
        let before = migrator.version().unwrap();
        let names = write_tables(dir.path(), round, n);

        let report = migrator.up().unwrap();
        assert_eq!(report.batch, before + 1);
        assert_eq!(report.applied.len(), n);
        assert_eq!(migrator.version().unwrap(), before + 1);

        let in_batch: Vec<_> = batches(&db)
            .into_iter()
            .filter(|(_, b)| *b == before + 1)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(in_batch, names);
    }
}

#[test]
fn second_up_without_new_files_is_noop() {
    let dir = TempDir::new().unwrap();
    let db = DuckDbBackend::in_memory("app").unwrap();
    write_tables(dir.path(), 1, 2);
    let migrator = Migrator::new(&db, MigrationContext::new(dir.path())).unwrap();

    migrator.up().unwrap();
    let records = batches(&db);

    let report = migrator.up().unwrap();
    assert!(report.is_noop());
    assert_eq!(report.batch, 1);
    assert_eq!(batches(&db), records);
}

#[test]
fn up_then_rollback_everything_returns_to_zero() {
    let dir = TempDir::new().unwrap();
    let db = DuckDbBackend::in_memory("app").unwrap();
    let migrator = Migrator::new(&db, MigrationContext::new(dir.path())).unwrap();

    write_tables(dir.path(), 1, 2);
    migrator.up().unwrap();
    write_tables(dir.path(), 2, 3);
    migrator.up().unwrap();
    assert_eq!(migrator.version().unwrap(), 2);

    assert_eq!(migrator.rollback().unwrap().reverted.len(), 3);
    assert_eq!(migrator.version().unwrap(), 1);
    assert_eq!(migrator.rollback().unwrap().reverted.len(), 2);

    assert_eq!(migrator.version().unwrap(), 0);
    assert!(batches(&db).is_empty());
    assert!(!db.relation_exists("t1_0").unwrap());
    assert!(!db.relation_exists("t2_2").unwrap());
}

#[test]
fn files_apply_in_name_order_and_rollback_reverts_only_latest_batch() {
    let dir = TempDir::new().unwrap();
    let db = DuckDbBackend::in_memory("app").unwrap();
    // Each migration logs its own name; order of rows proves order of execution.
    let (a, b, c) = (
        "2024_05_01_00_0000_a",
        "2024_05_02_00_0000_b",
        "2024_05_03_00_0000_c",
    );
    write_pair(
        dir.path(),
        a,
        "CREATE TABLE run_log (seq INTEGER, name VARCHAR); INSERT INTO run_log VALUES (1, 'a');",
        "DROP TABLE run_log;",
    );
    write_pair(
        dir.path(),
        c,
        "INSERT INTO run_log VALUES (3, 'c');",
        "DELETE FROM run_log WHERE name = 'c';",
    );
    write_pair(
        dir.path(),
        b,
        "INSERT INTO run_log VALUES (2, 'b');",
        "DELETE FROM run_log WHERE name = 'b';",
    );

    let migrator = Migrator::new(&db, MigrationContext::new(dir.path())).unwrap();
    let report = migrator.up().unwrap();
    assert_eq!(report.applied, vec![a, b, c]);

    let mut stmt = db
        .conn()
        .prepare("SELECT name FROM run_log ORDER BY seq")
        .unwrap();
    let logged: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(logged, vec!["a", "b", "c"]);

    let d = "2024_05_04_00_0000_d";
    write_pair(
        dir.path(),
        d,
        "INSERT INTO run_log VALUES (4, 'd');",
        "DELETE FROM run_log WHERE name = 'd';",
    );
    migrator.up().unwrap();

    let report = migrator.rollback().unwrap();
    assert_eq!(report.batch, 2);
    assert_eq!(report.reverted, vec![d]);
    let remaining: Vec<_> = batches(&db).into_iter().map(|(n, _)| n).collect();
    assert_eq!(remaining, vec![a, b, c]);
}

#[test]
fn kth_failure_compensates_earlier_and_persists_nothing() {
    for k in 1..=4usize {
        let dir = TempDir::new().unwrap();
        let db = DuckDbBackend::in_memory("app").unwrap();
        let names = write_tables(dir.path(), 1, 4);
        // Replace the k-th up file with broken SQL.
        fs::write(
            dir.path().join(format!("{}.up.sql", names[k - 1])),
            "CREATE TABLE (;",
        )
        .unwrap();

        let migrator = Migrator::new(&db, MigrationContext::new(dir.path())).unwrap();
        let err = migrator.up().unwrap_err();
        let EngineError::DirtyRun {
            cause, compensated, ..
        } = err
        else {
            panic!("expected a dirty run for k = {k}");
        };

        let expected: Vec<MigrationName> = names[..k - 1]
            .iter()
            .rev()
            .map(|n| MigrationName::new(n.as_str()))
            .collect();
        assert_eq!(compensated, expected, "k = {k}");
        assert!(matches!(*cause, EngineError::Execution { .. }));

        for i in 0..4 {
            assert!(!db.relation_exists(&format!("t1_{i}")).unwrap(), "k = {k}");
        }
        assert_eq!(migrator.version().unwrap(), 0);
        assert!(batches(&db).is_empty());
    }
}

#[test]
fn init_add_col_scenario() {
    let dir = TempDir::new().unwrap();
    let db = DuckDbBackend::in_memory("app").unwrap();
    write_pair(
        dir.path(),
        INIT,
        "CREATE TABLE users (id INTEGER PRIMARY KEY);",
        "DROP TABLE users;",
    );
    write_pair(
        dir.path(),
        ADD_COL,
        "ALTER TABLE users ADD COLUMN email VARCHAR;",
        "ALTER TABLE users DROP COLUMN email;",
    );
    let migrator = Migrator::new(&db, MigrationContext::new(dir.path())).unwrap();

    migrator.up().unwrap();
    assert_eq!(
        batches(&db),
        vec![(INIT.to_string(), 1), (ADD_COL.to_string(), 1)]
    );

    let report = migrator.rollback().unwrap();
    assert_eq!(report.reverted, vec![ADD_COL, INIT]);
    assert_eq!(migrator.version().unwrap(), 0);
    assert!(!db.relation_exists("users").unwrap());

    migrator.up().unwrap();
    assert_eq!(
        batches(&db),
        vec![(INIT.to_string(), 1), (ADD_COL.to_string(), 1)]
    );
}

#[test]
fn state_survives_reopening_file_backed_database() {
    let dir = TempDir::new().unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    let db_path = dir.path().join("app.duckdb");
    write_pair(
        &migrations,
        INIT,
        "CREATE TABLE users (id INTEGER);",
        "DROP TABLE users;",
    );

    {
        let db = DuckDbBackend::from_path(&db_path, "app").unwrap();
        let migrator = Migrator::new(&db, MigrationContext::new(&migrations)).unwrap();
        migrator.up().unwrap();
    }

    write_pair(
        &migrations,
        ADD_COL,
        "ALTER TABLE users ADD COLUMN email VARCHAR;",
        "ALTER TABLE users DROP COLUMN email;",
    );
    let db = DuckDbBackend::from_path(&db_path, "app").unwrap();
    assert!(db.relation_exists(LEDGER_TABLE).unwrap());
    let migrator = Migrator::new(&db, MigrationContext::new(&migrations)).unwrap();
    assert_eq!(migrator.version().unwrap(), 1);

    let report = migrator.up().unwrap();
    assert_eq!(report.batch, 2);
    assert_eq!(report.applied, vec![ADD_COL]);
}

#[test]
fn down_removes_file_backed_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("app.duckdb");
    let db = DuckDbBackend::from_path(&db_path, "app").unwrap();
    let migrator = Migrator::new(&db, MigrationContext::new(dir.path())).unwrap();
    assert!(db_path.exists());

    migrator.down().unwrap();
    assert!(!db_path.exists());
}
