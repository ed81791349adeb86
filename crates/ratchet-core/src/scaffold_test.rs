use super::*;
use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

#[test]
fn test_create_migration_writes_pair() {
    let dir = tempdir().unwrap();
    let created = create_migration(dir.path(), "add_users", at(2024, 3, 7, 9, 5, 2)).unwrap();

    assert_eq!(created.name, "2024_03_07_09_0502_add_users");
    assert_eq!(
        created.up_path,
        dir.path().join("2024_03_07_09_0502_add_users.up.sql")
    );
    assert!(created.up_path.is_file());
    assert!(created.down_path.is_file());

    let up = fs::read_to_string(&created.up_path).unwrap();
    let down = fs::read_to_string(&created.down_path).unwrap();
    assert!(up.contains("CREATE TABLE"));
    assert!(down.contains("DROP TABLE"));
}

#[test]
fn test_timestamp_prefix_is_fixed_width() {
    let dir = tempdir().unwrap();
    let created = create_migration(dir.path(), "x", at(2031, 12, 31, 23, 59, 59)).unwrap();
    assert_eq!(created.name.created_at_prefix(), "2031_12_31_23_5959");
    assert!(has_timestamp_prefix(&created.name));
}

#[test]
fn test_later_timestamps_sort_later() {
    let dir = tempdir().unwrap();
    let first = create_migration(dir.path(), "zzz", at(2024, 1, 9, 23, 0, 0)).unwrap();
    let second = create_migration(dir.path(), "aaa", at(2024, 1, 10, 0, 0, 0)).unwrap();
    assert!(first.name.created_at_prefix() < second.name.created_at_prefix());
}

#[test]
fn test_create_migration_refuses_overwrite() {
    let dir = tempdir().unwrap();
    let now = at(2024, 1, 1, 0, 0, 0);
    create_migration(dir.path(), "init", now).unwrap();

    let err = create_migration(dir.path(), "init", now).unwrap_err();
    assert!(matches!(err, CoreError::MigrationExists { .. }));
}

#[test]
fn test_existing_down_half_blocks_both() {
    let dir = tempdir().unwrap();
    let now = at(2024, 1, 1, 0, 0, 0);
    fs::write(dir.path().join("2024_01_01_00_0000_init.down.sql"), "-- keep").unwrap();

    assert!(create_migration(dir.path(), "init", now).is_err());
    assert!(!dir.path().join("2024_01_01_00_0000_init.up.sql").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("2024_01_01_00_0000_init.down.sql")).unwrap(),
        "-- keep"
    );
}

#[test]
fn test_create_migration_missing_dir() {
    let dir = tempdir().unwrap();
    let err = create_migration(&dir.path().join("nope"), "init", at(2024, 1, 1, 0, 0, 0))
        .unwrap_err();
    assert!(matches!(err, CoreError::PathNotFound { .. }));
}

#[test]
fn test_validate_migration_name() {
    assert!(validate_migration_name("add_users").is_ok());
    assert!(validate_migration_name("V2_backfill").is_ok());

    for bad in ["", "../escape", "a/b", "a\\b", ".hidden", "-flag", "has space", "_lead"] {
        let err = validate_migration_name(bad).unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidMigrationName { .. }),
            "expected '{}' to be rejected",
            bad
        );
    }
}

#[test]
fn test_has_timestamp_prefix() {
    assert!(has_timestamp_prefix(&MigrationName::new(
        "2024_01_01_00_0000_init"
    )));
    assert!(!has_timestamp_prefix(&MigrationName::new("init")));
    assert!(!has_timestamp_prefix(&MigrationName::new(
        "20240101000000init_table"
    )));
    assert!(!has_timestamp_prefix(&MigrationName::new(
        "2024_01_01_00_0000"
    )));
}
