use super::*;
use std::fs;
use tempfile::TempDir;

fn args(project_dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.display().to_string(),
        config: None,
        target: None,
        database: None,
        migrations: None,
    }
}

#[test]
fn test_defaults_without_config_file() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::resolve(&args(dir.path())).unwrap();
    assert!(settings.database.is_in_memory());
    assert_eq!(settings.database.name, "main_db");
    assert_eq!(settings.migrations_dir, dir.path().join("migrations"));
    assert_eq!(settings.target, None);
}

#[test]
fn test_config_file_and_relative_database_path() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ratchet.yml"),
        "migrations_path: db/migrations\ndatabase:\n  path: data/app.duckdb\n  name: app\n",
    )
    .unwrap();

    let settings = Settings::resolve(&args(dir.path())).unwrap();
    assert_eq!(settings.database.name, "app");
    assert_eq!(
        settings.database.path,
        dir.path().join("data/app.duckdb").display().to_string()
    );
    assert_eq!(settings.migrations_dir, dir.path().join("db/migrations"));
}

#[test]
fn test_target_then_flags_override() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ratchet.yml"),
        "database:\n  name: app\ntargets:\n  ci:\n    database:\n      path: ci.duckdb\n      name: ci_db\n    migrations_path: ci_migrations\n",
    )
    .unwrap();

    let mut global = args(dir.path());
    global.target = Some("ci".to_string());
    let settings = Settings::resolve(&global).unwrap();
    assert_eq!(settings.database.name, "ci_db");
    assert_eq!(settings.migrations_dir, dir.path().join("ci_migrations"));
    assert_eq!(settings.target.as_deref(), Some("ci"));

    global.database = Some(":memory:".to_string());
    global.migrations = Some("elsewhere".to_string());
    let settings = Settings::resolve(&global).unwrap();
    assert!(settings.database.is_in_memory());
    assert_eq!(settings.database.name, "ci_db");
    assert_eq!(settings.migrations_dir, dir.path().join("elsewhere"));
}

#[test]
fn test_unknown_target_is_error() {
    let dir = TempDir::new().unwrap();
    let mut global = args(dir.path());
    global.target = Some("nope".to_string());
    assert!(Settings::resolve(&global).is_err());
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let mut global = args(dir.path());
    global.config = Some(dir.path().join("missing.yml").display().to_string());
    assert!(Settings::resolve(&global).is_err());
}

#[test]
fn test_migrator_requires_migrations_dir() {
    let dir = TempDir::new().unwrap();
    let ctx = RuntimeContext::new(&args(dir.path())).unwrap();
    assert!(ctx.migrator().is_err());

    fs::create_dir(dir.path().join("migrations")).unwrap();
    let migrator = ctx.migrator().unwrap();
    assert_eq!(migrator.version().unwrap(), 0);
}
