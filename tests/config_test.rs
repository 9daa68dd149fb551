use liftlog::models::config::Config;
use std::ffi::OsString;
use std::sync::{LazyLock, Mutex};
use tempfile::TempDir;

static CONFIG_ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

struct LiftlogHomeGuard {
    previous: Option<OsString>,
}

impl LiftlogHomeGuard {
    fn set(path: &std::path::Path) -> Self {
        let previous = std::env::var_os("LIFTLOG_HOME");
        // SAFETY: tests that touch LIFTLOG_HOME are serialized by CONFIG_ENV_LOCK.
        unsafe { std::env::set_var("LIFTLOG_HOME", path) };
        Self { previous }
    }
}

impl Drop for LiftlogHomeGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => {
                // SAFETY: tests that touch LIFTLOG_HOME are serialized by CONFIG_ENV_LOCK.
                unsafe { std::env::set_var("LIFTLOG_HOME", value) };
            }
            None => {
                // SAFETY: tests that touch LIFTLOG_HOME are serialized by CONFIG_ENV_LOCK.
                unsafe { std::env::remove_var("LIFTLOG_HOME") };
            }
        }
    }
}

fn with_temp_home<T>(f: impl FnOnce(&std::path::Path) -> T) -> T {
    let _lock = CONFIG_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let _home = LiftlogHomeGuard::set(dir.path());
    f(dir.path())
}

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert!(cfg.profile.body_weight_kg.is_none());
    assert!(cfg.coach.command.is_none());
    assert_eq!(cfg.coach.context_days, 30);
    assert_eq!(cfg.confirm.timeout_secs, 10);
    assert_eq!(cfg.export_dir(), std::path::PathBuf::from("."));
}

#[test]
fn test_config_paths_follow_liftlog_home() {
    with_temp_home(|home| {
        assert_eq!(Config::data_dir(), home);
        assert_eq!(Config::path(), home.join("config.toml"));
        assert_eq!(Config::db_path(), home.join("data.db"));
    });
}

#[test]
fn test_config_load_missing_returns_default() {
    with_temp_home(|_| {
        let cfg = Config::load().unwrap();
        assert_eq!(cfg.confirm.timeout_secs, 10);
    });
}

#[test]
fn test_config_set_save_load() {
    with_temp_home(|_| {
        let mut cfg = Config::default();
        cfg.set("name", "Sam").unwrap();
        cfg.set("weight", "82.5").unwrap();
        cfg.set("coach.command", "llm -m small").unwrap();
        cfg.set("coach.context_days", "14").unwrap();
        cfg.set("confirm.timeout_secs", "5").unwrap();
        cfg.set("export.directory", "/tmp/exports").unwrap();
        cfg.save().unwrap();

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.profile.name.as_deref(), Some("Sam"));
        assert_eq!(loaded.profile.body_weight_kg, Some(82.5));
        assert_eq!(loaded.coach.command.as_deref(), Some("llm -m small"));
        assert_eq!(loaded.coach.context_days, 14);
        assert_eq!(loaded.confirm.timeout_secs, 5);
        assert_eq!(loaded.export_dir(), std::path::PathBuf::from("/tmp/exports"));
    });
}

#[test]
fn test_config_set_rejects_bad_values() {
    let mut cfg = Config::default();
    assert!(cfg.set("weight", "heavy").is_err());
    assert!(cfg.set("weight", "-3").is_err());
    assert!(cfg.set("coach.context_days", "soon").is_err());
    assert!(cfg.set("theme", "dark").is_err());
}

#[test]
fn test_partial_config_file_fills_defaults() {
    with_temp_home(|home| {
        std::fs::write(home.join("config.toml"), "[profile]\nbody_weight_kg = 70.0\n").unwrap();
        let cfg = Config::load().unwrap();
        assert_eq!(cfg.profile.body_weight_kg, Some(70.0));
        assert_eq!(cfg.coach.context_days, 30);
    });
}

#[cfg(unix)]
#[test]
fn test_private_file_permissions() {
    use liftlog::db::Database;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    with_temp_home(|home| {
        let config = Config::default();
        config.save().unwrap();

        let dir_mode = fs::metadata(home).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700, "data dir should be 0700");
        let config_mode = fs::metadata(home.join("config.toml")).unwrap().permissions().mode();
        assert_eq!(config_mode & 0o777, 0o600, "config should be 0600");

        Database::open(&Config::db_path()).unwrap();
        let db_mode = fs::metadata(Config::db_path()).unwrap().permissions().mode();
        assert_eq!(db_mode & 0o777, 0o600, "database should be 0600");

        let mut perms = fs::metadata(home.join("config.toml")).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(home.join("config.toml"), perms).unwrap();
        config.save().unwrap();
        let after = fs::metadata(home.join("config.toml")).unwrap().permissions().mode();
        assert_eq!(after & 0o777, 0o600, "config should be corrected to 0600");
    });
}
