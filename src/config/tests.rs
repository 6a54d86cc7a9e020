use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_audiotag_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("AUDIOTAG_CONFIG_PATH", "/tmp/audiotag-test-config.json");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/audiotag-test-config.json")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("audiotag")
            .join("config.json")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("audiotag")
            .join("config.json")
    );
}

#[test]
fn settings_load_from_json_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.json");
    std::fs::write(
        &cfg_path,
        r#"{
  "cleanup": {
    "display_chars": [ { "src": ["_"], "dst": " " } ],
    "filesystem_chars": [ { "src": ["/", ":"], "dst": "-" } ],
    "allowed_formats": [".jpg"],
    "supported_formats": [".flac"],
    "finished_albums": "Done"
  },
  "extract": { "archive": "Old", "program": "unar" },
  "library": { "location": "/srv/music" }
}"#,
    )
    .unwrap();

    let _g1 = EnvGuard::remove("AUDIOTAG__LIBRARY__LOCATION");

    let s = Settings::load(Some(&cfg_path)).unwrap();
    assert_eq!(s.cleanup.display_chars, vec![Replacement::new(&["_"], " ")]);
    assert_eq!(
        s.cleanup.filesystem_chars,
        vec![Replacement::new(&["/", ":"], "-")]
    );
    assert_eq!(s.cleanup.allowed_formats, vec![".jpg".to_string()]);
    assert_eq!(s.cleanup.supported_formats, vec![".flac".to_string()]);
    assert_eq!(s.cleanup.finished_albums, std::path::PathBuf::from("Done"));
    assert_eq!(s.extract.archive, std::path::PathBuf::from("Old"));
    assert_eq!(s.extract.program, "unar");
    // Untouched fields keep their defaults.
    assert_eq!(s.extract.supported_formats, ExtractSettings::default().supported_formats);
    assert_eq!(s.convert.program, "ffmpeg");
    assert_eq!(s.library.location, std::path::PathBuf::from("/srv/music"));
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.json");
    std::fs::write(&cfg_path, r#"{ "library": { "location": "/srv/music" } }"#).unwrap();

    let _g1 = EnvGuard::set("AUDIOTAG_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("AUDIOTAG__LIBRARY__LOCATION", "/mnt/roon");

    let s = Settings::load(None).unwrap();
    assert_eq!(s.library.location, std::path::PathBuf::from("/mnt/roon"));
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::remove("AUDIOTAG__LIBRARY__LOCATION");

    let s = Settings::load(Some(&dir.path().join("absent.json"))).unwrap();
    assert_eq!(s.cleanup.supported_formats, vec![".flac", ".dsf"]);
    assert_eq!(s.library.location, std::path::PathBuf::from("Library"));
}

#[test]
fn validate_rejects_formats_without_leading_dot() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.cleanup.allowed_formats.push("txt".into());
    let err = s.validate().unwrap_err();
    assert!(err.contains("cleanup.allowed_formats"));
}

#[test]
fn validate_rejects_empty_supported_formats() {
    let mut s = Settings::default();
    s.cleanup.supported_formats.clear();
    assert!(s.validate().is_err());
}
