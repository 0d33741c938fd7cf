use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
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
fn resolve_config_path_prefers_vibes_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VIBES_CONFIG_PATH", "/tmp/vibes-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/vibes-test-config.toml")
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
            .join("vibes")
            .join("config.toml")
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
            .join("vibes")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[storage]
downloads_dir = "/tmp/vibes-dl"
playlists_dir = "/tmp/vibes-pl"

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false

[extractor]
command = "my-extractor"
extra_args = ["--cookies", "jar.txt"]

[playback]
volume = 55
volume_step = 10
startup_slot = "evening"

[ui]
header_text = "hello"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIBES_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("VIBES__PLAYBACK__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.storage.downloads_dir, std::path::PathBuf::from("/tmp/vibes-dl"));
    assert_eq!(s.storage.playlists_dir, std::path::PathBuf::from("/tmp/vibes-pl"));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.extractor.command, "my-extractor");
    assert_eq!(s.extractor.extra_args, vec!["--cookies".to_string(), "jar.txt".to_string()]);
    assert_eq!(s.playback.volume, 55);
    assert_eq!(s.playback.volume_step, 10);
    assert_eq!(s.playback.startup_slot.as_deref(), Some("evening"));
    assert_eq!(s.ui.header_text, "hello");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
volume = 30
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIBES_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("VIBES__PLAYBACK__VOLUME", "90");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume, 90);
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.playback.volume = 101;
    assert!(s.validate().is_err());
    s.playback.volume = 100;
    assert!(s.validate().is_ok());

    s.playback.volume_step = 0;
    assert!(s.validate().is_err());
    s.playback.volume_step = 5;

    s.extractor.command = "  ".to_string();
    assert!(s.validate().is_err());
    s.extractor.command = "yt-dlp".to_string();

    s.library.extensions.clear();
    assert!(s.validate().is_err());
}
