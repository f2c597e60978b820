//! Settings file loading and saving

use std::path::{Path, PathBuf};

use mlops_core::prelude::*;

use super::types::Settings;

pub const CONFIG_DIR: &str = "mlops-console";
pub const CONFIG_FILENAME: &str = "config.toml";

/// `<config dir>/mlops-console/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`.
///
/// A missing, unreadable or malformed file yields the defaults; the console
/// should always start.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Write `settings` to `path`, creating parent directories.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::config(format!("Failed to create {}: {}", dir.display(), e)))?;
    }

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("# mlops-console configuration\n\n{content}");

    // Atomic write: temp file, then rename
    let temp_path = dir.join(".config.toml.tmp");
    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join("nope.toml"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.polling.task_interval_ms, 3000);
        assert_eq!(settings.polling.max_consecutive_errors, 3);
        assert_eq!(settings.editor.height_debounce_ms, 100);
        assert_eq!(settings.logs.default_namespace, "default");
        assert!(settings.logs.follow);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[api]
cluster_base_url = "http://cluster:9000"

[logs]
tail = 200
"#,
        )
        .unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.api.cluster_base_url, "http://cluster:9000");
        assert_eq!(settings.api.code_base_url, "http://localhost:8000");
        assert_eq!(settings.logs.tail, Some(200));
        assert_eq!(settings.ui.notification_secs, 4);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[polling\ntask_interval_ms = ").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILENAME);
        let mut settings = Settings::default();
        settings.polling.task_interval_ms = 500;
        settings.ui.refresh_interval_secs = 0;

        save_settings(&path, &settings).unwrap();
        assert!(!dir.path().join("nested").join(".config.toml.tmp").exists());

        let loaded = load_settings(&path);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.ui.refresh_interval(), None);
    }

    #[test]
    fn test_interval_floor() {
        let mut settings = Settings::default();
        settings.polling.task_interval_ms = 0;
        assert_eq!(
            settings.polling.interval(),
            std::time::Duration::from_millis(100)
        );
    }
}
