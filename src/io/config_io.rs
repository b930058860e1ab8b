use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

pub const CONFIG_FILE: &str = "carebook.toml";

/// Starter config written by `carebook init`
pub const DEFAULT_CONFIG: &str = r##"# carebook configuration

[guard]
# Prompt shown before leaving an editor with unsaved changes
confirm_prompt = "Discard unsaved changes?"
# Prompt shown when quitting with unsaved changes
unload_prompt = "You have unsaved changes. Quit anyway?"
# Upper bound (ms) on form initialization for editors without a completion signal
init_fallback_ms = 250

[ui]
show_key_hints = true
# colors = { highlight = "#FB4196" }
"##;

/// Error type for config and data directory operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Read `carebook.toml` from the data dir. A missing file yields defaults.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

/// Create the data dir and write the starter config
pub fn init_data_dir(data_dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path));
    }
    fs::create_dir_all(data_dir)?;
    fs::write(&path, DEFAULT_CONFIG)?;
    Ok(path)
}

/// Resolve the data directory: explicit flag, then `CAREBOOK_DIR`, then `./carebook`
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("CAREBOOK_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    PathBuf::from("carebook")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = read_config(dir.path()).unwrap();
        assert_eq!(config.guard.init_fallback_ms, 250);
    }

    #[test]
    fn init_writes_parseable_config() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let path = init_data_dir(&data, false).unwrap();
        assert!(path.exists());
        let config = read_config(&data).unwrap();
        assert_eq!(config.guard.confirm_prompt, "Discard unsaved changes?");
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        init_data_dir(dir.path(), false).unwrap();
        assert!(matches!(
            init_data_dir(dir.path(), false),
            Err(ConfigError::AlreadyExists(_))
        ));
        init_data_dir(dir.path(), true).unwrap();
    }

    #[test]
    fn malformed_config_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[guard\n").unwrap();
        assert!(matches!(
            read_config(dir.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn explicit_data_dir_wins() {
        assert_eq!(resolve_data_dir(Some("/tmp/x")), PathBuf::from("/tmp/x"));
    }
}
