use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::credentials::PartialCredentials;

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read seed file {path}: {source}")]
    SeedRead { path: PathBuf, source: io::Error },

    #[error("Invalid seed file {path}: {source}")]
    SeedParse { path: PathBuf, source: serde_json::Error },

    #[error("Cannot create log directory {path}: {source}")]
    LogDir { path: PathBuf, source: io::Error },
}

pub struct AppConfig {
    pub initial: Option<PartialCredentials>,
    pub start_expanded: bool,
    pub print_json: bool,
    pub log_file: PathBuf,
    pub message_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial: None,
            start_expanded: false,
            print_json: false,
            log_file: default_log_file(),
            message_timeout: Duration::from_secs(5),
        }
    }
}

pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("azure-creds")
        .join("azure-creds.log")
}

/// Read a JSON seed. Missing keys are allowed; unknown keys are ignored.
pub fn load_seed(path: &Path) -> Result<PartialCredentials, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ConfigError::SeedParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge command-line/environment values over an optional seed file.
/// Yields `None` when neither supplies anything.
pub fn resolve_initial(
    seed_file: Option<&Path>,
    overrides: PartialCredentials,
) -> Result<Option<PartialCredentials>, ConfigError> {
    let seed = match seed_file {
        Some(path) => load_seed(path)?,
        None => PartialCredentials::default(),
    };

    let merged = overrides.or(seed);
    Ok((!merged.is_empty()).then_some(merged))
}

/// Ensure the log file's directory exists
pub fn prepare_log_dir(log_file: &Path) -> Result<(), ConfigError> {
    let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).map_err(|source| ConfigError::LogDir {
        path: parent.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn seed_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_partial_seed() {
        let file = seed_file(r#"{"azureEndpoint": "https://foo.openai.azure.com", "deployment": "prod"}"#);
        let seed = load_seed(file.path()).unwrap();

        assert_eq!(seed.azure_endpoint.as_deref(), Some("https://foo.openai.azure.com"));
        assert_eq!(seed.deployment.as_deref(), Some("prod"));
        assert_eq!(seed.api_key, None);
        assert_eq!(seed.api_version, None);
    }

    #[test]
    fn test_invalid_seed() {
        let file = seed_file("not json");
        assert!(matches!(load_seed(file.path()), Err(ConfigError::SeedParse { .. })));
    }

    #[test]
    fn test_missing_seed() {
        let dir = TempDir::new().unwrap();
        let result = load_seed(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::SeedRead { .. })));
    }

    #[test]
    fn test_overrides_win_over_seed() {
        let file = seed_file(r#"{"apiKey": "from-file-key", "deployment": "file"}"#);
        let overrides = PartialCredentials {
            deployment: Some("cli".into()),
            ..Default::default()
        };

        let merged = resolve_initial(Some(file.path()), overrides).unwrap().unwrap();
        assert_eq!(merged.deployment.as_deref(), Some("cli"));
        assert_eq!(merged.api_key.as_deref(), Some("from-file-key"));
    }

    #[test]
    fn test_nothing_supplied() {
        assert_eq!(resolve_initial(None, PartialCredentials::default()).unwrap(), None);
    }

    #[test]
    fn test_prepare_log_dir() {
        let dir = TempDir::new().unwrap();
        let log_file = dir.path().join("nested").join("app.log");
        prepare_log_dir(&log_file).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
