//! Configuration: built-in defaults, an optional TOML file, then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::model::Settings;

pub const DEFAULT_GRID_SIZE: i32 = 20;
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/find-path";
pub const DEFAULT_ANIMATION_DELAY_MS: u64 = 100;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Accepted grid sizes. The upper bound keeps the board on a normal terminal.
pub const GRID_SIZE_RANGE: std::ops::RangeInclusive<i32> = 2..=64;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "GRIDPATH_CONFIG";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("invalid TOML in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub grid_size: Option<i32>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub animation_delay_ms: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub grid_size: Option<i32>,
    pub endpoint: Option<String>,
    pub animation_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub grid_size: i32,
    pub endpoint: String,
    pub animation_delay: Duration,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            animation_delay: Duration::from_millis(DEFAULT_ANIMATION_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_file: default_log_path(),
        }
    }
}

impl Config {
    /// Layer `file` and then `overrides` over the defaults and validate the
    /// result.
    pub fn resolve(file: Option<ConfigFile>, overrides: Overrides) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let file = file.unwrap_or_default();

        let grid_size = overrides
            .grid_size
            .or(file.grid_size)
            .unwrap_or(defaults.grid_size);
        let endpoint = overrides
            .endpoint
            .or(file.endpoint)
            .unwrap_or(defaults.endpoint);
        let delay_ms = overrides
            .animation_delay_ms
            .or(file.animation_delay_ms)
            .unwrap_or(DEFAULT_ANIMATION_DELAY_MS);
        let timeout_secs = overrides
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let log_file = overrides
            .log_file
            .or(file.log_file)
            .unwrap_or(defaults.log_file);

        if !GRID_SIZE_RANGE.contains(&grid_size) {
            return Err(ConfigError::Invalid {
                field: "grid_size",
                reason: format!(
                    "{grid_size} is outside {}..={}",
                    GRID_SIZE_RANGE.start(),
                    GRID_SIZE_RANGE.end()
                ),
            });
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "endpoint",
                reason: format!("{endpoint:?} is not an http(s) URL"),
            });
        }
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }

        Ok(Self {
            grid_size,
            endpoint,
            animation_delay: Duration::from_millis(delay_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            log_file,
        })
    }

    /// The parts of the configuration the visualizer model needs.
    pub fn settings(&self) -> Settings {
        Settings {
            grid_size: self.grid_size,
            animation_delay: self.animation_delay,
        }
    }
}

/// `<state dir>/gridpath/gridpath.log`, or `gridpath.log` in the working
/// directory when the platform has no state directory.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(dir) => dir.join("gridpath").join("gridpath.log"),
        None => PathBuf::from("gridpath.log"),
    }
}

/// `<config dir>/gridpath/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gridpath").join("config.toml"))
}

/// Load a config file. A missing file is `Ok(None)`.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        log::info!("no config file at {}", path.display());
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let file = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    log::info!("loaded config from {}", path.display());
    Ok(Some(file))
}

/// Load the config file from, in order of preference: `explicit` (the
/// `--config` flag), `$GRIDPATH_CONFIG`, or the default location.
pub fn load_config_with_precedence(
    explicit: Option<&Path>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return load_config_file(Path::new(&path));
    }
    match default_config_path() {
        Some(path) => load_config_file(&path),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Write `contents` to a file unique to this test and return its path.
    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gridpath-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let cfg = Config::resolve(None, Overrides::default()).unwrap();
        assert_eq!(cfg.grid_size, 20);
        assert_eq!(cfg.endpoint, "http://localhost:8080/find-path");
        assert_eq!(cfg.animation_delay, Duration::from_millis(100));
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert!(cfg.log_file.ends_with("gridpath.log"));
    }

    #[test]
    fn default_config_path_is_under_gridpath() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("gridpath/config.toml"));
        }
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = Path::new("/nonexistent/gridpath/config.toml");
        assert_eq!(load_config_file(path), Ok(None));
        assert_eq!(load_config_with_precedence(Some(path)), Ok(None));
    }

    #[test]
    fn file_values_apply() {
        let path = temp_config(
            "file_values.toml",
            r#"
grid_size = 12
endpoint = "http://pathfinder.local:9000/find-path"
animation_delay_ms = 25
"#,
        );
        let file = load_config_file(&path).unwrap();
        let cfg = Config::resolve(file, Overrides::default()).unwrap();
        assert_eq!(cfg.grid_size, 12);
        assert_eq!(cfg.endpoint, "http://pathfinder.local:9000/find-path");
        assert_eq!(cfg.animation_delay, Duration::from_millis(25));
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn cli_beats_file() {
        let file = ConfigFile {
            grid_size: Some(12),
            animation_delay_ms: Some(25),
            ..ConfigFile::default()
        };
        let overrides = Overrides {
            grid_size: Some(30),
            log_file: Some(PathBuf::from("/tmp/g.log")),
            ..Overrides::default()
        };
        let cfg = Config::resolve(Some(file), overrides).unwrap();
        assert_eq!(cfg.grid_size, 30);
        assert_eq!(cfg.animation_delay, Duration::from_millis(25));
        assert_eq!(cfg.log_file, PathBuf::from("/tmp/g.log"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let path = temp_config("unknown_key.toml", "grid_sise = 12\n");
        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let path = temp_config("broken.toml", "grid_size = [\n");
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn grid_size_is_range_checked() {
        for bad in [0, 1, 65] {
            let overrides = Overrides {
                grid_size: Some(bad),
                ..Overrides::default()
            };
            assert!(matches!(
                Config::resolve(None, overrides),
                Err(ConfigError::Invalid {
                    field: "grid_size",
                    ..
                })
            ));
        }
    }

    #[test]
    fn zero_timeout_and_bad_endpoint_are_rejected() {
        let zero = Overrides {
            request_timeout_secs: Some(0),
            ..Overrides::default()
        };
        assert!(Config::resolve(None, zero).is_err());

        let bad = Overrides {
            endpoint: Some("localhost:8080".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            Config::resolve(None, bad),
            Err(ConfigError::Invalid {
                field: "endpoint",
                ..
            })
        ));
    }

    #[test]
    fn zero_delay_is_allowed() {
        let overrides = Overrides {
            animation_delay_ms: Some(0),
            ..Overrides::default()
        };
        let cfg = Config::resolve(None, overrides).unwrap();
        assert_eq!(cfg.settings().animation_delay, Duration::ZERO);
        assert_eq!(cfg.settings().grid_size, 20);
    }
}
