use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::estimator::DEFAULT_HARDER_ACCESS_MARKETS;

/// Status of config file loading
#[derive(Debug, Clone)]
pub enum ConfigLoadStatus {
    /// Config loaded successfully from existing file
    Loaded,
    /// Created default config file (first run)
    Created,
    /// Error occurred during loading, using defaults.
    /// String is used in Debug output for logging.
    #[allow(dead_code)]
    Error(String),
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the hosted generation service.
    pub endpoint: String,
    /// Bearer token for the service, usually supplied via QUILL_API_KEY.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3400/api".to_string(),
            api_key: None,
        }
    }
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Local store for submissions and the user profile.
    pub database: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            database: "~/.quill/quill.db".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Feasibility tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeasibilityConfig {
    /// Market codes that carry the harder-access surcharge.
    pub harder_access_markets: Vec<String>,
    /// Sample size a fresh project starts from.
    pub default_sample_size: u32,
}

impl Default for FeasibilityConfig {
    fn default() -> Self {
        Self {
            harder_access_markets: DEFAULT_HARDER_ACCESS_MARKETS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            default_sample_size: 100,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub feasibility: FeasibilityConfig,
}

impl Config {
    /// Expand `~` to home directory in a path string
    pub fn expand_tilde(path: &str) -> PathBuf {
        if let Some(stripped) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(stripped);
        }
        PathBuf::from(path)
    }

    /// Get the expanded database path
    pub fn database_path(&self) -> PathBuf {
        Self::expand_tilde(&self.paths.database)
    }
}

/// Partial generation service configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialApiConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

/// Partial path configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialPathsConfig {
    pub database: Option<String>,
}

/// Partial logging configuration for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialLoggingConfig {
    pub level: Option<String>,
}

/// Partial feasibility tuning for project overrides.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialFeasibilityConfig {
    pub harder_access_markets: Option<Vec<String>>,
    pub default_sample_size: Option<u32>,
}

/// Project-specific configuration where every field is optional.
/// Parsed from `.quill` files. Fields that are `None` inherit from the
/// global config.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PartialConfig {
    pub api: PartialApiConfig,
    pub paths: PartialPathsConfig,
    pub logging: PartialLoggingConfig,
    pub feasibility: PartialFeasibilityConfig,
}

/// Merge a global config with a project-level partial config.
/// Project values override global values where present.
pub fn merge_config(global: &Config, project: &PartialConfig) -> Config {
    Config {
        api: ApiConfig {
            endpoint: project
                .api
                .endpoint
                .clone()
                .unwrap_or_else(|| global.api.endpoint.clone()),
            api_key: project
                .api
                .api_key
                .clone()
                .or_else(|| global.api.api_key.clone()),
        },
        paths: PathsConfig {
            database: project
                .paths
                .database
                .clone()
                .unwrap_or_else(|| global.paths.database.clone()),
        },
        logging: LoggingConfig {
            level: project
                .logging
                .level
                .clone()
                .unwrap_or_else(|| global.logging.level.clone()),
        },
        feasibility: FeasibilityConfig {
            harder_access_markets: project
                .feasibility
                .harder_access_markets
                .clone()
                .unwrap_or_else(|| global.feasibility.harder_access_markets.clone()),
            default_sample_size: project
                .feasibility
                .default_sample_size
                .unwrap_or(global.feasibility.default_sample_size),
        },
    }
}

/// Loaded configuration with metadata
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_path: PathBuf,
    pub project_config_path: Option<PathBuf>,
    pub status: ConfigLoadStatus,
}

/// Get the platform-appropriate config directory
fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "quill", "quill").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the full path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.quill in current working directory).
pub fn get_project_config_path() -> Option<PathBuf> {
    let path = std::env::current_dir().ok()?.join(".quill");
    if path.exists() { Some(path) } else { None }
}

/// Load a project config (.quill) from the given path.
/// Returns Ok(PartialConfig) on success, Err(String) on parse/read failure.
fn load_project_config(path: &PathBuf) -> Result<PartialConfig, String> {
    let contents = fs::read_to_string(path).map_err(|e| {
        warn!(path = ?path, error = %e, "project_config_read_failed");
        format!("Failed to read .quill: {}", e)
    })?;

    toml::from_str::<PartialConfig>(&contents).map_err(|e| {
        warn!(path = ?path, error = %e, "project_config_parse_failed");
        format!("Invalid .quill: {}", e)
    })
}

/// Load configuration from file, environment, and defaults
pub fn load_config() -> LoadedConfig {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using defaults");
            return LoadedConfig {
                config: apply_env_overrides(Config::default()),
                config_path: PathBuf::from("config.toml"),
                project_config_path: None,
                status: ConfigLoadStatus::Error("Could not determine config directory".to_string()),
            };
        }
    };

    debug!("Config path: {:?}", config_path);

    let (mut config, status) = load_or_create_config(&config_path);

    // Check for project-level .quill file
    let project_config_path = get_project_config_path();
    if let Some(ref project_path) = project_config_path {
        match load_project_config(project_path) {
            Ok(partial) => {
                config = merge_config(&config, &partial);
                info!(path = ?project_path, "project_config_loaded");
            }
            Err(e) => {
                warn!(path = ?project_path, error = %e, "project_config_error");
                // Keep using global config only
            }
        }
    }

    let config = apply_env_overrides(config);

    LoadedConfig {
        config,
        config_path,
        project_config_path,
        status,
    }
}

/// Save a config to the given file path.
/// Returns Ok(()) on success, or Err(String) with error message on failure.
pub fn save_config(config: &Config, config_path: &PathBuf) -> Result<(), String> {
    let toml_content = toml::to_string_pretty(config).map_err(|e| {
        warn!(error = %e, "config_save_serialize_failed");
        format!("Failed to serialize config: {}", e)
    })?;

    fs::write(config_path, &toml_content).map_err(|e| {
        warn!(path = ?config_path, error = %e, "config_save_write_failed");
        format!("Failed to write config: {}", e)
    })?;

    info!(path = ?config_path, "config_saved");
    Ok(())
}

/// Load config from file, or create default if not exists
fn load_or_create_config(config_path: &PathBuf) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                info!("Loaded config from {:?}", config_path);
                (config, ConfigLoadStatus::Loaded)
            }
            Err(e) => {
                warn!(
                    "Config file malformed at {:?}: {}. Using defaults.",
                    config_path, e
                );
                (
                    Config::default(),
                    ConfigLoadStatus::Error(format!("Malformed TOML: {}", e)),
                )
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // Config doesn't exist, create default
            create_default_config(config_path)
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(
                "Permission denied reading config at {:?}. Using defaults.",
                config_path
            );
            (
                Config::default(),
                ConfigLoadStatus::Error("Permission denied reading config".to_string()),
            )
        }
        Err(e) => {
            warn!(
                "Error reading config at {:?}: {}. Using defaults.",
                config_path, e
            );
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Read error: {}", e)),
            )
        }
    }
}

/// Create the default config file
fn create_default_config(config_path: &PathBuf) -> (Config, ConfigLoadStatus) {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!(
            "Could not create config directory {:?}: {}. Continuing without file.",
            parent, e
        );
        return (
            config,
            ConfigLoadStatus::Error(format!("Could not create config directory: {}", e)),
        );
    }

    // Serialize to TOML
    let toml_content = match toml::to_string_pretty(&config) {
        Ok(s) => s,
        Err(e) => {
            warn!("Could not serialize default config: {}", e);
            return (
                config,
                ConfigLoadStatus::Error(format!("Serialization error: {}", e)),
            );
        }
    };

    // Write file
    match fs::write(config_path, &toml_content) {
        Ok(()) => {
            info!("Created default config at {:?}", config_path);
            (config, ConfigLoadStatus::Created)
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(
                "Permission denied creating config at {:?}. Continuing without file.",
                config_path
            );
            (
                config,
                ConfigLoadStatus::Error("Permission denied creating config".to_string()),
            )
        }
        Err(e) => {
            warn!(
                "Could not write default config to {:?}: {}. Continuing without file.",
                config_path, e
            );
            (
                config,
                ConfigLoadStatus::Error(format!("Write error: {}", e)),
            )
        }
    }
}

/// Apply environment variable overrides to config
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(endpoint) = env::var("QUILL_API_ENDPOINT") {
        debug!("Overriding api.endpoint from QUILL_API_ENDPOINT");
        config.api.endpoint = endpoint;
    }

    if let Ok(key) = env::var("QUILL_API_KEY") {
        debug!("Overriding api.api_key from QUILL_API_KEY");
        config.api.api_key = Some(key);
    }

    if let Ok(path) = env::var("QUILL_DB_PATH") {
        debug!("Overriding paths.database from QUILL_DB_PATH");
        config.paths.database = path;
    }

    if let Ok(level) = env::var("QUILL_LOG") {
        debug!("Overriding logging.level from QUILL_LOG");
        config.logging.level = level;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, "http://localhost:3400/api");
        assert!(config.api.api_key.is_none());
        assert_eq!(config.paths.database, "~/.quill/quill.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.feasibility.harder_access_markets,
            vec!["cn", "jp", "br", "in"]
        );
        assert_eq!(config.feasibility.default_sample_size, 100);
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = Config::expand_tilde("~/.config/test");
        assert!(!expanded.to_string_lossy().starts_with('~'));

        let no_tilde = Config::expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));

        let relative = Config::expand_tilde("./relative/path");
        assert_eq!(relative, PathBuf::from("./relative/path"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
[api]
endpoint = "https://generation.internal/api"

[paths]
database = "./custom.db"

[logging]
level = "debug"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.endpoint, "https://generation.internal/api");
        assert_eq!(config.paths.database, "./custom.db");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_partial_deserialization() {
        // Only api section specified, others should use defaults
        let toml_str = r#"
[api]
endpoint = "https://generation.internal/api"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.endpoint, "https://generation.internal/api");
        assert_eq!(config.paths.database, "~/.quill/quill.db");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let toml_str = r#"
[api]
endpoint = "https://generation.internal/api"
unknown_key = "should be ignored"

[unknown_section]
foo = "bar"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.endpoint, "https://generation.internal/api");
    }

    #[test]
    fn test_feasibility_overrides() {
        let toml_str = r#"
[feasibility]
harder_access_markets = ["cn", "sa"]
default_sample_size = 200
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.feasibility.harder_access_markets, vec!["cn", "sa"]);
        assert_eq!(config.feasibility.default_sample_size, 200);
    }

    #[test]
    fn test_partial_config_empty() {
        let toml_str = "";
        let partial: PartialConfig = toml::from_str(toml_str).unwrap();
        assert!(partial.api.endpoint.is_none());
        assert!(partial.api.api_key.is_none());
        assert!(partial.paths.database.is_none());
        assert!(partial.logging.level.is_none());
        assert!(partial.feasibility.harder_access_markets.is_none());
        assert!(partial.feasibility.default_sample_size.is_none());
    }

    #[test]
    fn test_partial_config_some_fields() {
        let toml_str = r#"
[paths]
database = "./project.db"

[feasibility]
default_sample_size = 300
"#;

        let partial: PartialConfig = toml::from_str(toml_str).unwrap();
        assert!(partial.api.endpoint.is_none());
        assert_eq!(partial.paths.database, Some("./project.db".to_string()));
        assert_eq!(partial.feasibility.default_sample_size, Some(300));
    }

    #[test]
    fn test_partial_config_unknown_keys_ignored() {
        let toml_str = r#"
[paths]
database = "./p.db"
unknown = "ignored"

[unknown_section]
foo = "bar"
"#;

        let partial: PartialConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(partial.paths.database, Some("./p.db".to_string()));
    }

    #[test]
    fn test_partial_config_comment_only() {
        let toml_str = "# Project-specific Quill config\n";
        let partial: PartialConfig = toml::from_str(toml_str).unwrap();
        assert!(partial.api.endpoint.is_none());
        assert!(partial.paths.database.is_none());
    }

    #[test]
    fn test_merge_config_no_overrides() {
        let global = Config::default();
        let partial = PartialConfig::default();
        let merged = merge_config(&global, &partial);

        assert_eq!(merged.api.endpoint, global.api.endpoint);
        assert_eq!(merged.paths.database, global.paths.database);
        assert_eq!(merged.logging.level, global.logging.level);
        assert_eq!(
            merged.feasibility.harder_access_markets,
            global.feasibility.harder_access_markets
        );
        assert_eq!(
            merged.feasibility.default_sample_size,
            global.feasibility.default_sample_size
        );
    }

    #[test]
    fn test_merge_config_all_overrides() {
        let global = Config::default();
        let partial = PartialConfig {
            api: PartialApiConfig {
                endpoint: Some("https://project.internal/api".to_string()),
                api_key: Some("project-key".to_string()),
            },
            paths: PartialPathsConfig {
                database: Some("./proj.db".to_string()),
            },
            logging: PartialLoggingConfig {
                level: Some("debug".to_string()),
            },
            feasibility: PartialFeasibilityConfig {
                harder_access_markets: Some(vec!["ru".to_string()]),
                default_sample_size: Some(250),
            },
        };
        let merged = merge_config(&global, &partial);

        assert_eq!(merged.api.endpoint, "https://project.internal/api");
        assert_eq!(merged.api.api_key, Some("project-key".to_string()));
        assert_eq!(merged.paths.database, "./proj.db");
        assert_eq!(merged.logging.level, "debug");
        assert_eq!(merged.feasibility.harder_access_markets, vec!["ru"]);
        assert_eq!(merged.feasibility.default_sample_size, 250);
    }

    #[test]
    fn test_merge_config_partial_overrides() {
        let global = Config::default();
        let partial: PartialConfig = toml::from_str(
            r#"
[paths]
database = "./proj.db"

[feasibility]
default_sample_size = 150
"#,
        )
        .unwrap();
        let merged = merge_config(&global, &partial);

        // Overridden fields
        assert_eq!(merged.paths.database, "./proj.db");
        assert_eq!(merged.feasibility.default_sample_size, 150);

        // Inherited fields
        assert_eq!(merged.api.endpoint, global.api.endpoint);
        assert_eq!(merged.logging.level, global.logging.level);
        assert_eq!(
            merged.feasibility.harder_access_markets,
            global.feasibility.harder_access_markets
        );
    }

    #[test]
    fn test_api_key_inherited_when_project_unset() {
        let mut global = Config::default();
        global.api.api_key = Some("global-key".to_string());
        let merged = merge_config(&global, &PartialConfig::default());
        assert_eq!(merged.api.api_key, Some("global-key".to_string()));
    }
}
