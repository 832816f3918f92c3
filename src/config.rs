//! Configuration management for biolex using the prefer crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::lexical::LexicalConfig;
use crate::output::OutputFormat;
use crate::semantic::LookupConfig;

/// Default output directory, relative to the working directory.
const DEFAULT_OUTPUT_DIR: &str = "out";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory that tabular and structured output is written to.
    pub output_dir: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Per-request HTTP timeout. None waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Remote lookup services.
    pub lookup: LookupConfig,
    /// Lexical backend selection.
    pub lexical: LexicalConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::default(),
            request_timeout: None,
            lookup: LookupConfig::default(),
            lexical: LexicalConfig::default().with_env_overrides(),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    /// Output format (console, table, yaml).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Lookup service endpoints and enrichment.
    #[serde(default)]
    pub lookup: Option<LookupConfig>,
    /// Lexical backend.
    #[serde(default)]
    pub lexical: Option<LexicalConfig>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers biolex config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("biolex").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML, and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, String> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        match ext {
            "toml" => {
                toml::from_str(contents).map_err(|e| format!("Failed to parse TOML config: {}", e))
            }
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings. Environment overrides are applied
    /// on top of file values for the lookup and lexical sections.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref output_dir) = self.output_dir {
            settings.output_dir = self.resolve_path(output_dir, base_dir);
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = Some(Duration::from_secs(timeout));
        }
        if let Some(ref lookup) = self.lookup {
            settings.lookup = lookup.clone().with_env_overrides();
        }
        if let Some(ref lexical) = self.lexical {
            settings.lexical = lexical.clone().with_env_overrides();
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
}

/// Load config from the explicit path, or discover it.
async fn load_file_config(options: &LoadOptions) -> Result<Config, String> {
    if let Some(ref config_path) = options.config_path {
        return Config::load_from_path(config_path).await;
    }
    Ok(Config::load().await)
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple. An explicit config path that cannot be
/// read or parsed is an error; a discovered one falls back to defaults.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), String> {
    let config = load_file_config(&options).await?;

    let mut settings = Settings::default();

    let base_dir = if options.use_cwd {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    } else {
        config
            .base_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    };

    config.apply_to_settings(&mut settings, &base_dir);

    // BIOLEX_OUTPUT_DIR takes precedence over config
    if let Some(dir) = std::env::var("BIOLEX_OUTPUT_DIR")
        .ok()
        .filter(|s| !s.is_empty())
    {
        tracing::debug!("Using BIOLEX_OUTPUT_DIR from environment: {}", dir);
        settings.output_dir = config.resolve_path(&dir, &base_dir);
    }

    Ok((settings, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexicalBackendKind;

    #[test]
    fn test_parse_by_extension() {
        let toml = r#"
            output_dir = "results"
            format = "yaml"
            request_timeout = 30

            [lookup]
            identifier_limit = 5

            [lexical]
            backend = "http"
            endpoint = "http://localhost:8080/parse"
        "#;
        let config = Config::parse(toml, Path::new("biolex.toml")).unwrap();
        assert_eq!(config.format, Some(OutputFormat::Yaml));
        assert_eq!(config.lookup.as_ref().unwrap().identifier_limit, 5);
        assert_eq!(
            config.lexical.as_ref().unwrap().backend,
            LexicalBackendKind::Http
        );

        let yaml = "format: console\nlookup:\n  enrich_pos: [NOUN, PROPN]\n";
        let config = Config::parse(yaml, Path::new("biolex.yml")).unwrap();
        assert_eq!(config.format, Some(OutputFormat::Console));
        assert_eq!(
            config.lookup.unwrap().enrich_pos,
            vec!["NOUN".to_string(), "PROPN".to_string()]
        );

        let json = r#"{"output_dir": "/tmp/biolex"}"#;
        let config = Config::parse(json, Path::new("biolex.json")).unwrap();
        assert_eq!(config.output_dir.as_deref(), Some("/tmp/biolex"));

        assert!(Config::parse("format = 1", Path::new("biolex.toml")).is_err());
    }

    #[test]
    fn test_apply_to_settings() {
        let config = Config {
            output_dir: Some("results".to_string()),
            request_timeout: Some(30),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/data"));

        assert_eq!(settings.output_dir, PathBuf::from("/data/results"));
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_resolve_absolute_path() {
        let config = Config::default();
        assert_eq!(
            config.resolve_path("/abs/out", Path::new("/data")),
            PathBuf::from("/abs/out")
        );
    }

    #[tokio::test]
    async fn test_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biolex.yaml");
        std::fs::write(&path, "output_dir: results\nformat: yaml\n").unwrap();

        let (settings, config) = load_settings_with_options(LoadOptions {
            config_path: Some(path.clone()),
            use_cwd: false,
        })
        .await
        .unwrap();

        assert_eq!(config.source_path, Some(path));
        assert_eq!(settings.format, OutputFormat::Yaml);
        assert!(settings.output_dir.ends_with("results"));

        let missing = load_settings_with_options(LoadOptions {
            config_path: Some(dir.path().join("missing.toml")),
            use_cwd: false,
        })
        .await;
        assert!(missing.is_err());
    }
}
