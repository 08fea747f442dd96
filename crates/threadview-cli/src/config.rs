use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use threadview_browse::BrowseConfig;
use threadview_engine::ArchiveEngineConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub engine: ArchiveEngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// `chrono` format string for thread dates (UTC)
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables `THREADVIEW_<SECTION>__<KEY>`,
    ///    e.g. `THREADVIEW_BROWSE__PAGE_SIZE=10`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("THREADVIEW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [browse]
            page_size = 10
            event_buffer = 16

            [engine]
            initial_window = 30
            min_word_len = 3
            title_max_chars = 60
            language = "none"

            [logging]
            level = "debug"
            format = "json"

            [display]
            date_format = "%d.%m.%Y"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.browse.page_size, 10);
        assert_eq!(config.engine.initial_window, 30);
        assert_eq!(config.engine.language, "none");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.display.date_format, "%d.%m.%Y");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let toml = r#"
            [browse]
            page_size = 2
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.browse.page_size, 2);
        assert_eq!(config.browse.event_buffer, 64);
        assert_eq!(config.engine, ArchiveEngineConfig::default());
        assert_eq!(config.logging.level, "info");
    }
}
