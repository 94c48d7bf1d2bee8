use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::Weights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Locations of the header-less reference CSV tables
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_zip_codes_path")]
    pub zip_codes_path: String,
    #[serde(default = "default_hospitals_path")]
    pub hospitals_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            zip_codes_path: default_zip_codes_path(),
            hospitals_path: default_hospitals_path(),
        }
    }
}

fn default_zip_codes_path() -> String { "data/zipcode.csv".to_string() }
fn default_hospitals_path() -> String { "data/hospital.csv".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingSettings {
    /// Weights used for any importance the client leaves out
    #[serde(default)]
    pub default_weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_weight")]
    pub closeness: f64,
    #[serde(default = "default_weight")]
    pub c_section: f64,
    #[serde(default = "default_weight")]
    pub vbac: f64,
    #[serde(default = "default_weight")]
    pub nicu: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            closeness: default_weight(),
            c_section: default_weight(),
            vbac: default_weight(),
            nicu: default_weight(),
        }
    }
}

impl From<&WeightsConfig> for Weights {
    fn from(config: &WeightsConfig) -> Self {
        Weights {
            c_section: config.c_section,
            vbac: config.vbac,
            nicu: config.nicu,
            closeness: config.closeness,
        }
    }
}

// Midpoint of the 0-10 importance scale
fn default_weight() -> f64 { 5.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: i64 = 8080;

fn environment() -> Environment {
    // e.g., DELIVERY__SERVER__PORT -> server.port
    Environment::with_prefix("DELIVERY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with DELIVERY__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", DEFAULT_PORT)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", DEFAULT_PORT)?
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    pub fn default_weights(&self) -> Weights {
        Weights::from(&self.ranking.default_weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.closeness, 5.0);
        assert_eq!(weights.c_section, 5.0);
        assert_eq!(weights.vbac, 5.0);
        assert_eq!(weights.nicu, 5.0);
        assert_eq!(Weights::from(&weights), Weights::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file_without_server_section() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[data]
zip_codes_path = "/srv/zipcode.csv"
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.data.zip_codes_path, "/srv/zipcode.csv");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "0.0.0.0"
port = 9000

[data]
hospitals_path = "/srv/hospital.csv"

[ranking.default_weights]
closeness = 8.0
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.data.hospitals_path, "/srv/hospital.csv");
        assert_eq!(settings.data.zip_codes_path, "data/zipcode.csv");
        assert_eq!(settings.default_weights().closeness, 8.0);
        assert_eq!(settings.default_weights().vbac, 5.0);
        assert_eq!(settings.logging.format, "json");
    }
}
