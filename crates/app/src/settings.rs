//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` next to the binary and from `TALLY__*`
//! environment variables (e.g. `TALLY__SERVER__PORT=8080`).
//!
//! See `settings.example.toml` for the available keys.
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("tally.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            database: Database::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(
                    Environment::with_prefix("TALLY")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
