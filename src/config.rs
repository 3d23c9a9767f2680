// conference-export-service/src/config.rs

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub export: ExportConfig,
    pub renderer: RendererConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Account left out of batch exports alongside administrators.
    pub excluded_username: String,
    pub countries_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    pub chrome_binary: String,
    pub max_concurrent: usize,
    pub navigation_timeout_secs: u64,
    pub virtual_time_budget_ms: u64,
    pub page_format: String,
    pub margin_mm: u32,
}

impl RendererConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateConfig {
    /// Optional handlebars file replacing the embedded export template.
    pub path: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default values
            .set_default("service.name", "conference-export-service")?
            .set_default("service.log_level", "info")?
            .set_default("http.bind_addr", "0.0.0.0:3000")?
            .set_default("database.url", "sqlite://database/conference.db")?
            .set_default("database.max_connections", 5)?
            .set_default("export.excluded_username", "test")?
            .set_default("export.countries_path", "data/countries-simplified.json")?
            .set_default("renderer.chrome_binary", "chromium")?
            .set_default("renderer.max_concurrent", 2)?
            .set_default("renderer.navigation_timeout_secs", 60)?
            .set_default("renderer.virtual_time_budget_ms", 5000)?
            .set_default("renderer.page_format", "A4")?
            .set_default("renderer.margin_mm", 12)?
            // Load from config file if it exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g., SERVICE__RENDERER__CHROME_BINARY)
            .add_source(Environment::with_prefix("SERVICE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
