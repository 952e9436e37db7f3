use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::models::{Color, QrKind, BLACK, WHITE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub defaults: DefaultsConfig,
    pub output: OutputConfig,
    pub ui: UiConfig,
}

/// Initial values for the form state; every one of them can still be
/// changed live through the bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_kind")]
    pub kind: QrKind,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_foreground")]
    pub foreground: Color,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default = "default_logo_size")]
    pub logo_size: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Echo toast notifications through the log output.
    #[serde(default = "default_true")]
    pub log_toasts: bool,
}

// Default value functions
fn default_kind() -> QrKind { QrKind::Url }
fn default_size() -> u32 { 200 }
fn default_foreground() -> Color { BLACK }
fn default_background() -> Color { WHITE }
fn default_logo_size() -> u8 { 25 }
fn default_true() -> bool { true }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig {
                kind: default_kind(),
                size: default_size(),
                foreground: default_foreground(),
                background: default_background(),
                logo_size: default_logo_size(),
            },
            output: OutputConfig { directory: None },
            ui: UiConfig {
                log_toasts: default_true(),
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("qrstudio.toml").required(false))
            .add_source(config::Environment::with_prefix("QRSTUDIO"));

        // Override with individual environment variables
        if let Ok(size) = std::env::var("QR_SIZE") {
            builder = builder.set_override("defaults.size", size)?;
        }
        if let Ok(dir) = std::env::var("OUTPUT_DIR") {
            builder = builder.set_override("output.directory", dir)?;
        }

        let settings = builder.build()?;
        let config: AppConfig = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn save_example() -> Result<()> {
        let example_config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&example_config)?;
        std::fs::write("qrstudio.example.toml", toml_string)?;
        Ok(())
    }

    pub fn from_toml(toml_content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_content)?;
        Ok(config)
    }
}
