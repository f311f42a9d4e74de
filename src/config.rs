//! Configuration management for the annotation server

use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::html::{AnnotateError, HighlightConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid highlight configuration: {0}")]
    Highlight(#[from] AnnotateError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub highlight: HighlightConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding `{book_id}.epub` files
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            library: LibraryConfig {
                path: PathBuf::from("./library"),
            },
            highlight: HighlightConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = HighlightConfig::default();

        let config = Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            library: LibraryConfig {
                path: PathBuf::from(
                    env::var("LIBRARY_PATH").unwrap_or_else(|_| "./library".to_string()),
                ),
            },
            highlight: HighlightConfig {
                tag: env::var("HIGHLIGHT_TAG").unwrap_or(defaults.tag),
                class_name: env::var("HIGHLIGHT_CLASS").unwrap_or(defaults.class_name),
                onclick: env::var("HIGHLIGHT_ONCLICK").ok().or(defaults.onclick),
                ..HighlightConfig::default()
            },
        };

        config.highlight.validate()?;
        Ok(config)
    }
}
