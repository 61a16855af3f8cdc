//! Configuration loading

pub mod site;

pub use site::{ConfigError, SiteConfig, CONFIG_FILE};
