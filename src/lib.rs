//! staticgen-rs: a small static site generator
//!
//! Content files are Markdown with `~key: value` front-matter lines, pages
//! render through Tera templates, and every run produces a date-sorted
//! index page and an Atom feed alongside copies of the static and asset
//! directories.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod sink;
pub mod templates;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use config::{ConfigError, SiteConfig, CONFIG_FILE};

/// A project rooted at one directory
///
/// Holds the parsed config and the directories derived from it; everything
/// downstream takes this instead of reaching for the working directory.
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: SiteConfig,
    /// Project root
    pub base_dir: PathBuf,
    /// Markdown content
    pub content_dir: PathBuf,
    /// Generated output
    pub public_dir: PathBuf,
    /// Tera templates
    pub templates_dir: PathBuf,
    /// Static passthrough tree
    pub static_dir: PathBuf,
    /// Asset passthrough tree
    pub assets_dir: PathBuf,
}

impl Site {
    /// Load a project from its root directory.
    pub fn load<P: AsRef<Path>>(base_dir: P) -> Result<Self, ConfigError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = SiteConfig::load(base_dir.join(CONFIG_FILE))?;
        Ok(Self::with_config(base_dir, config))
    }

    /// Assemble a project from an already-parsed config.
    pub fn with_config(base_dir: PathBuf, config: SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content);
        let public_dir = base_dir.join(&config.public);
        let templates_dir = base_dir.join(&config.templates);
        let static_dir = base_dir.join(&config.static_dir);
        let assets_dir = base_dir.join(&config.assets);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            templates_dir,
            static_dir,
            assets_dir,
        }
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_site_load_derives_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "content: posts\npublic: out/\nauthor: X",
        )
        .unwrap();

        let site = Site::load(tmp.path()).unwrap();
        assert_eq!(site.base_dir, tmp.path());
        assert_eq!(site.content_dir, tmp.path().join("posts"));
        assert_eq!(site.public_dir, tmp.path().join("out"));
        assert_eq!(site.templates_dir, tmp.path().join("templates"));
        assert_eq!(site.static_dir, tmp.path().join("static"));
        assert_eq!(site.assets_dir, tmp.path().join("assets"));
    }

    #[test]
    fn test_site_load_requires_config() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            Site::load(tmp.path()),
            Err(ConfigError::Missing { .. })
        ));
    }
}
