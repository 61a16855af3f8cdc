//! Site configuration (staticgen.yml)

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "staticgen.yml";

const HIGHLIGHT_CDN: &str = "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/9.18.1";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{path:?} does not exist, run `staticgen-rs --init` to scaffold a new project")]
    Missing { path: PathBuf },

    #[error("failed to read {path:?}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse {path:?}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Main site configuration
///
/// Templates see the whole structure as `global`, extra keys included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directories, relative to the project root
    pub content: String,
    pub public: String,
    pub templates: String,
    #[serde(rename = "static")]
    pub static_dir: String,
    pub assets: String,

    // Site and feed metadata
    pub author: String,
    pub description: String,
    pub domain: String,
    pub email: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content: "content".to_string(),
            public: "public".to_string(),
            templates: "templates".to_string(),
            static_dir: "static".to_string(),
            assets: "assets".to_string(),

            author: String::new(),
            description: String::new(),
            domain: String::new(),
            email: String::new(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ConfigError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut config: SiteConfig = serde_yaml::from_str(content)?;
        config.normalize_dirs();
        config.expand_snippets();
        Ok(config)
    }

    /// Directory values may be written with a trailing slash; paths are
    /// joined with `Path::join` later, so strip it here once.
    fn normalize_dirs(&mut self) {
        for dir in [
            &mut self.content,
            &mut self.public,
            &mut self.templates,
            &mut self.static_dir,
            &mut self.assets,
        ] {
            while dir.ends_with('/') {
                dir.pop();
            }
        }
    }

    /// Replace shorthand keys with ready-to-embed HTML snippets.
    ///
    /// `ga: <id>` becomes the full gtag loader under the same key, and
    /// `highlight_style: <theme>` adds a `highlight` key with the CDN
    /// stylesheet and script tags. Templates embed them verbatim as
    /// `global.ga` and `global.highlight`.
    fn expand_snippets(&mut self) {
        if let Some(style) = self
            .extra
            .get("highlight_style")
            .and_then(|v| v.as_str())
            .map(str::to_string)
        {
            let snippet = format!(
                "<link rel=\"stylesheet\" href=\"{HIGHLIGHT_CDN}/styles/{style}.min.css\">\n\
                 <script src=\"{HIGHLIGHT_CDN}/highlight.min.js\"></script>\n\
                 <script>hljs.initHighlightingOnLoad();</script>"
            );
            self.extra
                .insert("highlight".to_string(), serde_yaml::Value::String(snippet));
        }

        if let Some(id) = self
            .extra
            .get("ga")
            .and_then(|v| v.as_str())
            .map(str::to_string)
        {
            let snippet = format!(
                "<script async=\"async\" src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n\
                 <script>\n\
                 window.dataLayer = window.dataLayer || [];\n\
                 function gtag() {{ dataLayer.push(arguments); }}\n\
                 gtag('js', new Date());\n\
                 gtag('config', '{id}');\n\
                 </script>"
            );
            self.extra
                .insert("ga".to_string(), serde_yaml::Value::String(snippet));
        }
    }
}
