//! Generator module - drives the whole pipeline from content to public tree

pub mod feed;
pub mod index;

pub use feed::{render_feed, FEED_FILE};
pub use index::{sort_entries, INDEX_FILE};

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::content::{self, Document, DocumentError, IndexEntry, MarkdownRenderer, ScanError};
use crate::sink::{DiskSink, Sink};
use crate::templates::TemplateRenderer;
use crate::Site;

/// Extension of source content files.
pub const CONTENT_SUFFIX: &str = ".md";

/// Failures that abort the whole run.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to load templates from {dir:?}")]
    Templates { dir: PathBuf, source: tera::Error },

    #[error("failed to create output directory {path:?}")]
    OutputDir { path: PathBuf, source: io::Error },

    #[error("failed to render the index")]
    IndexRender { source: tera::Error },

    #[error("failed to write {path:?}")]
    IndexWrite { path: PathBuf, source: io::Error },

    #[error("failed to write {path:?}")]
    FeedWrite { path: PathBuf, source: io::Error },
}

/// Static site generator
pub struct Generator {
    site: Site,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
    sink: Box<dyn Sink>,
}

impl Generator {
    /// Create a generator writing to the real output tree.
    pub fn new(site: &Site) -> Result<Self, GenerateError> {
        Self::with_sink(site, Box::new(DiskSink))
    }

    /// Create a generator writing through a custom sink.
    ///
    /// Templates are parsed here, so a broken template fails the run before
    /// any output is produced.
    pub fn with_sink(site: &Site, sink: Box<dyn Sink>) -> Result<Self, GenerateError> {
        if !site.templates_dir.is_dir() {
            warn!("Templates directory {:?} does not exist", site.templates_dir);
        }
        let templates =
            TemplateRenderer::from_dir(&site.templates_dir).map_err(|source| {
                GenerateError::Templates {
                    dir: site.templates_dir.clone(),
                    source,
                }
            })?;

        Ok(Self {
            site: site.clone(),
            templates,
            markdown: MarkdownRenderer::new(),
            sink,
        })
    }

    /// Generate the entire site
    ///
    /// Pages first, then the index, the static and asset copies, and the
    /// feed. A failure in one document skips that document only; failures
    /// around run-level artifacts abort.
    pub fn generate(&self) -> Result<(), GenerateError> {
        self.sink
            .ensure_dir(&self.site.public_dir)
            .map_err(|source| GenerateError::OutputDir {
                path: self.site.public_dir.clone(),
                source,
            })?;

        let files = content::scan(&self.site.content_dir, CONTENT_SUFFIX)?;

        let mut list = Vec::new();
        let mut skipped = 0usize;
        for path in &files {
            match self.generate_page(path) {
                Ok(Some(entry)) => list.push(entry),
                Ok(None) => {}
                Err(err) => {
                    skipped += 1;
                    warn!("Skipping document: {}", err);
                }
            }
        }

        sort_entries(&mut list);
        self.write_index(&list)?;
        self.copy_passthrough_dirs();
        self.write_feed(&list)?;

        info!(
            "Generated {} pages ({} skipped), index and feed",
            files.len() - skipped,
            skipped
        );
        Ok(())
    }

    /// Render and write one document. Returns its index entry, or `None`
    /// when the document is hidden.
    fn generate_page(&self, path: &Path) -> Result<Option<IndexEntry>, DocumentError> {
        let doc = Document::load(path)?;
        let slug = doc.require("slug")?;
        let template = doc.require("template")?;

        let target = resolve_slug(&self.site.public_dir, slug).ok_or_else(|| {
            DocumentError::UnsafeSlug {
                path: doc.source.clone(),
                slug: slug.to_string(),
            }
        })?;

        let html = self.markdown.render(&doc.body);
        let page = self
            .templates
            .render_page(template, doc.front_matter.options(), &self.site.config, &html)
            .map_err(|source| DocumentError::Template {
                path: doc.source.clone(),
                template: template.to_string(),
                source,
            })?;

        if let Some(parent) = target.parent() {
            self.sink
                .ensure_dir(parent)
                .map_err(|source| DocumentError::Write {
                    target: parent.to_path_buf(),
                    source,
                })?;
        }
        self.sink
            .write_file(&target, page.as_bytes())
            .map_err(|source| DocumentError::Write {
                target: target.clone(),
                source,
            })?;
        debug!("Generated: {:?}", target);

        if doc.front_matter.hidden() {
            return Ok(None);
        }
        Ok(Some(IndexEntry::new(&doc, html)))
    }

    fn write_index(&self, list: &[IndexEntry]) -> Result<(), GenerateError> {
        let html = self
            .templates
            .render_index(&self.site.config, list)
            .map_err(|source| GenerateError::IndexRender { source })?;
        let path = self.site.public_dir.join(INDEX_FILE);
        self.sink
            .write_file(&path, html.as_bytes())
            .map_err(|source| GenerateError::IndexWrite { path, source })?;
        info!("Generated index with {} entries", list.len());
        Ok(())
    }

    /// Copy the static and assets trees into the output directory, keeping
    /// their directory names. A missing or unreadable tree is logged and
    /// skipped; pages, index and feed do not depend on it.
    fn copy_passthrough_dirs(&self) {
        for (name, dir) in [
            (&self.site.config.static_dir, &self.site.static_dir),
            (&self.site.config.assets, &self.site.assets_dir),
        ] {
            if !dir.is_dir() {
                warn!("Skipping copy of {:?}: not a directory", dir);
                continue;
            }
            let dest = self.site.public_dir.join(name);
            match self.sink.copy_tree(dir, &dest) {
                Ok(()) => debug!("Copied {:?} to {:?}", dir, dest),
                Err(err) => warn!("Failed to copy {:?} to {:?}: {}", dir, dest, err),
            }
        }
    }

    fn write_feed(&self, list: &[IndexEntry]) -> Result<(), GenerateError> {
        let feed = render_feed(&self.site.config, list);
        let path = self.site.public_dir.join(FEED_FILE);
        self.sink
            .write_file(&path, feed.as_bytes())
            .map_err(|source| GenerateError::FeedWrite { path, source })?;
        info!("Generated {}", FEED_FILE);
        Ok(())
    }
}

/// Resolve a slug against the output root, refusing any path that would land
/// outside of it.
///
/// Leading slashes are treated as relative to the root. `.` segments drop
/// out, `..` pops within the resolved part and fails once it would climb
/// past the root.
fn resolve_slug(public_dir: &Path, slug: &str) -> Option<PathBuf> {
    let relative = Path::new(slug.trim_start_matches('/'));
    let mut resolved = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if resolved.as_os_str().is_empty() {
        return None;
    }
    Some(public_dir.join(resolved))
}
