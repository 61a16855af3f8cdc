//! Content pipeline: discovery, front matter, markdown

pub mod document;
pub mod frontmatter;
pub mod markdown;
pub mod scanner;

pub use document::{Document, DocumentError, IndexEntry};
pub use frontmatter::{FrontMatter, MalformedLine, MARKER};
pub use markdown::MarkdownRenderer;
pub use scanner::{scan, ScanError};
