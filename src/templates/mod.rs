//! Page and index rendering through the Tera template engine
//!
//! Templates live in the project's templates directory and are addressed by
//! the `template` front-matter option, without extension.

use std::collections::HashMap;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::IndexEntry;
use crate::helpers;

/// Extension appended to a `template` option to find its file.
pub const TEMPLATE_EXT: &str = ".html";

/// Template used for the site index.
pub const INDEX_TEMPLATE: &str = "index.html";

/// Template renderer over a project's templates directory
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load and parse every `*.html` template under `dir`.
    ///
    /// A missing directory yields an empty renderer; unknown templates then
    /// surface per document at render time. A template that fails to parse
    /// is an error here, before any page is touched.
    pub fn from_dir(dir: &Path) -> tera::Result<Self> {
        let mut tera = Tera::new(&format!("{}/**/*{}", dir.display(), TEMPLATE_EXT))?;

        // Disable autoescaping: content is already rendered HTML, and the
        // config snippets must embed verbatim
        tera.autoescape_on(vec![]);

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render one document's page.
    ///
    /// The template sees `options` (its front matter), `global` (the whole
    /// config), and `content` (the rendered HTML body).
    pub fn render_page(
        &self,
        template: &str,
        options: &HashMap<String, String>,
        global: &SiteConfig,
        content: &str,
    ) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("options", options);
        context.insert("global", global);
        context.insert("content", content);
        self.tera
            .render(&format!("{template}{TEMPLATE_EXT}"), &context)
    }

    /// Render the site index from the sorted list of visible documents.
    pub fn render_index(&self, global: &SiteConfig, list: &[IndexEntry]) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("global", global);
        context.insert("list", list);
        self.tera.render(INDEX_TEMPLATE, &context)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => " .....".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: reformat a front-matter date string
///
/// Accepts the same date layouts the index sort does and formats with a
/// strftime pattern, `%Y-%m-%d` when none is given. Unparsable input passes
/// through unchanged.
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%Y-%m-%d".to_string(),
    };

    let items: Vec<Item> = StrftimeItems::new(&format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(tera::Error::msg(format!(
            "invalid format `{format}` for the date_format filter"
        )));
    }

    match helpers::parse_date(&s) {
        Some(date) => Ok(tera::Value::String(
            date.format_with_items(items.into_iter()).to_string(),
        )),
        None => Ok(tera::Value::String(s)),
    }
}
