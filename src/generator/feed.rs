//! Atom feed assembly

use chrono::DateTime;

use crate::config::SiteConfig;
use crate::content::IndexEntry;

/// File name of the feed inside the public directory.
pub const FEED_FILE: &str = "feed.atom";

/// Build the Atom document for an already-sorted entry list.
///
/// The feed `<updated>` stamp comes from the newest entry, never from the
/// clock, so regenerating unchanged content produces identical bytes.
/// Undated entries fall back to the Unix epoch.
pub fn render_feed(config: &SiteConfig, entries: &[IndexEntry]) -> String {
    let domain = config.domain.trim_end_matches('/');
    let updated = entries
        .iter()
        .filter_map(|e| e.date)
        .max()
        .unwrap_or(DateTime::UNIX_EPOCH);

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!(
        "  <title>{}</title>\n",
        escape_xml(&config.author)
    ));
    feed.push_str(&format!(
        "  <subtitle>{}</subtitle>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!(
        "  <link href=\"{}/{}\" rel=\"self\"/>\n",
        escape_xml(domain),
        FEED_FILE
    ));
    feed.push_str(&format!("  <link href=\"{}/\"/>\n", escape_xml(domain)));
    feed.push_str(&format!("  <updated>{}</updated>\n", updated.to_rfc3339()));
    feed.push_str(&format!("  <id>{}/</id>\n", escape_xml(domain)));
    feed.push_str(&format!(
        "  <author><name>{}</name><email>{}</email></author>\n",
        escape_xml(&config.author),
        escape_xml(&config.email)
    ));

    for entry in entries {
        let slug = entry.slug().unwrap_or_default();
        let link = if slug.starts_with('/') {
            format!("{domain}{slug}")
        } else {
            format!("{domain}/{slug}")
        };
        let link = escape_xml(&link);
        let date = entry.date.unwrap_or(DateTime::UNIX_EPOCH).to_rfc3339();

        feed.push_str("  <entry>\n");
        feed.push_str(&format!(
            "    <title>{}</title>\n",
            escape_xml(entry.title().unwrap_or_default())
        ));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
        feed.push_str(&format!("    <id>{}</id>\n", link));
        feed.push_str(&format!("    <published>{}</published>\n", date));
        feed.push_str(&format!("    <updated>{}</updated>\n", date));
        if let Some(description) = entry.description() {
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(description)
            ));
        }
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            cdata(entry.html())
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Prepare text for a CDATA section: strip characters XML 1.0 forbids and
/// split any `]]>` terminator inside the payload.
fn cdata(s: &str) -> String {
    strip_invalid_xml_chars(s).replace("]]>", "]]]]><![CDATA[>")
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Document;
    use std::path::Path;

    fn config() -> SiteConfig {
        SiteConfig {
            author: "Jane Doe".to_string(),
            description: "Notes & essays".to_string(),
            domain: "https://example.com".to_string(),
            email: "jane@example.com".to_string(),
            ..SiteConfig::default()
        }
    }

    fn entry(title: &str, slug: &str, date: Option<&str>, html: &str) -> IndexEntry {
        let mut text = format!("~title: {title}\n~slug: {slug}");
        if let Some(date) = date {
            text.push_str(&format!("\n~date: {date}"));
        }
        let doc = Document::parse(&text, Path::new("t.md"));
        IndexEntry::new(&doc, html.to_string())
    }

    #[test]
    fn test_feed_metadata() {
        let feed = render_feed(&config(), &[]);
        assert!(feed.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(feed.contains("<title>Jane Doe</title>"));
        assert!(feed.contains("<subtitle>Notes &amp; essays</subtitle>"));
        assert!(feed.contains(r#"<link href="https://example.com/feed.atom" rel="self"/>"#));
        assert!(feed.contains("<id>https://example.com/</id>"));
        assert!(feed.contains("<name>Jane Doe</name><email>jane@example.com</email>"));
    }

    #[test]
    fn test_entries_keep_given_order() {
        let entries = vec![
            entry("Newer", "/b.html", Some("2024-02-01"), "<p>b</p>"),
            entry("Older", "/a.html", Some("2024-01-01"), "<p>a</p>"),
        ];
        let feed = render_feed(&config(), &entries);

        let b = feed.find("https://example.com/b.html").unwrap();
        let a = feed.find("https://example.com/a.html").unwrap();
        assert!(b < a);
        assert_eq!(feed.matches("<entry>").count(), 2);
    }

    #[test]
    fn test_entry_fields() {
        let e = entry("Post <1>", "/p.html", Some("2024-01-15"), "<p>text</p>");
        let feed = render_feed(&config(), &[e]);

        assert!(feed.contains("<title>Post &lt;1&gt;</title>"));
        assert!(feed.contains(r#"<link href="https://example.com/p.html"/>"#));
        assert!(feed.contains("<id>https://example.com/p.html</id>"));
        assert!(feed.contains("<published>2024-01-15T00:00:00+00:00</published>"));
        assert!(feed.contains("<content type=\"html\"><![CDATA[<p>text</p>]]></content>"));
    }

    #[test]
    fn test_slug_without_leading_slash_still_absolute() {
        let feed = render_feed(&config(), &[entry("T", "p.html", None, "")]);
        assert!(feed.contains("<id>https://example.com/p.html</id>"));
    }

    #[test]
    fn test_entry_url_is_escaped() {
        let feed = render_feed(&config(), &[entry("T", "/a&b.html", None, "")]);
        assert!(feed.contains(r#"<link href="https://example.com/a&amp;b.html"/>"#));
        assert!(feed.contains("<id>https://example.com/a&amp;b.html</id>"));
        assert!(!feed.contains("a&b.html"));
    }

    #[test]
    fn test_undated_entry_uses_epoch() {
        let feed = render_feed(&config(), &[entry("T", "/p.html", None, "")]);
        assert!(feed.contains("<published>1970-01-01T00:00:00+00:00</published>"));
    }

    #[test]
    fn test_feed_updated_is_newest_entry_date() {
        let entries = vec![
            entry("B", "/b.html", Some("2024-02-01"), ""),
            entry("A", "/a.html", Some("2024-01-01"), ""),
        ];
        let feed = render_feed(&config(), &entries);
        assert!(feed.contains("<updated>2024-02-01T00:00:00+00:00</updated>"));
    }

    #[test]
    fn test_feed_updated_epoch_when_no_dates() {
        let feed = render_feed(&config(), &[]);
        assert!(feed.contains("<updated>1970-01-01T00:00:00+00:00</updated>"));
    }

    #[test]
    fn test_summary_only_with_description() {
        let doc = Document::parse(
            "~title: T\n~slug: /p.html\n~description: A short one",
            Path::new("t.md"),
        );
        let feed = render_feed(&config(), &[IndexEntry::new(&doc, String::new())]);
        assert!(feed.contains("<summary>A short one</summary>"));

        let feed = render_feed(&config(), &[entry("T", "/p.html", None, "")]);
        assert!(!feed.contains("<summary>"));
    }

    #[test]
    fn test_control_chars_stripped_from_content() {
        let feed = render_feed(
            &config(),
            &[entry("T", "/p.html", None, "ok\u{0}\u{8}still ok")],
        );
        assert!(feed.contains("<![CDATA[okstill ok]]>"));
    }

    #[test]
    fn test_cdata_terminator_in_content_split() {
        let feed = render_feed(&config(), &[entry("T", "/p.html", None, "<p>a]]>b</p>")]);
        assert!(feed.contains("<![CDATA[<p>a]]]]><![CDATA[>b</p>]]></content>"));
        assert!(!feed.contains("a]]>b"));
    }

    #[test]
    fn test_two_runs_identical() {
        let entries = vec![entry("A", "/a.html", Some("2024-01-01"), "<p>a</p>")];
        assert_eq!(
            render_feed(&config(), &entries),
            render_feed(&config(), &entries)
        );
    }
}
