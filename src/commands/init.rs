//! Initialize a new project

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;

/// Scaffold an empty project in the given directory
pub fn run(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{:?} already exists, not touching this project", config_path);
    }

    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content"))?;
    fs::create_dir_all(target_dir.join("templates"))?;
    fs::create_dir_all(target_dir.join("static"))?;
    fs::create_dir_all(target_dir.join("assets"))?;

    // Create default staticgen.yml
    let config_content = r#"# staticgen configuration

# Directories, relative to this file
content: content
public: public
templates: templates
static: static
assets: assets

# Site metadata, used by templates and the atom feed
author: John Doe
description: A static site
domain: https://example.com
email: john@example.com

# highlight.js theme for client-side code highlighting
highlight_style: default

# Google Analytics id, expanded into global.ga
# ga: G-XXXXXXXXXX
"#;

    fs::write(&config_path, config_content)?;

    // Create starter templates
    let post_template = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ options.title | default(value="Untitled") }}</title>
  <meta name="description" content="{{ options.description | default(value=global.description) }}">
  <link rel="stylesheet" href="/static/style.css">
  {{ global.highlight | default(value="") }}
  {{ global.ga | default(value="") }}
</head>
<body>
  <header>
    <a href="/">{{ global.author }}</a>
  </header>
  <main>
    <h1>{{ options.title | default(value="Untitled") }}</h1>
    {% if options.date is defined %}<time>{{ options.date | date_format }}</time>{% endif %}
    <article>
      {{ content }}
    </article>
  </main>
  <footer>
    <a href="/feed.atom">feed</a>
  </footer>
</body>
</html>
"#;

    let index_template = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ global.author }}</title>
  <meta name="description" content="{{ global.description }}">
  <link rel="stylesheet" href="/static/style.css">
  {{ global.ga | default(value="") }}
</head>
<body>
  <header>
    <h1>{{ global.author }}</h1>
    <p>{{ global.description }}</p>
  </header>
  <main>
    <ul>
    {% for item in list %}
      <li>
        <a href="{{ item.slug }}">{{ item.title | default(value=item.slug) }}</a>
        {% if item.date is defined %}<time>{{ item.date | date_format }}</time>{% endif %}
      </li>
    {% endfor %}
    </ul>
  </main>
  <footer>
    <a href="/feed.atom">feed</a>
  </footer>
</body>
</html>
"#;

    fs::write(target_dir.join("templates/post.html"), post_template)?;
    fs::write(target_dir.join("templates/index.html"), index_template)?;

    // Create a sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"~slug: /hello-world.html
~template: post
~title: Hello World
~description: The first post
~date: {}

# Hello World

Welcome to your new site. This post lives in `content/hello-world.md`.
Edit it, then rebuild everything into the `public` directory:

```text
staticgen-rs --generate
```

## Front matter

The `~key: value` lines at the top of this file carry page options.
`slug` is where the page lands under `public`, `template` picks a file
from `templates`, and `date` orders the index and feed. Any line whose
first character is the marker becomes an option, even inside a code
block; everything else is Markdown body.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("content/hello-world.md"), sample_post)?;

    // Minimal stylesheet so the starter templates link to something real
    let stylesheet = r#"body {
  max-width: 42rem;
  margin: 2rem auto;
  padding: 0 1rem;
  font-family: sans-serif;
  line-height: 1.6;
}
"#;

    fs::write(target_dir.join("static/style.css"), stylesheet)?;

    tracing::info!("Initialized empty project in {:?}", target_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::Site;

    #[test]
    fn test_init_scaffolds_project() {
        let tmp = tempfile::tempdir().unwrap();
        run(tmp.path()).unwrap();

        assert!(tmp.path().join(CONFIG_FILE).exists());
        assert!(tmp.path().join("content/hello-world.md").exists());
        assert!(tmp.path().join("templates/post.html").exists());
        assert!(tmp.path().join("templates/index.html").exists());
        assert!(tmp.path().join("static/style.css").exists());
        assert!(tmp.path().join("assets").is_dir());
    }

    #[test]
    fn test_init_refuses_existing_project() {
        let tmp = tempfile::tempdir().unwrap();
        run(tmp.path()).unwrap();
        assert!(run(tmp.path()).is_err());
    }

    #[test]
    fn test_scaffolded_project_generates() {
        let tmp = tempfile::tempdir().unwrap();
        run(tmp.path()).unwrap();

        let site = Site::load(tmp.path()).unwrap();
        Generator::new(&site).unwrap().generate().unwrap();

        assert!(site.public_dir.join("hello-world.html").exists());
        assert!(site.public_dir.join("index.html").exists());
        assert!(site.public_dir.join("feed.atom").exists());
        assert!(site.public_dir.join("static/style.css").exists());

        let page = std::fs::read_to_string(site.public_dir.join("hello-world.html")).unwrap();
        assert!(page.contains("<h1>Hello World</h1>"));
        assert!(page.contains("highlight.min.js"));
        assert!(page.contains(r#"<code class="language-text">staticgen-rs --generate"#));
        assert!(page.contains("<code>~key: value</code>"));

        let index = std::fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        assert!(index.contains("/hello-world.html"));
    }
}
