//! HTML page that hosts the charting script.
//!
//! The page loads Mermaid from the configured script URL, initializes it with
//! the static theme from [`ThemeConfig`], and places the markup inside a single
//! `<div class="mermaid">` container. Nothing in the page depends on the
//! request other than the markup itself.

use std::{io::Write, path::Path};

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use tempfile::NamedTempFile;

use visaid_core::diagram::DiagramMarkup;

use crate::config::ThemeConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MermaidInit<'a> {
    start_on_load: bool,
    theme: &'a str,
    theme_variables: &'a IndexMap<String, String>,
    flowchart: FlowchartInit<'a>,
}

#[derive(Serialize)]
struct FlowchartInit<'a> {
    curve: &'a str,
    padding: u32,
}

/// Builds the complete HTML document for `markup`.
pub fn build_page(markup: &DiagramMarkup, theme: &ThemeConfig) -> String {
    let init = MermaidInit {
        start_on_load: true,
        theme: theme.name(),
        theme_variables: theme.variables(),
        flowchart: FlowchartInit {
            curve: theme.curve(),
            padding: theme.padding(),
        },
    };
    // Serializing a struct of strings and integers cannot fail.
    let init_json = serde_json::to_string(&init)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <script src="{script_url}"></script>
    <script>
        document.addEventListener("DOMContentLoaded", function() {{
            mermaid.initialize({init_json});
        }});
    </script>
    <style>
        body {{ margin: 0; padding: 0; background: white; }}
        .mermaid {{ background: white; padding: 20px; display: inline-block; max-width: {max_width}px; }}
    </style>
</head>
<body>
    <div class="mermaid">
{markup}
    </div>
</body>
</html>
"#,
        script_url = escape_html(theme.script_url()),
        max_width = theme.max_width(),
        markup = escape_html(markup.as_str()),
    )
}

/// Writes the page for `markup` to a scoped temporary `.html` file.
///
/// The file is removed when the returned handle is dropped.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn stage_page(
    markup: &DiagramMarkup,
    theme: &ThemeConfig,
    dir: Option<&Path>,
) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("visaid-").suffix(".html");
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    file.write_all(build_page(markup, theme).as_bytes())?;
    file.flush()?;

    debug!(path = file.path().display().to_string(); "Page document staged");
    Ok(file)
}

/// Escapes the characters that would otherwise be read as HTML structure.
///
/// Mermaid decodes these entities again before parsing the markup.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
