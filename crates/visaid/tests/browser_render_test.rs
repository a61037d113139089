//! End-to-end tests for the headless browser backend.
//!
//! These need a local Chromium install and network access to fetch the
//! Mermaid script, so they are ignored by default:
//!
//! ```sh
//! cargo test -p visaid --test browser_render_test -- --ignored
//! ```

use std::{
    fs,
    time::{Duration, Instant},
};

use tempfile::tempdir;

use visaid::{
    config::{AppConfig, BrowserConfig, GeneratorConfig, RenderConfig, ThemeConfig},
    diagram::DiagramMarkup,
    render::{RenderError, Renderer},
};

fn config_with_temp_dir(dir: &std::path::Path, wait_secs: u64) -> AppConfig {
    AppConfig::new(
        RenderConfig::default()
            .with_temp_dir(dir)
            .with_wait_timeout_secs(wait_secs),
        BrowserConfig::default(),
        ThemeConfig::default(),
        GeneratorConfig::default(),
    )
}

fn html_files_in(dir: &std::path::Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("html"))
        .count()
}

#[test]
#[ignore = "requires Chromium and network access"]
fn test_flowchart_renders_png() {
    let pages = tempdir().unwrap();
    let outputs = tempdir().unwrap();
    let output = outputs.path().join("out.png");
    let renderer = Renderer::browser(&config_with_temp_dir(pages.path(), 10));

    assert!(renderer.render("flowchart TD; A-->B;", &output));

    let bytes = fs::read(&output).unwrap();
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(b"\x89PNG"));
    assert_eq!(html_files_in(pages.path()), 0);
}

#[test]
#[ignore = "requires Chromium and network access"]
fn test_invalid_markup_fails_within_bound() {
    let pages = tempdir().unwrap();
    let outputs = tempdir().unwrap();
    let output = outputs.path().join("invalid.png");
    let renderer = Renderer::browser(&config_with_temp_dir(pages.path(), 5));

    let started = Instant::now();
    let result = renderer.try_render(&DiagramMarkup::new("this is not a diagram -->"), &output);

    assert!(matches!(
        result,
        Err(RenderError::Wait { .. } | RenderError::Markup(_))
    ));
    // Wait bound plus browser start-up and teardown.
    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(!output.exists());
    assert_eq!(html_files_in(pages.path()), 0);
}

#[test]
#[ignore = "requires Chromium and network access"]
fn test_sequential_renders_produce_distinct_images() {
    let pages = tempdir().unwrap();
    let outputs = tempdir().unwrap();
    let first = outputs.path().join("first.png");
    let second = outputs.path().join("second.png");
    let renderer = Renderer::browser(&config_with_temp_dir(pages.path(), 10));

    assert!(renderer.render("flowchart TD; A-->B;", &first));
    assert!(renderer.render(
        "sequenceDiagram\n  Alice->>Bob: Hello\n  Bob-->>Alice: Hi",
        &second
    ));

    assert_ne!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    assert_eq!(html_files_in(pages.path()), 0);
}

#[test]
#[ignore = "requires Chromium and network access"]
fn test_jpeg_output_by_extension() {
    let pages = tempdir().unwrap();
    let outputs = tempdir().unwrap();
    let output = outputs.path().join("out.jpg");
    let renderer = Renderer::browser(&config_with_temp_dir(pages.path(), 10));

    assert!(renderer.render("pie\n  \"a\" : 1\n  \"b\" : 2", &output));
    assert!(fs::read(&output).unwrap().starts_with(&[0xFF, 0xD8]));
}
