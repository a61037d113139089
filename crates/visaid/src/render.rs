//! Render pipeline: diagram markup in, raster image on disk out.
//!
//! [`Renderer`] owns the parts of a render that do not depend on how the
//! image is produced: rejecting empty markup, choosing the image format from
//! the output path, and writing the result atomically. Producing the image
//! bytes is delegated to a [`RenderBackend`]; [`BrowserBackend`] is the
//! default and drives a headless Chromium instance.

pub mod browser;

pub use browser::BrowserBackend;

use std::{
    io::{self, Write},
    path::Path,
    time::Duration,
};

use log::{debug, error, info};
use tempfile::NamedTempFile;
use thiserror::Error;

use visaid_core::diagram::DiagramMarkup;

use crate::config::AppConfig;

/// A failure in one stage of a render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("diagram markup is empty")]
    EmptyMarkup,

    #[error("failed to stage page document: {0}")]
    Page(#[source] io::Error),

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("failed to load page: {0}")]
    Navigate(String),

    #[error("`{selector}` did not appear within {timeout:?}: {message}")]
    Wait {
        selector: String,
        timeout: Duration,
        message: String,
    },

    #[error("charting script rejected the markup: {0}")]
    Markup(String),

    #[error("failed to measure diagram: {0}")]
    Measure(String),

    #[error("failed to resize window: {0}")]
    Resize(String),

    #[error("failed to capture screenshot: {0}")]
    Capture(String),

    #[error("failed to write image: {0}")]
    Output(#[source] io::Error),
}

/// Raster format of a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    /// Picks the format from the extension of `path`, falling back to PNG.
    ///
    /// ```
    /// use visaid::render::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::from_path("out.JPG"), ImageFormat::Jpeg);
    /// assert_eq!(ImageFormat::from_path("out"), ImageFormat::Png);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("webp") => Self::Webp,
            _ => Self::Png,
        }
    }
}

/// Capability to turn markup into encoded image bytes.
pub trait RenderBackend {
    /// Renders `markup` and returns the image encoded as `format`.
    ///
    /// # Errors
    ///
    /// Returns the [`RenderError`] of the stage that failed.
    fn render_markup_to_image(
        &self,
        markup: &DiagramMarkup,
        format: ImageFormat,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Turns diagram markup into an image file.
///
/// A renderer holds no per-call state, so one instance can serve any number
/// of sequential or concurrent renders.
///
/// # Examples
///
/// ```rust,no_run
/// use visaid::{config::AppConfig, render::Renderer};
///
/// let renderer = Renderer::browser(&AppConfig::default());
/// if renderer.render("flowchart TD; A-->B;", "out.png") {
///     println!("wrote out.png");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Renderer<B> {
    backend: B,
}

impl Renderer<BrowserBackend> {
    /// Creates a renderer backed by a headless browser.
    pub fn browser(config: &AppConfig) -> Self {
        Self::new(BrowserBackend::new(config))
    }
}

impl<B: RenderBackend> Renderer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Renders `markup` to `output_path`, reporting only success.
    ///
    /// Failures are logged. `false` means no usable image exists at
    /// `output_path`.
    pub fn render(&self, markup: impl Into<DiagramMarkup>, output_path: impl AsRef<Path>) -> bool {
        let output_path = output_path.as_ref();
        match self.try_render(&markup.into(), output_path) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    output_path = output_path.display().to_string(),
                    err:% = err;
                    "Render failed"
                );
                false
            }
        }
    }

    /// Renders `markup` to `output_path`.
    ///
    /// The image is written to a sibling temporary file first and moved into
    /// place only once complete, so a failed call never leaves a partial
    /// image at `output_path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyMarkup`] for blank markup without invoking
    /// the backend, the backend's error if rendering fails,
    /// [`RenderError::Capture`] if the backend produced no bytes, or
    /// [`RenderError::Output`] if the image cannot be written.
    pub fn try_render(&self, markup: &DiagramMarkup, output_path: &Path) -> Result<(), RenderError> {
        if markup.is_blank() {
            return Err(RenderError::EmptyMarkup);
        }

        let format = ImageFormat::from_path(output_path);
        info!(
            output_path = output_path.display().to_string(),
            format:? = format;
            "Rendering diagram"
        );

        let bytes = self.backend.render_markup_to_image(markup, format)?;
        if bytes.is_empty() {
            return Err(RenderError::Capture("image is empty".to_string()));
        }
        debug!(bytes = bytes.len(); "Image captured");

        write_atomically(output_path, &bytes).map_err(RenderError::Output)?;

        info!(output_path = output_path.display().to_string(); "Image written");
        Ok(())
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, fs};

    use tempfile::tempdir;

    use super::*;

    struct EchoBackend {
        calls: Cell<usize>,
    }

    impl EchoBackend {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl RenderBackend for EchoBackend {
        fn render_markup_to_image(
            &self,
            markup: &DiagramMarkup,
            _format: ImageFormat,
        ) -> Result<Vec<u8>, RenderError> {
            self.calls.set(self.calls.get() + 1);
            Ok(markup.as_str().as_bytes().to_vec())
        }
    }

    struct FailingBackend;

    impl RenderBackend for FailingBackend {
        fn render_markup_to_image(
            &self,
            _markup: &DiagramMarkup,
            _format: ImageFormat,
        ) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Launch("no browser".to_string()))
        }
    }

    struct EmptyBackend;

    impl RenderBackend for EmptyBackend {
        fn render_markup_to_image(
            &self,
            _markup: &DiagramMarkup,
            _format: ImageFormat,
        ) -> Result<Vec<u8>, RenderError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_path("a.png"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path("a.jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path("a.WebP"), ImageFormat::Webp);
        assert_eq!(ImageFormat::from_path("a.gif"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path("dir.v2/a"), ImageFormat::Png);
    }

    #[test]
    fn test_empty_markup_skips_backend() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.png");
        let renderer = Renderer::new(EchoBackend::new());

        assert!(!renderer.render("", &output));
        assert!(!renderer.render("  \n", &output));
        assert_eq!(renderer.backend().calls.get(), 0);
        assert!(!output.exists());
        assert!(matches!(
            renderer.try_render(&DiagramMarkup::new(""), &output),
            Err(RenderError::EmptyMarkup)
        ));
    }

    #[test]
    fn test_successful_render_writes_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.png");
        let renderer = Renderer::new(EchoBackend::new());

        assert!(renderer.render("flowchart TD; A-->B;", &output));
        assert_eq!(fs::read(&output).unwrap(), b"flowchart TD; A-->B;");
    }

    #[test]
    fn test_sequential_renders_are_independent() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        let renderer = Renderer::new(EchoBackend::new());

        assert!(renderer.render("flowchart TD; A-->B;", &first));
        assert!(renderer.render("pie\n\"x\" : 1", &second));

        assert_eq!(fs::read(&first).unwrap(), b"flowchart TD; A-->B;");
        assert_eq!(fs::read(&second).unwrap(), b"pie\n\"x\" : 1");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_render_leaves_no_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.png");
        let renderer = Renderer::new(FailingBackend);

        assert!(!renderer.render("flowchart TD; A-->B;", &output));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_image_is_failure() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.png");
        let renderer = Renderer::new(EmptyBackend);

        assert!(!renderer.render("flowchart TD; A-->B;", &output));
        assert!(!output.exists());
        assert!(matches!(
            renderer.try_render(&DiagramMarkup::new("flowchart TD; A-->B;"), &output),
            Err(RenderError::Capture(_))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_directory_is_output_error() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("missing").join("out.png");
        let renderer = Renderer::new(EchoBackend::new());

        let result = renderer.try_render(&DiagramMarkup::new("flowchart TD; A-->B;"), &output);
        assert!(matches!(result, Err(RenderError::Output(_))));
    }
}
