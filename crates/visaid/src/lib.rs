//! Visaid - Generate diagrams from text descriptions.
//!
//! A description and a diagram type go to a [`MarkupGenerator`], which
//! returns Mermaid markup. The markup is then rendered to a raster image by
//! a [`Renderer`], by default one driving a headless browser that runs the
//! Mermaid script and screenshots the result.

pub mod config;
pub mod generate;
pub mod render;
pub mod template;

mod error;

pub use visaid_core::{color, diagram};

pub use error::VisaidError;

use std::path::{Path, PathBuf};

use log::{info, warn};

use config::AppConfig;
use diagram::{DiagramMarkup, DiagramRequest};
use generate::{ChatGenerator, MarkupGenerator};
use render::{BrowserBackend, RenderBackend, RenderError, Renderer};

/// Outcome of one generate-then-render run.
///
/// Generation succeeded; rendering may not have.
#[derive(Debug)]
pub struct Design {
    markup: DiagramMarkup,
    image: Result<PathBuf, RenderError>,
}

impl Design {
    pub fn markup(&self) -> &DiagramMarkup {
        &self.markup
    }

    /// Returns the rendered image path, or the reason there is none.
    pub fn image(&self) -> Result<&Path, &RenderError> {
        self.image.as_deref()
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image().ok()
    }

    pub fn into_parts(self) -> (DiagramMarkup, Result<PathBuf, RenderError>) {
        (self.markup, self.image)
    }
}

/// The three output surfaces shown to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Markup text, or the error text when generation failed.
    pub code: String,
    /// Path of the rendered image, if any.
    pub image: Option<PathBuf>,
    /// Markdown preview of the markup; empty when generation failed.
    pub preview: String,
}

/// Runs generation and rendering for diagram requests.
///
/// # Examples
///
/// ```rust,no_run
/// use visaid::{Designer, config::AppConfig, diagram::{DiagramRequest, DiagramType}};
///
/// let designer = Designer::from_config(&AppConfig::default());
/// let request = DiagramRequest::new("user registration with email verification", DiagramType::Flowchart);
///
/// let design = designer.design(&request, "signup.png").expect("generation failed");
/// println!("{}", design.markup());
/// ```
#[derive(Debug, Clone)]
pub struct Designer<G, B> {
    generator: G,
    renderer: Renderer<B>,
}

impl Designer<ChatGenerator, BrowserBackend> {
    /// Creates a designer using the chat-completions generator and the browser backend.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ChatGenerator::new(config.generator()),
            Renderer::browser(config),
        )
    }
}

impl<G: MarkupGenerator, B: RenderBackend> Designer<G, B> {
    pub fn new(generator: G, renderer: Renderer<B>) -> Self {
        Self {
            generator,
            renderer,
        }
    }

    pub fn renderer(&self) -> &Renderer<B> {
        &self.renderer
    }

    /// Generates markup for `request` and renders it to `output_path`.
    ///
    /// # Errors
    ///
    /// Returns [`VisaidError::Generate`] if no markup was produced. A render
    /// failure is not an error here; it is recorded in the returned [`Design`].
    pub fn design(
        &self,
        request: &DiagramRequest,
        output_path: impl AsRef<Path>,
    ) -> Result<Design, VisaidError> {
        let output_path = output_path.as_ref();
        info!(diagram_type = request.diagram_type().tag(); "Generating diagram markup");

        let markup = self
            .generator
            .generate(request.diagram_type(), request.prompt())?;

        let image = self
            .renderer
            .try_render(&markup, output_path)
            .map(|()| output_path.to_path_buf());
        if let Err(err) = &image {
            warn!(err:% = err; "Diagram markup generated but not rendered");
        }

        Ok(Design { markup, image })
    }

    /// Runs [`Designer::design`] and folds the outcome into display surfaces.
    ///
    /// Generation errors put the error text where the markup would go and
    /// leave the image and preview empty. Render errors keep the markup and
    /// preview but leave the image empty.
    pub fn present(&self, request: &DiagramRequest, output_path: impl AsRef<Path>) -> Presentation {
        match self.design(request, output_path) {
            Ok(design) => {
                let preview = design.markup.to_markdown();
                let (markup, image) = design.into_parts();
                Presentation {
                    code: markup.into_string(),
                    image: image.ok(),
                    preview,
                }
            }
            Err(err) => Presentation {
                code: err.to_string(),
                image: None,
                preview: String::new(),
            },
        }
    }
}
