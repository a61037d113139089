//! Markup generation from natural-language descriptions.
//!
//! A [`MarkupGenerator`] turns a prompt and a [`DiagramType`] into
//! [`DiagramMarkup`]. The pipeline treats generators as opaque: their output is
//! handed to the renderer without retries, validation or sanitizing.

pub mod chat;
pub mod prompt;

pub use chat::ChatGenerator;

use thiserror::Error;

use visaid_core::diagram::{DiagramMarkup, DiagramType};

/// Errors returned by markup generators.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key not found in environment variable `{0}`")]
    MissingApiKey(String),

    #[error("request to the generation endpoint failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("the model returned no markup")]
    EmptyResponse,

    #[error("{0}")]
    Other(String),
}

/// Produces diagram markup for a description.
pub trait MarkupGenerator {
    /// Generates markup of `diagram_type` describing `prompt`.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] when no markup could be produced.
    fn generate(&self, diagram_type: DiagramType, prompt: &str)
    -> Result<DiagramMarkup, GenerateError>;
}

impl<F> MarkupGenerator for F
where
    F: Fn(DiagramType, &str) -> Result<DiagramMarkup, GenerateError>,
{
    fn generate(
        &self,
        diagram_type: DiagramType,
        prompt: &str,
    ) -> Result<DiagramMarkup, GenerateError> {
        self(diagram_type, prompt)
    }
}
