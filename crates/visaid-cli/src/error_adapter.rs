//! Error adapter for converting VisaidError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Each error gets a
//! stable code and, where the fix is obvious, a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use visaid::{VisaidError, generate::GenerateError, render::RenderError};

/// Adapter that renders a [`VisaidError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a VisaidError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            VisaidError::Io(_) => "visaid::io",
            VisaidError::Config(_) => "visaid::config",
            VisaidError::Generate(_) => "visaid::generate",
            VisaidError::Render(_) => "visaid::render",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help: String = match self.0 {
            VisaidError::Generate(GenerateError::MissingApiKey(name)) => {
                format!("export {name}=<your API key> or set `generator.api_key_env`")
            }
            VisaidError::Render(RenderError::Launch(_)) => {
                "install Chromium or set `browser.executable` in the configuration".to_string()
            }
            VisaidError::Render(RenderError::Wait { .. } | RenderError::Markup(_)) => {
                "check that the markup is valid Mermaid and that the charting script URL is reachable"
                    .to_string()
            }
            VisaidError::Render(RenderError::EmptyMarkup) => {
                "the input contains no diagram markup".to_string()
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
