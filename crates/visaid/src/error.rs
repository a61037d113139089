//! Error types for Visaid operations.
//!
//! This module provides the main error type [`VisaidError`] which wraps the
//! failures of the two pipeline steps, [`GenerateError`] and [`RenderError`],
//! alongside I/O and configuration problems.

use std::io;

use thiserror::Error;

use crate::{generate::GenerateError, render::RenderError};

/// The main error type for Visaid operations.
#[derive(Debug, Error)]
pub enum VisaidError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation failed: {0}")]
    Generate(#[from] GenerateError),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}
