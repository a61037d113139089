//! Visaid Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Visaid
//! generation and rendering pipeline. It includes:
//!
//! - **Diagram types**: The fixed set of supported diagram tags ([`diagram::DiagramType`])
//! - **Requests and markup**: [`diagram::DiagramRequest`] and [`diagram::DiagramMarkup`]
//! - **Colors**: CSS color validation for theme variables ([`color::Color`])

pub mod color;
pub mod diagram;
