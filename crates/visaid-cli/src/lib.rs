//! CLI logic for the Visaid diagram tool.
//!
//! This module contains the core CLI logic: it loads configuration, then
//! dispatches to rendering existing markup, generating and rendering new
//! markup, or listing the supported diagram types.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use log::info;

use visaid::{
    Designer, VisaidError,
    diagram::{DiagramMarkup, DiagramRequest, DiagramType},
    generate::prompt::SAMPLE_PROMPTS,
    render::Renderer,
};

/// Run the Visaid CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `VisaidError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Generation errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), VisaidError> {
    match &args.command {
        Command::Types => {
            print_types();
            Ok(())
        }
        Command::Render { input, output } => {
            let app_config = config::load_config(args.config.as_ref())?;
            info!(input_path = input, output_path = output; "Rendering markup file");

            let markup = read_markup(input)?;
            Renderer::browser(&app_config).try_render(&markup, Path::new(output))?;

            info!(output_file = output; "Image exported successfully");
            Ok(())
        }
        Command::Generate {
            prompt,
            diagram_type,
            output,
            markup,
            preview,
        } => {
            let app_config = config::load_config(args.config.as_ref())?;
            info!(diagram_type = diagram_type.tag(), output_path = output; "Generating diagram");

            let designer = Designer::from_config(&app_config);
            let request = DiagramRequest::new(prompt.as_str(), *diagram_type);
            let design = designer.design(&request, output)?;

            println!("{}", design.markup());
            if let Some(path) = markup {
                fs::write(path, design.markup().as_str())?;
                info!(markup_file = path.as_str(); "Markup saved");
            }
            if let Some(path) = preview {
                fs::write(path, design.markup().to_markdown())?;
                info!(preview_file = path.as_str(); "Preview saved");
            }

            let (_, image) = design.into_parts();
            image?;

            info!(output_file = output; "Image exported successfully");
            Ok(())
        }
    }
}

fn read_markup(input: &str) -> Result<DiagramMarkup, VisaidError> {
    let text = if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(input)?
    };
    Ok(DiagramMarkup::new(text))
}

fn print_types() {
    println!("Diagram types:");
    for kind in DiagramType::ALL {
        println!("  {:<30} {}", kind.tag(), kind.description());
    }
    println!();
    println!("Sample prompts:");
    for (prompt, kind) in SAMPLE_PROMPTS {
        println!("  [{}] {prompt}", kind.tag());
    }
}
