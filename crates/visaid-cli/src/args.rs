//! Command-line argument definitions for the Visaid CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the configuration file and the
//! logging verbosity; the [`Command`] picks what to do.

use clap::{Parser, Subcommand};

use visaid::diagram::DiagramType;

/// Command-line arguments for the Visaid diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render existing Mermaid markup to an image
    Render {
        /// Path to the markup file, or `-` for standard input
        input: String,

        /// Path to the output image (png, jpg, jpeg or webp)
        #[arg(short, long, default_value = "out.png")]
        output: String,
    },

    /// Generate markup from a description, then render it
    Generate {
        /// Description of the diagram
        prompt: String,

        /// Diagram type tag
        #[arg(short = 't', long = "type", default_value = "flowchart-diagram")]
        diagram_type: DiagramType,

        /// Path to the output image (png, jpg, jpeg or webp)
        #[arg(short, long, default_value = "out.png")]
        output: String,

        /// Also save the generated markup to this file
        #[arg(long)]
        markup: Option<String>,

        /// Also save a Markdown preview of the markup to this file
        #[arg(long)]
        preview: Option<String>,
    },

    /// List the supported diagram types and sample prompts
    Types,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let args = Args::try_parse_from(["visaid", "render", "diagram.mmd", "-o", "d.png"]).unwrap();
        match args.command {
            Command::Render { input, output } => {
                assert_eq!(input, "diagram.mmd");
                assert_eq!(output, "d.png");
            }
            other => panic!("Expected Render, got {other:?}"),
        }
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_parse_generate_with_type() {
        let args = Args::try_parse_from([
            "visaid",
            "--log-level",
            "debug",
            "generate",
            "--type",
            "sequence-diagram",
            "checkout between customer and cart",
        ])
        .unwrap();
        match args.command {
            Command::Generate {
                prompt,
                diagram_type,
                output,
                markup,
                preview,
            } => {
                assert_eq!(prompt, "checkout between customer and cart");
                assert_eq!(diagram_type, DiagramType::Sequence);
                assert_eq!(output, "out.png");
                assert!(markup.is_none());
                assert!(preview.is_none());
            }
            other => panic!("Expected Generate, got {other:?}"),
        }
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = Args::try_parse_from(["visaid", "generate", "-t", "venn-diagram", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let args = Args::try_parse_from(["visaid", "types", "--config", "my.toml"]).unwrap();
        assert_eq!(args.config.as_deref(), Some("my.toml"));
    }
}
