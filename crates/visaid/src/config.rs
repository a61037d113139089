//! Configuration types for diagram generation and rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file. Every field is optional; a missing
//! field falls back to the documented default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`RenderConfig`] - Wait bound, screenshot margins and temp-file placement.
//! - [`BrowserConfig`] - How the headless browser process is launched.
//! - [`ThemeConfig`] - Charting script location and its static theme.
//! - [`GeneratorConfig`] - Text-generation endpoint settings.
//!
//! # Example
//!
//! ```
//! # use visaid::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.render().margin_width(), 40);
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use indexmap::IndexMap;
use serde::Deserialize;

use visaid_core::color::Color;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    render: RenderConfig,

    #[serde(default)]
    browser: BrowserConfig,

    #[serde(default)]
    theme: ThemeConfig,

    #[serde(default)]
    generator: GeneratorConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        render: RenderConfig,
        browser: BrowserConfig,
        theme: ThemeConfig,
        generator: GeneratorConfig,
    ) -> Self {
        Self {
            render,
            browser,
            theme,
            generator,
        }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the browser configuration.
    pub fn browser(&self) -> &BrowserConfig {
        &self.browser
    }

    /// Returns the theme configuration.
    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    /// Returns the generator configuration.
    pub fn generator(&self) -> &GeneratorConfig {
        &self.generator
    }

    /// Checks values that deserialization alone cannot reject.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid value: a zero wait
    /// timeout, or a theme color variable that is not a valid CSS color.
    pub fn validate(&self) -> Result<(), String> {
        if self.render.wait_timeout_secs == 0 {
            return Err("render.wait_timeout_secs must be greater than zero".to_string());
        }
        self.theme.validate()
    }
}

/// Settings that shape a single render call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound, in seconds, for the rendered diagram to appear.
    wait_timeout_secs: u64,

    /// Pixels added to the measured diagram width before resizing the window.
    margin_width: u32,

    /// Pixels added to the measured diagram height before resizing the window.
    margin_height: u32,

    /// CSS selector of the element the charting script renders into.
    container_selector: String,

    /// Directory for temporary page documents; system temp dir when unset.
    temp_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: 10,
            margin_width: 40,
            margin_height: 200,
            container_selector: ".mermaid".to_string(),
            temp_dir: None,
        }
    }
}

impl RenderConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn margin_width(&self) -> u32 {
        self.margin_width
    }

    pub fn margin_height(&self) -> u32 {
        self.margin_height
    }

    pub fn container_selector(&self) -> &str {
        &self.container_selector
    }

    /// Returns the selector that matches once the diagram has been drawn.
    pub fn rendered_selector(&self) -> String {
        format!("{} svg", self.container_selector)
    }

    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Sets the wait bound in whole seconds.
    pub fn with_wait_timeout_secs(mut self, secs: u64) -> Self {
        self.wait_timeout_secs = secs;
        self
    }

    /// Sets the directory for temporary page documents.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

/// How the headless browser process is launched.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Explicit browser executable; auto-detected when unset.
    executable: Option<PathBuf>,

    headless: bool,

    /// Chromium's sandbox does not work in most containers, so it is off by default.
    sandbox: bool,

    window_width: u32,

    window_height: u32,

    /// Extra command-line flags appended to the built-in ones.
    args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            sandbox: false,
            window_width: 1280,
            window_height: 1024,
            args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    pub fn headless(&self) -> bool {
        self.headless
    }

    pub fn sandbox(&self) -> bool {
        self.sandbox
    }

    /// Returns the initial window size as `(width, height)`.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Sets an explicit browser executable.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }
}

/// Location of the charting script and the static theme it is initialized with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    script_url: String,

    /// Mermaid theme name.
    name: String,

    /// Flowchart edge curve style.
    curve: String,

    /// Flowchart padding in pixels.
    padding: u32,

    /// Maximum width of the diagram container in pixels.
    max_width: u32,

    /// Mermaid `themeVariables`, emitted in declaration order.
    variables: IndexMap<String, String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let variables = [
            ("primaryColor", "#ffffff"),
            ("primaryTextColor", "#000000"),
            ("primaryBorderColor", "#000000"),
            ("lineColor", "#000000"),
            ("secondaryColor", "#e0e0e0"),
            ("tertiaryColor", "#f5f5f5"),
            ("noteBkgColor", "#ffffff"),
            ("noteTextColor", "#000000"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

        Self {
            script_url: "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js".to_string(),
            name: "default".to_string(),
            curve: "basis".to_string(),
            padding: 20,
            max_width: 4000,
            variables,
        }
    }
}

impl ThemeConfig {
    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn curve(&self) -> &str {
        &self.curve
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.variables
    }

    /// Overrides a single theme variable, keeping its position if it exists.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Ensures every `*Color` variable holds a parseable CSS color.
    fn validate(&self) -> Result<(), String> {
        for (name, value) in &self.variables {
            if name.ends_with("Color") {
                Color::new(value).map_err(|err| format!("Invalid theme variable `{name}`: {err}"))?;
            }
        }
        Ok(())
    }
}

/// Settings for the chat-completions markup generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base URL of an OpenAI-compatible API.
    endpoint: String,

    model: String,

    /// Name of the environment variable holding the API key.
    api_key_env: String,

    temperature: f32,

    timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

impl GeneratorConfig {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Sets the environment variable the API key is read from.
    pub fn with_api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = name.into();
        self
    }
}
