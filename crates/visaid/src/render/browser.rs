//! Headless browser render backend.
//!
//! Each call stages a page document, launches its own browser process, waits
//! for the charting script to draw the diagram, sizes the window to fit it and
//! takes a screenshot. The page document and the browser process are both
//! owned by the call: they are released when it returns, on every path.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use headless_chrome::{
    Browser, LaunchOptions, Tab, protocol::cdp::Page::CaptureScreenshotFormatOption,
    types::Bounds,
};
use log::{debug, info};
use url::Url;

use visaid_core::diagram::DiagramMarkup;

use super::{ImageFormat, RenderBackend, RenderError};
use crate::config::{AppConfig, BrowserConfig, RenderConfig, ThemeConfig};
use crate::template;

/// Flags that let Chromium run inside containers without a GPU or a large `/dev/shm`.
const BASE_ARGS: [&str; 2] = ["--disable-gpu", "--disable-dev-shm-usage"];

const JPEG_QUALITY: u32 = 90;

/// Renders diagrams with a fresh headless Chromium per call.
#[derive(Debug, Clone)]
pub struct BrowserBackend {
    render: RenderConfig,
    browser: BrowserConfig,
    theme: ThemeConfig,
}

impl BrowserBackend {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            render: config.render().clone(),
            browser: config.browser().clone(),
            theme: config.theme().clone(),
        }
    }

    fn launch(&self) -> Result<Browser, RenderError> {
        let args: Vec<&OsStr> = BASE_ARGS
            .into_iter()
            .map(OsStr::new)
            .chain(self.browser.args().iter().map(OsStr::new))
            .collect();

        let options = LaunchOptions::default_builder()
            .headless(self.browser.headless())
            .sandbox(self.browser.sandbox())
            .window_size(Some(self.browser.window_size()))
            .path(self.browser.executable().map(PathBuf::from))
            .args(args)
            .build()
            .map_err(|err| RenderError::Launch(err.to_string()))?;

        Browser::new(options).map_err(|err| RenderError::Launch(format!("{err:#}")))
    }

    fn capture(&self, tab: &Tab, page_url: &str, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        tab.navigate_to(page_url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|err| RenderError::Navigate(format!("{err:#}")))?;
        debug!(url = page_url; "Page loaded");

        let selector = self.render.rendered_selector();
        let timeout = self.render.wait_timeout();
        tab.wait_for_element_with_custom_timeout(&selector, timeout)
            .map_err(|err| RenderError::Wait {
                selector: selector.clone(),
                timeout,
                message: format!("{err:#}"),
            })?;
        debug!(selector = selector.as_str(); "Diagram rendered");

        if self.is_error_diagram(tab)? {
            return Err(RenderError::Markup(
                "the rendered diagram is the charting script's syntax error diagram".to_string(),
            ));
        }

        let width = self.measure(tab, "offsetWidth")?;
        let height = self.measure(tab, "offsetHeight")?;
        debug!(width = width, height = height; "Diagram measured");

        let window_width = width + f64::from(self.render.margin_width());
        let window_height = height + f64::from(self.render.margin_height());
        tab.set_bounds(Bounds::Normal {
            left: Some(0),
            top: Some(0),
            width: Some(window_width),
            height: Some(window_height),
        })
        .map_err(|err| RenderError::Resize(format!("{err:#}")))?;
        debug!(window_width = window_width, window_height = window_height; "Window resized");

        let (format, quality) = match format {
            ImageFormat::Png => (CaptureScreenshotFormatOption::Png, None),
            ImageFormat::Jpeg => (CaptureScreenshotFormatOption::Jpeg, Some(JPEG_QUALITY)),
            ImageFormat::Webp => (CaptureScreenshotFormatOption::Webp, None),
        };
        tab.capture_screenshot(format, quality, None, true)
            .map_err(|err| RenderError::Capture(format!("{err:#}")))
    }

    fn is_error_diagram(&self, tab: &Tab) -> Result<bool, RenderError> {
        let script = format!(
            r#"document.querySelector({}) !== null"#,
            js_string(&format!(
                "{} svg[aria-roledescription=\"error\"]",
                self.render.container_selector()
            ))
        );
        let result = tab.evaluate(&script, false).map_err(|err| {
            RenderError::Markup(format!("could not check for a syntax error diagram: {err:#}"))
        })?;
        Ok(result.value.and_then(|value| value.as_bool()).unwrap_or(false))
    }

    fn measure(&self, tab: &Tab, property: &str) -> Result<f64, RenderError> {
        let script = format!(
            "document.querySelector({}).{property}",
            js_string(self.render.container_selector())
        );
        let result = tab
            .evaluate(&script, false)
            .map_err(|err| RenderError::Measure(format!("{err:#}")))?;

        result
            .value
            .and_then(|value| value.as_f64())
            .ok_or_else(|| RenderError::Measure(format!("`{property}` is not a number")))
    }
}

impl RenderBackend for BrowserBackend {
    fn render_markup_to_image(
        &self,
        markup: &DiagramMarkup,
        format: ImageFormat,
    ) -> Result<Vec<u8>, RenderError> {
        let page = template::stage_page(markup, &self.theme, self.render.temp_dir())
            .map_err(RenderError::Page)?;
        let page_url = page_url(page.path())?;

        let browser = self.launch()?;
        info!("Browser launched");

        let tab = browser
            .new_tab()
            .map_err(|err| RenderError::Launch(format!("{err:#}")))?;

        let result = self.capture(&tab, &page_url, format);

        // Browser process first, then the page it was reading.
        drop(tab);
        drop(browser);
        drop(page);
        debug!("Browser session closed and page document removed");

        result
    }
}

/// Builds the percent-encoded `file://` URL of a staged page.
fn page_url(path: &Path) -> Result<String, RenderError> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| RenderError::Navigate(format!("`{}` is not an absolute path", path.display())))
}

/// Quotes `text` as a JavaScript string literal.
fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
