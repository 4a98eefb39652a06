//! Headless Chrome backend
//!
//! Wraps `headless_chrome` with launch configuration, a managed session and a
//! [`Driver`] implementation bound to one tab.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, Element, LaunchOptionsBuilder, Tab};
use tracing::{debug, info};

use sc_core::config::{BrowserSettings, Config};
use sc_core::{Error, Result};

use crate::driver::Driver;
use crate::locator::{Locator, Query};

/// Poll interval while waiting for elements
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// In-page visibility check, evaluated against a resolved element
const IS_VISIBLE_FN: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    return rect.width > 0 && rect.height > 0 \
        && style.visibility !== 'hidden' && style.display !== 'none'; \
}";

const CLEAR_VALUE_FN: &str = "function() { \
    this.value = ''; \
    this.dispatchEvent(new Event('input', { bubbles: true })); \
    this.dispatchEvent(new Event('change', { bubbles: true })); \
}";

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Whether to run in headless mode
    pub headless: bool,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Artificial pause after each driver action
    pub slow_mo: Duration,
    /// Upper bound for navigation settles, applied as the tab's default wait
    pub navigation_timeout: Duration,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1920,
            height: 1080,
            slow_mo: Duration::ZERO,
            navigation_timeout: Duration::from_millis(30_000),
            user_agent: None,
        }
    }
}

impl BrowserConfig {
    /// Create a new configuration builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }
}

impl From<&BrowserSettings> for BrowserConfig {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            headless: settings.headless,
            width: settings.width,
            height: settings.height,
            slow_mo: Duration::from_millis(settings.slow_mo),
            ..Self::default()
        }
    }
}

impl From<&Config> for BrowserConfig {
    fn from(config: &Config) -> Self {
        Self {
            navigation_timeout: config.timeouts.navigation(),
            ..Self::from(&config.browser)
        }
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn slow_mo(mut self, slow_mo: Duration) -> Self {
        self.config.slow_mo = slow_mo;
        self
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

/// Managed browser session
pub struct ChromeSession {
    browser: Browser,
    config: BrowserConfig,
}

impl ChromeSession {
    /// Launch a browser with default configuration
    pub fn launch() -> Result<Self> {
        Self::with_config(BrowserConfig::default())
    }

    /// Launch a browser with custom configuration
    pub fn with_config(config: BrowserConfig) -> Result<Self> {
        info!("Launching browser (headless: {})", config.headless);

        let mut args: Vec<String> = vec![
            format!("--window-size={},{}", config.width, config.height),
            "--no-sandbox".to_string(),
            "--disable-setuid-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
        ];

        if let Some(ref ua) = config.user_agent {
            args.push(format!("--user-agent={}", ua));
        }

        let os_args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();

        let launch_options = LaunchOptionsBuilder::default()
            .headless(config.headless)
            .args(os_args)
            .build()
            .map_err(|e| {
                Error::Initialization(format!("Failed to build launch options: {}", e))
            })?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::Initialization(format!("Failed to launch browser: {}", e)))?;

        info!("Browser session ready");

        Ok(Self { browser, config })
    }

    /// Get the active tab
    pub fn active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.browser.get_tabs();
        let tabs_guard = tabs
            .lock()
            .map_err(|e| Error::Initialization(format!("Failed to lock tabs: {}", e)))?;

        tabs_guard
            .first()
            .cloned()
            .ok_or_else(|| Error::Initialization("No open tab in browser session".to_string()))
    }

    /// Open a new tab
    pub fn new_tab(&self) -> Result<Arc<Tab>> {
        self.browser
            .new_tab()
            .map_err(|e| Error::Initialization(format!("Failed to create new tab: {}", e)))
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        info!("Closing browser session");
    }
}

/// [`Driver`] bound to one Chrome tab
pub struct ChromeDriver {
    tab: Arc<Tab>,
    slow_mo: Duration,
}

impl ChromeDriver {
    /// Bind to the session's active tab.
    ///
    /// Fails when the session has no open tab; page objects cannot exist
    /// without a page handle.
    pub fn new(session: &ChromeSession) -> Result<Self> {
        Ok(Self::from_tab(session.active_tab()?, session.config()))
    }

    /// Bind to a specific tab, applying the configured navigation timeout as
    /// the tab's default wait
    pub fn from_tab(tab: Arc<Tab>, config: &BrowserConfig) -> Self {
        tab.set_default_timeout(config.navigation_timeout);
        Self {
            tab,
            slow_mo: config.slow_mo,
        }
    }

    fn pace(&self) {
        if !self.slow_mo.is_zero() {
            thread::sleep(self.slow_mo);
        }
    }

    /// All current matches for the locator, with regex name filtering applied
    fn find_all(&self, locator: &Locator) -> Vec<Element<'_>> {
        let found = match locator.query() {
            Query::XPath(xpath) => self.tab.find_elements_by_xpath(&xpath),
            Query::Css(selector) => self.tab.find_elements(&selector),
        };
        let mut elements = found.unwrap_or_default();

        if let Some(pattern) = locator.name_filter() {
            elements.retain(|el| pattern.matches(&accessible_name(el)));
        }

        elements
    }

    /// Wait until at least `index + 1` elements match, returning the one at
    /// `index`
    fn wait_for_nth(
        &self,
        locator: &Locator,
        index: usize,
        timeout: Duration,
    ) -> Result<Element<'_>> {
        let deadline = Instant::now() + timeout;
        loop {
            let mut elements = self.find_all(locator);
            if elements.len() > index {
                return Ok(elements.remove(index));
            }
            if Instant::now() >= deadline {
                return Err(Error::ElementNotFound(format!(
                    "{} (index {}) not found within {:?}",
                    locator, index, timeout
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<Element<'_>> {
        self.wait_for_nth(locator, 0, timeout)
    }
}

fn element_is_visible(element: &Element<'_>) -> bool {
    element
        .call_js_fn(IS_VISIBLE_FN, vec![], false)
        .ok()
        .and_then(|object| object.value)
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

fn attribute(element: &Element<'_>, name: &str) -> Option<String> {
    let attributes = element.get_attributes().ok().flatten()?;
    attributes
        .chunks_exact(2)
        .find(|pair| pair[0] == name)
        .map(|pair| pair[1].clone())
}

/// Best-effort accessible name: aria-label, then value, then inner text
fn accessible_name(element: &Element<'_>) -> String {
    if let Some(label) = attribute(element, "aria-label") {
        return label;
    }
    if let Some(value) = attribute(element, "value") {
        if !value.is_empty() {
            return value;
        }
    }
    element.get_inner_text().unwrap_or_default()
}

impl Driver for ChromeDriver {
    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::Navigation(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Navigation(format!("Navigation to {} timed out: {}", url, e)))?;

        self.pace();
        Ok(())
    }

    fn click(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        let element = self.wait_for(locator, timeout)?;
        element
            .click()
            .map_err(|e| Error::Interaction(format!("Failed to click {}: {}", locator, e)))?;
        self.pace();
        Ok(())
    }

    fn click_nth(&self, locator: &Locator, index: usize, timeout: Duration) -> Result<()> {
        let element = self.wait_for_nth(locator, index, timeout)?;
        element.click().map_err(|e| {
            Error::Interaction(format!(
                "Failed to click {} (index {}): {}",
                locator, index, e
            ))
        })?;
        self.pace();
        Ok(())
    }

    fn fill(&self, locator: &Locator, value: &str, timeout: Duration) -> Result<()> {
        let element = self.wait_for(locator, timeout)?;

        element
            .click()
            .map_err(|e| Error::Fill(format!("Failed to focus {}: {}", locator, e)))?;
        element
            .call_js_fn(CLEAR_VALUE_FN, vec![], false)
            .map_err(|e| Error::Fill(format!("Failed to reset {}: {}", locator, e)))?;
        self.tab
            .type_str(value)
            .map_err(|e| Error::Fill(format!("Failed to type into {}: {}", locator, e)))?;

        self.pace();
        Ok(())
    }

    fn clear(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        let element = self.wait_for(locator, timeout)?;
        element
            .call_js_fn(CLEAR_VALUE_FN, vec![], false)
            .map_err(|e| Error::Fill(format!("Failed to clear {}: {}", locator, e)))?;
        self.pace();
        Ok(())
    }

    fn press_key(&self, locator: &Locator, key: &str, timeout: Duration) -> Result<()> {
        let element = self.wait_for(locator, timeout)?;
        element
            .click()
            .map_err(|e| Error::Interaction(format!("Failed to focus {}: {}", locator, e)))?;
        self.tab
            .press_key(key)
            .map_err(|e| Error::Interaction(format!("Failed to press '{}': {}", key, e)))?;
        self.pace();
        Ok(())
    }

    fn text_of(&self, locator: &Locator, timeout: Duration) -> Result<String> {
        let element = self.wait_for(locator, timeout)?;
        element
            .get_inner_text()
            .map_err(|e| Error::Extraction(format!("Failed to read text of {}: {}", locator, e)))
    }

    fn count(&self, locator: &Locator) -> Result<usize> {
        let visible = self
            .find_all(locator)
            .iter()
            .filter(|el| element_is_visible(el))
            .count();
        Ok(visible)
    }

    fn is_visible(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.find_all(locator).iter().any(element_is_visible) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        if self.is_visible(locator, timeout)? {
            Ok(())
        } else {
            Err(Error::Timeout(format!(
                "{} did not become visible within {:?}",
                locator, timeout
            )))
        }
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    fn title(&self) -> Result<String> {
        self.tab
            .get_title()
            .map_err(|e| Error::Extraction(format!("Failed to read title: {}", e)))
    }

    fn back(&self) -> Result<()> {
        self.tab
            .evaluate("history.back()", false)
            .map_err(|e| Error::Navigation(format!("history.back failed: {}", e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Navigation(format!("Back navigation timed out: {}", e)))?;
        self.pace();
        Ok(())
    }

    fn forward(&self) -> Result<()> {
        self.tab
            .evaluate("history.forward()", false)
            .map_err(|e| Error::Navigation(format!("history.forward failed: {}", e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Navigation(format!("Forward navigation timed out: {}", e)))?;
        self.pace();
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        self.tab
            .reload(false, None)
            .map_err(|e| Error::Navigation(format!("Reload failed: {}", e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Navigation(format!("Reload timed out: {}", e)))?;
        self.pace();
        Ok(())
    }

    fn screenshot(&self, path: &Path) -> Result<()> {
        debug!("Capturing screenshot to {}", path.display());

        let bytes = self
            .tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::Screenshot(format!("Failed to capture screenshot: {}", e)))?;

        std::fs::write(path, &bytes)?;
        info!("Screenshot captured: {} bytes", bytes.len());
        Ok(())
    }

    fn eval(&self, script: &str) -> Result<serde_json::Value> {
        let preview: String = script.chars().take(50).collect();
        debug!("Evaluating script: {}...", preview);

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| Error::Interaction(format!("Script evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_default() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 1080);
        assert!(config.slow_mo.is_zero());
        assert_eq!(config.navigation_timeout, Duration::from_millis(30_000));
    }

    #[test]
    fn test_browser_config_builder() {
        let config = BrowserConfig::builder()
            .headless(false)
            .window_size(1280, 720)
            .slow_mo(Duration::from_millis(100))
            .navigation_timeout(Duration::from_millis(8_000))
            .user_agent("Custom Agent")
            .build();

        assert!(!config.headless);
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert_eq!(config.slow_mo, Duration::from_millis(100));
        assert_eq!(config.navigation_timeout, Duration::from_millis(8_000));
        assert_eq!(config.user_agent, Some("Custom Agent".to_string()));
    }

    #[test]
    fn test_browser_config_from_settings() {
        let settings = BrowserSettings {
            headless: false,
            width: 800,
            height: 600,
            slow_mo: 50,
            debug: true,
        };
        let config = BrowserConfig::from(&settings);
        assert!(!config.headless);
        assert_eq!(config.width, 800);
        assert_eq!(config.slow_mo, Duration::from_millis(50));
    }

    #[test]
    fn test_navigation_timeout_follows_the_config_tier() {
        let mut config = Config::from_env_with(|_| None).unwrap();
        config.timeouts.navigation = 5_000;
        config.browser.slow_mo = 25;

        let browser = BrowserConfig::from(&config);
        assert_eq!(browser.navigation_timeout, Duration::from_millis(5_000));
        assert_eq!(browser.slow_mo, Duration::from_millis(25));
    }
}
