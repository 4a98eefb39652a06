//! Base page facade
//!
//! A uniform, logged, timeout-aware surface over the [`Driver`] capability.
//! Domain page objects compose a `BasePage` instead of calling the driver
//! directly. Action methods propagate failures; visibility probes degrade to
//! a conservative default and never propagate.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

use sc_core::config::{Config, Delays, Timeouts};
use sc_core::{Error, Result};

use crate::driver::Driver;
use crate::locator::Locator;

/// Logged facade over one page handle
#[derive(Clone)]
pub struct BasePage {
    driver: Arc<dyn Driver>,
    timeouts: Timeouts,
    delays: Delays,
}

impl BasePage {
    pub fn new(driver: Arc<dyn Driver>, config: &Config) -> Self {
        Self {
            driver,
            timeouts: config.timeouts.clone(),
            delays: config.delays.clone(),
        }
    }

    /// The underlying driver handle; page objects wrapping the same handle
    /// are views over it, not owners
    pub fn driver(&self) -> Arc<dyn Driver> {
        Arc::clone(&self.driver)
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub fn delays(&self) -> &Delays {
        &self.delays
    }

    /// Navigate and wait for the load to settle
    pub fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        match self.driver.navigate(url) {
            Ok(()) => {
                info!("Navigated to {}", url);
                Ok(())
            }
            Err(e) => {
                error!("Navigation to {} failed: {}", url, e);
                Err(e)
            }
        }
    }

    /// Click an element by accessibility role and accessible name
    /// (case-insensitive partial match)
    pub fn click_by_role(&self, role: &str, name: &str) -> Result<()> {
        self.click(&Locator::role(role, name))
    }

    /// Click an element by role with a regex accessible-name pattern
    pub fn click_by_role_pattern(&self, role: &str, name: regex::Regex) -> Result<()> {
        self.click(&Locator::role_matching(role, name))
    }

    /// Click the first element whose visible text matches (case-insensitive)
    pub fn click_by_text(&self, text: &str) -> Result<()> {
        self.click(&Locator::text(text))
    }

    /// Click an element by its stable test identifier
    pub fn click_by_test_id(&self, id: &str) -> Result<()> {
        self.click(&Locator::test_id(id))
    }

    /// Click an arbitrary locator within the element timeout
    pub fn click(&self, locator: &Locator) -> Result<()> {
        info!("Clicking {}", locator);
        match self.driver.click(locator, self.timeouts.element()) {
            Ok(()) => {
                info!("Clicked {}", locator);
                Ok(())
            }
            Err(e) => {
                error!("Click on {} failed: {}", locator, e);
                Err(e)
            }
        }
    }

    /// Click the `index`-th match of a locator
    pub fn click_nth(&self, locator: &Locator, index: usize) -> Result<()> {
        info!("Clicking {} (index {})", locator, index);
        match self.driver.click_nth(locator, index, self.timeouts.element()) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Click on {} (index {}) failed: {}", locator, index, e);
                Err(e)
            }
        }
    }

    /// Fill a text input resolved by accessible name / label
    pub fn fill_input(&self, name: &str, value: &str) -> Result<()> {
        self.fill(&Locator::label(name), value)
    }

    /// Fill a password input associated with a matching label, falling back
    /// to placeholder resolution. When both fail, the fallback's error is
    /// the one propagated.
    pub fn fill_password(&self, name: &str, value: &str) -> Result<()> {
        let primary = Locator::password_label(name);
        info!("Filling password field {}", primary);
        match self.driver.fill(&primary, value, self.timeouts.element()) {
            Ok(()) => Ok(()),
            Err(first) => {
                debug!(
                    "Password field {} not resolvable by label ({}); trying placeholder",
                    primary, first
                );
                let fallback = Locator::placeholder(name);
                match self.driver.fill(&fallback, value, self.timeouts.element()) {
                    Ok(()) => Ok(()),
                    Err(second) => {
                        error!("Password fill via {} failed: {}", fallback, second);
                        Err(second)
                    }
                }
            }
        }
    }

    /// Fill an arbitrary locator
    pub fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        info!("Filling {}", locator);
        match self.driver.fill(locator, value, self.timeouts.element()) {
            Ok(()) => {
                info!("Filled {}", locator);
                Ok(())
            }
            Err(e) => {
                error!("Fill of {} failed: {}", locator, e);
                Err(e)
            }
        }
    }

    /// Clear an input's value
    pub fn clear(&self, locator: &Locator) -> Result<()> {
        info!("Clearing {}", locator);
        match self.driver.clear(locator, self.timeouts.element()) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Clear of {} failed: {}", locator, e);
                Err(e)
            }
        }
    }

    /// Focus a locator and press a key
    pub fn press_key(&self, locator: &Locator, key: &str) -> Result<()> {
        info!("Pressing '{}' on {}", key, locator);
        match self.driver.press_key(locator, key, self.timeouts.element()) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Key press on {} failed: {}", locator, e);
                Err(e)
            }
        }
    }

    /// Text content of the first element whose visible text matches
    pub fn text_by_text(&self, text: &str) -> Result<String> {
        let locator = Locator::text(text);
        info!("Reading text of {}", locator);
        match self.driver.text_of(&locator, self.timeouts.element()) {
            Ok(content) => Ok(content),
            Err(e) => {
                error!("Text retrieval for {} failed: {}", locator, e);
                Err(e)
            }
        }
    }

    /// Tolerant visibility probe over a string locator kind.
    ///
    /// An unknown kind is a configuration error; every other failure
    /// (including timeout) is reported as `false`, never propagated.
    pub fn is_visible(&self, kind: &str, value: &str) -> Result<bool> {
        let locator = Locator::from_kind(kind, value)?;
        Ok(self.is_locator_visible(&locator))
    }

    /// Tolerant visibility probe; absence and failure both read as `false`
    pub fn is_locator_visible(&self, locator: &Locator) -> bool {
        self.is_locator_visible_within(locator, self.timeouts.short())
    }

    pub fn is_locator_visible_within(&self, locator: &Locator, timeout: Duration) -> bool {
        match self.driver.is_visible(locator, timeout) {
            Ok(visible) => {
                debug!("Visibility of {}: {}", locator, visible);
                visible
            }
            Err(e) => {
                debug!("Visibility probe for {} failed ({}); treating as hidden", locator, e);
                false
            }
        }
    }

    /// Strict visibility wait over a string locator kind; propagates when the
    /// element does not appear in time
    pub fn wait_for_visibility(
        &self,
        kind: &str,
        value: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let locator = Locator::from_kind(kind, value)?;
        self.wait_for_locator(&locator, timeout)
    }

    /// Strict visibility wait on a locator
    pub fn wait_for_locator(&self, locator: &Locator, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.timeouts.element());
        info!("Waiting for {} (up to {:?})", locator, timeout);
        match self.driver.wait_visible(locator, timeout) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Wait for {} failed: {}", locator, e);
                Err(e)
            }
        }
    }

    /// Unconditional pause. A fallback for UI updates with no observable
    /// completion signal; prefer [`BasePage::wait_for_locator`].
    pub fn delay(&self, duration: Duration) {
        debug!("Delaying {:?}", duration);
        thread::sleep(duration);
    }

    pub fn url(&self) -> Result<String> {
        self.driver.current_url()
    }

    pub fn title(&self) -> Result<String> {
        self.driver.title()
    }

    pub fn go_back(&self) -> Result<()> {
        info!("Navigating back");
        self.driver.back().inspect_err(|e| {
            error!("Back navigation failed: {}", e);
        })
    }

    pub fn go_forward(&self) -> Result<()> {
        info!("Navigating forward");
        self.driver.forward().inspect_err(|e| {
            error!("Forward navigation failed: {}", e);
        })
    }

    pub fn refresh(&self) -> Result<()> {
        info!("Refreshing page");
        self.driver.refresh().inspect_err(|e| {
            error!("Refresh failed: {}", e);
        })
    }

    /// Capture the current visual state to `path`
    pub fn take_screenshot(&self, path: &Path) -> Result<()> {
        info!("Taking screenshot: {}", path.display());
        match self.driver.screenshot(path) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Screenshot to {} failed: {}", path.display(), e);
                Err(match e {
                    Error::Io(io) => Error::Screenshot(io.to_string()),
                    other => other,
                })
            }
        }
    }

    /// Evaluate a script in the page
    pub fn eval(&self, script: &str) -> Result<serde_json::Value> {
        self.driver.eval(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeDriver, FakeElement};

    fn page_with(elements: Vec<FakeElement>) -> (Arc<FakeDriver>, BasePage) {
        let driver = Arc::new(FakeDriver::with_elements(elements));
        let config = Config::from_env_with(|_| None).unwrap();
        let page = BasePage::new(driver.clone(), &config);
        (driver, page)
    }

    #[test]
    fn test_tolerant_probe_on_absent_element() {
        let (_, page) = page_with(vec![]);
        assert!(!page.is_visible("text", "Welcome").unwrap());
        assert!(!page.is_visible("testid", "grid").unwrap());
        assert!(!page.is_visible("role", "button:Login").unwrap());
    }

    #[test]
    fn test_unknown_probe_kind_is_config_error() {
        let (_, page) = page_with(vec![]);
        let err = page.is_visible("css", ".grid").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_strict_action_on_absent_element_propagates() {
        let (_, page) = page_with(vec![]);
        let err = page.click_by_text("Checkout").unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));

        let err = page.wait_for_visibility("text", "Checkout", None).unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[test]
    fn test_click_by_role_hits_submit_input() {
        let (driver, page) = page_with(vec![FakeElement {
            input_type: Some("submit".to_string()),
            value: "Log In".to_string(),
            test_id: Some("submit".to_string()),
            ..FakeElement::new()
        }]);

        let clicked = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = clicked.clone();
        driver.on_click(Locator::test_id("submit"), move |_| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
        });

        page.click_by_role("button", "log in").unwrap();
        assert!(clicked.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_fill_password_falls_back_to_placeholder() {
        let (driver, page) = page_with(vec![FakeElement {
            input_type: Some("password".to_string()),
            placeholder: Some("Password".to_string()),
            test_id: Some("pw".to_string()),
            ..FakeElement::new()
        }]);

        // No label on the element, so the label resolution misses and the
        // placeholder fallback lands
        page.fill_password("password", "s3cret").unwrap();
        assert_eq!(driver.with_dom(|dom| dom.value_of("pw")), Some("s3cret".to_string()));
    }

    #[test]
    fn test_fill_password_both_paths_missing() {
        let (_, page) = page_with(vec![]);
        let err = page.fill_password("password", "s3cret").unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
    }

    #[test]
    fn test_history_and_screenshot_delegate() {
        let (driver, page) = page_with(vec![]);
        page.go_back().unwrap();
        page.go_forward().unwrap();
        page.refresh().unwrap();
        assert_eq!(driver.history_ops(), vec!["back", "forward", "refresh"]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.png");
        page.take_screenshot(&path).unwrap();
        assert!(path.exists());
        assert_eq!(driver.screenshots().len(), 1);
    }

    #[test]
    fn test_text_by_text() {
        let (_, page) = page_with(vec![FakeElement::text_block("Order confirmed!")]);
        assert_eq!(page.text_by_text("order confirmed").unwrap(), "Order confirmed!");
        assert!(page.text_by_text("order cancelled").is_err());
    }
}
