//! Automation capability boundary
//!
//! Page objects talk to the browser exclusively through this trait, so the
//! engine can be swapped without touching page code and specs can run against
//! the in-memory fake.

use std::path::Path;
use std::time::Duration;

use sc_core::Result;

use crate::locator::Locator;

/// One browser tab/context, as seen by page objects.
///
/// Implementations: [`crate::chrome::ChromeDriver`] (headless Chrome) and
/// [`crate::fake::FakeDriver`] (in-memory, for unit tests). All locating and
/// interacting calls take a per-call timeout; on expiry they fail with a
/// `Timeout` or `ElementNotFound` error rather than blocking indefinitely.
pub trait Driver: Send + Sync {
    /// Navigate the tab and wait for the load to settle
    fn navigate(&self, url: &str) -> Result<()>;

    /// Click the first element matching the locator
    fn click(&self, locator: &Locator, timeout: Duration) -> Result<()>;

    /// Click the element at `index` among the locator's matches
    fn click_nth(&self, locator: &Locator, index: usize, timeout: Duration) -> Result<()>;

    /// Set the value of the first matching input
    fn fill(&self, locator: &Locator, value: &str, timeout: Duration) -> Result<()>;

    /// Clear the value of the first matching input
    fn clear(&self, locator: &Locator, timeout: Duration) -> Result<()>;

    /// Focus the first matching element and press a key (e.g. "Enter")
    fn press_key(&self, locator: &Locator, key: &str, timeout: Duration) -> Result<()>;

    /// Text content of the first matching element
    fn text_of(&self, locator: &Locator, timeout: Duration) -> Result<String>;

    /// Number of currently matching, visible elements
    fn count(&self, locator: &Locator) -> Result<usize>;

    /// Whether a matching element becomes visible within the timeout.
    /// Absence is reported as `Ok(false)`, not as an error.
    fn is_visible(&self, locator: &Locator, timeout: Duration) -> Result<bool>;

    /// Wait until a matching element is visible, failing on timeout
    fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<()>;

    /// Current page URL
    fn current_url(&self) -> Result<String>;

    /// Current page title
    fn title(&self) -> Result<String>;

    /// History back, waiting for the navigation to settle
    fn back(&self) -> Result<()>;

    /// History forward, waiting for the navigation to settle
    fn forward(&self) -> Result<()>;

    /// Reload the page
    fn refresh(&self) -> Result<()>;

    /// Capture a PNG screenshot to the given path
    fn screenshot(&self, path: &Path) -> Result<()>;

    /// Evaluate a script in the page, returning its JSON value
    fn eval(&self, script: &str) -> Result<serde_json::Value>;
}
