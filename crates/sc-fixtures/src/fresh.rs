//! Fresh page fixture
//!
//! Wraps the test's page handle in a [`BasePage`], arms the page against
//! blocking dialogs and starts collecting uncaught page errors.

use std::sync::Arc;

use tracing::{debug, info, warn};

use sc_core::config::Config;
use sc_core::Result;
use sc_pages::{BasePage, Driver};

/// Auto-accept JS dialogs and collect uncaught errors into a page-global
/// buffer the fixture can drain
const PAGE_GUARD_JS: &str = "\
window.__scPageErrors = window.__scPageErrors || []; \
window.alert = function() {}; \
window.confirm = function() { return true; }; \
window.prompt = function() { return ''; }; \
window.addEventListener('error', function(e) { \
    window.__scPageErrors.push(String(e.message || e)); \
});";

const DRAIN_ERRORS_JS: &str =
    "(function() { const e = window.__scPageErrors || []; window.__scPageErrors = []; return JSON.stringify(e); })()";

/// A ready-to-use page scoped to one test case
pub struct FreshPage {
    page: BasePage,
}

impl FreshPage {
    /// Wrap the handle and install the page guards
    pub fn set_up(driver: Arc<dyn Driver>, config: &Config) -> Result<Self> {
        let page = BasePage::new(driver, config);
        page.eval(PAGE_GUARD_JS)?;
        info!("Fresh page fixture ready");
        Ok(Self { page })
    }

    pub fn page(&self) -> &BasePage {
        &self.page
    }

    /// Read and clear the collected uncaught page errors, logging each one.
    /// Collection failures are swallowed; this is a diagnostics channel.
    pub fn drain_page_errors(&self) -> Vec<String> {
        let raw = match self.page.eval(DRAIN_ERRORS_JS) {
            Ok(value) => value,
            Err(e) => {
                debug!("Page error drain failed ({}); reporting none", e);
                return Vec::new();
            }
        };

        let errors: Vec<String> = raw
            .as_str()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default();

        for error in &errors {
            warn!("Uncaught page error: {}", error);
        }
        errors
    }
}
