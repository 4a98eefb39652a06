//! Authenticated session fixture
//!
//! Navigates to the login page and establishes a logged-in state for one
//! test case. Setup failure is fatal to the test; retries belong to the
//! runner, not to this fixture.

use std::sync::Arc;

use tracing::{error, info, warn};

use sc_core::config::Config;
use sc_core::{Error, Result};
use sc_pages::{Driver, HomePage, LoginPage};

/// "Already logged in" state for a single test: the shared handle plus the
/// page objects bound to it
pub struct AuthenticatedSession {
    pub driver: Arc<dyn Driver>,
    pub home: HomePage,
    pub login: LoginPage,
}

impl std::fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedSession").finish_non_exhaustive()
    }
}

impl AuthenticatedSession {
    /// Navigate to the login page and log in when the form is present.
    ///
    /// When the form is not visible, an existing session is assumed. That is
    /// a guess about page state, not a verified one: a broken target page
    /// looks identical, so the assumption is logged loudly.
    pub fn establish(driver: Arc<dyn Driver>, config: &Config) -> Result<Self> {
        let login = LoginPage::new(Arc::clone(&driver), config);

        login.navigate_to_login().map_err(|e| {
            error!("Authenticated-session setup could not reach the login page: {}", e);
            Error::Setup(format!("navigation to login failed: {}", e))
        })?;

        if login.is_login_form_displayed() {
            login.login(None, None).map_err(|e| {
                error!("Authenticated-session setup login failed: {}", e);
                Error::Setup(format!("login flow failed: {}", e))
            })?;

            if !login.verify_login_success() {
                error!("Login flow ran but the login form is still visible");
                return Err(Error::Setup(
                    "login verification failed: form still visible after submit".to_string(),
                ));
            }
            info!("Authenticated session established via login flow");
        } else {
            warn!(
                "Login form not visible; assuming an existing session \
                 (an unreachable or broken login page looks the same)"
            );
        }

        let home = HomePage::new(Arc::clone(&driver), config);
        Ok(Self { driver, home, login })
    }
}
