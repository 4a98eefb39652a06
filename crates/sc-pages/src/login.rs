//! Login page object
//!
//! Encapsulates the login form's locators and the login workflow.

use std::sync::Arc;

use tracing::{debug, info, warn};

use sc_core::config::{Config, Credentials};
use sc_core::Result;

use crate::base::BasePage;
use crate::driver::Driver;
use crate::locator::Locator;

pub struct LoginPage {
    base: BasePage,
    base_url: String,
    credentials: Credentials,
}

impl LoginPage {
    pub fn new(driver: Arc<dyn Driver>, config: &Config) -> Self {
        Self {
            base: BasePage::new(driver, config),
            base_url: config.base_url.clone(),
            credentials: config.credentials.clone(),
        }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    fn email_field() -> Locator {
        Locator::placeholder("email")
    }

    fn password_field() -> Locator {
        Locator::placeholder("password")
    }

    fn submit_button() -> Locator {
        Locator::role("button", "log in")
    }

    fn error_alert() -> Locator {
        Locator::role("alert", "")
    }

    pub fn navigate_to_login(&self) -> Result<()> {
        self.base.goto(&self.base_url)
    }

    pub fn enter_email(&self, email: &str) -> Result<()> {
        self.base.fill(&Self::email_field(), email)
    }

    pub fn enter_password(&self, password: &str) -> Result<()> {
        self.base.fill_password("password", password)
    }

    /// Click the submit control, then allow the page a short settle delay
    /// (submission has no uniform completion signal across deployments)
    pub fn click_login_button(&self) -> Result<()> {
        self.base.click(&Self::submit_button())?;
        self.base.delay(self.base.delays().short());
        Ok(())
    }

    /// Run the full login flow. Defaults to the configured credentials; the
    /// first failing step aborts the sequence and propagates. Fields already
    /// filled are not rolled back.
    pub fn login(&self, email: Option<&str>, password: Option<&str>) -> Result<()> {
        let email = email.unwrap_or(&self.credentials.email);
        let password = password.unwrap_or(&self.credentials.password);

        info!("Logging in as {}", email);
        self.enter_email(email)?;
        self.enter_password(password)?;
        self.click_login_button()?;
        info!("Login flow submitted for {}", email);
        Ok(())
    }

    /// Text of the first visible alert/error element, if one appears within
    /// the short timeout. Never propagates.
    pub fn error_message(&self) -> Option<String> {
        let alert = Self::error_alert();
        if !self.base.is_locator_visible(&alert) {
            debug!("No login error visible");
            return None;
        }
        match self
            .base
            .driver()
            .text_of(&alert, self.base.timeouts().short())
        {
            Ok(text) => {
                let text = text.trim().to_string();
                if text.is_empty() { None } else { Some(text) }
            }
            Err(e) => {
                debug!("Error text retrieval failed ({}); treating as absent", e);
                None
            }
        }
    }

    pub fn is_error_displayed(&self) -> bool {
        self.error_message().is_some()
    }

    /// Whether the complete login form (email, password, submit) is visible.
    /// Any individual probe failure reads as "not visible".
    pub fn is_login_form_displayed(&self) -> bool {
        self.base.is_locator_visible(&Self::email_field())
            && self.base.is_locator_visible(&Self::password_field())
            && self.base.is_locator_visible(&Self::submit_button())
    }

    /// Heuristic success check: the email field disappearing is read as
    /// "navigated away from the login form". Not a positive assertion of a
    /// post-login page.
    pub fn verify_login_success(&self) -> bool {
        let success = !self.base.is_locator_visible(&Self::email_field());
        if success {
            info!("Login form gone; treating login as successful");
        } else {
            warn!("Login form still visible after submit");
        }
        success
    }

    pub fn clear_email(&self) -> Result<()> {
        self.base.clear(&Self::email_field())
    }

    pub fn clear_password(&self) -> Result<()> {
        self.base.clear(&Self::password_field())
    }

    /// Run a login attempt with (presumably invalid) credentials and return
    /// whatever error message the page shows. Callers must check the result;
    /// no error being shown is a legal outcome here.
    pub fn attempt_invalid_login(&self, email: &str, password: &str) -> Result<Option<String>> {
        self.login(Some(email), Some(password))?;
        self.base.delay(self.base.delays().short());
        Ok(self.error_message())
    }
}
