//! sc-pages: page objects for the shopcheck harness
//!
//! The [`Driver`] trait is the boundary to the browser-automation engine;
//! [`chrome::ChromeDriver`] implements it over headless Chrome and
//! [`fake::FakeDriver`] implements it in memory for unit tests. Domain page
//! objects ([`LoginPage`], [`HomePage`]) compose the [`BasePage`] facade
//! rather than inheriting from it, so a shared primitive can diverge per
//! page without a fragile base class.

pub mod base;
pub mod chrome;
pub mod driver;
pub mod fake;
pub mod home;
pub mod locator;
pub mod login;

pub use base::BasePage;
pub use chrome::{BrowserConfig, BrowserConfigBuilder, ChromeDriver, ChromeSession};
pub use driver::Driver;
pub use home::HomePage;
pub use locator::{Locator, NamePattern, Query};
pub use login::LoginPage;
