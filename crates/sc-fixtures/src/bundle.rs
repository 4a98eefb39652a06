//! Page-object bundle fixture

use std::sync::Arc;

use sc_core::config::Config;
use sc_core::TestData;
use sc_pages::{BasePage, Driver, HomePage, LoginPage};

/// One instance of each page object, all views over the same handle
pub struct PageObjects {
    pub base: BasePage,
    pub login: LoginPage,
    pub home: HomePage,
}

impl PageObjects {
    pub fn bind(driver: Arc<dyn Driver>, config: &Config) -> Self {
        Self {
            base: BasePage::new(Arc::clone(&driver), config),
            login: LoginPage::new(Arc::clone(&driver), config),
            home: HomePage::new(driver, config),
        }
    }
}

/// Fresh test-data bundle for one test case
pub fn test_data(config: &Config) -> TestData {
    TestData::from_config(config)
}
