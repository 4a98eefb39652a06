//! Shared scripted "demo shop" for the scenario specs: a fake driver wired
//! to behave like the storefront under test.

// Not every test target uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use sc_core::Config;
use sc_pages::fake::{FakeDriver, FakeElement};
use sc_pages::Locator;

/// Default config with zeroed settle delays and tight probe windows so the
/// suite stays fast against the instant fake driver
pub fn test_config() -> Config {
    let mut config = Config::from_env_with(|_| None).unwrap();
    config.delays.short = 0;
    config.delays.medium = 0;
    config.delays.long = 0;
    config.timeouts.short = 10;
    config.timeouts.element = 10;
    config
}

pub fn login_elements() -> Vec<FakeElement> {
    vec![
        FakeElement::email_input("Email").with_test_id("email"),
        FakeElement::password_input("Password")
            .with_placeholder("Password")
            .with_test_id("password"),
        FakeElement {
            input_type: Some("submit".to_string()),
            value: "Log In".to_string(),
            test_id: Some("submit".to_string()),
            ..FakeElement::new()
        },
    ]
}

pub fn catalog_elements(products: &[String]) -> Vec<FakeElement> {
    let mut elements = vec![
        FakeElement::search_input("Search products").with_test_id("search"),
        FakeElement::new()
            .with_test_id("product-grid")
            .with_text("grid"),
        FakeElement::button("Cart").with_test_id("cart"),
        FakeElement::text_block("0").with_test_id("cart-count"),
        FakeElement::new()
            .with_test_id("featured")
            .with_text("Featured picks"),
    ];
    for product in products {
        elements.push(FakeElement::text_block(product.clone()).with_test_id("product-card"));
    }
    elements
}

/// Wire the login form: matching credentials swap the page to the catalog,
/// anything else (including empty fields) surfaces an alert
pub fn install_login_behavior(driver: &Arc<FakeDriver>, config: &Config) {
    let email = config.credentials.email.clone();
    let password = config.credentials.password.clone();
    let products = config.data.products.clone();

    driver.on_click(Locator::test_id("submit"), move |dom| {
        let entered_email = dom.value_of("email").unwrap_or_default();
        let entered_password = dom.value_of("password").unwrap_or_default();

        if entered_email.is_empty() || entered_password.is_empty() {
            dom.push(FakeElement::alert("Email and password are required"));
        } else if entered_email == email && entered_password == password {
            dom.elements = catalog_elements(&products);
        } else {
            dom.push(FakeElement::alert("Invalid email or password"));
        }
    });
}

/// Wire the search field: submitting replaces the product cards with the
/// catalog entries matching the entered term, or a no-results notice
pub fn install_search_behavior(driver: &Arc<FakeDriver>, config: &Config) {
    let products = config.data.products.clone();

    driver.on_click(Locator::test_id("search"), move |dom| {
        let term = dom.value_of("search").unwrap_or_default().to_lowercase();

        dom.remove_by_test_id("product-card");
        dom.elements.retain(|el| !el.text.to_lowercase().contains("no results"));

        let matches: Vec<&String> = products
            .iter()
            .filter(|p| p.to_lowercase().contains(&term))
            .collect();

        if matches.is_empty() {
            dom.push(FakeElement::text_block("No results found"));
        } else {
            for product in matches {
                dom.push(
                    FakeElement::text_block(product.clone()).with_test_id("product-card"),
                );
            }
        }
    });
}

/// A driver wired as the complete demo shop: login page at the base URL,
/// catalog after authentication, working search
pub fn demo_shop(config: &Config) -> Arc<FakeDriver> {
    let driver = Arc::new(FakeDriver::new());
    driver.route(config.base_url.as_str(), login_elements());
    install_login_behavior(&driver, config);
    install_search_behavior(&driver, config);
    driver
}
