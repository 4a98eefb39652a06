//! Home/catalog page object
//!
//! Product browsing, search, filters and cart interactions. Optional UI
//! (search button, filter panel, badges) is handled best-effort: an absent
//! control is a warning and a no-op, a failing interaction on a visible
//! control propagates.

use std::sync::Arc;

use tracing::{debug, info, warn};

use sc_core::config::Config;
use sc_core::Result;

use crate::base::BasePage;
use crate::driver::Driver;
use crate::locator::Locator;

pub struct HomePage {
    base: BasePage,
    base_url: String,
}

impl HomePage {
    pub fn new(driver: Arc<dyn Driver>, config: &Config) -> Self {
        Self {
            base: BasePage::new(driver, config),
            base_url: config.base_url.clone(),
        }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    fn search_field() -> Locator {
        Locator::placeholder("search")
    }

    fn search_button() -> Locator {
        Locator::role("button", "search")
    }

    fn product_item() -> Locator {
        Locator::test_id("product-card")
    }

    fn product_grid() -> Locator {
        Locator::test_id("product-grid")
    }

    fn no_results() -> Locator {
        Locator::text("no results")
    }

    fn featured_section() -> Locator {
        Locator::test_id("featured")
    }

    fn cart_button() -> Locator {
        Locator::role("button", "cart")
    }

    fn cart_badge() -> Locator {
        Locator::test_id("cart-count")
    }

    fn add_to_cart_button() -> Locator {
        Locator::role("button", "add to cart")
    }

    fn sort_control() -> Locator {
        Locator::test_id("sort-select")
    }

    fn clear_filters_control() -> Locator {
        Locator::text("clear all")
    }

    fn filter_control(name: &str) -> Locator {
        Locator::test_id(format!("filter-{}", name.to_lowercase()))
    }

    pub fn navigate_to_home(&self) -> Result<()> {
        self.base.goto(&self.base_url)
    }

    /// Fill the search field and submit: via the search button when one is
    /// visible within the short timeout, otherwise via Enter on the field
    pub fn search_product(&self, term: &str) -> Result<()> {
        info!("Searching for '{}'", term);
        self.base.fill(&Self::search_field(), term)?;

        if self
            .base
            .is_locator_visible_within(&Self::search_button(), self.base.timeouts().short())
        {
            self.base.click(&Self::search_button())?;
        } else {
            debug!("No search button visible; submitting via Enter");
            self.base.press_key(&Self::search_field(), "Enter")?;
        }

        self.base.delay(self.base.delays().medium());
        Ok(())
    }

    /// Number of visible product items. Returns 0 on any failure; callers
    /// cannot distinguish "zero products" from "grid not found".
    pub fn product_count(&self) -> usize {
        match self.base.driver().count(&Self::product_item()) {
            Ok(count) => {
                debug!("Product count: {}", count);
                count
            }
            Err(e) => {
                warn!("Product count failed ({}); reporting 0", e);
                0
            }
        }
    }

    pub fn click_product(&self, name: &str) -> Result<()> {
        self.base.click_by_text(name)?;
        self.base.delay(self.base.delays().short());
        Ok(())
    }

    pub fn click_product_by_index(&self, index: usize) -> Result<()> {
        self.base.click_nth(&Self::product_item(), index)?;
        self.base.delay(self.base.delays().short());
        Ok(())
    }

    /// Open the named product and click "add to cart" if the control shows
    /// up. A missing control is logged and swallowed; deployments without a
    /// product detail action are tolerated.
    pub fn add_product_to_cart(&self, name: &str) -> Result<()> {
        self.click_product(name)?;

        let add_button = Self::add_to_cart_button();
        if self
            .base
            .is_locator_visible_within(&add_button, self.base.timeouts().element())
        {
            self.base.click(&add_button)?;
            info!("Added '{}' to cart", name);
        } else {
            warn!("Add-to-cart control not visible for '{}'; skipping", name);
        }
        Ok(())
    }

    pub fn open_cart(&self) -> Result<()> {
        self.base.click(&Self::cart_button())
    }

    /// Numeric cart badge value; 0 when the badge is absent or unparsable.
    /// Never propagates.
    pub fn cart_item_count(&self) -> usize {
        let badge = Self::cart_badge();
        if !self.base.is_locator_visible(&badge) {
            debug!("Cart badge not visible; reporting 0");
            return 0;
        }
        match self
            .base
            .driver()
            .text_of(&badge, self.base.timeouts().short())
        {
            Ok(text) => {
                let digits: String = text.chars().filter(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            }
            Err(e) => {
                debug!("Cart badge read failed ({}); reporting 0", e);
                0
            }
        }
    }

    /// Best-effort sort: no sort control, no action
    pub fn sort_products(&self, option: &str) -> Result<()> {
        let control = Self::sort_control();
        if !self.base.is_locator_visible(&control) {
            warn!("Sort control not visible; skipping sort by '{}'", option);
            return Ok(());
        }
        self.base.click(&control)?;
        self.base.click_by_text(option)?;
        self.base.delay(self.base.delays().short());
        Ok(())
    }

    /// Best-effort filter: the named filter group must be visible, otherwise
    /// this is a logged no-op
    pub fn apply_filter(&self, name: &str, value: &str) -> Result<()> {
        let control = Self::filter_control(name);
        if !self.base.is_locator_visible(&control) {
            warn!("Filter '{}' not visible; skipping", name);
            return Ok(());
        }
        self.base.click(&control)?;
        self.base.click_by_text(value)?;
        self.base.delay(self.base.delays().short());
        Ok(())
    }

    /// Best-effort filter reset
    pub fn clear_all_filters(&self) -> Result<()> {
        let control = Self::clear_filters_control();
        if !self.base.is_locator_visible(&control) {
            warn!("Clear-filters control not visible; skipping");
            return Ok(());
        }
        self.base.click(&control)?;
        self.base.delay(self.base.delays().short());
        Ok(())
    }

    pub fn is_product_grid_displayed(&self) -> bool {
        self.base.is_locator_visible(&Self::product_grid())
    }

    pub fn is_no_results_displayed(&self) -> bool {
        self.base.is_locator_visible(&Self::no_results())
    }

    pub fn is_featured_section_displayed(&self) -> bool {
        self.base.is_locator_visible(&Self::featured_section())
    }
}
