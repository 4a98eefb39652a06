//! In-memory driver for unit-testing page objects and fixtures
//!
//! Holds a flat element store instead of a DOM and matches the same locator
//! semantics the XPath compilation expresses. Click hooks let a spec script
//! how the "page" reacts to interactions (submit hides the form, search
//! populates the grid, and so on) without a live browser.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use sc_core::{Error, Result};

use crate::driver::Driver;
use crate::locator::{Locator, NamePattern};

/// One element in the fake store
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub role: Option<String>,
    /// Accessible name (aria-label equivalent)
    pub name: Option<String>,
    /// Visible text content
    pub text: String,
    pub test_id: Option<String>,
    /// Associated label text
    pub label: Option<String>,
    pub placeholder: Option<String>,
    /// Input type for form controls ("text", "email", "password", ...)
    pub input_type: Option<String>,
    pub visible: bool,
    /// Current input value
    pub value: String,
}

impl FakeElement {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn button(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            role: Some("button".to_string()),
            text: name.clone(),
            name: Some(name),
            ..Self::new()
        }
    }

    pub fn text_block(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new()
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            role: Some("alert".to_string()),
            text: text.into(),
            ..Self::new()
        }
    }

    pub fn text_input(placeholder: impl Into<String>) -> Self {
        Self {
            input_type: Some("text".to_string()),
            placeholder: Some(placeholder.into()),
            ..Self::new()
        }
    }

    pub fn email_input(placeholder: impl Into<String>) -> Self {
        Self {
            input_type: Some("email".to_string()),
            placeholder: Some(placeholder.into()),
            ..Self::new()
        }
    }

    pub fn password_input(label: impl Into<String>) -> Self {
        Self {
            input_type: Some("password".to_string()),
            label: Some(label.into()),
            ..Self::new()
        }
    }

    pub fn search_input(placeholder: impl Into<String>) -> Self {
        Self {
            input_type: Some("search".to_string()),
            placeholder: Some(placeholder.into()),
            ..Self::new()
        }
    }

    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Whether this element matches the locator's semantics
    pub fn matches(&self, locator: &Locator) -> bool {
        match locator {
            Locator::Role { role, name } => {
                self.has_role(role) && self.name_candidates().iter().any(|c| name.matches(c))
            }
            Locator::Text(text) => {
                !self.text.is_empty()
                    && self.text.to_lowercase().contains(&text.to_lowercase())
            }
            Locator::TestId(id) => self.test_id.as_deref() == Some(id.as_str()),
            Locator::Label(label) => {
                let needle = label.to_lowercase();
                contains(&self.label, &needle)
                    || contains(&self.name, &needle)
                    || contains(&self.placeholder, &needle)
            }
            Locator::Placeholder(placeholder) => {
                contains(&self.placeholder, &placeholder.to_lowercase())
            }
            Locator::PasswordLabel(label) => {
                let needle = label.to_lowercase();
                self.input_type.as_deref() == Some("password")
                    && (contains(&self.label, &needle) || contains(&self.name, &needle))
            }
            // The fake store has no CSS engine
            Locator::Css(_) => false,
        }
    }

    fn has_role(&self, role: &str) -> bool {
        let role = role.to_lowercase();
        if let Some(ref own) = self.role {
            if own.to_lowercase() == role {
                return true;
            }
        }
        // Implicit roles carried by the input type
        match (role.as_str(), self.input_type.as_deref()) {
            ("button", Some("submit")) | ("button", Some("button")) => true,
            ("textbox", Some("text")) | ("textbox", Some("email")) => true,
            ("searchbox", Some("search")) => true,
            _ => false,
        }
    }

    fn name_candidates(&self) -> Vec<&str> {
        let mut candidates = Vec::new();
        if let Some(ref name) = self.name {
            candidates.push(name.as_str());
        }
        if !self.text.is_empty() {
            candidates.push(self.text.as_str());
        }
        if !self.value.is_empty() {
            candidates.push(self.value.as_str());
        }
        if candidates.is_empty() {
            // An element with no naming surface still matches NamePattern::Any
            candidates.push("");
        }
        candidates
    }
}

fn contains(field: &Option<String>, needle_lower: &str) -> bool {
    field
        .as_deref()
        .map(|v| v.to_lowercase().contains(needle_lower))
        .unwrap_or(false)
}

/// The fake page state
#[derive(Debug, Default)]
pub struct FakeDom {
    pub url: String,
    pub title: String,
    pub elements: Vec<FakeElement>,
}

impl FakeDom {
    pub fn push(&mut self, element: FakeElement) {
        self.elements.push(element);
    }

    pub fn by_test_id(&self, id: &str) -> Option<&FakeElement> {
        self.elements
            .iter()
            .find(|el| el.test_id.as_deref() == Some(id))
    }

    pub fn by_test_id_mut(&mut self, id: &str) -> Option<&mut FakeElement> {
        self.elements
            .iter_mut()
            .find(|el| el.test_id.as_deref() == Some(id))
    }

    pub fn value_of(&self, id: &str) -> Option<String> {
        self.by_test_id(id).map(|el| el.value.clone())
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(el) = self.by_test_id_mut(id) {
            el.visible = visible;
        }
    }

    pub fn remove_by_test_id(&mut self, id: &str) {
        self.elements.retain(|el| el.test_id.as_deref() != Some(id));
    }

    fn visible_matches(&self, locator: &Locator) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.visible && el.matches(locator))
            .map(|(idx, _)| idx)
            .collect()
    }
}

type Hook = Box<dyn Fn(&mut FakeDom) + Send>;

/// In-memory [`Driver`] with scriptable interaction hooks
#[derive(Default)]
pub struct FakeDriver {
    dom: Mutex<FakeDom>,
    hooks: Mutex<Vec<(Locator, Hook)>>,
    routes: Mutex<Vec<(String, Vec<FakeElement>)>>,
    navigations: Mutex<Vec<String>>,
    history_ops: Mutex<Vec<&'static str>>,
    scripts: Mutex<Vec<String>>,
    screenshots: Mutex<Vec<PathBuf>>,
    eval_results: Mutex<VecDeque<serde_json::Value>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(elements: Vec<FakeElement>) -> Self {
        let driver = Self::new();
        driver.set_elements(elements);
        driver
    }

    pub fn set_elements(&self, elements: Vec<FakeElement>) {
        self.dom.lock().expect("fake dom poisoned").elements = elements;
    }

    /// Serve `elements` whenever a navigation target contains `url_part`
    pub fn route(&self, url_part: impl Into<String>, elements: Vec<FakeElement>) {
        self.routes
            .lock()
            .expect("fake routes poisoned")
            .push((url_part.into(), elements));
    }

    /// Run `hook` against the store after a click (or Enter press) lands on
    /// an element matching `trigger`
    pub fn on_click<F>(&self, trigger: Locator, hook: F)
    where
        F: Fn(&mut FakeDom) + Send + 'static,
    {
        self.hooks
            .lock()
            .expect("fake hooks poisoned")
            .push((trigger, Box::new(hook)));
    }

    /// Inspect or mutate the store directly
    pub fn with_dom<T>(&self, f: impl FnOnce(&mut FakeDom) -> T) -> T {
        f(&mut self.dom.lock().expect("fake dom poisoned"))
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().expect("fake log poisoned").clone()
    }

    pub fn history_ops(&self) -> Vec<&'static str> {
        self.history_ops.lock().expect("fake log poisoned").clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().expect("fake log poisoned").clone()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.screenshots.lock().expect("fake log poisoned").clone()
    }

    /// Queue the value the next `eval` call returns
    pub fn push_eval_result(&self, value: serde_json::Value) {
        self.eval_results
            .lock()
            .expect("fake eval poisoned")
            .push_back(value);
    }

    /// Fire hooks whose trigger matches the element at `idx`
    fn run_hooks(&self, dom: &mut FakeDom, idx: usize) {
        let element = dom.elements[idx].clone();
        let hooks = self.hooks.lock().expect("fake hooks poisoned");
        for (trigger, hook) in hooks.iter() {
            if element.matches(trigger) {
                hook(dom);
            }
        }
    }

    fn first_visible(&self, dom: &FakeDom, locator: &Locator) -> Option<usize> {
        dom.visible_matches(locator).into_iter().next()
    }
}

impl Driver for FakeDriver {
    fn navigate(&self, url: &str) -> Result<()> {
        self.navigations
            .lock()
            .expect("fake log poisoned")
            .push(url.to_string());

        let mut dom = self.dom.lock().expect("fake dom poisoned");
        dom.url = url.to_string();

        let routes = self.routes.lock().expect("fake routes poisoned");
        if let Some((_, elements)) = routes.iter().find(|(part, _)| url.contains(part.as_str())) {
            dom.elements = elements.clone();
        }
        Ok(())
    }

    fn click(&self, locator: &Locator, _timeout: Duration) -> Result<()> {
        let mut dom = self.dom.lock().expect("fake dom poisoned");
        let idx = self
            .first_visible(&dom, locator)
            .ok_or_else(|| Error::ElementNotFound(format!("{} not present", locator)))?;
        self.run_hooks(&mut dom, idx);
        Ok(())
    }

    fn click_nth(&self, locator: &Locator, index: usize, _timeout: Duration) -> Result<()> {
        let mut dom = self.dom.lock().expect("fake dom poisoned");
        let matches = dom.visible_matches(locator);
        let idx = matches.get(index).copied().ok_or_else(|| {
            Error::ElementNotFound(format!("{} (index {}) not present", locator, index))
        })?;
        self.run_hooks(&mut dom, idx);
        Ok(())
    }

    fn fill(&self, locator: &Locator, value: &str, _timeout: Duration) -> Result<()> {
        let mut dom = self.dom.lock().expect("fake dom poisoned");
        let idx = self
            .first_visible(&dom, locator)
            .ok_or_else(|| Error::ElementNotFound(format!("{} not present", locator)))?;
        dom.elements[idx].value = value.to_string();
        Ok(())
    }

    fn clear(&self, locator: &Locator, _timeout: Duration) -> Result<()> {
        let mut dom = self.dom.lock().expect("fake dom poisoned");
        let idx = self
            .first_visible(&dom, locator)
            .ok_or_else(|| Error::ElementNotFound(format!("{} not present", locator)))?;
        dom.elements[idx].value.clear();
        Ok(())
    }

    fn press_key(&self, locator: &Locator, key: &str, _timeout: Duration) -> Result<()> {
        let mut dom = self.dom.lock().expect("fake dom poisoned");
        let idx = self
            .first_visible(&dom, locator)
            .ok_or_else(|| Error::ElementNotFound(format!("{} not present", locator)))?;
        if key.eq_ignore_ascii_case("enter") {
            self.run_hooks(&mut dom, idx);
        }
        Ok(())
    }

    fn text_of(&self, locator: &Locator, _timeout: Duration) -> Result<String> {
        let dom = self.dom.lock().expect("fake dom poisoned");
        let idx = self
            .first_visible(&dom, locator)
            .ok_or_else(|| Error::ElementNotFound(format!("{} not present", locator)))?;
        Ok(dom.elements[idx].text.clone())
    }

    fn count(&self, locator: &Locator) -> Result<usize> {
        let dom = self.dom.lock().expect("fake dom poisoned");
        Ok(dom.visible_matches(locator).len())
    }

    fn is_visible(&self, locator: &Locator, _timeout: Duration) -> Result<bool> {
        let dom = self.dom.lock().expect("fake dom poisoned");
        Ok(self.first_visible(&dom, locator).is_some())
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
        Ok(self.dom.lock().expect("fake dom poisoned").url.clone())
    }

    fn title(&self) -> Result<String> {
        Ok(self.dom.lock().expect("fake dom poisoned").title.clone())
    }

    fn back(&self) -> Result<()> {
        self.history_ops
            .lock()
            .expect("fake log poisoned")
            .push("back");
        Ok(())
    }

    fn forward(&self) -> Result<()> {
        self.history_ops
            .lock()
            .expect("fake log poisoned")
            .push("forward");
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        self.history_ops
            .lock()
            .expect("fake log poisoned")
            .push("refresh");
        Ok(())
    }

    fn screenshot(&self, path: &Path) -> Result<()> {
        std::fs::write(path, b"\x89PNG-fake")?;
        self.screenshots
            .lock()
            .expect("fake log poisoned")
            .push(path.to_path_buf());
        Ok(())
    }

    fn eval(&self, script: &str) -> Result<serde_json::Value> {
        self.scripts
            .lock()
            .expect("fake log poisoned")
            .push(script.to_string());
        Ok(self
            .eval_results
            .lock()
            .expect("fake eval poisoned")
            .pop_front()
            .unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_matching_with_implicit_submit() {
        let submit = FakeElement {
            input_type: Some("submit".to_string()),
            value: "Log In".to_string(),
            ..FakeElement::new()
        };
        assert!(submit.matches(&Locator::role("button", "log in")));
        assert!(!submit.matches(&Locator::role("button", "register")));
    }

    #[test]
    fn test_text_matching_is_case_insensitive() {
        let el = FakeElement::text_block("Add to Cart");
        assert!(el.matches(&Locator::text("ADD TO CART")));
        assert!(el.matches(&Locator::text("cart")));
        assert!(!el.matches(&Locator::text("checkout")));
    }

    #[test]
    fn test_password_label_matching_excludes_placeholder() {
        let by_label = FakeElement::password_input("Password");
        assert!(by_label.matches(&Locator::password_label("password")));

        let by_placeholder_only = FakeElement {
            input_type: Some("password".to_string()),
            placeholder: Some("Password".to_string()),
            ..FakeElement::new()
        };
        assert!(!by_placeholder_only.matches(&Locator::password_label("password")));
        assert!(by_placeholder_only.matches(&Locator::placeholder("password")));
    }

    #[test]
    fn test_hidden_elements_do_not_resolve() {
        let driver = FakeDriver::with_elements(vec![
            FakeElement::button("Checkout").hidden(),
        ]);
        let locator = Locator::role("button", "checkout");
        assert!(!driver.is_visible(&locator, Duration::from_millis(10)).unwrap());
        assert!(driver.click(&locator, Duration::from_millis(10)).is_err());
    }

    #[test]
    fn test_click_hook_mutates_dom() {
        let driver = FakeDriver::with_elements(vec![
            FakeElement::button("Reveal").with_test_id("reveal"),
            FakeElement::text_block("Surprise")
                .with_test_id("surprise")
                .hidden(),
        ]);
        driver.on_click(Locator::test_id("reveal"), |dom| {
            dom.set_visible("surprise", true);
        });

        let timeout = Duration::from_millis(10);
        assert!(!driver.is_visible(&Locator::text("Surprise"), timeout).unwrap());
        driver.click(&Locator::test_id("reveal"), timeout).unwrap();
        assert!(driver.is_visible(&Locator::text("Surprise"), timeout).unwrap());
    }

    #[test]
    fn test_routes_swap_elements_on_navigation() {
        let driver = FakeDriver::new();
        driver.route("/catalog", vec![FakeElement::text_block("Products")]);

        driver.navigate("https://shop.example.com/catalog").unwrap();
        assert_eq!(driver.navigations().len(), 1);
        assert!(driver
            .is_visible(&Locator::text("Products"), Duration::from_millis(10))
            .unwrap());
    }

    #[test]
    fn test_fill_and_clear_round_trip() {
        let driver = FakeDriver::with_elements(vec![
            FakeElement::email_input("Email").with_test_id("email"),
        ]);
        let locator = Locator::placeholder("email");
        let timeout = Duration::from_millis(10);

        driver.fill(&locator, "a@b.com", timeout).unwrap();
        assert_eq!(driver.with_dom(|dom| dom.value_of("email")), Some("a@b.com".to_string()));

        driver.clear(&locator, timeout).unwrap();
        assert_eq!(driver.with_dom(|dom| dom.value_of("email")), Some(String::new()));
    }
}
