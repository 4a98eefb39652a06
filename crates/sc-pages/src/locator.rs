//! Semantic locators
//!
//! Elements are resolved by accessibility role, visible text, stable test id,
//! label or placeholder rather than by structural CSS paths. Each locator
//! compiles to an XPath 1.0 expression for the Chrome backend; the in-memory
//! fake driver matches the same semantics structurally.

use std::fmt;

use regex::Regex;

use sc_core::{Error, Result};

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Accessible-name matcher for role locators.
///
/// Plain strings match case-insensitively on a substring; regex patterns are
/// matched in Rust against candidate names (XPath 1.0 has no regex support).
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// Match any accessible name
    Any,
    /// Case-insensitive substring match
    Contains(String),
    /// Case-insensitive exact match
    Exact(String),
    /// Regex match against the accessible name
    Regex(Regex),
}

impl NamePattern {
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        match self {
            Self::Any => true,
            Self::Contains(needle) => candidate
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Self::Exact(name) => candidate.eq_ignore_ascii_case(name),
            Self::Regex(re) => re.is_match(candidate),
        }
    }

    /// Whether this pattern can be expressed in XPath (regex cannot)
    fn xpath_expressible(&self) -> bool {
        !matches!(self, Self::Regex(_))
    }
}

/// How a locator is resolved by the browser backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    XPath(String),
    Css(String),
}

/// A semantic element locator
#[derive(Debug, Clone)]
pub enum Locator {
    /// Accessibility role plus accessible-name pattern
    Role { role: String, name: NamePattern },
    /// Case-insensitive visible-text match (first match wins)
    Text(String),
    /// Stable test identifier (`data-testid` attribute, exact)
    TestId(String),
    /// Form control by associated/ARIA label or placeholder
    Label(String),
    /// Input or textarea by placeholder text
    Placeholder(String),
    /// Password input associated with a matching label or ARIA label
    PasswordLabel(String),
    /// Raw CSS selector escape hatch
    Css(String),
}

impl Locator {
    /// Role locator with case-insensitive partial name match
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let pattern = if name.is_empty() {
            NamePattern::Any
        } else {
            NamePattern::Contains(name)
        };
        Self::Role {
            role: role.into(),
            name: pattern,
        }
    }

    /// Role locator with a regex accessible-name pattern
    pub fn role_matching(role: impl Into<String>, name: Regex) -> Self {
        Self::Role {
            role: role.into(),
            name: NamePattern::Regex(name),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder(text.into())
    }

    pub fn password_label(text: impl Into<String>) -> Self {
        Self::PasswordLabel(text.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Build a locator from a string kind, used by data-driven visibility
    /// probes. Recognized kinds: `role` (value `role` or `role:name`),
    /// `text`, `testid`.
    pub fn from_kind(kind: &str, value: &str) -> Result<Self> {
        match kind.to_lowercase().as_str() {
            "role" => {
                let (role, name) = match value.split_once(':') {
                    Some((role, name)) => (role.trim(), name.trim()),
                    None => (value.trim(), ""),
                };
                Ok(Self::role(role, name))
            }
            "text" => Ok(Self::text(value)),
            "testid" | "test-id" | "test_id" => Ok(Self::test_id(value)),
            other => Err(Error::Config(format!(
                "Unknown locator kind '{}' (expected role, text or testid)",
                other
            ))),
        }
    }

    /// Compile to a backend query.
    ///
    /// Role locators with a regex name pattern compile to a candidate query
    /// over the role alone; the driver filters candidates with
    /// [`Locator::name_filter`].
    pub fn query(&self) -> Query {
        match self {
            Self::Role { role, name } => {
                let pattern = if name.xpath_expressible() {
                    name
                } else {
                    &NamePattern::Any
                };
                Query::XPath(role_xpath(role, pattern))
            }
            Self::Text(text) => Query::XPath(format!(
                "//*[text()[contains({}, {})]]",
                lower("normalize-space(.)"),
                xpath_literal(&text.to_lowercase())
            )),
            Self::TestId(id) => {
                Query::XPath(format!("//*[@data-testid={}]", xpath_literal(id)))
            }
            Self::Label(label) => {
                let needle = xpath_literal(&label.to_lowercase());
                Query::XPath(format!(
                    "//input[contains({al}, {n})] \
                     | //textarea[contains({al}, {n})] \
                     | //label[contains({txt}, {n})]/following::input[1] \
                     | //input[contains({ph}, {n})]",
                    al = lower("@aria-label"),
                    txt = lower("normalize-space(.)"),
                    ph = lower("@placeholder"),
                    n = needle,
                ))
            }
            Self::Placeholder(placeholder) => {
                let needle = xpath_literal(&placeholder.to_lowercase());
                Query::XPath(format!(
                    "//input[contains({ph}, {n})] | //textarea[contains({ph}, {n})]",
                    ph = lower("@placeholder"),
                    n = needle,
                ))
            }
            Self::PasswordLabel(label) => {
                let needle = xpath_literal(&label.to_lowercase());
                Query::XPath(format!(
                    "//label[contains({txt}, {n})]/following::input[@type='password'][1] \
                     | //input[@type='password' and contains({al}, {n})]",
                    txt = lower("normalize-space(.)"),
                    al = lower("@aria-label"),
                    n = needle,
                ))
            }
            Self::Css(selector) => Query::Css(selector.clone()),
        }
    }

    /// Name filter the driver must apply after querying candidates, if any
    pub fn name_filter(&self) -> Option<&NamePattern> {
        match self {
            Self::Role { name, .. } if !name.xpath_expressible() => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role { role, name } => match name {
                NamePattern::Any => write!(f, "role={}", role),
                NamePattern::Contains(n) => write!(f, "role={}[name~'{}']", role, n),
                NamePattern::Exact(n) => write!(f, "role={}[name='{}']", role, n),
                NamePattern::Regex(re) => write!(f, "role={}[name=/{}/]", role, re),
            },
            Self::Text(t) => write!(f, "text~'{}'", t),
            Self::TestId(id) => write!(f, "testid='{}'", id),
            Self::Label(l) => write!(f, "label~'{}'", l),
            Self::Placeholder(p) => write!(f, "placeholder~'{}'", p),
            Self::PasswordLabel(l) => write!(f, "password-label~'{}'", l),
            Self::Css(s) => write!(f, "css='{}'", s),
        }
    }
}

/// Lowercasing XPath 1.0 expression for case-insensitive comparisons
fn lower(expr: &str) -> String {
    format!("translate({}, '{}', '{}')", expr, UPPER, LOWER)
}

/// Quote a string as an XPath literal, falling back to concat() when the
/// string mixes both quote characters
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{}'", s)
    } else if !s.contains('"') {
        format!("\"{}\"", s)
    } else {
        let parts: Vec<String> = s
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Per-role element branches: each branch is an element path plus the
/// expressions that carry its accessible name
fn role_branches(role: &str) -> Vec<(&'static str, Vec<&'static str>)> {
    match role.to_lowercase().as_str() {
        "button" => vec![
            ("//button", vec!["normalize-space(.)", "@aria-label", "@value"]),
            (
                "//input[@type='submit' or @type='button']",
                vec!["@value", "@aria-label"],
            ),
            ("//*[@role='button']", vec!["normalize-space(.)", "@aria-label"]),
        ],
        "link" => vec![
            ("//a", vec!["normalize-space(.)", "@aria-label"]),
            ("//*[@role='link']", vec!["normalize-space(.)", "@aria-label"]),
        ],
        "textbox" => vec![
            (
                "//input[not(@type) or @type='text' or @type='email' or @type='search']",
                vec!["@aria-label", "@placeholder", "@name"],
            ),
            ("//textarea", vec!["@aria-label", "@placeholder", "@name"]),
            ("//*[@role='textbox']", vec!["@aria-label"]),
        ],
        "searchbox" => vec![
            (
                "//input[@type='search']",
                vec!["@aria-label", "@placeholder", "@name"],
            ),
            ("//*[@role='searchbox']", vec!["@aria-label", "@placeholder"]),
        ],
        "heading" => vec![
            (
                "//h1 | //h2 | //h3 | //h4 | //h5 | //h6",
                vec!["normalize-space(.)"],
            ),
            ("//*[@role='heading']", vec!["normalize-space(.)"]),
        ],
        "alert" => vec![
            ("//*[@role='alert']", vec!["normalize-space(.)"]),
            (
                "//*[contains(@class,'alert') or contains(@class,'error')]",
                vec!["normalize-space(.)"],
            ),
        ],
        _ => vec![("//*[@role='{ROLE}']", vec!["normalize-space(.)", "@aria-label"])],
    }
}

fn role_xpath(role: &str, name: &NamePattern) -> String {
    let branches = role_branches(role);
    let role_lower = role.to_lowercase();

    let compiled: Vec<String> = branches
        .into_iter()
        .map(|(path, name_exprs)| {
            let path = path.replace("{ROLE}", &role_lower);
            match name_predicate(&name_exprs, name) {
                Some(pred) => format!("({})[{}]", path, pred),
                None => path,
            }
        })
        .collect();

    compiled.join(" | ")
}

fn name_predicate(name_exprs: &[&str], name: &NamePattern) -> Option<String> {
    let clauses: Vec<String> = match name {
        NamePattern::Any | NamePattern::Regex(_) => return None,
        NamePattern::Contains(needle) => {
            let literal = xpath_literal(&needle.to_lowercase());
            name_exprs
                .iter()
                .map(|expr| format!("contains({}, {})", lower(expr), literal))
                .collect()
        }
        NamePattern::Exact(name) => {
            let literal = xpath_literal(&name.to_lowercase());
            name_exprs
                .iter()
                .map(|expr| format!("{} = {}", lower(expr), literal))
                .collect()
        }
    };
    Some(clauses.join(" or "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_id_query() {
        let locator = Locator::test_id("cart-count");
        assert_eq!(
            locator.query(),
            Query::XPath("//*[@data-testid='cart-count']".to_string())
        );
    }

    #[test]
    fn test_text_query_is_case_insensitive() {
        let locator = Locator::text("Add To Cart");
        match locator.query() {
            Query::XPath(xpath) => {
                assert!(xpath.contains("'add to cart'"));
                assert!(xpath.contains("translate("));
            }
            Query::Css(_) => panic!("expected xpath"),
        }
    }

    #[test]
    fn test_role_query_unions_branches() {
        let locator = Locator::role("button", "Login");
        match locator.query() {
            Query::XPath(xpath) => {
                assert!(xpath.contains("//button"));
                assert!(xpath.contains("@type='submit'"));
                assert!(xpath.contains("@role='button'"));
                assert!(xpath.contains("'login'"));
            }
            Query::Css(_) => panic!("expected xpath"),
        }
    }

    #[test]
    fn test_role_without_name_has_no_predicate() {
        let locator = Locator::role("alert", "");
        match locator.query() {
            Query::XPath(xpath) => {
                assert!(xpath.contains("@role='alert'"));
                assert!(!xpath.contains("contains(translate(normalize-space"));
            }
            Query::Css(_) => panic!("expected xpath"),
        }
    }

    #[test]
    fn test_unknown_role_falls_back_to_role_attribute() {
        let locator = Locator::role("tab", "Orders");
        match locator.query() {
            Query::XPath(xpath) => assert!(xpath.contains("//*[@role='tab']")),
            Query::Css(_) => panic!("expected xpath"),
        }
    }

    #[test]
    fn test_regex_role_defers_name_filtering_to_driver() {
        let locator = Locator::role_matching("button", Regex::new("(?i)log ?in").unwrap());
        assert!(locator.name_filter().is_some());
        match locator.query() {
            // Candidate query has no name predicate
            Query::XPath(xpath) => assert!(!xpath.contains("contains(translate(@value")),
            Query::Css(_) => panic!("expected xpath"),
        }
        assert!(locator.name_filter().unwrap().matches("Log In"));
        assert!(!locator.name_filter().unwrap().matches("Sign Up"));
    }

    #[test]
    fn test_css_query_passthrough() {
        let locator = Locator::css(".product-card");
        assert_eq!(locator.query(), Query::Css(".product-card".to_string()));
    }

    #[test]
    fn test_from_kind() {
        assert!(matches!(
            Locator::from_kind("text", "Welcome").unwrap(),
            Locator::Text(_)
        ));
        assert!(matches!(
            Locator::from_kind("testid", "grid").unwrap(),
            Locator::TestId(_)
        ));
        match Locator::from_kind("role", "button:Login").unwrap() {
            Locator::Role { role, name } => {
                assert_eq!(role, "button");
                assert!(name.matches("Login now"));
            }
            other => panic!("unexpected locator: {}", other),
        }
    }

    #[test]
    fn test_from_kind_unknown_is_config_error() {
        let err = Locator::from_kind("xpath", "//div").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_name_pattern_matching() {
        assert!(NamePattern::Contains("log".to_string()).matches("LOGIN"));
        assert!(!NamePattern::Contains("logout".to_string()).matches("login"));
        assert!(NamePattern::Exact("Login".to_string()).matches("login"));
        assert!(!NamePattern::Exact("Login".to_string()).matches("login now"));
        assert!(NamePattern::Any.matches(""));
    }

    #[test]
    fn test_xpath_literal_quoting() {
        assert_eq!(xpath_literal("plain"), "'plain'");
        assert_eq!(xpath_literal("it's"), "\"it's\"");
        assert_eq!(
            xpath_literal("a'b\"c"),
            "concat('a', \"'\", 'b\"c')"
        );
    }
}
