//! Configuration management
//!
//! Settings are resolved in the following priority order:
//! 1. Environment variables
//! 2. shopcheck.toml configuration file
//! 3. Default values
//!
//! Inside the configuration file, `${VAR_NAME}` expands to the value of the
//! named environment variable.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Error;

/// Credentials for the account under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Email for the valid test account
    pub email: String,
    /// Password for the valid test account
    pub password: String,
    /// Email used by negative-path login tests
    pub invalid_email: String,
    /// Password used by negative-path login tests
    pub invalid_password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "tester@example.com".to_string(),
            password: "Sup3rSecret!".to_string(),
            invalid_email: "nobody@example.com".to_string(),
            invalid_password: "wrong-password".to_string(),
        }
    }
}

/// Timeout tiers in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeouts {
    pub short: u64,
    pub medium: u64,
    pub long: u64,
    pub element: u64,
    pub navigation: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            short: 2_000,
            medium: 5_000,
            long: 10_000,
            element: 10_000,
            navigation: 30_000,
        }
    }
}

impl Timeouts {
    pub fn short(&self) -> Duration {
        Duration::from_millis(self.short)
    }

    pub fn medium(&self) -> Duration {
        Duration::from_millis(self.medium)
    }

    pub fn long(&self) -> Duration {
        Duration::from_millis(self.long)
    }

    pub fn element(&self) -> Duration {
        Duration::from_millis(self.element)
    }

    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation)
    }

    /// Look up a timeout by tier name. Unknown tiers yield `None`; the caller
    /// decides whether that is an error.
    pub fn by_tier(&self, tier: &str) -> Option<Duration> {
        let ms = match tier.to_lowercase().as_str() {
            "short" => self.short,
            "medium" => self.medium,
            "long" => self.long,
            "element" => self.element,
            "navigation" => self.navigation,
            _ => return None,
        };
        Some(Duration::from_millis(ms))
    }
}

/// Settle-delay tiers in milliseconds
///
/// Fixed delays are a fallback for UI updates with no observable completion
/// signal. Prefer an explicit visibility wait wherever one exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delays {
    pub short: u64,
    pub medium: u64,
    pub long: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            short: 500,
            medium: 1_000,
            long: 2_000,
        }
    }
}

impl Delays {
    pub fn short(&self) -> Duration {
        Duration::from_millis(self.short)
    }

    pub fn medium(&self) -> Duration {
        Duration::from_millis(self.medium)
    }

    pub fn long(&self) -> Duration {
        Duration::from_millis(self.long)
    }
}

/// Catalog data used by example specs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Product names known to exist in the catalog under test
    pub products: Vec<String>,
    /// Search terms expected to produce results
    pub search_terms: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            products: vec![
                "Classic White Shirt".to_string(),
                "Blue Denim Jacket".to_string(),
                "Canvas Sneakers".to_string(),
                "Leather Wallet".to_string(),
                "Wool Beanie".to_string(),
            ],
            search_terms: vec![
                "shirt".to_string(),
                "jacket".to_string(),
                "sneakers".to_string(),
            ],
        }
    }
}

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Whether to run in headless mode
    pub headless: bool,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Artificial delay after each driver action, in milliseconds
    pub slow_mo: u64,
    /// Verbose harness logging
    pub debug: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1920,
            height: 1080,
            slow_mo: 0,
            debug: false,
        }
    }
}

/// Main configuration for the shopcheck harness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the deployment under test
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub credentials: Credentials,

    #[serde(default)]
    pub timeouts: Timeouts,

    #[serde(default)]
    pub delays: Delays,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub browser: BrowserSettings,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: Credentials::default(),
            timeouts: Timeouts::default(),
            delays: Delays::default(),
            data: DataConfig::default(),
            browser: BrowserSettings::default(),
        }
    }
}

/// TOML file structure (all fields optional so partial files layer over
/// defaults)
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    base_url: Option<String>,
    credentials: Option<TomlCredentials>,
    timeouts: Option<TomlTimeouts>,
    delays: Option<TomlDelays>,
    data: Option<TomlData>,
    browser: Option<TomlBrowser>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlCredentials {
    email: Option<String>,
    password: Option<String>,
    invalid_email: Option<String>,
    invalid_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlTimeouts {
    short: Option<u64>,
    medium: Option<u64>,
    long: Option<u64>,
    element: Option<u64>,
    navigation: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlDelays {
    short: Option<u64>,
    medium: Option<u64>,
    long: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlData {
    products: Option<Vec<String>>,
    search_terms: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlBrowser {
    headless: Option<bool>,
    width: Option<u32>,
    height: Option<u32>,
    slow_mo: Option<u64>,
    debug: Option<bool>,
}

impl Config {
    /// Expand `${VAR_NAME}` references through the given lookup.
    ///
    /// Unset variables expand to the empty string.
    fn expand_env_vars<F>(value: &str, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(c);
                    chars.next();
                }

                if let Some(env_value) = lookup(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file, expanding `${VAR}` references and
    /// then applying environment overrides on top.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;
        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;

        Ok(cfg)
    }

    /// Parse configuration from a TOML string (no environment overrides),
    /// expanding `${VAR}` against the process environment
    pub fn from_toml_str(toml_content: &str) -> crate::Result<Self> {
        Self::from_toml_str_with(toml_content, |key| std::env::var(key).ok())
    }

    /// Parse configuration from a TOML string, expanding `${VAR}` through an
    /// injected lookup
    pub fn from_toml_str_with<F>(toml_content: &str, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded_content = Self::expand_env_vars(toml_content, lookup);

        let toml_config: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        Ok(Self::from_toml_config(toml_config))
    }

    /// Load configuration from the default locations.
    ///
    /// Looks for `./shopcheck.toml` first; when it does not exist the
    /// configuration comes from environment variables and defaults alone.
    pub fn load() -> crate::Result<Self> {
        if Path::new("shopcheck.toml").exists() {
            return Self::from_toml_file("shopcheck.toml");
        }

        Self::from_env()
    }

    fn from_toml_config(toml: TomlConfig) -> Self {
        let defaults = Config::default();

        let credentials = toml.credentials.unwrap_or_default();
        let timeouts = toml.timeouts.unwrap_or_default();
        let delays = toml.delays.unwrap_or_default();
        let data = toml.data.unwrap_or_default();
        let browser = toml.browser.unwrap_or_default();

        Config {
            base_url: toml.base_url.unwrap_or(defaults.base_url),
            credentials: Credentials {
                email: credentials.email.unwrap_or(defaults.credentials.email),
                password: credentials
                    .password
                    .unwrap_or(defaults.credentials.password),
                invalid_email: credentials
                    .invalid_email
                    .unwrap_or(defaults.credentials.invalid_email),
                invalid_password: credentials
                    .invalid_password
                    .unwrap_or(defaults.credentials.invalid_password),
            },
            timeouts: Timeouts {
                short: timeouts.short.unwrap_or(defaults.timeouts.short),
                medium: timeouts.medium.unwrap_or(defaults.timeouts.medium),
                long: timeouts.long.unwrap_or(defaults.timeouts.long),
                element: timeouts.element.unwrap_or(defaults.timeouts.element),
                navigation: timeouts
                    .navigation
                    .unwrap_or(defaults.timeouts.navigation),
            },
            delays: Delays {
                short: delays.short.unwrap_or(defaults.delays.short),
                medium: delays.medium.unwrap_or(defaults.delays.medium),
                long: delays.long.unwrap_or(defaults.delays.long),
            },
            data: DataConfig {
                products: data.products.unwrap_or(defaults.data.products),
                search_terms: data.search_terms.unwrap_or(defaults.data.search_terms),
            },
            browser: BrowserSettings {
                headless: browser.headless.unwrap_or(defaults.browser.headless),
                width: browser.width.unwrap_or(defaults.browser.width),
                height: browser.height.unwrap_or(defaults.browser.height),
                slow_mo: browser.slow_mo.unwrap_or(defaults.browser.slow_mo),
                debug: browser.debug.unwrap_or(defaults.browser.debug),
            },
        }
    }

    /// Apply environment overrides through an injected lookup.
    ///
    /// Tests pass a closure over a map instead of mutating the process
    /// environment.
    fn apply_env_overrides<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BASE_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }

        if let Some(email) = lookup("TEST_EMAIL") {
            if !email.is_empty() {
                self.credentials.email = email;
            }
        }
        if let Some(password) = lookup("TEST_PASSWORD") {
            if !password.is_empty() {
                self.credentials.password = password;
            }
        }
        if let Some(email) = lookup("INVALID_EMAIL") {
            if !email.is_empty() {
                self.credentials.invalid_email = email;
            }
        }
        if let Some(password) = lookup("INVALID_PASSWORD") {
            if !password.is_empty() {
                self.credentials.invalid_password = password;
            }
        }

        if let Some(headless) = lookup("HEADLESS") {
            self.browser.headless = parse_bool(&headless);
        }
        if let Some(debug) = lookup("DEBUG") {
            self.browser.debug = parse_bool(&debug);
        }
        if let Some(slow_mo) = lookup("SLOW_MO") {
            self.browser.slow_mo = slow_mo.parse().map_err(|_| {
                Error::Config(format!("SLOW_MO must be an integer (got '{}')", slow_mo))
            })?;
        }

        Ok(())
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> crate::Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration from an injected environment lookup
    pub fn from_env_with<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        cfg.apply_env_overrides(lookup)?;
        Ok(cfg)
    }
}

/// Boolean-like environment value: "false", "0" and "no" are false,
/// everything else is true.
fn parse_bool(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| map.get(key).map(|v| (*v).to_string())
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_with(|_| None).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.browser.headless);
        assert!(!config.browser.debug);
        assert_eq!(config.browser.slow_mo, 0);
        assert_eq!(config.timeouts.navigation, 30_000);
        assert!(!config.data.products.is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let mut env = HashMap::new();
        env.insert("BASE_URL", "https://staging.example.com");
        env.insert("TEST_EMAIL", "qa@example.com");
        env.insert("TEST_PASSWORD", "hunter2");
        env.insert("HEADLESS", "false");
        env.insert("DEBUG", "1");
        env.insert("SLOW_MO", "250");

        let config = Config::from_env_with(lookup_from(&env)).unwrap();
        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(config.credentials.email, "qa@example.com");
        assert_eq!(config.credentials.password, "hunter2");
        assert!(!config.browser.headless);
        assert!(config.browser.debug);
        assert_eq!(config.browser.slow_mo, 250);
    }

    #[test]
    fn test_empty_env_values_keep_defaults() {
        let mut env = HashMap::new();
        env.insert("BASE_URL", "");
        env.insert("TEST_EMAIL", "");

        let config = Config::from_env_with(lookup_from(&env)).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.credentials.email, "tester@example.com");
    }

    #[test]
    fn test_invalid_slow_mo_is_a_config_error() {
        let mut env = HashMap::new();
        env.insert("SLOW_MO", "fast");

        let err = Config::from_env_with(lookup_from(&env)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("anything"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("FALSE"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("no"));
    }

    #[test]
    fn test_timeout_tier_lookup() {
        let timeouts = Timeouts::default();
        assert_eq!(
            timeouts.by_tier("short"),
            Some(Duration::from_millis(2_000))
        );
        assert_eq!(
            timeouts.by_tier("NAVIGATION"),
            Some(Duration::from_millis(30_000))
        );
        assert_eq!(timeouts.by_tier("glacial"), None);
    }

    #[test]
    fn test_toml_layering() {
        let toml = r#"
            base_url = "https://shop.example.com"

            [credentials]
            email = "file@example.com"

            [timeouts]
            short = 1500

            [browser]
            headless = false
        "#;

        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.base_url, "https://shop.example.com");
        assert_eq!(config.credentials.email, "file@example.com");
        // Untouched fields fall back to defaults
        assert_eq!(config.credentials.password, "Sup3rSecret!");
        assert_eq!(config.timeouts.short, 1_500);
        assert_eq!(config.timeouts.medium, 5_000);
        assert!(!config.browser.headless);
    }

    #[test]
    fn test_toml_parse_error() {
        let err = Config::from_toml_str("base_url = [not toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_var_expansion() {
        let mut env = HashMap::new();
        env.insert("EXPANSION_URL", "https://expanded.example.com");

        let expanded = Config::expand_env_vars(
            "base_url = \"${EXPANSION_URL}\"",
            lookup_from(&env),
        );
        assert_eq!(expanded, "base_url = \"https://expanded.example.com\"");

        let missing = Config::expand_env_vars("value = \"${NOT_SET}\"", lookup_from(&env));
        assert_eq!(missing, "value = \"\"");
    }

    #[test]
    fn test_toml_expansion_through_injected_lookup() {
        let mut env = HashMap::new();
        env.insert("SHOP_URL", "https://injected.example.com");

        let config = Config::from_toml_str_with(
            "base_url = \"${SHOP_URL}\"",
            lookup_from(&env),
        )
        .unwrap();
        assert_eq!(config.base_url, "https://injected.example.com");
    }

    #[test]
    fn test_default_base_url_is_populated() {
        assert_eq!(Config::default().base_url, "http://localhost:3000");
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = Config::from_toml_file("/nonexistent/shopcheck.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
