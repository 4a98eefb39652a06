//! Per-test data bundle
//!
//! Constructed fresh from [`Config`] for each test case. Read-only after
//! construction; nothing here persists across tests.

use std::time::Duration;

use rand::Rng;

use crate::config::{Config, Credentials, Timeouts};

/// Read-only bundle of credentials, catalog data and lookup helpers
#[derive(Debug, Clone)]
pub struct TestData {
    credentials: Credentials,
    products: Vec<String>,
    search_terms: Vec<String>,
    timeouts: Timeouts,
}

impl TestData {
    /// Build a fresh bundle from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            credentials: config.credentials.clone(),
            products: config.data.products.clone(),
            search_terms: config.data.search_terms.clone(),
            timeouts: config.timeouts.clone(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    /// Pick a random product from the configured catalog list
    pub fn random_product(&self) -> Option<&str> {
        if self.products.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..self.products.len());
        Some(&self.products[idx])
    }

    /// Generate a unique throwaway email address
    pub fn random_email(&self) -> String {
        let tag: u32 = rand::thread_rng().r#gen();
        format!("shopcheck+{:08x}@example.com", tag)
    }

    /// Look up a timeout by tier name ("short", "medium", "long", "element",
    /// "navigation")
    pub fn timeout(&self, tier: &str) -> Option<Duration> {
        self.timeouts.by_tier(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_product_is_from_the_list() {
        let data = TestData::from_config(&Config::from_env_with(|_| None).unwrap());
        for _ in 0..20 {
            let product = data.random_product().unwrap();
            assert!(data.products().iter().any(|p| p == product));
        }
    }

    #[test]
    fn test_random_product_empty_list() {
        let mut config = Config::from_env_with(|_| None).unwrap();
        config.data.products.clear();
        let data = TestData::from_config(&config);
        assert!(data.random_product().is_none());
    }

    #[test]
    fn test_random_email_shape() {
        let data = TestData::from_config(&Config::from_env_with(|_| None).unwrap());
        let email = data.random_email();
        assert!(email.starts_with("shopcheck+"));
        assert!(email.ends_with("@example.com"));
    }

    #[test]
    fn test_random_emails_differ() {
        let data = TestData::from_config(&Config::from_env_with(|_| None).unwrap());
        let a = data.random_email();
        let b = data.random_email();
        // 32 random bits; a collision here would be astonishing
        assert_ne!(a, b);
    }

    #[test]
    fn test_timeout_lookup() {
        let data = TestData::from_config(&Config::from_env_with(|_| None).unwrap());
        assert_eq!(data.timeout("element"), Some(Duration::from_millis(10_000)));
        assert_eq!(data.timeout("bogus"), None);
    }
}
