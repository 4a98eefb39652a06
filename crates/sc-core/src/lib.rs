//! sc-core: shared foundation for the shopcheck harness
//!
//! Provides configuration, the harness error taxonomy, logging setup and the
//! per-test data bundle used by page objects and fixtures.

pub mod config;
pub mod error;
pub mod logging;
pub mod testdata;

pub use config::{BrowserSettings, Config, Credentials, DataConfig, Delays, Timeouts};
pub use error::{Error, Result};
pub use testdata::TestData;
