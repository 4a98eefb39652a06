//! Error types for sc-core

use thiserror::Error;

/// Main error type for the shopcheck harness
#[derive(Error, Debug)]
pub enum Error {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("Fill failed: {0}")]
    Fill(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fixture setup failed: {0}")]
    Setup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the shopcheck harness
pub type Result<T> = std::result::Result<T, Error>;
