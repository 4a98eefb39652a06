//! Logging initialization
//!
//! All components log through `tracing`. The subscriber is installed once by
//! the binary (or a test setup); `RUST_LOG` takes precedence over the debug
//! flag.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// Emit a section header, used to delimit phases of a spec in the log output.
pub fn section(title: &str) {
    tracing::info!(target: "section", "==== {} ====", title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
        section("smoke");
    }
}
