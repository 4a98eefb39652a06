//! sc-runner: shopcheck smoke runner
//!
//! Drives the page objects against a live deployment, outside the test
//! suite. Useful for checking a target environment before pointing the full
//! suite at it.
//!
//! Usage:
//!   sc-runner smoke              - Log in with the configured credentials
//!   sc-runner screenshot <path>  - Capture the home page to <path>
//!   sc-runner --help             - Show help

use std::path::PathBuf;
use std::sync::Arc;

use sc_core::{logging, Config};
use sc_fixtures::AuthenticatedSession;
use sc_pages::{BasePage, BrowserConfig, ChromeDriver, ChromeSession};

/// Run mode
enum RunMode {
    /// Login smoke check against the configured deployment
    Smoke,
    /// Capture a home-page screenshot to the given path
    Screenshot(PathBuf),
    /// Show help
    Help,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let mode = parse_args()?;

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("sc-runner {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Load .env file before reading configuration
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    logging::init(config.browser.debug);

    tracing::info!("Starting sc-runner against {}", config.base_url);

    let session = ChromeSession::with_config(BrowserConfig::from(&config))
        .map_err(|e| anyhow::anyhow!("Browser launch failed: {}", e))?;
    let driver = Arc::new(ChromeDriver::new(&session)?);

    match mode {
        RunMode::Smoke => run_smoke(driver, &config),
        RunMode::Screenshot(path) => run_screenshot(driver, &config, &path),
        _ => Ok(()),
    }
}

fn run_smoke(driver: Arc<ChromeDriver>, config: &Config) -> anyhow::Result<()> {
    logging::section("login smoke");

    let session = AuthenticatedSession::establish(driver, config)
        .map_err(|e| anyhow::anyhow!("Smoke check failed: {}", e))?;

    let count = session.home.product_count();
    tracing::info!("Smoke check passed; {} products visible", count);
    println!("OK: authenticated against {} ({} products visible)", config.base_url, count);
    Ok(())
}

fn run_screenshot(
    driver: Arc<ChromeDriver>,
    config: &Config,
    path: &std::path::Path,
) -> anyhow::Result<()> {
    logging::section("screenshot");

    let page = BasePage::new(driver, config);
    page.goto(&config.base_url)?;
    page.take_screenshot(path)?;

    println!("Screenshot written to {}", path.display());
    Ok(())
}

/// Parse command line arguments
fn parse_args() -> anyhow::Result<RunMode> {
    let args: Vec<String> = std::env::args().collect();

    let mut positional = args.iter().skip(1);
    match positional.next().map(String::as_str) {
        Some("--help") | Some("-h") => Ok(RunMode::Help),
        Some("--version") | Some("-v") => Ok(RunMode::Version),
        Some("smoke") | None => Ok(RunMode::Smoke),
        Some("screenshot") => {
            let path = positional
                .next()
                .ok_or_else(|| anyhow::anyhow!("screenshot requires a target path"))?;
            Ok(RunMode::Screenshot(PathBuf::from(path)))
        }
        Some(other) => Err(anyhow::anyhow!("Unknown command '{}'; see --help", other)),
    }
}

/// Print help message
fn print_help() {
    println!("sc-runner - shopcheck smoke runner");
    println!();
    println!("Usage:");
    println!("  sc-runner smoke              Log in with the configured credentials");
    println!("  sc-runner screenshot <path>  Capture the home page to <path>");
    println!("  sc-runner --help             Show this help message");
    println!("  sc-runner --version          Show version");
    println!();
    println!("Environment Variables:");
    println!("  BASE_URL          Deployment under test (default: http://localhost:3000)");
    println!("  TEST_EMAIL        Login email");
    println!("  TEST_PASSWORD     Login password");
    println!("  HEADLESS          Run headless (default: true)");
    println!("  DEBUG             Verbose harness logging (default: false)");
    println!("  SLOW_MO           Pause after each action, in ms (default: 0)");
}
