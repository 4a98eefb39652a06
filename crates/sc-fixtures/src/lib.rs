//! sc-fixtures: test-lifecycle factories for the shopcheck harness
//!
//! Each fixture builds a resource graph scoped to one test case: a fresh
//! guarded page, an authenticated session, a page-object bundle or a test
//! data bundle. Setup failures are logged and re-raised; the enclosing test
//! fails and any retry policy lives in the runner.

pub mod auth;
pub mod bundle;
pub mod fresh;

pub use auth::AuthenticatedSession;
pub use bundle::{test_data, PageObjects};
pub use fresh::FreshPage;
