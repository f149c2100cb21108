//! Fixture schema definitions and a compiled-catalog helper shared by the
//! workspace's integration tests.

pub mod fixtures;

use std::sync::Arc;

use mavcodec_schema::MessageCatalog;

pub use fixtures::FixtureProvider;

/// Load and compile the standard fixture set into a [`MessageCatalog`],
/// blocking the calling thread.
///
/// A thin synchronous wrapper around [`mavcodec_schema::load`] for test
/// code (property tests in particular) that isn't itself async.
///
/// # Panics
///
/// Panics if the fixture set fails to compile - a bug in the fixtures
/// themselves, not something callers need to handle.
#[must_use]
#[allow(clippy::expect_used, reason = "test-only helper; a failing fixture set is a harness bug, not a caller error")]
pub fn compiled_catalog() -> Arc<MessageCatalog> {
    let runtime = tokio::runtime::Builder::new_current_thread().build().expect("failed to start test runtime");
    let provider = Arc::new(FixtureProvider::new());
    let definitions: Vec<String> = mavcodec_schema::DEFAULT_DEFINITIONS.iter().map(|s| (*s).to_string()).collect();
    let catalog = runtime
        .block_on(mavcodec_schema::load(provider, &definitions))
        .expect("fixture schema set failed to compile");
    Arc::new(catalog)
}
