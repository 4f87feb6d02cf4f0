//! Core functionality for stdlib conformance suites.
//!
//! This crate provides the substrate the suites run on: a seeded, replayable
//! draw capability, character constraints, generators, the property runner
//! and choice-sequence shrinking.

pub mod chars;
pub mod data;
pub mod draw;
pub mod error;
pub mod gen;
pub mod property;
pub mod shrink;

// Re-export the main types
pub use chars::*;
pub use data::*;
pub use draw::*;
pub use error::*;
pub use gen::*;
pub use property::*;

/// Install a test-writer tracing subscriber.
///
/// Safe to call from every test; only the first call installs anything.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
