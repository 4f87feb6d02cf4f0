//! Property-based conformance suites for regular expression engines.
//!
//! Patterns are built by construction: each generated tree knows a string
//! it matches and, usually, a string it does not. The suites check an
//! engine's verdicts on both, and on the empty string, against the tree.
//!
//! ```no_run
//! use stdlib_conformance::*;
//!
//! let suite = find_suite("backref_sequence").unwrap();
//! let result = suite.run(EngineKind::Fancy.build(), &Config::default());
//! println!("{result}");
//! ```

pub mod construct;
pub mod engine;
pub mod error;
pub mod harness;
pub mod suite;

pub use stdlib_conformance_core::*;

pub use construct::*;
pub use engine::*;
pub use error::*;
pub use harness::*;
pub use suite::*;

/// Install a test-writer tracing subscriber.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
