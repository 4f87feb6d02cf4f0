//! Errors raised while building trees, deriving strings and checking engines.

use crate::construct::NodeId;
use std::fmt;
use stdlib_conformance_core::DrawError;
use thiserror::Error;

/// A tree could not be assembled from the given parts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("character set needs at least one element")]
    EmptySet,

    #[error("character range {start:?}-{stop:?} is not increasing")]
    InvertedRange { start: char, stop: char },

    #[error("repetition bounds {{{min},{max}}} are inverted")]
    InvertedBounds { min: u32, max: u32 },

    #[error("disjunction needs at least one alternative")]
    EmptyDisjunction,

    #[error("node {0:?} does not belong to this tree")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Draw(#[from] DrawError),
}

/// Factories report build errors through the draw channel, so an invalid
/// construction rejects the case instead of failing it.
impl From<BuildError> for DrawError {
    fn from(error: BuildError) -> Self {
        match error {
            BuildError::Draw(inner) => inner,
            other => DrawError::Rejected {
                reason: other.to_string(),
            },
        }
    }
}

/// Deriving a matching or non-matching string failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// No string is known not to match; the non-match check is skipped.
    #[error("cannot generate a non-matching string")]
    CannotGenerateNonMatching,

    /// A group reference was reached before its group in the current pass.
    #[error("group {0:?} has not produced a string in this pass")]
    UnboundGroup(NodeId),

    #[error(transparent)]
    Draw(#[from] DrawError),
}

/// The engine under test refused a pattern or a match call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{engine} rejected /{pattern}/: {message}")]
    Compile {
        engine: &'static str,
        pattern: String,
        message: String,
    },

    #[error("{engine} failed while matching: {message}")]
    Match {
        engine: &'static str,
        message: String,
    },

    #[error("unknown engine {name:?} (expected one of: fancy, regex)")]
    Unknown { name: String },
}

/// Which assertion of the oracle harness failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// `can_be_empty` disagrees with matching the empty string.
    EmptinessMismatch,
    MatchRejected,
    NonMatchAccepted,
    /// A match call exceeded the latency ceiling.
    TooSlow,
    EngineError,
}

impl Check {
    pub fn describe(self) -> &'static str {
        match self {
            Check::EmptinessMismatch => "emptiness mismatch",
            Check::MatchRejected => "matching string rejected",
            Check::NonMatchAccepted => "non-matching string accepted",
            Check::TooSlow => "latency ceiling exceeded",
            Check::EngineError => "engine error",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A genuine conformance failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub check: Check,
    /// Pattern text as rendered, before anchoring.
    pub pattern: String,
    pub input: String,
    pub detail: Option<String>,
}

impl CheckFailure {
    pub fn new(check: Check, pattern: &str, input: &str) -> Self {
        CheckFailure {
            check,
            pattern: pattern.to_string(),
            input: input.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: /{}/ on {:?}", self.check, self.pattern, self.input)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Outcome of a harness run that did not pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    #[error(transparent)]
    Failure(#[from] CheckFailure),

    /// The case could not be completed; it is discarded, not failed.
    #[error("case abandoned: {0}")]
    Generate(#[from] GenerateError),
}
