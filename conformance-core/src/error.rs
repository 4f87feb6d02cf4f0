//! Error and result types for conformance runs.

use std::fmt;
use thiserror::Error;

/// Main error type for conformance runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConformanceError {
    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A draw could not be satisfied outside of a property run.
    #[error("Draw failed: {0}")]
    Draw(#[from] DrawError),
}

/// Result type for conformance operations.
pub type Result<T> = std::result::Result<T, ConformanceError>;

/// Failure of a single draw.
///
/// Inside a property run these abort the current case, which is discarded
/// and redrawn rather than reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// Integer bounds were inverted.
    #[error("invalid integer bounds: {min} > {max}")]
    InvalidBounds { min: i64, max: i64 },

    /// `one_of` was handed an empty slice.
    #[error("cannot choose from an empty collection")]
    EmptyChoice,

    /// No character satisfies the constraints.
    #[error("no character satisfies {spec}")]
    Unsatisfiable { spec: String },

    /// The case drew more choices than its budget allows.
    #[error("case exceeded its budget of {limit} choices")]
    Overrun { limit: usize },

    /// A generator refused the value it drew.
    #[error("case rejected: {reason}")]
    Rejected { reason: String },
}

/// A shrinking step in the failure progression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkStep {
    /// The counterexample at this step.
    pub counterexample: String,
    /// The step number (0 = original, 1+ = accepted shrinks).
    pub step: usize,
    /// Optional variable name for the generated input (e.g. "tree").
    pub variable_name: Option<String>,
}

/// Outcome of a property run.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    /// Every case passed.
    Pass {
        tests_run: usize,
        property_name: Option<String>,
        module_path: Option<String>,
    },

    /// Every case passed, with classification statistics.
    PassWithStatistics {
        tests_run: usize,
        property_name: Option<String>,
        module_path: Option<String>,
        statistics: crate::property::TestStatistics,
    },

    /// A case failed.
    Fail {
        counterexample: String,
        tests_run: usize,
        shrinks_performed: usize,
        property_name: Option<String>,
        module_path: Option<String>,
        assertion_type: Option<String>,
        /// The shrinking progression leading to the minimal counterexample.
        shrink_steps: Vec<ShrinkStep>,
        /// Run seed, when the failure came from a generated case.
        seed: Option<u64>,
        /// Choice sequence that replays the minimal counterexample.
        choices: Vec<u64>,
    },

    /// Too many cases were discarded.
    Discard {
        limit: usize,
        tests_run: usize,
        property_name: Option<String>,
        module_path: Option<String>,
    },
}

impl TestResult {
    /// Did every case pass?
    pub fn is_pass(&self) -> bool {
        matches!(
            self,
            TestResult::Pass { .. } | TestResult::PassWithStatistics { .. }
        )
    }

    /// Did a case fail?
    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }

    /// Number of cases that ran before the result was decided.
    pub fn tests_run(&self) -> usize {
        match self {
            TestResult::Pass { tests_run, .. }
            | TestResult::PassWithStatistics { tests_run, .. }
            | TestResult::Fail { tests_run, .. }
            | TestResult::Discard { tests_run, .. } => *tests_run,
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass {
                tests_run,
                property_name,
                module_path,
            } => {
                write_module_header(f, module_path)?;
                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ✓ {} passed {} tests.", prop_name, tests_run)
            }
            TestResult::PassWithStatistics {
                tests_run,
                property_name,
                module_path,
                statistics,
            } => {
                write_module_header(f, module_path)?;
                let prop_name = property_name.as_deref().unwrap_or("property");
                writeln!(f, "  ✓ {} passed {} tests.", prop_name, tests_run)?;

                if !statistics.classifications.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "  Test data distribution:")?;
                    let mut classification_names: Vec<_> =
                        statistics.classifications.keys().collect();
                    classification_names.sort();
                    for name in classification_names {
                        let count = statistics.classifications[name];
                        let percentage = (count as f64 / statistics.total_tests as f64) * 100.0;
                        writeln!(f, "    {:>3.0}% {}", percentage, name)?;
                    }
                }

                if !statistics.collections.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "  Test data statistics:")?;
                    let mut collection_names: Vec<_> = statistics.collections.keys().collect();
                    collection_names.sort();
                    for name in collection_names {
                        let values: Vec<f64> = statistics.collections[name]
                            .iter()
                            .copied()
                            .filter(|v| v.is_finite())
                            .collect();
                        if values.is_empty() {
                            continue;
                        }

                        let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
                        let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                        let avg = values.iter().sum::<f64>() / values.len() as f64;
                        writeln!(
                            f,
                            "    {}: min={:.1}, max={:.1}, avg={:.1}",
                            name, min, max, avg
                        )?;
                    }
                }

                Ok(())
            }
            TestResult::Fail {
                counterexample,
                tests_run,
                shrinks_performed,
                property_name,
                module_path,
                assertion_type,
                shrink_steps,
                seed,
                choices,
            } => {
                write_module_header(f, module_path)?;
                let prop_name = property_name.as_deref().unwrap_or("property");
                writeln!(
                    f,
                    "  ✗ {} failed after {} tests and {} shrinks.",
                    prop_name, tests_run, shrinks_performed
                )?;

                if !shrink_steps.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "    Shrinking progression:")?;
                    for step in shrink_steps {
                        match (&step.variable_name, step.step) {
                            (Some(var_name), n) => writeln!(
                                f,
                                "      │ forAll {} = {} -- {}",
                                n, step.counterexample, var_name
                            )?,
                            (None, 0) => {
                                writeln!(f, "      │ Original: {}", step.counterexample)?
                            }
                            (None, n) => {
                                writeln!(f, "      │ Step {}: {}", n, step.counterexample)?
                            }
                        }
                    }
                    writeln!(f)?;
                }

                if let Some(assertion) = assertion_type {
                    writeln!(f, "    === {} ===", assertion)?;
                }

                if let Some(seed) = seed {
                    writeln!(f, "    Replay with seed {} ({} choices)", seed, choices.len())?;
                }

                write!(f, "    Minimal counterexample: {}", counterexample)
            }
            TestResult::Discard {
                limit,
                tests_run,
                property_name,
                module_path,
            } => {
                write_module_header(f, module_path)?;
                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(
                    f,
                    "  ⚐ {} gave up after {} discards ({} tests passed)",
                    prop_name, limit, tests_run
                )
            }
        }
    }
}

fn write_module_header(f: &mut fmt::Formatter<'_>, module_path: &Option<String>) -> fmt::Result {
    if let Some(module) = module_path {
        writeln!(f, "━━━ {} ━━━", module)?;
    }
    Ok(())
}
