//! Serializable run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stdlib_conformance::{Suite, TestResult};

pub const REPORT_FORMAT: &str = "stdlib-conformance-report";
pub const REPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteStatus {
    Passed,
    Failed,
    Discarded,
    Skipped,
}

/// Outcome of one suite against one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub name: String,
    pub status: SuiteStatus,
    pub tests_run: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterexample: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SuiteReport {
    pub fn from_result(suite: &Suite, result: &TestResult) -> Self {
        let mut report = SuiteReport {
            name: suite.name.to_string(),
            status: SuiteStatus::Passed,
            tests_run: result.tests_run(),
            assertion: None,
            counterexample: None,
            seed: None,
        };
        match result {
            TestResult::Pass { .. } | TestResult::PassWithStatistics { .. } => {}
            TestResult::Fail {
                counterexample,
                assertion_type,
                seed,
                ..
            } => {
                report.status = SuiteStatus::Failed;
                report.assertion = assertion_type.clone();
                report.counterexample = Some(counterexample.clone());
                report.seed = *seed;
            }
            TestResult::Discard { .. } => report.status = SuiteStatus::Discarded,
        }
        report
    }

    /// A suite the engine could not run.
    pub fn skipped(suite: &Suite) -> Self {
        SuiteReport {
            name: suite.name.to_string(),
            status: SuiteStatus::Skipped,
            tests_run: 0,
            assertion: None,
            counterexample: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_suites: usize,
    pub passed: usize,
    pub failed: usize,
    pub discarded: usize,
    pub skipped: usize,
    pub total_tests_run: usize,
}

impl Summary {
    pub fn from_suites(suites: &[SuiteReport]) -> Self {
        let count = |status: SuiteStatus| suites.iter().filter(|s| s.status == status).count();
        Summary {
            total_suites: suites.len(),
            passed: count(SuiteStatus::Passed),
            failed: count(SuiteStatus::Failed),
            discarded: count(SuiteStatus::Discarded),
            skipped: count(SuiteStatus::Skipped),
            total_tests_run: suites.iter().map(|s| s.tests_run).sum(),
        }
    }

    /// No suite failed or gave up.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.discarded == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub format: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub engine: String,
    pub seed: u64,
    pub summary: Summary,
    pub suites: Vec<SuiteReport>,
}

impl Report {
    pub fn new(engine: &str, seed: u64, suites: Vec<SuiteReport>) -> Self {
        Report {
            format: REPORT_FORMAT.to_string(),
            version: REPORT_VERSION.to_string(),
            timestamp: Utc::now(),
            engine: engine.to_string(),
            seed,
            summary: Summary::from_suites(&suites),
            suites,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Regex Conformance Report\n\n");
        out.push_str(&format!("Engine: `{}`  \n", self.engine));
        out.push_str(&format!("Seed: `{}`  \n", self.seed));
        out.push_str(&format!("Generated: {}\n\n", self.timestamp.to_rfc3339()));

        out.push_str("## Summary\n");
        out.push_str(&format!("- **Total Suites**: {}\n", self.summary.total_suites));
        out.push_str(&format!("- **Passed**: {}\n", self.summary.passed));
        out.push_str(&format!("- **Failed**: {}\n", self.summary.failed));
        out.push_str(&format!("- **Discarded**: {}\n", self.summary.discarded));
        out.push_str(&format!("- **Skipped**: {}\n", self.summary.skipped));
        out.push_str(&format!(
            "- **Total Tests Run**: {}\n\n",
            self.summary.total_tests_run
        ));

        out.push_str("## Suites\n\n");
        out.push_str("| Suite | Status | Tests |\n");
        out.push_str("|-------|--------|-------|\n");
        for suite in &self.suites {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                suite.name,
                status_label(suite.status),
                suite.tests_run
            ));
        }

        let failures: Vec<_> = self
            .suites
            .iter()
            .filter(|suite| suite.counterexample.is_some())
            .collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for suite in failures {
                out.push_str(&format!("\n### {}\n\n", suite.name));
                if let Some(assertion) = &suite.assertion {
                    out.push_str(&format!("- **Check**: {}\n", assertion));
                }
                if let Some(seed) = suite.seed {
                    out.push_str(&format!("- **Seed**: {}\n", seed));
                }
                if let Some(counterexample) = &suite.counterexample {
                    out.push_str(&format!("\n```\n{}\n```\n", counterexample));
                }
            }
        }

        out.push_str("\n---\nGenerated by stdlib-conformance\n");
        out
    }
}

fn status_label(status: SuiteStatus) -> &'static str {
    match status {
        SuiteStatus::Passed => "passed",
        SuiteStatus::Failed => "FAILED",
        SuiteStatus::Discarded => "gave up",
        SuiteStatus::Skipped => "skipped",
    }
}
