use colored::*;
use stdlib_conformance::{Sample, Suite};

pub mod report;

/// Header printed before a run.
pub fn format_header(engine: &str, seed: u64) -> String {
    format!(
        "{}\n{}\n  Engine: {}\n  Seed: {}\n",
        "Regex Conformance by Construction".bright_green().bold(),
        "=================================".bright_green(),
        engine.bright_cyan(),
        seed.to_string().bright_yellow()
    )
}

/// One line per suite for `list`.
pub fn format_suite_listing(suite: &Suite) -> String {
    let marker = if suite.uses_backreferences {
        " (backreferences)"
    } else {
        ""
    };
    format!(
        "  {}{}\n    {}\n",
        suite.name.bright_green(),
        marker.bright_yellow(),
        suite.description
    )
}

/// A suite the engine cannot run.
pub fn format_skipped(suite: &Suite, engine: &str) -> String {
    format!(
        "⚐ {} skipped: {} does not support backreferences",
        suite.name.bright_yellow(),
        engine
    )
}

/// Colour the status lines of a rendered test result.
pub fn highlight_result(rendered: &str) -> String {
    let mut highlighted = String::new();
    for line in rendered.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('✓') {
            highlighted.push_str(&format!("{}\n", line.bright_green()));
        } else if trimmed.starts_with('✗') || trimmed.starts_with("===") {
            highlighted.push_str(&format!("{}\n", line.bright_red()));
        } else if trimmed.starts_with('⚐') {
            highlighted.push_str(&format!("{}\n", line.bright_yellow()));
        } else if trimmed.starts_with("Minimal counterexample") {
            highlighted.push_str(&format!("{}\n", line.bright_cyan()));
        } else if trimmed.starts_with("Replay with seed") {
            highlighted.push_str(&format!("{}\n", line.bright_magenta()));
        } else {
            highlighted.push_str(&format!("{}\n", line));
        }
    }
    highlighted
}

/// A generated case for `sample`.
pub fn format_sample(seed: u64, sample: &Sample) -> String {
    let non_matching = match &sample.non_matching {
        Some(text) => format!("{text:?}"),
        None => "none derivable".dimmed().to_string(),
    };
    format!(
        "{} /{}/\n    seed: {}\n    can be empty: {}\n    matching: {:?}\n    non-matching: {}\n",
        "pattern".bright_cyan(),
        sample.pattern,
        seed,
        sample.can_be_empty,
        sample.matching,
        non_matching
    )
}

pub fn format_success() -> String {
    format!("{}\n", "All conformance suites passed!".bright_green().bold())
}

pub fn format_failure() -> String {
    format!("{}\n", "Some conformance suites failed!".bright_red().bold())
}

pub fn format_report_message() -> String {
    format!("{}\n", "Generating conformance report...".bright_blue().bold())
}
