//! Runner guarantees, exercised through an engine with a planted bug.

use std::rc::Rc;
use std::result::Result;
use std::time::Duration;
use stdlib_conformance::shrink::shortlex;
use stdlib_conformance::*;

/// Rejects every input that is not pure ASCII.
struct AsciiOnlyEngine;

struct AsciiOnlyMatcher(Box<dyn Matcher>);

impl RegexEngine for AsciiOnlyEngine {
    fn name(&self) -> &'static str {
        "ascii-only"
    }

    fn supports_backreferences(&self) -> bool {
        true
    }

    fn compile(&self, pattern: &str) -> Result<Box<dyn Matcher>, EngineError> {
        Ok(Box::new(AsciiOnlyMatcher(FancyRegexEngine.compile(pattern)?)))
    }
}

impl Matcher for AsciiOnlyMatcher {
    fn match_at_start(&self, text: &str) -> Result<bool, EngineError> {
        if text.is_ascii() {
            self.0.match_at_start(text)
        } else {
            Ok(false)
        }
    }
}

fn broken_run(shrinks: usize) -> TestResult {
    let suite = find_suite("char").unwrap();
    let config = Config::default().with_seed(11).with_shrinks(shrinks);
    suite.run(Rc::new(AsciiOnlyEngine), &config)
}

fn failing_choices(result: &TestResult) -> Vec<u64> {
    match result {
        TestResult::Fail { choices, .. } => choices.clone(),
        other => panic!("Expected the planted bug to be found, got:\n{other}"),
    }
}

/// Property: a run is a function of its seed
pub fn test_same_seed_same_result() {
    assert_eq!(broken_run(100), broken_run(100));

    let suite = find_suite("disjunction_sequence_repetition").unwrap();
    assert_eq!(suite.sample(5), suite.sample(5));
}

/// Property: the reported choices replay to a failing case
pub fn test_shrunk_case_replays_and_fails() {
    let result = broken_run(500);
    let choices = failing_choices(&result);

    let suite = find_suite("char").unwrap();
    let replayed = replay_case(&suite.generator(), choices, |tree, draw| {
        match check_tree(tree, &AsciiOnlyEngine, draw, Duration::from_secs(1)) {
            Ok(_) => CaseResult::Pass,
            Err(error) => CaseResult::fail("replay", error.to_string()),
        }
    })
    .unwrap();

    match replayed {
        CaseResult::Fail { counterexample, .. } => {
            assert!(counterexample.starts_with("matching string rejected"));
        }
        other => panic!("Expected the replay to fail, got: {other:?}"),
    }
}

/// Property: shrinking only ever moves to shortlex-smaller choice sequences
pub fn test_shrinking_never_grows_choices() {
    let original = failing_choices(&broken_run(0));
    let shrunk = failing_choices(&broken_run(500));
    assert_ne!(shortlex(&shrunk, &original), std::cmp::Ordering::Greater);
}

/// Property: failure reports carry the shrink progression and replay seed
pub fn test_failure_report_names_the_tree() {
    let output = broken_run(500).to_string();
    assert!(output.contains("━━━ stdlib_conformance::suite ━━━"));
    assert!(output.contains("✗ char failed after"));
    assert!(output.contains("-- tree"));
    assert!(output.contains("=== matching string rejected ==="));
    assert!(output.contains("Replay with seed 11"));
}
