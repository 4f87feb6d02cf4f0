//! Repetitions, sequences, groups and disjunctions.

use crate::{run_named, suite_config};
use stdlib_conformance::*;

/// Property: a repeated primitive matches any count within its bounds
pub fn test_simple_repetition() {
    run_named("simple_repetition", EngineKind::Fancy);
}

/// Property: concatenations of repetitions
pub fn test_sequence_repetition() {
    run_named("sequence_repetition", EngineKind::Fancy);
}

/// Property: a reference repeats exactly what its group matched
pub fn test_backref_sequence() {
    run_named("backref_sequence", EngineKind::Fancy);
}

/// Property: alternatives of primitives
pub fn test_simple_disjunction() {
    run_named("simple_disjunction", EngineKind::Fancy);
}

/// Property: alternatives of sequences that carry their own groups
pub fn test_disjunction_sequence_repetition() {
    let suite = find_suite("disjunction_sequence_repetition").unwrap();
    let config = suite_config();

    match suite.run(EngineKind::Fancy.build(), &config) {
        TestResult::PassWithStatistics { statistics, .. } => {
            let with_references = statistics
                .classifications
                .get("has backreference")
                .copied()
                .unwrap_or(0);
            assert_eq!(with_references, statistics.total_tests);
        }
        result => panic!("disjunction_sequence_repetition failed:\n{result}"),
    }
}
