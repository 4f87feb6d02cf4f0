//! The automata engine against the same constructions.

use crate::{run_named, PINNED_SEED};
use stdlib_conformance::*;

/// Property: every suite without group references also holds on the regex crate
pub fn test_backreference_free_suites_on_regex_crate() {
    let engine = EngineKind::RegexCrate.build();
    let runnable: Vec<&Suite> = suites()
        .iter()
        .filter(|suite| suite.supported_by(engine.as_ref()))
        .collect();
    assert_eq!(runnable.len(), 10);

    for suite in runnable {
        run_named(suite.name, EngineKind::RegexCrate);
    }
}

/// Property: both engines give the same verdicts on sampled strings
pub fn test_engines_agree_on_samples() {
    let fancy = EngineKind::Fancy.build();
    let regex = EngineKind::RegexCrate.build();

    for suite in suites().iter().filter(|suite| !suite.uses_backreferences) {
        for seed in PINNED_SEED..PINNED_SEED + 25 {
            let Ok(sample) = suite.sample(seed) else {
                continue;
            };
            let left = fancy.compile(&sample.pattern).unwrap();
            let right = regex.compile(&sample.pattern).unwrap();

            let mut inputs = vec![String::new(), sample.matching.clone()];
            inputs.extend(sample.non_matching.clone());
            for input in &inputs {
                assert_eq!(
                    left.match_at_start(input).unwrap(),
                    right.match_at_start(input).unwrap(),
                    "engines disagree on /{}/ with {:?}",
                    sample.pattern,
                    input
                );
            }
        }
    }
}
