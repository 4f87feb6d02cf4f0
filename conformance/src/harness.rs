//! The oracle harness: one tree, one engine, three checks.

use crate::construct::RegexTree;
use crate::engine::{Matcher, RegexEngine};
use crate::error::{Check, CheckFailure, GenerateError, HarnessError};
use std::time::{Duration, Instant};
use stdlib_conformance_core::Draw;
use tracing::trace;

/// What a passing check saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked {
    pub pattern: String,
    pub matching: String,
    /// `None` when no non-matching string could be derived.
    pub non_matching: Option<String>,
}

/// Check an engine against a tree.
///
/// The emptiness check is untimed. Both string checks must finish within
/// `ceiling`. Strings are drawn from `draw`, so the whole case replays from
/// its choices.
pub fn check_tree(
    tree: &RegexTree,
    engine: &dyn RegexEngine,
    draw: &mut Draw,
    ceiling: Duration,
) -> Result<Checked, HarnessError> {
    let pattern = tree.pattern();
    trace!(engine = engine.name(), %pattern, "checking pattern");

    let matcher = engine.compile(&pattern).map_err(|error| {
        CheckFailure::new(Check::EngineError, &pattern, "").with_detail(error.to_string())
    })?;

    let matches_empty = matcher
        .match_at_start("")
        .map_err(|error| engine_failure(&pattern, "", error))?;
    if matches_empty != tree.can_be_empty() {
        return Err(CheckFailure::new(Check::EmptinessMismatch, &pattern, "")
            .with_detail(format!(
                "tree says can_be_empty = {}, engine says {}",
                tree.can_be_empty(),
                matches_empty
            ))
            .into());
    }

    let matching = tree.matching_string(draw)?;
    check_input(matcher.as_ref(), &pattern, &matching, true, ceiling)?;

    let non_matching = match tree.non_matching_string(draw) {
        Ok(text) => {
            check_input(matcher.as_ref(), &pattern, &text, false, ceiling)?;
            Some(text)
        }
        Err(GenerateError::CannotGenerateNonMatching) => {
            trace!(%pattern, "no non-matching string");
            None
        }
        Err(other) => return Err(other.into()),
    };

    Ok(Checked {
        pattern,
        matching,
        non_matching,
    })
}

fn check_input(
    matcher: &dyn Matcher,
    pattern: &str,
    input: &str,
    expected: bool,
    ceiling: Duration,
) -> Result<(), CheckFailure> {
    let started = Instant::now();
    let matched = matcher
        .match_at_start(input)
        .map_err(|error| engine_failure(pattern, input, error))?;
    let elapsed = started.elapsed();

    if matched != expected {
        let check = if expected {
            Check::MatchRejected
        } else {
            Check::NonMatchAccepted
        };
        return Err(CheckFailure::new(check, pattern, input));
    }
    if elapsed > ceiling {
        return Err(CheckFailure::new(Check::TooSlow, pattern, input)
            .with_detail(format!("took {elapsed:?}, ceiling is {ceiling:?}")));
    }
    Ok(())
}

fn engine_failure(pattern: &str, input: &str, error: impl ToString) -> CheckFailure {
    CheckFailure::new(Check::EngineError, pattern, input).with_detail(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::{CharSet, Repeat, SetItem, TreeBuilder};
    use crate::engine::{EngineKind, FancyRegexEngine};
    use crate::error::EngineError;
    use stdlib_conformance_core::{Seed, DEFAULT_MATCH_CEILING};

    /// Answers from a fixed table instead of running a regex.
    struct ScriptedEngine {
        empty: bool,
        everything: bool,
    }

    impl RegexEngine for ScriptedEngine {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn supports_backreferences(&self) -> bool {
            true
        }

        fn compile(&self, _pattern: &str) -> Result<Box<dyn Matcher>, EngineError> {
            Ok(Box::new(ScriptedMatcher {
                empty: self.empty,
                everything: self.everything,
            }))
        }
    }

    struct ScriptedMatcher {
        empty: bool,
        everything: bool,
    }

    impl Matcher for ScriptedMatcher {
        fn match_at_start(&self, text: &str) -> Result<bool, EngineError> {
            Ok(if text.is_empty() { self.empty } else { self.everything })
        }
    }

    fn plus_a() -> RegexTree {
        let mut builder = TreeBuilder::new();
        let a = builder.literal('a');
        let root = builder.repeat(a, Repeat::Plus, false).unwrap();
        builder.finish(root)
    }

    #[test]
    fn test_passing_check_reports_strings() {
        let mut draw = Draw::from_seed(Seed::from_u64(1));
        let checked = check_tree(&plus_a(), &FancyRegexEngine, &mut draw, DEFAULT_MATCH_CEILING)
            .unwrap();

        assert_eq!(checked.pattern, "a+");
        assert!(!checked.matching.is_empty());
        assert!(checked.matching.chars().all(|c| c == 'a'));
        let non_matching = checked.non_matching.unwrap();
        assert_eq!(non_matching.chars().count(), 1);
        assert_ne!(non_matching, "a");
    }

    #[test]
    fn test_emptiness_mismatch_is_reported() {
        let engine = ScriptedEngine {
            empty: true,
            everything: true,
        };
        let mut draw = Draw::from_seed(Seed::from_u64(1));
        match check_tree(&plus_a(), &engine, &mut draw, DEFAULT_MATCH_CEILING) {
            Err(HarnessError::Failure(failure)) => {
                assert_eq!(failure.check, Check::EmptinessMismatch);
                assert_eq!(failure.pattern, "a+");
            }
            other => panic!("Expected emptiness mismatch, got: {other:?}"),
        }
    }

    #[test]
    fn test_accepting_everything_is_caught() {
        let engine = ScriptedEngine {
            empty: false,
            everything: true,
        };
        let mut draw = Draw::from_seed(Seed::from_u64(1));
        match check_tree(&plus_a(), &engine, &mut draw, DEFAULT_MATCH_CEILING) {
            Err(HarnessError::Failure(failure)) => {
                assert_eq!(failure.check, Check::NonMatchAccepted);
                assert_ne!(failure.input, "a");
            }
            other => panic!("Expected non-match acceptance, got: {other:?}"),
        }
    }

    #[test]
    fn test_rejecting_everything_is_caught() {
        let engine = ScriptedEngine {
            empty: false,
            everything: false,
        };
        let mut draw = Draw::from_seed(Seed::from_u64(1));
        match check_tree(&plus_a(), &engine, &mut draw, DEFAULT_MATCH_CEILING) {
            Err(HarnessError::Failure(failure)) => {
                assert_eq!(failure.check, Check::MatchRejected);
            }
            other => panic!("Expected match rejection, got: {other:?}"),
        }
    }

    #[test]
    fn test_zero_ceiling_is_too_slow() {
        let mut draw = Draw::from_seed(Seed::from_u64(1));
        match check_tree(&plus_a(), &FancyRegexEngine, &mut draw, Duration::ZERO) {
            Err(HarnessError::Failure(failure)) => assert_eq!(failure.check, Check::TooSlow),
            other => panic!("Expected ceiling failure, got: {other:?}"),
        }
    }

    #[test]
    fn test_compile_errors_are_engine_failures() {
        let mut builder = TreeBuilder::new();
        let x = builder.literal('x');
        let group = builder.named_group(x).unwrap();
        let reference = builder.group_reference(group).unwrap();
        let root = builder.sequence(vec![group.node(), reference]).unwrap();
        let tree = builder.finish(root);

        let engine = EngineKind::RegexCrate.build();
        let mut draw = Draw::from_seed(Seed::from_u64(1));
        match check_tree(&tree, engine.as_ref(), &mut draw, DEFAULT_MATCH_CEILING) {
            Err(HarnessError::Failure(failure)) => {
                assert_eq!(failure.check, Check::EngineError);
                assert!(failure.detail.is_some());
            }
            other => panic!("Expected engine failure, got: {other:?}"),
        }
    }

    #[test]
    fn test_underivable_non_match_is_skipped() {
        let mut builder = TreeBuilder::new();
        let set = CharSet::new(vec![SetItem::Char('a'), SetItem::Char('b')]).unwrap();
        let ab = builder.char_set(set);
        let root = builder.repeat(ab, Repeat::Star, false).unwrap();
        let tree = builder.finish(root);

        let mut draw = Draw::from_seed(Seed::from_u64(4));
        let checked = check_tree(&tree, &FancyRegexEngine, &mut draw, DEFAULT_MATCH_CEILING).unwrap();
        assert_eq!(checked.non_matching, None);
    }
}
