//! Regex engines under test.

use crate::error::EngineError;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Compiles pattern text into a [`Matcher`].
pub trait RegexEngine {
    fn name(&self) -> &'static str;

    fn supports_backreferences(&self) -> bool;

    fn compile(&self, pattern: &str) -> Result<Box<dyn Matcher>, EngineError>;
}

/// A compiled pattern.
pub trait Matcher {
    /// Does the pattern match a prefix of `text`?
    fn match_at_start(&self, text: &str) -> Result<bool, EngineError>;
}

/// Anchor a pattern at the start of the haystack, keeping alternations whole.
pub fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})")
}

/// Backtracking engine with backreference support.
#[derive(Debug, Clone, Copy, Default)]
pub struct FancyRegexEngine;

struct FancyMatcher(fancy_regex::Regex);

impl RegexEngine for FancyRegexEngine {
    fn name(&self) -> &'static str {
        "fancy-regex"
    }

    fn supports_backreferences(&self) -> bool {
        true
    }

    fn compile(&self, pattern: &str) -> Result<Box<dyn Matcher>, EngineError> {
        let regex = fancy_regex::Regex::new(&anchored(pattern)).map_err(|error| {
            EngineError::Compile {
                engine: self.name(),
                pattern: pattern.to_string(),
                message: error.to_string(),
            }
        })?;
        Ok(Box::new(FancyMatcher(regex)))
    }
}

impl Matcher for FancyMatcher {
    fn match_at_start(&self, text: &str) -> Result<bool, EngineError> {
        self.0.is_match(text).map_err(|error| EngineError::Match {
            engine: "fancy-regex",
            message: error.to_string(),
        })
    }
}

/// Finite-automata engine; rejects backreferences at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCrateEngine;

struct RegexCrateMatcher(regex::Regex);

impl RegexEngine for RegexCrateEngine {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn supports_backreferences(&self) -> bool {
        false
    }

    fn compile(&self, pattern: &str) -> Result<Box<dyn Matcher>, EngineError> {
        let regex = regex::Regex::new(&anchored(pattern)).map_err(|error| EngineError::Compile {
            engine: self.name(),
            pattern: pattern.to_string(),
            message: error.to_string(),
        })?;
        Ok(Box::new(RegexCrateMatcher(regex)))
    }
}

impl Matcher for RegexCrateMatcher {
    fn match_at_start(&self, text: &str) -> Result<bool, EngineError> {
        Ok(self.0.is_match(text))
    }
}

/// Engine selection by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Fancy,
    RegexCrate,
}

impl EngineKind {
    pub const ALL: [EngineKind; 2] = [EngineKind::Fancy, EngineKind::RegexCrate];

    pub fn build(self) -> Rc<dyn RegexEngine> {
        match self {
            EngineKind::Fancy => Rc::new(FancyRegexEngine),
            EngineKind::RegexCrate => Rc::new(RegexCrateEngine),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Fancy => "fancy",
            EngineKind::RegexCrate => "regex",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = EngineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EngineKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| EngineError::Unknown {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_anchored_at_start() {
        for kind in EngineKind::ALL {
            let matcher = kind.build().compile("ab|c").unwrap();
            assert!(matcher.match_at_start("abx").unwrap());
            assert!(matcher.match_at_start("c").unwrap());
            assert!(!matcher.match_at_start("xab").unwrap());
            assert!(!matcher.match_at_start("xc").unwrap());
        }
    }

    #[test]
    fn test_backreferences() {
        let matcher = FancyRegexEngine.compile("(?P<g1>x+)(?P=g1)").unwrap();
        assert!(matcher.match_at_start("xxxx").unwrap());
        assert!(!matcher.match_at_start("xy").unwrap());

        assert!(matches!(
            RegexCrateEngine.compile("(?P<g1>x)(?P=g1)"),
            Err(EngineError::Compile { engine: "regex", .. })
        ));
    }

    #[test]
    fn test_rendered_dialect_is_accepted() {
        let patterns = [
            r"\d\D.",
            r"\.\^\$\*\+\?\{\}\\\[\]\-\|\(\)\#\=\!",
            "[a-c!x][^%-z]",
            "a?b*?c+d{3}e{2,5}?f{4,}g{0,6}",
        ];
        for kind in EngineKind::ALL {
            let engine = kind.build();
            for pattern in patterns {
                assert!(
                    engine.compile(pattern).is_ok(),
                    "{} rejected {pattern}",
                    engine.name()
                );
            }
        }
    }

    #[test]
    fn test_engine_names() {
        assert_eq!("fancy".parse::<EngineKind>(), Ok(EngineKind::Fancy));
        assert_eq!("regex".parse::<EngineKind>(), Ok(EngineKind::RegexCrate));
        assert!("pcre".parse::<EngineKind>().is_err());
    }
}
