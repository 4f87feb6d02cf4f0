//! Named suites: one factory composition each, run against an engine.

use crate::construct::factory::{self, Factory};
use crate::construct::{CharSet, RegexTree, Repeat, SetItem, TreeBuilder};
use crate::engine::RegexEngine;
use crate::error::{BuildError, GenerateError, HarnessError};
use crate::harness::check_tree;
use std::rc::Rc;
use std::time::Duration;
use stdlib_conformance_core::{CaseResult, Config, Draw, Gen, Property, Seed, TestResult};
use tracing::{debug, warn};

/// A named composition of factories.
#[derive(Debug, Clone, Copy)]
pub struct Suite {
    pub name: &'static str,
    pub description: &'static str,
    /// Whether generated patterns can contain group references.
    pub uses_backreferences: bool,
    factory: fn() -> Factory,
    examples: fn() -> Result<Vec<RegexTree>, BuildError>,
}

pub const SUITES: &[Suite] = &[
    Suite {
        name: "char",
        description: "a single literal character",
        uses_backreferences: false,
        factory: factory::literal,
        examples: literal_examples,
    },
    Suite {
        name: "dots",
        description: "the any-character dot",
        uses_backreferences: false,
        factory: factory::dot,
        examples: no_examples,
    },
    Suite {
        name: "escape",
        description: "an escaped special character",
        uses_backreferences: false,
        factory: factory::escape,
        examples: no_examples,
    },
    Suite {
        name: "charclass",
        description: r"\d or \D",
        uses_backreferences: false,
        factory: factory::char_class,
        examples: no_examples,
    },
    Suite {
        name: "charset",
        description: "a bracketed set of characters and ranges",
        uses_backreferences: false,
        factory: factory::char_set,
        examples: char_set_examples,
    },
    Suite {
        name: "charset_complement",
        description: "a negated bracketed set",
        uses_backreferences: false,
        factory: factory::char_set_complement,
        examples: complement_examples,
    },
    Suite {
        name: "simple",
        description: "any single primitive",
        uses_backreferences: false,
        factory: factory::simple,
        examples: no_examples,
    },
    Suite {
        name: "simple_repetition",
        description: "a repeated primitive",
        uses_backreferences: false,
        factory: simple_repetition,
        examples: repetition_examples,
    },
    Suite {
        name: "sequence_repetition",
        description: "a sequence of repeated primitives",
        uses_backreferences: false,
        factory: sequence_repetition,
        examples: no_examples,
    },
    Suite {
        name: "backref_sequence",
        description: "a sequence of repeated primitives with a group and a reference to it",
        uses_backreferences: true,
        factory: backref_sequence,
        examples: backref_examples,
    },
    Suite {
        name: "simple_disjunction",
        description: "alternatives of primitives",
        uses_backreferences: false,
        factory: simple_disjunction,
        examples: no_examples,
    },
    Suite {
        name: "disjunction_sequence_repetition",
        description: "alternatives of backreferencing sequences",
        uses_backreferences: true,
        factory: disjunction_sequence_repetition,
        examples: no_examples,
    },
];

fn simple_repetition() -> Factory {
    factory::repetition(factory::simple())
}

fn sequence_repetition() -> Factory {
    factory::sequence(simple_repetition())
}

fn backref_sequence() -> Factory {
    factory::sequence_with_backref(simple_repetition())
}

fn simple_disjunction() -> Factory {
    factory::disjunction(factory::simple())
}

fn disjunction_sequence_repetition() -> Factory {
    factory::disjunction(backref_sequence())
}

fn no_examples() -> Result<Vec<RegexTree>, BuildError> {
    Ok(Vec::new())
}

fn literal_examples() -> Result<Vec<RegexTree>, BuildError> {
    let mut builder = TreeBuilder::new();
    let a = builder.literal('a');
    Ok(vec![builder.finish(a)])
}

fn repetition_examples() -> Result<Vec<RegexTree>, BuildError> {
    [Repeat::Star, Repeat::Plus]
        .into_iter()
        .map(|repeat| {
            let mut builder = TreeBuilder::new();
            let a = builder.literal('a');
            let root = builder.repeat(a, repeat, false)?;
            Ok(builder.finish(root))
        })
        .collect()
}

fn backref_examples() -> Result<Vec<RegexTree>, BuildError> {
    let mut builder = TreeBuilder::new();
    let x = builder.literal('x');
    let group = builder.named_group(x)?;
    let reference = builder.group_reference(group)?;
    let root = builder.sequence(vec![group.node(), reference])?;
    Ok(vec![builder.finish(root)])
}

fn a_to_c() -> Result<CharSet, BuildError> {
    CharSet::new(vec![SetItem::range('a', 'c')?])
}

fn char_set_examples() -> Result<Vec<RegexTree>, BuildError> {
    let mut builder = TreeBuilder::new();
    let root = builder.char_set(a_to_c()?);
    Ok(vec![builder.finish(root)])
}

fn complement_examples() -> Result<Vec<RegexTree>, BuildError> {
    let mut builder = TreeBuilder::new();
    let root = builder.complement(a_to_c()?);
    Ok(vec![builder.finish(root)])
}

/// Every suite, in a stable order.
pub fn suites() -> &'static [Suite] {
    SUITES
}

pub fn find_suite(name: &str) -> Option<&'static Suite> {
    SUITES.iter().find(|suite| suite.name == name)
}

/// One generated case, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub pattern: String,
    pub can_be_empty: bool,
    pub matching: String,
    pub non_matching: Option<String>,
}

impl Suite {
    pub fn factory(&self) -> Factory {
        (self.factory)()
    }

    pub fn generator(&self) -> Gen<RegexTree> {
        factory::tree(self.factory())
    }

    /// Hand-written trees checked before any generated one.
    pub fn examples(&self) -> Vec<RegexTree> {
        (self.examples)().unwrap_or_else(|error| {
            warn!(suite = self.name, %error, "dropping examples");
            Vec::new()
        })
    }

    pub fn supported_by(&self, engine: &dyn RegexEngine) -> bool {
        !self.uses_backreferences || engine.supports_backreferences()
    }

    /// The suite as a property over generated trees.
    pub fn property(&self, engine: Rc<dyn RegexEngine>, ceiling: Duration) -> Property<RegexTree> {
        Property::new(self.generator(), move |tree: &RegexTree, draw: &mut Draw| {
            match check_tree(tree, engine.as_ref(), draw, ceiling) {
                Ok(_) => CaseResult::Pass,
                Err(HarnessError::Failure(failure)) => {
                    CaseResult::fail(failure.check.describe(), failure.to_string())
                }
                Err(HarnessError::Generate(error @ GenerateError::UnboundGroup(_))) => {
                    CaseResult::fail("unbound group reference", format!("{tree}: {error}"))
                }
                Err(HarnessError::Generate(error)) => CaseResult::discard(error),
            }
        })
        .named("tree")
        .classify("can be empty", RegexTree::can_be_empty)
        .classify("has backreference", RegexTree::has_backreference)
        .collect("nodes", |tree| tree.reachable().len() as f64)
        .with_examples(self.examples())
    }

    /// Run the suite. Engines without backreference support fail suites
    /// that use them; check [`Suite::supported_by`] first.
    pub fn run(&self, engine: Rc<dyn RegexEngine>, config: &Config) -> TestResult {
        let engine_name = engine.name();
        let result = self
            .property(engine, config.match_ceiling)
            .run_with_context(config, Some(self.name), Some(module_path!()));
        debug!(
            suite = self.name,
            engine = engine_name,
            passed = result.is_pass(),
            tests_run = result.tests_run(),
            "suite finished"
        );
        result
    }

    /// Generate one case from `seed` without checking it.
    pub fn sample(&self, seed: u64) -> Result<Sample, GenerateError> {
        let mut draw = Draw::from_seed(Seed::from_u64(seed));
        let tree = self.generator().generate(&mut draw)?;
        let matching = tree.matching_string(&mut draw)?;
        let non_matching = match tree.non_matching_string(&mut draw) {
            Ok(text) => Some(text),
            Err(GenerateError::CannotGenerateNonMatching) => None,
            Err(error) => return Err(error),
        };
        Ok(Sample {
            pattern: tree.pattern(),
            can_be_empty: tree.can_be_empty(),
            matching,
            non_matching,
        })
    }
}
