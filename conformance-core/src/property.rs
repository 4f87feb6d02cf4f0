//! Property definitions and the property runner.

use crate::{data::*, draw::Draw, error::*, gen::*, shrink};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Verdict of a property body on one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseResult {
    Pass,
    Fail {
        counterexample: String,
        assertion_type: Option<String>,
    },
    /// The case could not be completed and should be redrawn.
    Discard { reason: String },
}

impl CaseResult {
    pub fn fail(assertion_type: impl Into<String>, counterexample: impl Into<String>) -> Self {
        CaseResult::Fail {
            counterexample: counterexample.into(),
            assertion_type: Some(assertion_type.into()),
        }
    }

    pub fn discard(reason: impl ToString) -> Self {
        CaseResult::Discard {
            reason: reason.to_string(),
        }
    }
}

/// Statistics gathered during property testing.
#[derive(Debug, Clone, PartialEq)]
pub struct TestStatistics {
    pub classifications: HashMap<String, usize>,
    pub collections: HashMap<String, Vec<f64>>,
    pub total_tests: usize,
}

impl Default for TestStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl TestStatistics {
    pub fn new() -> Self {
        TestStatistics {
            classifications: HashMap::new(),
            collections: HashMap::new(),
            total_tests: 0,
        }
    }

    pub fn record_classification(&mut self, name: &str) {
        *self.classifications.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn record_collection(&mut self, name: &str, value: f64) {
        self.collections
            .entry(name.to_string())
            .or_default()
            .push(value);
    }
}

type ClassificationFn<T> = Box<dyn Fn(&T) -> bool>;
type CollectionFn<T> = Box<dyn Fn(&T) -> f64>;
type TestFn<T> = Box<dyn Fn(&T, &mut Draw) -> CaseResult>;

/// A failing case as seen by the shrinker.
#[derive(Debug, Clone)]
struct Failure {
    value: String,
    counterexample: String,
    assertion_type: Option<String>,
}

enum Case<T> {
    Pass(T),
    Fail(Failure),
    Discard(String),
}

/// A property checked against generated inputs.
///
/// The body receives the generated value and the same [`Draw`] it came
/// from, so it can keep drawing (e.g. example strings for a generated
/// pattern). Everything drawn is part of the case's choice sequence.
pub struct Property<T> {
    generator: Gen<T>,
    test_function: TestFn<T>,
    variable_name: Option<String>,
    classifications: Vec<(String, ClassificationFn<T>)>,
    collections: Vec<(String, CollectionFn<T>)>,
    examples: Vec<T>,
}

impl<T> Property<T>
where
    T: 'static + std::fmt::Debug + Clone,
{
    /// Create a new property from a generator and test body.
    pub fn new<F>(generator: Gen<T>, test_function: F) -> Self
    where
        F: Fn(&T, &mut Draw) -> CaseResult + 'static,
    {
        Property {
            generator,
            test_function: Box::new(test_function),
            variable_name: None,
            classifications: Vec::new(),
            collections: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Create a property that checks a boolean condition.
    pub fn for_all<F>(generator: Gen<T>, condition: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Property::new(generator, move |input, _draw| {
            if condition(input) {
                CaseResult::Pass
            } else {
                CaseResult::fail("Boolean Condition", format!("{input:?}"))
            }
        })
    }

    /// Create a property that checks a boolean condition with a named variable.
    pub fn for_all_named<F>(generator: Gen<T>, variable_name: &str, condition: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Property::for_all(generator, condition).named(variable_name)
    }

    /// Name the generated input in failure reports.
    pub fn named(mut self, variable_name: &str) -> Self {
        self.variable_name = Some(variable_name.to_string());
        self
    }

    /// Add a classification to categorize test inputs.
    pub fn classify<F>(mut self, name: &str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.classifications
            .push((name.to_string(), Box::new(predicate)));
        self
    }

    /// Add a collection to gather numerical statistics from test inputs.
    pub fn collect<F>(mut self, name: &str, extractor: F) -> Self
    where
        F: Fn(&T) -> f64 + 'static,
    {
        self.collections
            .push((name.to_string(), Box::new(extractor)));
        self
    }

    /// Check explicit examples before any generated case.
    ///
    /// Examples count towards the test limit. A failing example is reported
    /// as is; only generated cases are shrunk.
    pub fn with_examples(mut self, examples: Vec<T>) -> Self {
        self.examples = examples;
        self
    }

    /// Run this property with the given configuration.
    pub fn run(&self, config: &Config) -> TestResult {
        self.run_with_context(config, None, None)
    }

    /// Run this property with the given configuration and context information.
    pub fn run_with_context(
        &self,
        config: &Config,
        property_name: Option<&str>,
        module_path: Option<&str>,
    ) -> TestResult {
        let run_seed = config.seed.unwrap_or_else(Seed::random_value);
        let mut seed = Seed::from_u64(run_seed);
        let mut statistics = TestStatistics::new();
        let mut tests_run = 0;
        let mut discards = 0;

        let context = |result: TestResult| {
            with_context(
                result,
                property_name.map(str::to_string),
                module_path.map(str::to_string),
            )
        };

        let mut examples = self.examples.iter();
        while tests_run < config.test_limit {
            let (case_seed, next_seed) = seed.split();
            seed = next_seed;
            let mut draw = Draw::from_seed(case_seed).with_max_choices(config.max_choices);

            let (case, generated) = match examples.next() {
                Some(example) => (self.check_value(example.clone(), &mut draw), false),
                None => (self.run_case(&mut draw), true),
            };

            match case {
                Case::Pass(value) => {
                    self.collect_statistics(&value, &mut statistics);
                    tests_run += 1;
                }
                Case::Discard(reason) => {
                    discards += 1;
                    trace!(%reason, discards, "case discarded");
                    if discards >= config.discard_limit {
                        debug!(limit = config.discard_limit, tests_run, "too many discards");
                        return context(TestResult::Discard {
                            limit: config.discard_limit,
                            tests_run,
                            property_name: None,
                            module_path: None,
                        });
                    }
                }
                Case::Fail(failure) => {
                    tests_run += 1;
                    debug!(
                        tests_run,
                        seed = run_seed,
                        counterexample = %failure.counterexample,
                        "case failed"
                    );
                    return context(self.report_failure(
                        failure,
                        draw.into_choices(),
                        generated,
                        tests_run,
                        run_seed,
                        config,
                    ));
                }
            }
        }

        statistics.total_tests = tests_run;

        if !self.classifications.is_empty() || !self.collections.is_empty() {
            context(TestResult::PassWithStatistics {
                tests_run,
                property_name: None,
                module_path: None,
                statistics,
            })
        } else {
            context(TestResult::Pass {
                tests_run,
                property_name: None,
                module_path: None,
            })
        }
    }

    /// Generate a value and run the body on it.
    fn run_case(&self, draw: &mut Draw) -> Case<T> {
        match self.generator.generate(draw) {
            Ok(value) => self.check_value(value, draw),
            Err(error) => Case::Discard(error.to_string()),
        }
    }

    fn check_value(&self, value: T, draw: &mut Draw) -> Case<T> {
        match (self.test_function)(&value, draw) {
            CaseResult::Pass => Case::Pass(value),
            CaseResult::Discard { reason } => Case::Discard(reason),
            CaseResult::Fail {
                counterexample,
                assertion_type,
            } => Case::Fail(Failure {
                value: format!("{value:?}"),
                counterexample,
                assertion_type,
            }),
        }
    }

    /// Shrink a generated failure and build the report.
    fn report_failure(
        &self,
        failure: Failure,
        choices: Vec<u64>,
        generated: bool,
        tests_run: usize,
        run_seed: u64,
        config: &Config,
    ) -> TestResult {
        let mut shrink_steps = vec![ShrinkStep {
            counterexample: failure.value.clone(),
            step: 0,
            variable_name: self.variable_name.clone(),
        }];

        if !generated {
            return TestResult::Fail {
                counterexample: failure.counterexample,
                tests_run,
                shrinks_performed: 0,
                property_name: None,
                module_path: None,
                assertion_type: failure.assertion_type,
                shrink_steps,
                seed: None,
                choices,
            };
        }

        let shrunk = shrink::shrink(choices, failure, config.shrink_limit, |candidate| {
            let mut draw = Draw::replay(candidate.to_vec()).with_max_choices(config.max_choices);
            match self.run_case(&mut draw) {
                Case::Fail(found) => Some((draw.into_choices(), found)),
                Case::Pass(_) | Case::Discard(_) => None,
            }
        });
        debug!(
            replays = shrunk.replays,
            accepted = shrunk.accepted.len(),
            "shrinking finished"
        );

        shrink_steps.extend(
            shrunk
                .accepted
                .iter()
                .enumerate()
                .map(|(index, step)| ShrinkStep {
                    counterexample: step.value.clone(),
                    step: index + 1,
                    variable_name: self.variable_name.clone(),
                }),
        );

        TestResult::Fail {
            counterexample: shrunk.failure.counterexample,
            tests_run,
            shrinks_performed: shrunk.accepted.len(),
            property_name: None,
            module_path: None,
            assertion_type: shrunk.failure.assertion_type,
            shrink_steps,
            seed: Some(run_seed),
            choices: shrunk.choices,
        }
    }

    /// Collect statistics from a test input.
    fn collect_statistics(&self, value: &T, statistics: &mut TestStatistics) {
        for (name, predicate) in &self.classifications {
            if predicate(value) {
                statistics.record_classification(name);
            }
        }

        for (name, extractor) in &self.collections {
            statistics.record_collection(name, extractor(value));
        }
    }
}

fn with_context(
    result: TestResult,
    name: Option<String>,
    module: Option<String>,
) -> TestResult {
    match result {
        TestResult::Pass { tests_run, .. } => TestResult::Pass {
            tests_run,
            property_name: name,
            module_path: module,
        },
        TestResult::PassWithStatistics {
            tests_run,
            statistics,
            ..
        } => TestResult::PassWithStatistics {
            tests_run,
            property_name: name,
            module_path: module,
            statistics,
        },
        TestResult::Fail {
            counterexample,
            tests_run,
            shrinks_performed,
            assertion_type,
            shrink_steps,
            seed,
            choices,
            ..
        } => TestResult::Fail {
            counterexample,
            tests_run,
            shrinks_performed,
            property_name: name,
            module_path: module,
            assertion_type,
            shrink_steps,
            seed,
            choices,
        },
        TestResult::Discard {
            limit, tests_run, ..
        } => TestResult::Discard {
            limit,
            tests_run,
            property_name: name,
            module_path: module,
        },
    }
}

/// Create a property for a generator and test body.
pub fn property<T, F>(generator: Gen<T>, test_function: F) -> Property<T>
where
    T: 'static + std::fmt::Debug + Clone,
    F: Fn(&T, &mut Draw) -> CaseResult + 'static,
{
    Property::new(generator, test_function)
}

/// Create a property that checks a boolean condition.
pub fn for_all<T, F>(generator: Gen<T>, condition: F) -> Property<T>
where
    T: 'static + std::fmt::Debug + Clone,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all(generator, condition)
}

/// Create a property that checks a boolean condition with a named variable.
pub fn for_all_named<T, F>(generator: Gen<T>, variable_name: &str, condition: F) -> Property<T>
where
    T: 'static + std::fmt::Debug + Clone,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all_named(generator, variable_name, condition)
}

/// Replay a recorded choice sequence through a property's body.
///
/// Returns the body's verdict, or the draw error that stopped generation.
pub fn replay_case<T>(
    generator: &Gen<T>,
    choices: Vec<u64>,
    body: impl Fn(&T, &mut Draw) -> CaseResult,
) -> std::result::Result<CaseResult, DrawError> {
    let mut draw = Draw::replay(choices);
    let value = generator.generate(&mut draw)?;
    Ok(body(&value, &mut draw))
}
