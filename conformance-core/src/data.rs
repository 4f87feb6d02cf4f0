//! Seeds and run configuration.

use crate::error::{ConformanceError, Result};
use std::fmt;
use std::time::Duration;

/// Splittable random seed for deterministic case generation.
///
/// Seeds can be split to create independent random streams, so every case
/// of a run can be regenerated from the run seed alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64, pub u64);

impl Seed {
    /// Create a new seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Seed(state, gamma)
    }

    /// Split a seed into two independent seeds.
    pub fn split(self) -> (Self, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        let new_gamma = mix_gamma(output);

        (Seed(new_state, gamma), Seed(output, new_gamma))
    }

    /// Generate the next random value and advance the seed.
    pub fn next_u64(self) -> (u64, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        (output, Seed(new_state, gamma))
    }

    /// Generate a bounded random value in `[0, bound)`.
    pub fn next_bounded(self, bound: u64) -> (u64, Self) {
        let (value, new_seed) = self.next_u64();
        (((value as u128 * bound as u128) >> 64) as u64, new_seed)
    }

    /// Pick a fresh run seed value from the thread rng.
    pub fn random_value() -> u64 {
        use rand::Rng;
        rand::thread_rng().gen()
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({}, {})", self.0, self.1)
    }
}

/// Environment variable overriding [`Config::test_limit`].
pub const ENV_TESTS: &str = "CONFORMANCE_TESTS";
/// Environment variable overriding [`Config::shrink_limit`].
pub const ENV_SHRINKS: &str = "CONFORMANCE_SHRINKS";
/// Environment variable pinning [`Config::seed`].
pub const ENV_SEED: &str = "CONFORMANCE_SEED";
/// Environment variable overriding [`Config::match_ceiling`], in milliseconds.
pub const ENV_MATCH_CEILING_MS: &str = "CONFORMANCE_MATCH_CEILING_MS";

/// Wall-clock budget for a single matcher call.
///
/// Unoptimized builds of a matcher run roughly an order of magnitude slower.
pub const DEFAULT_MATCH_CEILING: Duration = if cfg!(debug_assertions) {
    Duration::from_millis(50)
} else {
    Duration::from_millis(10)
};

/// Configuration for a conformance run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of cases to generate per property.
    pub test_limit: usize,

    /// Maximum number of replays spent shrinking a failure.
    pub shrink_limit: usize,

    /// Maximum number of discarded cases before giving up.
    pub discard_limit: usize,

    /// Maximum number of choices a single case may draw.
    pub max_choices: usize,

    /// Run seed; a random one is picked when absent.
    pub seed: Option<u64>,

    /// Latency ceiling for each matcher call.
    pub match_ceiling: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            test_limit: 100,
            shrink_limit: 500,
            discard_limit: 100,
            max_choices: 8192,
            seed: None,
            match_ceiling: DEFAULT_MATCH_CEILING,
        }
    }
}

impl Config {
    /// Defaults overridden by the `CONFORMANCE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup, e.g. the process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_TESTS) {
            self.test_limit = parse_setting(ENV_TESTS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SHRINKS) {
            self.shrink_limit = parse_setting(ENV_SHRINKS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            self.seed = Some(parse_setting(ENV_SEED, &raw)?);
        }
        if let Some(raw) = lookup(ENV_MATCH_CEILING_MS) {
            let millis: u64 = parse_setting(ENV_MATCH_CEILING_MS, &raw)?;
            self.match_ceiling = Duration::from_millis(millis);
        }
        Ok(self)
    }

    /// Create a new config with the given number of tests.
    pub fn with_tests(mut self, tests: usize) -> Self {
        self.test_limit = tests;
        self
    }

    /// Create a new config with the given shrink limit.
    pub fn with_shrinks(mut self, shrinks: usize) -> Self {
        self.shrink_limit = shrinks;
        self
    }

    /// Create a new config with the given discard limit.
    pub fn with_discards(mut self, discards: usize) -> Self {
        self.discard_limit = discards;
        self
    }

    /// Pin the run seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Create a new config with the given matcher latency ceiling.
    pub fn with_match_ceiling(mut self, ceiling: Duration) -> Self {
        self.match_ceiling = ceiling;
        self
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ConformanceError::InvalidConfig {
            message: format!("{key} must be a non-negative integer, got {raw:?}"),
        })
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64 splitting.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Gamma must be odd for a full period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
