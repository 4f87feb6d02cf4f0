//! The draw capability: a recorded, replayable stream of choices.
//!
//! Every value a case draws is derived from a bounded integer choice. The
//! choices are recorded, so a failing case can be replayed exactly and
//! shrunk by editing its choice sequence (see [`crate::shrink`]).

use crate::{chars::CharSpec, data::Seed, error::DrawError};

/// Width of the ASCII-weighted window tried first by character draws.
const NARROW_WINDOW: u32 = 0x80;

#[derive(Debug, Clone)]
enum Source {
    Random(Seed),
    /// Exhausted replays yield 0, the simplest choice.
    Replay(Vec<u64>),
}

/// Source of controllable randomness for one case.
#[derive(Debug, Clone)]
pub struct Draw {
    source: Source,
    choices: Vec<u64>,
    max_choices: usize,
}

impl Draw {
    /// Draw fresh choices from a seed.
    pub fn from_seed(seed: Seed) -> Self {
        Draw {
            source: Source::Random(seed),
            choices: Vec::new(),
            max_choices: usize::MAX,
        }
    }

    /// Replay a recorded choice sequence.
    pub fn replay(choices: Vec<u64>) -> Self {
        Draw {
            source: Source::Replay(choices),
            choices: Vec::new(),
            max_choices: usize::MAX,
        }
    }

    /// Cap the number of choices this case may make.
    pub fn with_max_choices(mut self, limit: usize) -> Self {
        self.max_choices = limit;
        self
    }

    /// Choices made so far.
    pub fn choices(&self) -> &[u64] {
        &self.choices
    }

    pub fn into_choices(self) -> Vec<u64> {
        self.choices
    }

    /// Make one choice in `[0, bound)`. `bound` must be non-zero.
    fn choose(&mut self, bound: u64) -> Result<u64, DrawError> {
        debug_assert!(bound > 0);
        if self.choices.len() >= self.max_choices {
            return Err(DrawError::Overrun {
                limit: self.max_choices,
            });
        }

        let value = match &mut self.source {
            Source::Random(seed) => {
                let (value, next) = seed.next_bounded(bound);
                *seed = next;
                value
            }
            Source::Replay(prefix) => prefix
                .get(self.choices.len())
                .map_or(0, |&recorded| recorded.min(bound - 1)),
        };

        self.choices.push(value);
        Ok(value)
    }

    /// Draw a boolean.
    pub fn boolean(&mut self) -> Result<bool, DrawError> {
        Ok(self.choose(2)? == 1)
    }

    /// Draw an integer in `[min, max]`; shrinks towards `min`.
    pub fn integer(&mut self, min: i64, max: i64) -> Result<i64, DrawError> {
        if min > max {
            return Err(DrawError::InvalidBounds { min, max });
        }
        let span = (max as i128 - min as i128) as u128 + 1;
        let bound = u64::try_from(span).unwrap_or(u64::MAX);
        let offset = self.choose(bound)?;
        Ok((min as i128 + offset as i128) as i64)
    }

    /// Draw a count in `[min, max]`; shrinks towards `min`.
    pub fn count(&mut self, min: usize, max: usize) -> Result<usize, DrawError> {
        if min > max {
            return Err(DrawError::InvalidBounds {
                min: min as i64,
                max: max as i64,
            });
        }
        let offset = self.choose((max - min) as u64 + 1)?;
        Ok(min + offset as usize)
    }

    /// Draw one element uniformly; shrinks towards the first.
    pub fn one_of<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, DrawError> {
        if items.is_empty() {
            return Err(DrawError::EmptyChoice);
        }
        let index = self.choose(items.len() as u64)?;
        Ok(&items[index as usize])
    }

    /// Draw a character satisfying `spec`.
    ///
    /// Half the time the draw starts inside a small window at the bottom of
    /// the allowed range, which keeps most characters ASCII. The scan from
    /// the drawn start wraps around the window, so a draw only fails when no
    /// character in the whole range qualifies.
    pub fn character(&mut self, spec: &CharSpec) -> Result<char, DrawError> {
        let unsatisfiable = || DrawError::Unsatisfiable {
            spec: spec.to_string(),
        };

        if !spec.allow_list().is_empty() {
            let candidates: Vec<char> = spec
                .allow_list()
                .iter()
                .copied()
                .filter(|&c| spec.accepts(c))
                .collect();
            return match self.one_of(&candidates) {
                Ok(&c) => Ok(c),
                Err(DrawError::EmptyChoice) => Err(unsatisfiable()),
                Err(other) => Err(other),
            };
        }

        let (lo, hi) = spec.range();
        if lo > hi {
            return Err(unsatisfiable());
        }

        if !self.boolean()? {
            let narrow_hi = hi.min(lo.saturating_add(NARROW_WINDOW - 1));
            if let Some(c) = self.scan_from_drawn_start(spec, lo, narrow_hi)? {
                return Ok(c);
            }
        }

        self.scan_from_drawn_start(spec, lo, hi)?
            .ok_or_else(unsatisfiable)
    }

    fn scan_from_drawn_start(
        &mut self,
        spec: &CharSpec,
        lo: u32,
        hi: u32,
    ) -> Result<Option<char>, DrawError> {
        let start = lo + self.choose((hi - lo) as u64 + 1)? as u32;
        Ok(spec.first_accepted(start, hi).or_else(|| {
            start
                .checked_sub(1)
                .filter(|&end| end >= lo)
                .and_then(|end| spec.first_accepted(lo, end))
        }))
    }
}
