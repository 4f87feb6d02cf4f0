//! Character constraints for draws.

use std::fmt;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Largest Unicode scalar value.
pub const MAX_CODEPOINT: u32 = char::MAX as u32;

/// Last codepoint of the Basic Multilingual Plane.
pub const MAX_BMP_CODEPOINT: u32 = 0xFFFF;

const SURROGATES: (u32, u32) = (0xD800, 0xDFFF);

/// Membership test against a set of Unicode general categories.
#[derive(Debug, Clone, Copy)]
pub struct CategoryFilter {
    pub categories: &'static [GeneralCategory],
    /// `true` keeps members of `categories`, `false` keeps everything else.
    pub include: bool,
}

impl CategoryFilter {
    pub fn accepts(&self, c: char) -> bool {
        self.categories.contains(&get_general_category(c)) == self.include
    }
}

/// Constraints on a drawn character.
///
/// A character qualifies when it lies in `[min_codepoint, max_codepoint]`,
/// outside every excluded interval, is not on the deny list, is on the allow
/// list when one is given, and passes the category filter.
#[derive(Debug, Clone)]
pub struct CharSpec {
    min_codepoint: u32,
    max_codepoint: u32,
    allow: Vec<char>,
    deny: Vec<char>,
    excluded: Vec<(u32, u32)>,
    categories: Option<CategoryFilter>,
}

impl Default for CharSpec {
    fn default() -> Self {
        Self::any()
    }
}

impl CharSpec {
    /// Any Unicode scalar value.
    pub fn any() -> Self {
        CharSpec {
            min_codepoint: 0,
            max_codepoint: MAX_CODEPOINT,
            allow: Vec::new(),
            deny: Vec::new(),
            excluded: Vec::new(),
            categories: None,
        }
    }

    /// Restrict to an inclusive codepoint range.
    pub fn codepoints(mut self, min: u32, max: u32) -> Self {
        self.min_codepoint = min;
        self.max_codepoint = max.min(MAX_CODEPOINT);
        self
    }

    /// Raise the lower codepoint bound.
    pub fn min_codepoint(mut self, min: u32) -> Self {
        self.min_codepoint = min;
        self
    }

    /// Lower the upper codepoint bound.
    pub fn max_codepoint(mut self, max: u32) -> Self {
        self.max_codepoint = max.min(MAX_CODEPOINT);
        self
    }

    /// Only draw from these characters.
    pub fn only<I: IntoIterator<Item = char>>(mut self, chars: I) -> Self {
        self.allow.extend(chars);
        self
    }

    /// Never draw these characters.
    pub fn excluding<I: IntoIterator<Item = char>>(mut self, chars: I) -> Self {
        self.deny.extend(chars);
        self
    }

    /// Never draw a codepoint inside `[lo, hi]`.
    pub fn excluding_range(mut self, lo: u32, hi: u32) -> Self {
        if lo <= hi {
            self.excluded.push((lo, hi));
        }
        self
    }

    /// Only draw members of the given categories.
    pub fn in_categories(mut self, categories: &'static [GeneralCategory]) -> Self {
        self.categories = Some(CategoryFilter {
            categories,
            include: true,
        });
        self
    }

    /// Never draw members of the given categories.
    pub fn outside_categories(mut self, categories: &'static [GeneralCategory]) -> Self {
        self.categories = Some(CategoryFilter {
            categories,
            include: false,
        });
        self
    }

    pub fn range(&self) -> (u32, u32) {
        (self.min_codepoint, self.max_codepoint)
    }

    pub fn allow_list(&self) -> &[char] {
        &self.allow
    }

    /// Does `c` satisfy every constraint?
    pub fn accepts(&self, c: char) -> bool {
        let cp = c as u32;
        cp >= self.min_codepoint
            && cp <= self.max_codepoint
            && self.excluded_interval(cp).is_none()
            && !self.deny.contains(&c)
            && (self.allow.is_empty() || self.allow.contains(&c))
            && self.categories.map_or(true, |filter| filter.accepts(c))
    }

    /// Find the first accepted codepoint in `[from, to]`, skipping excluded
    /// intervals and surrogates wholesale.
    pub(crate) fn first_accepted(&self, from: u32, to: u32) -> Option<char> {
        let mut cp = from;
        while cp <= to {
            if let Some(end) = self.excluded_interval(cp) {
                cp = end.checked_add(1)?;
                continue;
            }
            if (SURROGATES.0..=SURROGATES.1).contains(&cp) {
                cp = SURROGATES.1 + 1;
                continue;
            }
            if let Some(c) = char::from_u32(cp) {
                if self.accepts(c) {
                    return Some(c);
                }
            }
            cp = cp.checked_add(1)?;
        }
        None
    }

    /// Upper end of the widest excluded interval containing `cp`.
    fn excluded_interval(&self, cp: u32) -> Option<u32> {
        self.excluded
            .iter()
            .filter(|(lo, hi)| (*lo..=*hi).contains(&cp))
            .map(|&(_, hi)| hi)
            .max()
    }
}

impl fmt::Display for CharSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "characters in U+{:04X}..=U+{:04X}",
            self.min_codepoint, self.max_codepoint
        )?;
        if !self.allow.is_empty() {
            write!(f, " from {:?}", self.allow.iter().collect::<String>())?;
        }
        if !self.deny.is_empty() {
            write!(f, " except {:?}", self.deny.iter().collect::<String>())?;
        }
        for (lo, hi) in &self.excluded {
            write!(f, " outside U+{:04X}..=U+{:04X}", lo, hi)?;
        }
        if let Some(filter) = &self.categories {
            let verb = if filter.include { "in" } else { "not in" };
            write!(f, " {} {:?}", verb, filter.categories)?;
        }
        Ok(())
    }
}
