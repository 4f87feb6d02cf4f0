//! Generator combinators over the draw capability.

use crate::{chars::CharSpec, data::Seed, draw::Draw, error::DrawError};

/// A generator for test data of type `T`.
///
/// Generators are explicit, first-class values composed with combinator
/// functions. Generating never consumes anything but choices from the
/// [`Draw`], so a generated value is reproducible from its choice sequence.
pub struct Gen<T> {
    generator: Box<dyn Fn(&mut Draw) -> Result<T, DrawError>>,
}

impl<T> Gen<T> {
    /// Create a new generator from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Draw) -> Result<T, DrawError> + 'static,
    {
        Gen {
            generator: Box::new(f),
        }
    }

    /// Generate a value from the given draw.
    pub fn generate(&self, draw: &mut Draw) -> Result<T, DrawError> {
        (self.generator)(draw)
    }

    /// Generate a single value from a seed, outside of any property.
    pub fn sample(&self, seed: u64) -> crate::error::Result<T> {
        let mut draw = Draw::from_seed(Seed::from_u64(seed));
        Ok(self.generate(&mut draw)?)
    }

    /// Create a generator that always produces the same value.
    pub fn constant(value: T) -> Self
    where
        T: Clone + 'static,
    {
        Gen::new(move |_draw| Ok(value.clone()))
    }
}

impl<T> Gen<T>
where
    T: 'static,
{
    /// Map a function over the generated values.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + 'static,
        U: 'static,
    {
        Gen::new(move |draw| self.generate(draw).map(&f))
    }

    /// Bind/flatmap for dependent generation.
    pub fn bind<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> Gen<U> + 'static,
        U: 'static,
    {
        Gen::new(move |draw| {
            let value = self.generate(draw)?;
            f(value).generate(draw)
        })
    }
}

/// Primitive generators.
impl Gen<bool> {
    /// Generate a random boolean.
    pub fn bool() -> Self {
        Gen::new(|draw| draw.boolean())
    }
}

impl Gen<i64> {
    /// Generate an integer in the given range.
    pub fn int_range(min: i64, max: i64) -> Self {
        Gen::new(move |draw| draw.integer(min, max))
    }
}

impl Gen<char> {
    /// Generate a character satisfying `spec`.
    pub fn char(spec: CharSpec) -> Self {
        Gen::new(move |draw| draw.character(&spec))
    }
}

impl<T> Gen<T>
where
    T: Clone + 'static,
{
    /// Generate one of the given elements.
    pub fn element_of(items: Vec<T>) -> Self {
        Gen::new(move |draw| draw.one_of(&items).cloned())
    }
}
