//! Tree factories.
//!
//! A factory draws one subtree into a [`TreeBuilder`]. Compound factories
//! take the factory for their children and return a new one, so a suite is
//! a composition such as `disjunction(sequence_with_backref(repetition(simple())))`.

use super::node::{CharClass, CharSet, NodeId, Repeat, SetItem, MAX_REPEAT};
use super::tree::{RegexTree, TreeBuilder};
use std::rc::Rc;
use stdlib_conformance_core::{CharSpec, Draw, DrawError, Gen};

/// Draws one subtree and returns its root.
pub type Factory = Rc<dyn Fn(&mut TreeBuilder, &mut Draw) -> Result<NodeId, DrawError>>;

/// Characters with a meaning of their own in pattern text.
pub const SPECIAL_CHARACTERS: &[char] = &[
    '.', '^', '$', '*', '+', '?', '{', '}', '\\', '[', ']', '-', '|', '(', ')', '#', '=', '!',
];

/// Characters kept out of set elements. Besides `-`, `^`, `]` and `\`, the
/// engines read `[`, `&&` and `~~` as set operations inside a class.
pub const SET_EXCLUDED: &[char] = &['-', '^', ']', '\\', '[', '&', '~'];

/// Shortest and longest sequence or disjunction.
const MIN_CHILDREN: usize = 2;

fn factory<F>(f: F) -> Factory
where
    F: Fn(&mut TreeBuilder, &mut Draw) -> Result<NodeId, DrawError> + 'static,
{
    Rc::new(f)
}

/// Wrap a factory as a generator of whole trees.
pub fn tree(root_factory: Factory) -> Gen<RegexTree> {
    Gen::new(move |draw| {
        let mut builder = TreeBuilder::new();
        let root = root_factory(&mut builder, draw)?;
        Ok(builder.finish(root))
    })
}

/// A character outside [`SPECIAL_CHARACTERS`].
pub fn literal() -> Factory {
    factory(|builder, draw| {
        let spec = CharSpec::any().excluding(SPECIAL_CHARACTERS.iter().copied());
        Ok(builder.literal(draw.character(&spec)?))
    })
}

/// A backslash-escaped special character.
pub fn escape() -> Factory {
    factory(|builder, draw| Ok(builder.escape(*draw.one_of(SPECIAL_CHARACTERS)?)))
}

pub fn dot() -> Factory {
    factory(|builder, _draw| Ok(builder.dot()))
}

/// `\d` or `\D`.
pub fn char_class() -> Factory {
    factory(|builder, draw| Ok(builder.char_class(*draw.one_of(&CharClass::ALL)?)))
}

pub fn char_set() -> Factory {
    factory(|builder, draw| {
        let set = draw_char_set(draw)?;
        Ok(builder.char_set(set))
    })
}

pub fn char_set_complement() -> Factory {
    factory(|builder, draw| {
        let set = draw_char_set(draw)?;
        Ok(builder.complement(set))
    })
}

/// 2 to 20 elements, each a character or an increasing range.
fn draw_char_set(draw: &mut Draw) -> Result<CharSet, DrawError> {
    let element = CharSpec::any().excluding(SET_EXCLUDED.iter().copied());
    let len = draw.count(2, 20)?;
    let mut items = Vec::with_capacity(len);
    for _ in 0..len {
        if !draw.boolean()? {
            items.push(SetItem::Char(draw.character(&element)?));
        } else {
            let start = draw.character(&element)?;
            let above = element.clone().min_codepoint(start as u32 + 1);
            let stop = draw.character(&above)?;
            items.push(SetItem::range(start, stop)?);
        }
    }
    Ok(CharSet::new(items)?)
}

/// Any one primitive.
pub fn simple() -> Factory {
    let options = [
        dot(),
        literal(),
        escape(),
        char_set(),
        char_class(),
        char_set_complement(),
    ];
    factory(move |builder, draw| {
        let chosen = Rc::clone(draw.one_of(&options)?);
        chosen(builder, draw)
    })
}

/// `base` under one of the seven repetition operators, greedy or lazy.
pub fn repetition(base: Factory) -> Factory {
    factory(move |builder, draw| {
        let child = base(builder, draw)?;
        let repeat = match draw.integer(0, 6)? {
            0 => Repeat::Optional,
            1 => Repeat::Star,
            2 => Repeat::Plus,
            3 => Repeat::Exactly(draw_count(draw, 0)?),
            4 => {
                let lo = draw_count(draw, 0)?;
                Repeat::Between(lo, draw_count(draw, lo)?)
            }
            5 => Repeat::AtLeast(draw_count(draw, 0)?),
            _ => Repeat::AtMost(draw_count(draw, 0)?),
        };
        let lazy = draw.boolean()?;
        Ok(builder.repeat(child, repeat, lazy)?)
    })
}

fn draw_count(draw: &mut Draw, min: u32) -> Result<u32, DrawError> {
    Ok(draw.count(min as usize, MAX_REPEAT as usize)? as u32)
}

fn draw_children(
    base: &Factory,
    builder: &mut TreeBuilder,
    draw: &mut Draw,
) -> Result<Vec<NodeId>, DrawError> {
    let len = draw.count(MIN_CHILDREN, MAX_REPEAT as usize)?;
    (0..len).map(|_| base(builder, draw)).collect()
}

pub fn sequence(base: Factory) -> Factory {
    factory(move |builder, draw| {
        let children = draw_children(&base, builder, draw)?;
        Ok(builder.sequence(children)?)
    })
}

/// A sequence with one child wrapped in a named group, followed by a
/// reference to that group.
pub fn sequence_with_backref(base: Factory) -> Factory {
    factory(move |builder, draw| {
        let mut children = draw_children(&base, builder, draw)?;
        let index = draw.count(0, children.len() - 1)?;
        let group = builder.named_group(children[index])?;
        children[index] = group.node();
        children.push(builder.group_reference(group)?);
        Ok(builder.sequence(children)?)
    })
}

pub fn disjunction(base: Factory) -> Factory {
    factory(move |builder, draw| {
        let children = draw_children(&base, builder, draw)?;
        Ok(builder.disjunction(children)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::Node;
    use stdlib_conformance_core::Seed;

    fn sample(factory: Factory, seed: u64) -> RegexTree {
        tree(factory)
            .generate(&mut Draw::from_seed(Seed::from_u64(seed)))
            .unwrap()
    }

    #[test]
    fn test_literals_avoid_special_characters() {
        for seed in 0..200 {
            let tree = sample(literal(), seed);
            match tree.node(tree.root()) {
                Node::Literal(c) => assert!(!SPECIAL_CHARACTERS.contains(c)),
                other => panic!("Expected literal, got: {other:?}"),
            }
        }
    }

    #[test]
    fn test_escapes_are_special_characters() {
        for seed in 0..50 {
            let pattern = sample(escape(), seed).pattern();
            assert!(pattern.starts_with('\\'));
            let escaped = pattern.chars().nth(1).unwrap();
            assert!(SPECIAL_CHARACTERS.contains(&escaped));
        }
    }

    #[test]
    fn test_char_sets_are_well_formed() {
        for seed in 0..200 {
            let tree = sample(char_set(), seed);
            let Node::Set(set) = tree.node(tree.root()) else {
                panic!("Expected a set, got: {tree:?}");
            };
            assert!((2..=20).contains(&set.items().len()));
            for item in set.items() {
                let chars = match *item {
                    SetItem::Char(c) => vec![c],
                    SetItem::Range(start, stop) => {
                        assert!(start < stop);
                        vec![start, stop]
                    }
                };
                assert!(chars.iter().all(|c| !SET_EXCLUDED.contains(c)));
            }
        }
    }

    #[test]
    fn test_simple_draws_every_primitive() {
        let mut kinds: Vec<&str> = (0..300)
            .map(|seed| {
                let tree = sample(simple(), seed);
                tree.node(tree.root()).kind()
            })
            .collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(
            kinds,
            vec!["class", "complement", "dot", "escape", "literal", "set"]
        );
    }

    #[test]
    fn test_repetition_bounds_stay_under_cap() {
        for seed in 0..200 {
            let tree = sample(repetition(simple()), seed);
            let Node::Repetition { repeat, .. } = tree.node(tree.root()) else {
                panic!("Expected a repetition, got: {tree:?}");
            };
            let (lo, hi) = repeat.bounds();
            assert!(lo <= hi && hi <= MAX_REPEAT);
        }
    }

    #[test]
    fn test_sequences_have_two_to_seven_children() {
        for seed in 0..100 {
            let tree = sample(sequence(simple()), seed);
            let Node::Sequence(children) = tree.node(tree.root()) else {
                panic!("Expected a sequence, got: {tree:?}");
            };
            assert!((2..=7).contains(&children.len()));
        }
    }

    #[test]
    fn test_backref_sequence_ends_with_reference() {
        for seed in 0..100 {
            let tree = sample(sequence_with_backref(repetition(simple())), seed);
            let Node::Sequence(children) = tree.node(tree.root()) else {
                panic!("Expected a sequence, got: {tree:?}");
            };
            let Some(&last) = children.last() else {
                panic!("Empty sequence: {tree:?}");
            };
            let Node::GroupReference { group } = tree.node(last) else {
                panic!("Expected a trailing reference, got: {tree:?}");
            };
            assert!(children.contains(group));
            assert!(tree.has_backreference());
        }
    }

    #[test]
    fn test_group_names_are_unique_per_tree() {
        for seed in 0..50 {
            let tree = sample(
                disjunction(sequence_with_backref(repetition(simple()))),
                seed,
            );
            let pattern = tree.pattern();
            let mut names: Vec<&str> = pattern
                .match_indices("(?P<")
                .map(|(at, _)| {
                    let rest = &pattern[at + 4..];
                    &rest[..rest.find('>').unwrap()]
                })
                .collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total);
        }
    }

    #[test]
    fn test_same_seed_same_tree() {
        let factory = disjunction(sequence_with_backref(repetition(simple())));
        assert_eq!(sample(factory.clone(), 9), sample(factory, 9));
    }
}
