//! Deriving strings that do, or do not, match a tree.

use super::node::{CharClass, CharSet, Node, NodeId, SetItem};
use super::tree::RegexTree;
use crate::error::GenerateError;
use std::collections::HashMap;
use stdlib_conformance_core::{CharSpec, Draw, DrawError, MAX_BMP_CODEPOINT, MAX_CODEPOINT};

/// Strings produced by named groups during one generation pass.
#[derive(Debug, Default)]
pub struct GenerationState {
    groups: HashMap<NodeId, String>,
}

impl GenerationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, group: NodeId, text: String) {
        self.groups.insert(group, text);
    }

    pub fn recorded(&self, group: NodeId) -> Option<&str> {
        self.groups.get(&group).map(String::as_str)
    }
}

impl RegexTree {
    /// A string the pattern matches at its start.
    pub fn matching_string(&self, draw: &mut Draw) -> Result<String, GenerateError> {
        let mut state = GenerationState::new();
        self.node_matching_string(self.root(), draw, &mut state)
    }

    /// A string the pattern does not match at its start, where one can be
    /// derived.
    pub fn non_matching_string(&self, draw: &mut Draw) -> Result<String, GenerateError> {
        let mut state = GenerationState::new();
        self.node_non_matching_string(self.root(), draw, &mut state)
    }

    pub fn node_matching_string(
        &self,
        id: NodeId,
        draw: &mut Draw,
        state: &mut GenerationState,
    ) -> Result<String, GenerateError> {
        match self.node(id) {
            Node::Literal(c) | Node::Escape(c) => Ok(c.to_string()),
            Node::Dot => Ok(draw.character(&CharSpec::any().excluding(['\n']))?.to_string()),
            Node::Class(class) => class_member(class, class.polarity, draw),
            Node::Set(set) => set_member(set, draw),
            Node::Complement(set) => set_outsider(set, draw),
            Node::Repetition { child, repeat, .. } => {
                let (min, max) = repeat.bounds();
                let count = draw.integer(min.into(), max.into())?;
                let mut out = String::new();
                for _ in 0..count {
                    out.push_str(&self.node_matching_string(*child, draw, state)?);
                }
                Ok(out)
            }
            Node::Sequence(children) => {
                let mut out = String::new();
                for &child in children {
                    out.push_str(&self.node_matching_string(child, draw, state)?);
                }
                Ok(out)
            }
            Node::Disjunction(children) => {
                let &child = draw.one_of(children)?;
                self.node_matching_string(child, draw, state)
            }
            Node::NamedGroup { child } => {
                let text = self.node_matching_string(*child, draw, state)?;
                state.record(id, text.clone());
                Ok(text)
            }
            Node::GroupReference { group } => recorded(state, *group),
        }
    }

    pub fn node_non_matching_string(
        &self,
        id: NodeId,
        draw: &mut Draw,
        state: &mut GenerationState,
    ) -> Result<String, GenerateError> {
        match self.node(id) {
            Node::Literal(c) | Node::Escape(c) => {
                Ok(draw.character(&CharSpec::any().excluding([*c]))?.to_string())
            }
            Node::Dot => Ok("\n".to_string()),
            Node::Class(class) => class_member(class, !class.polarity, draw),
            Node::Set(set) => set_outsider(set, draw),
            Node::Complement(set) => set_member(set, draw),
            Node::Repetition { child, repeat, .. } => {
                if self.node_can_be_empty(id) || self.node_can_be_empty(*child) {
                    return Err(GenerateError::CannotGenerateNonMatching);
                }
                // Exactly `min` copies, one of them spoiled.
                let min = repeat.bounds().0 as usize;
                let mut parts = Vec::with_capacity(min);
                for _ in 0..min {
                    parts.push(self.node_matching_string(*child, draw, state)?);
                }
                let spoiled = draw.count(0, min - 1)?;
                parts[spoiled] = self.node_non_matching_string(*child, draw, state)?;
                Ok(parts.concat())
            }
            Node::Sequence(children) => {
                if self.node_can_be_empty(id) {
                    return Err(GenerateError::CannotGenerateNonMatching);
                }
                let mut out = String::new();
                for &child in children {
                    if !self.node_can_be_empty(child) {
                        out.push_str(&self.node_non_matching_string(child, draw, state)?);
                    }
                }
                Ok(out)
            }
            Node::Disjunction(_) => Err(GenerateError::CannotGenerateNonMatching),
            Node::NamedGroup { child } => {
                let text = self.node_non_matching_string(*child, draw, state)?;
                state.record(id, text.clone());
                Ok(text)
            }
            // Only reached inside a sequence whose group already failed to
            // match, so the recorded string is as good as any.
            Node::GroupReference { group } => recorded(state, *group),
        }
    }
}

fn recorded(state: &GenerationState, group: NodeId) -> Result<String, GenerateError> {
    state
        .recorded(group)
        .map(str::to_string)
        .ok_or(GenerateError::UnboundGroup(group))
}

/// Category draws stay in the BMP, where the category tables of the engines
/// and of the generator agree.
fn class_member(class: &CharClass, member: bool, draw: &mut Draw) -> Result<String, GenerateError> {
    let spec = CharSpec::any().max_codepoint(MAX_BMP_CODEPOINT);
    let spec = if member {
        spec.in_categories(class.categories)
    } else {
        spec.outside_categories(class.categories)
    };
    Ok(draw.character(&spec)?.to_string())
}

fn set_member(set: &CharSet, draw: &mut Draw) -> Result<String, GenerateError> {
    let c = match *draw.one_of(set.items())? {
        SetItem::Char(c) => c,
        SetItem::Range(start, stop) => {
            draw.character(&CharSpec::any().codepoints(start as u32, stop as u32))?
        }
    };
    Ok(c.to_string())
}

/// Any character outside the set: not listed, and outside the span of the
/// ranges when there are any.
fn set_outsider(set: &CharSet, draw: &mut Draw) -> Result<String, GenerateError> {
    let mut spec = CharSpec::any().excluding(set.chars());
    if let Some((lo, hi)) = set.range_hull() {
        if lo as u32 == 0 && hi as u32 == MAX_CODEPOINT {
            return Err(GenerateError::CannotGenerateNonMatching);
        }
        spec = spec.excluding_range(lo as u32, hi as u32);
    }
    match draw.character(&spec) {
        Ok(c) => Ok(c.to_string()),
        Err(DrawError::Unsatisfiable { .. }) => Err(GenerateError::CannotGenerateNonMatching),
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::{CharClass, Repeat, TreeBuilder};
    use stdlib_conformance_core::Seed;
    use unicode_general_category::{get_general_category, GeneralCategory};

    fn draws() -> impl Iterator<Item = Draw> {
        (0..100).map(|seed| Draw::from_seed(Seed::from_u64(seed)))
    }

    #[test]
    fn test_literal() {
        let mut builder = TreeBuilder::new();
        let root = builder.literal('a');
        let tree = builder.finish(root);

        for mut draw in draws() {
            assert_eq!(tree.matching_string(&mut draw).unwrap(), "a");
            let other = tree.non_matching_string(&mut draw).unwrap();
            assert_ne!(other, "a");
            assert_eq!(other.chars().count(), 1);
        }
    }

    #[test]
    fn test_star_counts_and_never_fails_to_match() {
        let mut builder = TreeBuilder::new();
        let a = builder.literal('a');
        let root = builder.repeat(a, Repeat::Star, false).unwrap();
        let tree = builder.finish(root);

        // The only choice is the repetition count.
        let mut draw = Draw::replay(vec![3]);
        assert_eq!(tree.matching_string(&mut draw).unwrap(), "aaa");
        assert_eq!(
            tree.non_matching_string(&mut Draw::replay(vec![])),
            Err(GenerateError::CannotGenerateNonMatching)
        );
    }

    #[test]
    fn test_plus_non_match_is_one_spoiled_character() {
        let mut builder = TreeBuilder::new();
        let a = builder.literal('a');
        let root = builder.repeat(a, Repeat::Plus, false).unwrap();
        let tree = builder.finish(root);

        for mut draw in draws() {
            let text = tree.non_matching_string(&mut draw).unwrap();
            assert_eq!(text.chars().count(), 1);
            assert_ne!(text, "a");
        }
    }

    #[test]
    fn test_fixed_count_non_match_spoils_one_position() {
        let mut builder = TreeBuilder::new();
        let a = builder.literal('a');
        let root = builder.repeat(a, Repeat::Exactly(3), false).unwrap();
        let tree = builder.finish(root);

        for mut draw in draws() {
            let text = tree.non_matching_string(&mut draw).unwrap();
            assert_eq!(text.chars().count(), 3);
            assert_eq!(text.chars().filter(|&c| c != 'a').count(), 1);
        }
    }

    #[test]
    fn test_backreference_repeats_group() {
        let mut builder = TreeBuilder::new();
        let x = builder.literal('x');
        let group = builder.named_group(x).unwrap();
        let reference = builder.group_reference(group).unwrap();
        let root = builder.sequence(vec![group.node(), reference]).unwrap();
        let tree = builder.finish(root);

        for mut draw in draws() {
            assert_eq!(tree.matching_string(&mut draw).unwrap(), "xx");
            let text = tree.non_matching_string(&mut draw).unwrap();
            let chars: Vec<char> = text.chars().collect();
            assert_eq!(chars.len(), 2);
            assert_eq!(chars[0], chars[1]);
            assert_ne!(chars[0], 'x');
        }
    }

    #[test]
    fn test_unbound_reference_is_an_error() {
        let mut builder = TreeBuilder::new();
        let x = builder.literal('x');
        let group = builder.named_group(x).unwrap();
        let reference = builder.group_reference(group).unwrap();
        let root = builder.sequence(vec![reference, group.node()]).unwrap();
        let tree = builder.finish(root);

        assert_eq!(
            tree.matching_string(&mut Draw::replay(vec![])),
            Err(GenerateError::UnboundGroup(group.node()))
        );
    }

    #[test]
    fn test_char_set_range() {
        let mut builder = TreeBuilder::new();
        let set = CharSet::new(vec![SetItem::range('a', 'c').unwrap()]).unwrap();
        let root = builder.char_set(set);
        let tree = builder.finish(root);

        for mut draw in draws() {
            let yes = tree.matching_string(&mut draw).unwrap();
            assert!(["a", "b", "c"].contains(&yes.as_str()));
            let no = tree.non_matching_string(&mut draw).unwrap();
            let c = no.chars().next().unwrap() as u32;
            assert!(!(0x61..=0x63).contains(&c));
        }
    }

    #[test]
    fn test_char_set_mixed_excludes_listed_characters() {
        let mut builder = TreeBuilder::new();
        let set = CharSet::new(vec![
            SetItem::Char('z'),
            SetItem::range('\u{0}', 'y').unwrap(),
            SetItem::Char('{'),
        ])
        .unwrap();
        let root = builder.char_set(set.clone());
        let tree = builder.finish(root);

        for mut draw in draws() {
            let no = tree.non_matching_string(&mut draw).unwrap();
            let c = no.chars().next().unwrap();
            assert!(!set.contains(c));
        }
    }

    #[test]
    fn test_full_coverage_set_cannot_be_avoided() {
        let mut builder = TreeBuilder::new();
        let set = CharSet::new(vec![SetItem::range('\u{0}', char::MAX).unwrap()]).unwrap();
        let root = builder.char_set(set.clone());
        let complement = builder.complement(set);
        let seq = builder.sequence(vec![root, complement]).unwrap();
        let tree = builder.finish(seq);

        let mut state = GenerationState::new();
        let mut draw = Draw::replay(vec![]);
        assert_eq!(
            tree.node_non_matching_string(root, &mut draw, &mut state),
            Err(GenerateError::CannotGenerateNonMatching)
        );
        assert_eq!(
            tree.node_matching_string(complement, &mut draw, &mut state),
            Err(GenerateError::CannotGenerateNonMatching)
        );
    }

    #[test]
    fn test_listed_char_below_range_leaves_no_outsider() {
        // The hull starts at U+0001, and U+0000 is listed on its own.
        let mut builder = TreeBuilder::new();
        let set = CharSet::new(vec![
            SetItem::Char('\u{0}'),
            SetItem::range('\u{1}', char::MAX).unwrap(),
        ])
        .unwrap();
        assert_eq!(set.range_hull(), Some(('\u{1}', char::MAX)));
        let root = builder.char_set(set);
        let tree = builder.finish(root);

        for mut draw in draws().take(10) {
            assert_eq!(
                tree.non_matching_string(&mut draw),
                Err(GenerateError::CannotGenerateNonMatching)
            );
        }
    }

    #[test]
    fn test_complement_swaps_roles() {
        let mut builder = TreeBuilder::new();
        let set = CharSet::new(vec![SetItem::Char('q'), SetItem::Char('r')]).unwrap();
        let root = builder.complement(set);
        let tree = builder.finish(root);

        for mut draw in draws() {
            let yes = tree.matching_string(&mut draw).unwrap();
            assert!(yes != "q" && yes != "r");
            let no = tree.non_matching_string(&mut draw).unwrap();
            assert!(no == "q" || no == "r");
        }
    }

    #[test]
    fn test_digit_classes() {
        let mut builder = TreeBuilder::new();
        let digit = builder.char_class(CharClass::DIGIT);
        let other = builder.char_class(CharClass::NOT_DIGIT);
        let root = builder.sequence(vec![digit, other]).unwrap();
        let tree = builder.finish(root);

        for mut draw in draws() {
            let yes: Vec<char> = tree.matching_string(&mut draw).unwrap().chars().collect();
            assert_eq!(get_general_category(yes[0]), GeneralCategory::DecimalNumber);
            assert_ne!(get_general_category(yes[1]), GeneralCategory::DecimalNumber);
            assert!(yes.iter().all(|&c| c as u32 <= MAX_BMP_CODEPOINT));
        }
    }

    #[test]
    fn test_dot() {
        let mut builder = TreeBuilder::new();
        let root = builder.dot();
        let tree = builder.finish(root);

        for mut draw in draws() {
            assert_ne!(tree.matching_string(&mut draw).unwrap(), "\n");
            assert_eq!(tree.non_matching_string(&mut draw).unwrap(), "\n");
        }
    }

    #[test]
    fn test_disjunction_never_has_a_non_match() {
        let mut builder = TreeBuilder::new();
        let a = builder.literal('a');
        let b = builder.literal('b');
        let root = builder.disjunction(vec![a, b]).unwrap();
        let tree = builder.finish(root);

        for mut draw in draws() {
            let yes = tree.matching_string(&mut draw).unwrap();
            assert!(yes == "a" || yes == "b");
            assert_eq!(
                tree.non_matching_string(&mut draw),
                Err(GenerateError::CannotGenerateNonMatching)
            );
        }
    }

    #[test]
    fn test_sequence_skips_nullable_children() {
        let mut builder = TreeBuilder::new();
        let a = builder.literal('a');
        let star = builder.repeat(a, Repeat::Star, false).unwrap();
        let b = builder.literal('b');
        let root = builder.sequence(vec![star, b]).unwrap();
        let tree = builder.finish(root);

        for mut draw in draws() {
            let no = tree.non_matching_string(&mut draw).unwrap();
            assert_eq!(no.chars().count(), 1);
            assert_ne!(no, "b");
        }
    }
}
