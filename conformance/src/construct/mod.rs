//! Regular expressions by construction.
//!
//! A [`RegexTree`] is built node by node from draws, then rendered three
//! ways: as pattern text, as a string it must match and, where one can be
//! derived, as a string it must not match. Nodes live in an arena and refer
//! to their children by [`NodeId`]; a group reference points back at its
//! group the same way without owning it.

pub mod factory;
mod generate;
mod node;
mod render;
mod tree;

pub use factory::Factory;
pub use generate::GenerationState;
pub use node::{CharClass, CharSet, GroupId, Node, NodeId, Repeat, SetItem, MAX_REPEAT};
pub use tree::{RegexTree, TreeBuilder};
