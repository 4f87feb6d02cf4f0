//! The node arena: building trees and structural queries.

use super::node::{CharClass, CharSet, GroupId, Node, NodeId, Repeat};
use crate::error::BuildError;
use std::fmt;

/// Builds a tree bottom-up. Every method pushes one node and returns its id;
/// pushed nodes are never modified.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Ids are only meaningful in the builder that issued them.
    fn child(&self, id: NodeId) -> Result<NodeId, BuildError> {
        if id.0 < self.nodes.len() {
            Ok(id)
        } else {
            Err(BuildError::UnknownNode(id))
        }
    }

    fn children(&self, ids: Vec<NodeId>) -> Result<Vec<NodeId>, BuildError> {
        ids.into_iter().map(|id| self.child(id)).collect()
    }

    pub fn literal(&mut self, c: char) -> NodeId {
        self.push(Node::Literal(c))
    }

    pub fn escape(&mut self, c: char) -> NodeId {
        self.push(Node::Escape(c))
    }

    pub fn dot(&mut self) -> NodeId {
        self.push(Node::Dot)
    }

    pub fn char_class(&mut self, class: CharClass) -> NodeId {
        self.push(Node::Class(class))
    }

    pub fn char_set(&mut self, set: CharSet) -> NodeId {
        self.push(Node::Set(set))
    }

    pub fn complement(&mut self, set: CharSet) -> NodeId {
        self.push(Node::Complement(set))
    }

    pub fn repeat(&mut self, child: NodeId, repeat: Repeat, lazy: bool) -> Result<NodeId, BuildError> {
        let child = self.child(child)?;
        let repeat = repeat.validate()?;
        Ok(self.push(Node::Repetition {
            child,
            repeat,
            lazy,
        }))
    }

    pub fn sequence(&mut self, children: Vec<NodeId>) -> Result<NodeId, BuildError> {
        let children = self.children(children)?;
        Ok(self.push(Node::Sequence(children)))
    }

    pub fn disjunction(&mut self, children: Vec<NodeId>) -> Result<NodeId, BuildError> {
        if children.is_empty() {
            return Err(BuildError::EmptyDisjunction);
        }
        let children = self.children(children)?;
        Ok(self.push(Node::Disjunction(children)))
    }

    pub fn named_group(&mut self, child: NodeId) -> Result<GroupId, BuildError> {
        let child = self.child(child)?;
        Ok(GroupId(self.push(Node::NamedGroup { child })))
    }

    /// Reference a group. The reference must come after the group in
    /// generation order for the tree to produce strings.
    pub fn group_reference(&mut self, group: GroupId) -> Result<NodeId, BuildError> {
        let group = group.node();
        match self.nodes.get(group.0) {
            Some(Node::NamedGroup { .. }) => Ok(self.push(Node::GroupReference { group })),
            _ => Err(BuildError::UnknownNode(group)),
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// `root` must have been issued by this builder.
    pub fn finish(self, root: NodeId) -> RegexTree {
        debug_assert!(root.0 < self.nodes.len(), "root {root:?} is not in this builder");
        RegexTree {
            nodes: self.nodes,
            root,
        }
    }
}

/// A finished regex syntax tree.
#[derive(Clone, PartialEq, Eq)]
pub struct RegexTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl RegexTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Can the whole pattern match the empty string?
    pub fn can_be_empty(&self) -> bool {
        self.node_can_be_empty(self.root)
    }

    pub fn node_can_be_empty(&self, id: NodeId) -> bool {
        match self.node(id) {
            Node::Literal(_)
            | Node::Escape(_)
            | Node::Dot
            | Node::Class(_)
            | Node::Set(_)
            | Node::Complement(_) => false,
            Node::Repetition { child, repeat, .. } => {
                repeat.bounds().0 == 0 || self.node_can_be_empty(*child)
            }
            Node::Sequence(children) => children.iter().all(|&c| self.node_can_be_empty(c)),
            Node::Disjunction(children) => children.iter().any(|&c| self.node_can_be_empty(c)),
            Node::NamedGroup { child } => self.node_can_be_empty(*child),
            Node::GroupReference { group } => self.node_can_be_empty(*group),
        }
    }

    pub fn has_backreference(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node, Node::GroupReference { .. }))
    }

    /// Nodes reachable from the root, parents before children.
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            match self.node(id) {
                Node::Repetition { child, .. } | Node::NamedGroup { child } => stack.push(*child),
                Node::Sequence(children) | Node::Disjunction(children) => {
                    stack.extend(children.iter().rev())
                }
                _ => {}
            }
        }
        order
    }
}

impl fmt::Display for RegexTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.pattern())
    }
}

impl fmt::Debug for RegexTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.pattern())
    }
}
