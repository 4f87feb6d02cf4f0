//! Pattern text.
//!
//! Trees from the factories render to exactly the operators they were built
//! from. Hand-built trees that put a multi-atom node under a quantifier, or
//! an alternation inside a sequence, get a non-capturing group so the text
//! keeps the tree's meaning.

use super::node::{group_name, Node, NodeId, Repeat, SetItem};
use super::tree::RegexTree;

impl RegexTree {
    /// Render the pattern text. Pure: the same tree always renders the same.
    pub fn pattern(&self) -> String {
        let mut out = String::new();
        self.render(self.root(), &mut out);
        out
    }

    fn render(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Node::Literal(c) => out.push(*c),
            Node::Escape(c) => {
                out.push('\\');
                out.push(*c);
            }
            Node::Dot => out.push('.'),
            Node::Class(class) => {
                out.push('\\');
                out.push(class.tag);
            }
            Node::Set(set) => {
                out.push('[');
                render_items(set.items(), out);
                out.push(']');
            }
            Node::Complement(set) => {
                out.push_str("[^");
                render_items(set.items(), out);
                out.push(']');
            }
            Node::Repetition {
                child,
                repeat,
                lazy,
            } => {
                let atomic = !matches!(
                    self.node(*child),
                    Node::Repetition { .. } | Node::Sequence(_) | Node::Disjunction(_)
                );
                self.render_grouped(*child, atomic, out);
                match repeat {
                    Repeat::Optional => out.push('?'),
                    Repeat::Star => out.push('*'),
                    Repeat::Plus => out.push('+'),
                    Repeat::Exactly(n) => out.push_str(&format!("{{{n}}}")),
                    Repeat::Between(lo, hi) => out.push_str(&format!("{{{lo},{hi}}}")),
                    Repeat::AtLeast(n) => out.push_str(&format!("{{{n},}}")),
                    Repeat::AtMost(n) => out.push_str(&format!("{{0,{n}}}")),
                }
                if *lazy {
                    out.push('?');
                }
            }
            Node::Sequence(children) => {
                for &child in children {
                    let atomic = !matches!(self.node(child), Node::Disjunction(_));
                    self.render_grouped(child, atomic, out);
                }
            }
            Node::Disjunction(children) => {
                for (index, &child) in children.iter().enumerate() {
                    if index > 0 {
                        out.push('|');
                    }
                    self.render(child, out);
                }
            }
            Node::NamedGroup { child } => {
                out.push_str(&format!("(?P<{}>", group_name(id)));
                self.render(*child, out);
                out.push(')');
            }
            Node::GroupReference { group } => {
                out.push_str(&format!("(?P={})", group_name(*group)));
            }
        }
    }

    fn render_grouped(&self, id: NodeId, atomic: bool, out: &mut String) {
        if atomic {
            self.render(id, out);
        } else {
            out.push_str("(?:");
            self.render(id, out);
            out.push(')');
        }
    }
}

fn render_items(items: &[SetItem], out: &mut String) {
    for item in items {
        match item {
            SetItem::Char(c) => out.push(*c),
            SetItem::Range(start, stop) => {
                out.push(*start);
                out.push('-');
                out.push(*stop);
            }
        }
    }
}
