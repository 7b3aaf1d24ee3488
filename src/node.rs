//! The match-tree module that contains the [`MatchNode`] struct produced by evaluation.
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// The evaluation-node category that produced a [`MatchNode`].
///
/// This is tracked alongside the display name so that the flattening rules in
/// [`crate::eval`] can ask "was this an *anonymous* concatenation/repetition" without
/// resorting to comparing the name string against a hardcoded default (which would break
/// if a user happened to name a rule the same as an internal default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub(crate) enum NodeCategory {
    Literal,
    RangedLiteral,
    Concatenation,
    Alternation,
    Repetition,
}

/// An immutable node in a parse tree produced by evaluating a [`Node`](crate::eval::Node)
/// against a byte buffer.
///
/// A `MatchNode` borrows into the original input (`source`); no bytes are copied until
/// [`MatchNode::value`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatchNode<'s> {
    name: Arc<str>,
    is_default_name: bool,
    category: NodeCategory,
    start_offset: usize,
    end_offset: usize,
    // Omitted under `serde`: serializing it on every node would repeat the whole input.
    #[cfg_attr(feature = "serde", serde(skip))]
    source: &'s [u8],
    children: Vec<MatchNode<'s>>,
}

impl<'s> MatchNode<'s> {
    pub(crate) fn new(
        name: Arc<str>,
        is_default_name: bool,
        category: NodeCategory,
        start_offset: usize,
        end_offset: usize,
        source: &'s [u8],
        children: Vec<MatchNode<'s>>,
    ) -> Self {
        debug_assert!(start_offset <= end_offset);
        debug_assert!(end_offset <= source.len());
        Self {
            name,
            is_default_name,
            category,
            start_offset,
            end_offset,
            source,
            children,
        }
    }

    pub(crate) fn is_default_name(&self) -> bool {
        self.is_default_name
    }

    pub(crate) fn category(&self) -> NodeCategory {
        self.category
    }

    /// The name of the rule (or evaluation-node kind) that produced this match.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The byte offset, inclusive, at which this match starts.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// The byte offset, exclusive, at which this match ends.
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// The ordered child matches. Empty for literal and ranged-literal matches.
    pub fn children(&self) -> &[MatchNode<'s>] {
        &self.children
    }

    /// The matched byte range, borrowed from the original source buffer.
    pub fn value(&self) -> &'s [u8] {
        &self.source[self.start_offset..self.end_offset]
    }

    /// The number of bytes this match spans.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Whether this match spans zero bytes.
    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Returns the first direct child named `name`, if any.
    pub fn get_field(&self, name: &str) -> Option<&MatchNode<'s>> {
        self.children.iter().find(|child| &*child.name == name)
    }

    /// Returns every direct child named `name`, in order.
    pub fn get_field_all(&self, name: &str) -> Vec<&MatchNode<'s>> {
        self.children
            .iter()
            .filter(|child| &*child.name == name)
            .collect()
    }

    /// Searches the tree breadth-first for nodes named `name`.
    ///
    /// A subtree is not descended into once a node matching `name` is found along that
    /// path; siblings and other branches are still searched.
    pub fn search<'a>(&'a self, name: &str) -> Vec<&'a MatchNode<'s>> {
        let mut results = Vec::new();
        let mut queue: VecDeque<&MatchNode<'s>> = VecDeque::new();
        queue.push_back(self);
        while let Some(current) = queue.pop_front() {
            if &*current.name == name {
                results.push(current);
            } else {
                queue.extend(current.children.iter());
            }
        }
        results
    }
}

impl fmt::Display for MatchNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.value()))
    }
}
