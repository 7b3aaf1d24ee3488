//! The evaluation-node module. This is the rule-graph half of the engine: a small set of
//! operator node kinds, each able to lazily enumerate every legal match prefix of an input
//! buffer starting at a given offset.
use std::sync::{Arc, Mutex};

use crate::context::{BacktrackingLimit, EvalContext};
use crate::error::MatchError;
use crate::node::{MatchNode, NodeCategory};
use crate::utils::bytes_equal;

const LITERAL_DEFAULT: &str = "LiteralNode";
const RANGED_LITERAL_DEFAULT: &str = "RangedLiteralNode";
const CONCATENATION_DEFAULT: &str = "ConcatenationNode";
const ALTERNATION_DEFAULT: &str = "AlternationNode";
const REPETITION_DEFAULT: &str = "RepetitionNode";
const OPTION_DEFAULT: &str = "OptionNode";

#[derive(Debug)]
enum NodeKind {
    Literal {
        value: Box<[u8]>,
        case_sensitive: bool,
    },
    RangedLiteral {
        min: u8,
        max: u8,
    },
    Concatenation {
        left: Node,
        right: Node,
    },
    Alternation {
        alternatives: Mutex<Vec<Node>>,
    },
    Repetition {
        inner: Node,
        min: usize,
        max: Option<usize>,
    },
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    default_name: &'static str,
    name: Mutex<Arc<str>>,
}

/// A node in an evaluation-node graph: a handle shared (via reference counting) between
/// every ruleset and position that references it.
///
/// Cloning a [`Node`] clones the handle, not the subgraph it roots. This is what lets the
/// same `ALPHA` node be referenced from dozens of rules without duplication, and what lets
/// the rule graph contain cycles (a rule that refers to itself, directly or transitively).
#[derive(Clone, Debug)]
pub struct Node(Arc<NodeData>);

impl Node {
    fn new(kind: NodeKind, default_name: &'static str) -> Self {
        Node(Arc::new(NodeData {
            kind,
            default_name,
            name: Mutex::new(Arc::from(default_name)),
        }))
    }

    /// A single literal byte string, matched case-insensitively (ASCII only).
    pub fn literal(value: impl Into<Box<[u8]>>) -> Self {
        Self::new(
            NodeKind::Literal {
                value: value.into(),
                case_sensitive: false,
            },
            LITERAL_DEFAULT,
        )
    }

    /// A single literal byte string, matched byte-for-byte.
    pub fn literal_case_sensitive(value: impl Into<Box<[u8]>>) -> Self {
        Self::new(
            NodeKind::Literal {
                value: value.into(),
                case_sensitive: true,
            },
            LITERAL_DEFAULT,
        )
    }

    /// A single byte within the closed interval `[min, max]`.
    pub fn ranged(min: u8, max: u8) -> Self {
        Self::new(NodeKind::RangedLiteral { min, max }, RANGED_LITERAL_DEFAULT)
    }

    /// The concatenation of two nodes: `left` followed immediately by `right`.
    pub fn concat(left: Node, right: Node) -> Self {
        Self::new(NodeKind::Concatenation { left, right }, CONCATENATION_DEFAULT)
    }

    /// Left-folds `nodes` into a chain of binary concatenations. A single node is returned
    /// unwrapped rather than built into a degenerate `Concatenation`.
    ///
    /// # Panics
    ///
    /// Panics if `nodes` is empty. An empty concatenation has no well-defined input, and
    /// the original this crate is grounded on explicitly leaves that case undefined.
    pub fn concat_many(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut iter = nodes.into_iter();
        let first = iter.next().expect("concat_many requires at least one node");
        iter.fold(first, |acc, next| Node::concat(acc, next))
    }

    /// An ordered choice between `alternatives`, tried left to right.
    pub fn alt(alternatives: impl IntoIterator<Item = Node>) -> Self {
        Self::new(
            NodeKind::Alternation {
                alternatives: Mutex::new(alternatives.into_iter().collect()),
            },
            ALTERNATION_DEFAULT,
        )
    }

    /// An empty alternation with no alternatives. Used as a forward-reference placeholder
    /// (§4.5) and to tie the bootstrap ABNF meta-grammar's self-reference (§4.4); populated
    /// in place later via [`Node::set_alternatives`].
    pub(crate) fn alternation_placeholder() -> Self {
        Self::new(
            NodeKind::Alternation {
                alternatives: Mutex::new(Vec::new()),
            },
            ALTERNATION_DEFAULT,
        )
    }

    /// Mutates an alternation node's alternatives in place, preserving its identity (the
    /// same `Rc` pointer) so that references installed before this call see the update.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not an `Alternation` node.
    pub(crate) fn set_alternatives(&self, alternatives: Vec<Node>) {
        match &self.0.kind {
            NodeKind::Alternation { alternatives: cell } => {
                *cell.lock().unwrap() = alternatives;
            }
            _ => panic!("set_alternatives called on a non-alternation node"),
        }
    }

    /// The current alternatives of an `Alternation` node, cloned out, or `None` if `self`
    /// is not an `Alternation`. Used by the compiler to flatten a `=/` extension into one
    /// alternative list instead of nesting a new `Alternation` around the old one.
    pub(crate) fn alternatives(&self) -> Option<Vec<Node>> {
        match &self.0.kind {
            NodeKind::Alternation { alternatives } => Some(alternatives.lock().unwrap().clone()),
            _ => None,
        }
    }

    /// Zero or one repetitions of `inner`. Equivalent to `Node::repeat(inner, 0, Some(1))`,
    /// save for carrying the distinct default display name `"OptionNode"`.
    pub fn option(inner: Node) -> Self {
        Self::new(
            NodeKind::Repetition {
                inner,
                min: 0,
                max: Some(1),
            },
            OPTION_DEFAULT,
        )
    }

    /// Between `min` and `max` (inclusive, unbounded if `None`) repetitions of `inner`.
    pub fn repeat(inner: Node, min: usize, max: Option<usize>) -> Self {
        Self::new(NodeKind::Repetition { inner, min, max }, REPETITION_DEFAULT)
    }

    /// The node's current display name. Defaults to the constructor's category name
    /// (e.g. `"LiteralNode"`) until a [`crate::ruleset::Ruleset`] assigns it a rule name.
    pub fn name(&self) -> Arc<str> {
        self.0.name.lock().unwrap().clone()
    }

    pub(crate) fn default_name(&self) -> &'static str {
        self.0.default_name
    }

    pub(crate) fn is_default_name(&self) -> bool {
        &**self.0.name.lock().unwrap() == self.0.default_name
    }

    /// Renames this node in place. Used by [`crate::ruleset::Ruleset::insert`] once it has
    /// decided (per §3) that the node does not need to be shallow-copied first.
    pub(crate) fn rename_in_place(&self, name: Arc<str>) {
        *self.0.name.lock().unwrap() = name;
    }

    /// Shallow-copies the outer node (new handle, same children) so that it can be renamed
    /// without affecting other rules that reference the original handle.
    pub(crate) fn shallow_copy(&self) -> Self {
        let kind = match &self.0.kind {
            NodeKind::Literal {
                value,
                case_sensitive,
            } => NodeKind::Literal {
                value: value.clone(),
                case_sensitive: *case_sensitive,
            },
            NodeKind::RangedLiteral { min, max } => NodeKind::RangedLiteral {
                min: *min,
                max: *max,
            },
            NodeKind::Concatenation { left, right } => NodeKind::Concatenation {
                left: left.clone(),
                right: right.clone(),
            },
            NodeKind::Alternation { alternatives } => NodeKind::Alternation {
                alternatives: Mutex::new(alternatives.lock().unwrap().clone()),
            },
            NodeKind::Repetition { inner, min, max } => NodeKind::Repetition {
                inner: inner.clone(),
                min: *min,
                max: *max,
            },
        };
        Node(Arc::new(NodeData {
            kind,
            default_name: self.0.default_name,
            name: Mutex::new(self.0.name.lock().unwrap().clone()),
        }))
    }

    pub(crate) fn category(&self) -> NodeCategory {
        match &self.0.kind {
            NodeKind::Literal { .. } => NodeCategory::Literal,
            NodeKind::RangedLiteral { .. } => NodeCategory::RangedLiteral,
            NodeKind::Concatenation { .. } => NodeCategory::Concatenation,
            NodeKind::Alternation { .. } => NodeCategory::Alternation,
            NodeKind::Repetition { .. } => NodeCategory::Repetition,
        }
    }

    /// Evaluates this node against `source` starting at `offset`, returning the first match
    /// that consumes the input exactly. Returns [`MatchError::NoMatch`] otherwise.
    pub fn evaluate<'a>(
        &self,
        source: &'a [u8],
        offset: usize,
        backtracking_limit: BacktrackingLimit,
    ) -> Result<MatchNode<'a>, MatchError> {
        match self.try_evaluate(source, offset, backtracking_limit)? {
            Some(m) => Ok(m),
            None => Err(MatchError::NoMatch {
                rule_name: self.name(),
                offset,
                input_len: source.len(),
            }),
        }
    }

    /// Like [`Node::evaluate`], but returns `Ok(None)` instead of `Err(NoMatch)` when the
    /// input does not match. Budget-related errors still propagate.
    pub fn try_evaluate<'a>(
        &self,
        source: &'a [u8],
        offset: usize,
        backtracking_limit: BacktrackingLimit,
    ) -> Result<Option<MatchNode<'a>>, MatchError> {
        let ctx = EvalContext::new(backtracking_limit, offset, source.len());
        for candidate in generate(self, source, offset, &ctx) {
            let candidate = candidate?;
            if candidate.end_offset() == source.len() {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

type MatchIter<'a, 'b> = Box<dyn Iterator<Item = Result<MatchNode<'a>, MatchError>> + 'b>;

pub(crate) fn generate<'a, 'b>(
    node: &Node,
    source: &'a [u8],
    offset: usize,
    ctx: &'b EvalContext,
) -> MatchIter<'a, 'b>
where
    'a: 'b,
{
    match &node.0.kind {
        NodeKind::Literal {
            value,
            case_sensitive,
        } => literal_iter(node, source, offset, value, *case_sensitive),
        NodeKind::RangedLiteral { min, max } => ranged_iter(node, source, offset, *min, *max),
        NodeKind::Concatenation { left, right } => Box::new(ConcatIter {
            source,
            ctx,
            name: node.name(),
            is_default: node.is_default_name(),
            right: right.clone(),
            left_iter: generate(left, source, offset, ctx),
            right_iter: None,
            done: false,
        }),
        NodeKind::Alternation { alternatives } => Box::new(AlternationIter {
            source,
            ctx,
            offset,
            name: node.name(),
            is_default: node.is_default_name(),
            alternatives: alternatives.lock().unwrap().clone(),
            idx: 0,
            current: None,
            done: false,
        }),
        NodeKind::Repetition { inner, min, max } => Box::new(RepetitionIter {
            source,
            ctx,
            offset,
            name: node.name(),
            inner: inner.clone(),
            min: *min,
            max: *max,
            frames: vec![generate(inner, source, offset, ctx)],
            match_stack: Vec::new(),
            backtrack_count: 0,
            step: RepetitionStep::PullTop,
        }),
    }
}

fn literal_iter<'a, 'b>(
    node: &Node,
    source: &'a [u8],
    offset: usize,
    value: &[u8],
    case_sensitive: bool,
) -> MatchIter<'a, 'b>
where
    'a: 'b,
{
    let end = offset.checked_add(value.len());
    let matched = match end {
        Some(end) if end <= source.len() => bytes_equal(&source[offset..end], value, case_sensitive),
        _ => false,
    };
    if matched {
        let end = end.unwrap();
        let m = MatchNode::new(
            node.name(),
            node.is_default_name(),
            NodeCategory::Literal,
            offset,
            end,
            source,
            Vec::new(),
        );
        Box::new(std::iter::once(Ok(m)))
    } else {
        Box::new(std::iter::empty())
    }
}

fn ranged_iter<'a, 'b>(node: &Node, source: &'a [u8], offset: usize, min: u8, max: u8) -> MatchIter<'a, 'b>
where
    'a: 'b,
{
    let matched = source.get(offset).is_some_and(|&b| b >= min && b <= max);
    if matched {
        let m = MatchNode::new(
            node.name(),
            node.is_default_name(),
            NodeCategory::RangedLiteral,
            offset,
            offset + 1,
            source,
            Vec::new(),
        );
        Box::new(std::iter::once(Ok(m)))
    } else {
        Box::new(std::iter::empty())
    }
}

struct ConcatIter<'a, 'b> {
    source: &'a [u8],
    ctx: &'b EvalContext,
    name: Arc<str>,
    is_default: bool,
    right: Node,
    left_iter: MatchIter<'a, 'b>,
    right_iter: Option<(MatchNode<'a>, MatchIter<'a, 'b>)>,
    done: bool,
}

fn splice_or_keep<'a>(out: &mut Vec<MatchNode<'a>>, m: MatchNode<'a>) {
    let spliceable = m.is_default_name()
        && matches!(
            m.category(),
            NodeCategory::Concatenation | NodeCategory::Repetition
        );
    if spliceable {
        out.extend(m.children().iter().cloned());
    } else {
        out.push(m);
    }
}

impl<'a, 'b> Iterator for ConcatIter<'a, 'b>
where
    'a: 'b,
{
    type Item = Result<MatchNode<'a>, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if self.right_iter.is_none() {
                match self.left_iter.next() {
                    None => {
                        self.done = true;
                        return None;
                    }
                    Some(Err(e)) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                    Some(Ok(left_match)) => {
                        let right_iter =
                            generate(&self.right, self.source, left_match.end_offset(), self.ctx);
                        self.right_iter = Some((left_match, right_iter));
                    }
                }
            }
            let (left_match, right_iter) = self.right_iter.as_mut().unwrap();
            match right_iter.next() {
                None => {
                    self.right_iter = None;
                    continue;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(right_match)) => {
                    let start = left_match.start_offset();
                    let end = right_match.end_offset();
                    let mut children = Vec::new();
                    splice_or_keep(&mut children, left_match.clone());
                    splice_or_keep(&mut children, right_match);
                    children.retain(|c| !c.is_empty());
                    return Some(Ok(MatchNode::new(
                        self.name.clone(),
                        self.is_default,
                        NodeCategory::Concatenation,
                        start,
                        end,
                        self.source,
                        children,
                    )));
                }
            }
        }
    }
}

struct AlternationIter<'a, 'b> {
    source: &'a [u8],
    ctx: &'b EvalContext,
    offset: usize,
    name: Arc<str>,
    is_default: bool,
    alternatives: Vec<Node>,
    idx: usize,
    current: Option<MatchIter<'a, 'b>>,
    done: bool,
}

impl<'a, 'b> Iterator for AlternationIter<'a, 'b>
where
    'a: 'b,
{
    type Item = Result<MatchNode<'a>, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if self.current.is_none() {
                if self.idx >= self.alternatives.len() {
                    self.done = true;
                    return None;
                }
                self.current = Some(generate(
                    &self.alternatives[self.idx],
                    self.source,
                    self.offset,
                    self.ctx,
                ));
                self.idx += 1;
            }
            match self.current.as_mut().unwrap().next() {
                None => {
                    self.current = None;
                    continue;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(inner)) => {
                    if self.is_default {
                        return Some(Ok(inner));
                    }
                    let children = if inner.is_default_name()
                        && matches!(
                            inner.category(),
                            NodeCategory::Concatenation | NodeCategory::Repetition
                        ) {
                        inner.children().to_vec()
                    } else {
                        vec![inner.clone()]
                    };
                    return Some(Ok(MatchNode::new(
                        self.name.clone(),
                        false,
                        NodeCategory::Alternation,
                        inner.start_offset(),
                        inner.end_offset(),
                        self.source,
                        children,
                    )));
                }
            }
        }
    }
}

enum RepetitionStep {
    PullTop,
    PostFullYieldPop,
    PostExhaustYieldPop,
    EmitFinalEmpty,
    Done,
}

struct RepetitionIter<'a, 'b> {
    source: &'a [u8],
    ctx: &'b EvalContext,
    offset: usize,
    name: Arc<str>,
    inner: Node,
    min: usize,
    max: Option<usize>,
    frames: Vec<MatchIter<'a, 'b>>,
    match_stack: Vec<MatchNode<'a>>,
    backtrack_count: usize,
    step: RepetitionStep,
}

impl<'a, 'b> RepetitionIter<'a, 'b>
where
    'a: 'b,
{
    fn budget_error(&self) -> MatchError {
        MatchError::BacktrackingLimitReached {
            rule_name: self.inner.name(),
            offset: self
                .match_stack
                .last()
                .map(|m| m.end_offset())
                .unwrap_or(self.offset),
            count: self.backtrack_count,
            limit: self.ctx.limit.unwrap_or(0),
        }
    }

    fn budget_exceeded(&self) -> bool {
        matches!(self.ctx.limit, Some(limit) if self.backtrack_count >= limit)
    }

    fn emit_current(&self) -> MatchNode<'a> {
        let end = self
            .match_stack
            .last()
            .map(|m| m.end_offset())
            .unwrap_or(self.offset);
        MatchNode::new(
            self.name.clone(),
            true,
            NodeCategory::Repetition,
            self.offset,
            end,
            self.source,
            self.match_stack.clone(),
        )
    }
}

impl<'a, 'b> Iterator for RepetitionIter<'a, 'b>
where
    'a: 'b,
{
    type Item = Result<MatchNode<'a>, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step {
                RepetitionStep::PostFullYieldPop => {
                    self.match_stack.pop();
                    self.step = RepetitionStep::PullTop;
                }
                RepetitionStep::PostExhaustYieldPop => {
                    self.backtrack_count += 1;
                    if self.budget_exceeded() {
                        self.step = RepetitionStep::Done;
                        return Some(Err(self.budget_error()));
                    }
                    self.match_stack.pop();
                    self.step = RepetitionStep::PullTop;
                }
                RepetitionStep::PullTop => {
                    if self.frames.is_empty() {
                        self.step = RepetitionStep::EmitFinalEmpty;
                        continue;
                    }
                    match self.frames.last_mut().unwrap().next() {
                        None => {
                            self.frames.pop();
                            if self.match_stack.is_empty() {
                                continue;
                            }
                            if self.match_stack.len() >= self.min {
                                let m = self.emit_current();
                                self.step = RepetitionStep::PostExhaustYieldPop;
                                return Some(Ok(m));
                            } else {
                                self.backtrack_count += 1;
                                if self.budget_exceeded() {
                                    self.step = RepetitionStep::Done;
                                    return Some(Err(self.budget_error()));
                                }
                                self.match_stack.pop();
                                continue;
                            }
                        }
                        Some(Err(e)) => {
                            self.step = RepetitionStep::Done;
                            return Some(Err(e));
                        }
                        Some(Ok(m)) => {
                            let end = m.end_offset();
                            self.match_stack.push(m);
                            let full = self.max == Some(self.match_stack.len())
                                || end == self.source.len();
                            if full {
                                let emitted = self.emit_current();
                                self.step = RepetitionStep::PostFullYieldPop;
                                return Some(Ok(emitted));
                            } else {
                                self.frames
                                    .push(generate(&self.inner, self.source, end, self.ctx));
                                continue;
                            }
                        }
                    }
                }
                RepetitionStep::EmitFinalEmpty => {
                    self.step = RepetitionStep::Done;
                    if self.min == 0 {
                        return Some(Ok(MatchNode::new(
                            self.name.clone(),
                            true,
                            NodeCategory::Repetition,
                            self.offset,
                            self.offset,
                            self.source,
                            Vec::new(),
                        )));
                    }
                    return None;
                }
                RepetitionStep::Done => return None,
            }
        }
    }
}
