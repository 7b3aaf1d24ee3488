//! The evaluation-context module: the explicit, non-static carrier for the backtracking budget.

/// Selects how many times a [`Repetition`](crate::eval::Node::repeat) node is allowed to
/// shrink its accumulated match stack during a single [`evaluate`](crate::eval::Node::evaluate) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktrackingLimit {
    /// Allow at most `n` backtracks per repetition evaluation.
    Fixed(usize),
    /// Allow as many backtracks as there are remaining bytes of input. This is the default:
    /// it is generous enough for well-behaved grammars while still bounding pathological ones.
    InputLength,
    /// Do not bound backtracking at all. Pathological grammars can run arbitrarily long.
    Unbounded,
}

impl Default for BacktrackingLimit {
    fn default() -> Self {
        BacktrackingLimit::InputLength
    }
}

impl BacktrackingLimit {
    fn resolve(self, remaining_input: usize) -> Option<usize> {
        match self {
            BacktrackingLimit::Fixed(n) => Some(n),
            BacktrackingLimit::InputLength => Some(remaining_input),
            BacktrackingLimit::Unbounded => None,
        }
    }
}

/// Carries the resolved backtracking budget through a single call to
/// [`Node::generate_matches`](crate::eval::Node). Unlike the original implementation this
/// crate is grounded on, the budget is never stored in a mutable static: it is a plain
/// value threaded down the call tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EvalContext {
    pub(crate) limit: Option<usize>,
}

impl EvalContext {
    pub(crate) fn new(limit: BacktrackingLimit, offset: usize, source_len: usize) -> Self {
        let remaining = source_len.saturating_sub(offset);
        Self {
            limit: limit.resolve(remaining),
        }
    }
}
