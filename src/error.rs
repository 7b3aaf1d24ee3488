//! The error taxonomy for matching and grammar compilation.
use std::sync::Arc;

/// Represents the error when evaluating a [`Node`](crate::eval::Node) against an input buffer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchError {
    /// The source data did not match rule `{rule_name}` starting at offset `{offset}` (input length `{input_len}`).
    #[error(
        "the source data did not match rule \"{rule_name}\" starting at offset {offset} (input length {input_len})"
    )]
    NoMatch {
        /// The name of the rule that was evaluated.
        rule_name: Arc<str>,
        /// The offset at which evaluation started.
        offset: usize,
        /// The length of the input buffer that was evaluated.
        input_len: usize,
    },
    /// Backtracking inside rule `{rule_name}` exceeded its budget.
    #[error(
        "backtracking count {count} reached the limit {limit} while evaluating rule \"{rule_name}\" at offset {offset}"
    )]
    BacktrackingLimitReached {
        /// The name of the rule whose repetition exhausted the budget.
        rule_name: Arc<str>,
        /// The offset at which the repetition was being attempted.
        offset: usize,
        /// The number of backtracks observed when the budget was hit.
        count: usize,
        /// The budget that was configured for this evaluation.
        limit: usize,
    },
}

/// Represents the error when compiling ABNF grammar source text into a [`Ruleset`](crate::ruleset::Ruleset).
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompileError {
    /// The grammar source does not parse as valid ABNF (RFC 5234) syntax.
    #[error("the grammar source did not match the ABNF meta-grammar: {0}")]
    InvalidSyntax(#[from] Box<MatchError>),
    /// A rule referenced a name that could not be resolved, even after forward-reference
    /// resolution (this happens when `=/` is used to extend a rule that was never defined with `=`).
    #[error("rule \"{0}\" was referenced but never defined")]
    RuleNotFound(Box<str>),
    /// A construct in the ABNF grammar is recognized but not implemented by this engine.
    #[error("unsupported ABNF construct: {0}")]
    Unsupported(&'static str),
    /// A construct in the ABNF grammar is recognized but has a malformed value, e.g. a
    /// numeric literal that does not fit in a single byte, or inverted repeat bounds.
    #[error("malformed grammar construct: {0}")]
    Malformed(String),
}
