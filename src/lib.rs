/*!
# abnf-rs

A backtracking matcher and compiler for grammars written in Augmented Backus-Naur Form
(ABNF, RFC 5234). The engine has two halves: a small, generic matcher that walks a graph
of evaluation nodes (literal, ranged literal, concatenation, alternation, repetition)
against a byte buffer, and a compiler that turns ABNF grammar *text* into such a graph by
running the matcher over a hand-wired copy of ABNF's own grammar.

```rust
use abnf_rs::Ruleset;

let mut rules = Ruleset::new();
rules.update_from_source(b"foo = 2DIGIT\r\n").unwrap();

let m = rules["foo"].evaluate(b"42", 0, Default::default()).unwrap();
assert_eq!(m.name(), "foo");
assert_eq!(m.children().len(), 2);
assert_eq!(m.children()[0].value(), b"4");
```

Rules may reference each other out of order, and even refer to themselves, directly or
transitively — the compiler resolves forward references in a second pass once every rule
in the source has been read once. The core ABNF rules (`ALPHA`, `DIGIT`, `CRLF`, ...) from
RFC 5234 Appendix B.1 are always in scope, even in a [`Ruleset`] with no rules of its own.

Grammars can also be built programmatically via the [`Node`] constructors, without going
through ABNF text at all.

A handful of prepackaged rulesets for commonly needed RFC grammars live under
[`rulesets`]; they are worked examples of the compiler, not part of the core engine.
*/
#![warn(missing_docs)]

mod abnf_grammar;
mod compiler;
mod context;
mod core_ruleset;
mod error;
mod eval;
mod node;
pub mod rulesets;
mod ruleset;
mod utils;

pub use context::BacktrackingLimit;
pub use error::{CompileError, MatchError};
pub use eval::Node;
pub use node::MatchNode;
pub use ruleset::Ruleset;
