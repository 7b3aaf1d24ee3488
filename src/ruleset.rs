//! The [`Ruleset`] container: a named collection of rules, falling back to the RFC 5234
//! core rules for any name it does not define itself.
use std::ops::Index;
use std::sync::Arc;

use ahash::AHashMap;

use crate::abnf_grammar;
use crate::compiler;
use crate::core_ruleset;
use crate::error::CompileError;
use crate::eval::Node;

/// A named collection of [`Node`] rules.
///
/// Lookups that miss the ruleset's own rules fall through to the RFC 5234 core rules
/// (`ALPHA`, `DIGIT`, `CRLF`, ...) before failing, mirroring ABNF's implicit availability
/// of the core rules in every grammar.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    rules: AHashMap<Box<str>, Node>,
}

impl Ruleset {
    pub(crate) fn empty() -> Self {
        Self {
            rules: AHashMap::default(),
        }
    }

    /// An empty ruleset with no rules of its own; lookups still fall back to the core rules.
    pub fn new() -> Self {
        Self::empty()
    }

    /// Inserts `rule` under `name`.
    ///
    /// If `rule` is already named `name`, or is still carrying its constructor's default
    /// name, it is reused as-is. Otherwise it is shallow-copied first, so that renaming it
    /// does not affect other rules still holding the original handle.
    pub fn insert(&mut self, name: impl AsRef<str>, rule: Node) {
        let name = name.as_ref();
        let rule = if &*rule.name() == name || rule.is_default_name() {
            rule
        } else {
            rule.shallow_copy()
        };
        rule.rename_in_place(Arc::from(name));
        self.rules.insert(name.into(), rule);
    }

    /// Looks up a rule by name, checking this ruleset's own rules before the core rules.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.rules.get(name).or_else(|| core_ruleset::core().get_own(name))
    }

    fn get_own(&self, name: &str) -> Option<&Node> {
        self.rules.get(name)
    }

    /// Parses `source` as ABNF (RFC 5234) rule definitions and merges the resulting rules
    /// into `self`, returning `self` for chaining.
    ///
    /// Rules may reference each other out of order and, transitively, themselves: a rule
    /// that is referenced before it is defined is installed as an empty placeholder and
    /// populated once every rule in `source` has been read once.
    pub fn update_from_source(&mut self, source: &[u8]) -> Result<&mut Self, CompileError> {
        compiler::compile_into(self, source)?;
        Ok(self)
    }

    /// Parses `source` as ABNF rule definitions into a fresh ruleset.
    pub fn from_source(source: &[u8]) -> Result<Self, CompileError> {
        let mut ruleset = Self::empty();
        ruleset.update_from_source(source)?;
        Ok(ruleset)
    }

    /// The RFC 5234 Appendix B.1 core rules (`ALPHA`, `DIGIT`, `CRLF`, ...), shared process-wide.
    pub fn core() -> &'static Ruleset {
        core_ruleset::core()
    }

    /// The bootstrap ABNF (RFC 5234 §4) meta-grammar used by [`Ruleset::from_source`] to
    /// parse ABNF rule definitions themselves, shared process-wide.
    pub fn abnf_meta() -> &'static Ruleset {
        abnf_grammar::abnf_meta()
    }
}

impl Index<&str> for Ruleset {
    type Output = Node;

    fn index(&self, name: &str) -> &Node {
        self.get(name)
            .unwrap_or_else(|| panic!("rule \"{name}\" not found in ruleset"))
    }
}
