//! Prepackaged [`Ruleset`](crate::ruleset::Ruleset)s for a handful of commonly used RFC
//! grammars, built once and shared process-wide. Each module exposes a single `ruleset()`
//! function; none of this is part of the core ABNF engine (§4.6), and a caller who only
//! needs RFC 5234 itself never pays for building any of these.
//!
//! Coverage is partial by design: each module implements the subset of its RFC that is
//! useful standalone (addressing, header syntax, message framing), not the full grammar.

pub mod rfc3986;
pub mod rfc5321;
pub mod rfc5322;
pub mod rfc7239;
pub mod rfc9110;
pub mod rfc9112;
