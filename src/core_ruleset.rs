//! The core ABNF rules from RFC 5234 Appendix B.1, wired by hand once and shared by every
//! [`Ruleset`](crate::ruleset::Ruleset) as a fallback.
use std::sync::OnceLock;

use crate::eval::Node;
use crate::ruleset::Ruleset;

// The original this crate is grounded on never opts any of the core rules into
// case-sensitive matching, including the `A`-`F` alternatives of `HEXDIG` — so lowercase
// `a`-`f` matches `HEXDIG` too. Matched here rather than "corrected", since prepackaged
// grammars built on top of these rules (§4.6) may depend on the looser behavior.
fn literal(byte: u8) -> Node {
    Node::literal([byte])
}

fn build() -> Ruleset {
    let mut rules = Ruleset::empty();

    let alpha = Node::alt([Node::ranged(0x61, 0x7A), Node::ranged(0x41, 0x5A)]);
    rules.insert("ALPHA", alpha);

    let bit = Node::alt([literal(b'0'), literal(b'1')]);
    rules.insert("BIT", bit);

    rules.insert("CHAR", Node::ranged(0x01, 0x7F));

    let ctl = Node::alt([Node::ranged(0x00, 0x1F), literal(0x7F)]);
    rules.insert("CTL", ctl);

    rules.insert("CR", literal(0x0D));
    rules.insert("LF", literal(0x0A));
    rules.insert("DIGIT", Node::ranged(0x30, 0x39));
    rules.insert("DQUOTE", literal(0x22));
    rules.insert("SP", literal(0x20));
    rules.insert("HTAB", literal(0x09));
    rules.insert("OCTET", Node::ranged(0x00, 0xFF));
    rules.insert("VCHAR", Node::ranged(0x21, 0x7E));

    let crlf = Node::concat(rules["CR"].clone(), rules["LF"].clone());
    rules.insert("CRLF", crlf);

    let hexdig = Node::alt([
        rules["DIGIT"].clone(),
        literal(b'A'),
        literal(b'B'),
        literal(b'C'),
        literal(b'D'),
        literal(b'E'),
        literal(b'F'),
    ]);
    rules.insert("HEXDIG", hexdig);

    let wsp = Node::alt([rules["SP"].clone(), rules["HTAB"].clone()]);
    rules.insert("WSP", wsp);

    let lwsp = Node::repeat(
        Node::alt([
            rules["WSP"].clone(),
            Node::concat(rules["CRLF"].clone(), rules["WSP"].clone()),
        ]),
        0,
        None,
    );
    rules.insert("LWSP", lwsp);

    rules
}

/// The RFC 5234 Appendix B.1 core rules, built once and shared by every ruleset.
pub(crate) fn core() -> &'static Ruleset {
    static CORE: OnceLock<Ruleset> = OnceLock::new();
    CORE.get_or_init(build)
}
