//! The bootstrap ABNF (RFC 5234 §4) meta-grammar, wired by hand once and used by
//! [`crate::compiler`] to parse the ABNF rule definitions it is in turn asked to compile.
use std::sync::OnceLock;

use crate::core_ruleset::core;
use crate::eval::Node;
use crate::ruleset::Ruleset;

fn literal(byte: u8) -> Node {
    Node::literal([byte])
}

fn lit_str(s: &str) -> Node {
    Node::literal(s.as_bytes())
}

fn build() -> Ruleset {
    let core = core();
    let mut rules = Ruleset::empty();

    rules.insert(
        "quoted-string",
        Node::concat_many([
            core["DQUOTE"].clone(),
            Node::repeat(Node::alt([Node::ranged(0x20, 0x21), Node::ranged(0x23, 0x7E)]), 0, None),
            core["DQUOTE"].clone(),
        ]),
    );

    rules.insert(
        "prose-val",
        Node::concat_many([
            lit_str("<"),
            Node::repeat(Node::alt([Node::ranged(0x20, 0x3D), Node::ranged(0x3F, 0x7E)]), 0, None),
            lit_str(">"),
        ]),
    );

    // `<radix>-val` rules all share the `1*DIGIT ( 1*("." 1*DIGIT) / ("-" 1*DIGIT) )` shape,
    // parameterized only by the radix prefix letter and the digit rule.
    let radix_val = |prefix: u8, digit: Node| -> Node {
        Node::concat(
            literal(prefix),
            Node::concat(
                Node::repeat(digit.clone(), 1, None),
                Node::option(Node::alt([
                    Node::repeat(
                        Node::concat(lit_str("."), Node::repeat(digit.clone(), 1, None)),
                        1,
                        None,
                    ),
                    Node::concat(lit_str("-"), Node::repeat(digit, 1, None)),
                ])),
            ),
        )
    };

    rules.insert("hex-val", radix_val(b'x', core["HEXDIG"].clone()));
    rules.insert("dec-val", radix_val(b'd', core["DIGIT"].clone()));
    rules.insert("bin-val", radix_val(b'b', core["BIT"].clone()));

    rules.insert(
        "comment",
        Node::concat_many([
            lit_str(";"),
            Node::repeat(Node::alt([core["WSP"].clone(), core["VCHAR"].clone()]), 0, None),
            core["CRLF"].clone(),
        ]),
    );

    rules.insert(
        "rulename",
        Node::concat(
            core["ALPHA"].clone(),
            Node::repeat(
                Node::alt([core["ALPHA"].clone(), core["DIGIT"].clone(), lit_str("-")]),
                0,
                None,
            ),
        ),
    );

    rules.insert(
        "repeat",
        Node::alt([
            Node::concat_many([
                Node::repeat(core["DIGIT"].clone(), 0, None),
                lit_str("*"),
                Node::repeat(core["DIGIT"].clone(), 0, None),
            ]),
            Node::repeat(core["DIGIT"].clone(), 1, None),
        ]),
    );

    let quoted = rules["quoted-string"].clone();
    rules.insert("case-sensitive-string", Node::concat(lit_str("%s"), quoted.clone()));
    rules.insert(
        "case-insensitive-string",
        Node::concat(Node::option(lit_str("%i")), quoted),
    );

    rules.insert(
        "char-val",
        Node::alt([
            rules["case-insensitive-string"].clone(),
            rules["case-sensitive-string"].clone(),
        ]),
    );

    rules.insert(
        "num-val",
        Node::concat(
            lit_str("%"),
            Node::alt([
                rules["bin-val"].clone(),
                rules["dec-val"].clone(),
                rules["hex-val"].clone(),
            ]),
        ),
    );

    rules.insert("c-nl", Node::alt([rules["comment"].clone(), core["CRLF"].clone()]));

    rules.insert(
        "c-wsp",
        Node::alt([
            core["WSP"].clone(),
            Node::concat(rules["c-nl"].clone(), core["WSP"].clone()),
        ]),
    );

    // `alternation` is mutually recursive with `concatenation` via `element -> group/option`.
    // Two placeholder alternation nodes stand in for `option` and `group`'s inner
    // `alternation` reference until the real one below is built, then are patched in place
    // (§4.5's forward-reference mechanism, reused here for the bootstrap self-reference).
    let option_inner_placeholder = Node::alternation_placeholder();
    let group_inner_placeholder = Node::alternation_placeholder();

    rules.insert(
        "option",
        Node::concat_many([
            lit_str("["),
            Node::repeat(rules["c-wsp"].clone(), 0, None),
            option_inner_placeholder.clone(),
            Node::repeat(rules["c-wsp"].clone(), 0, None),
            lit_str("]"),
        ]),
    );

    rules.insert(
        "group",
        Node::concat_many([
            lit_str("("),
            Node::repeat(rules["c-wsp"].clone(), 0, None),
            group_inner_placeholder.clone(),
            Node::repeat(rules["c-wsp"].clone(), 0, None),
            lit_str(")"),
        ]),
    );

    rules.insert(
        "element",
        Node::alt([
            rules["rulename"].clone(),
            rules["group"].clone(),
            rules["option"].clone(),
            rules["char-val"].clone(),
            rules["num-val"].clone(),
            rules["prose-val"].clone(),
        ]),
    );

    rules.insert(
        "repetition",
        Node::concat(Node::option(rules["repeat"].clone()), rules["element"].clone()),
    );

    rules.insert(
        "concatenation",
        Node::concat(
            rules["repetition"].clone(),
            Node::repeat(
                Node::concat(
                    Node::repeat(rules["c-wsp"].clone(), 1, None),
                    rules["repetition"].clone(),
                ),
                0,
                None,
            ),
        ),
    );

    let alternation = Node::concat(
        rules["concatenation"].clone(),
        Node::repeat(
            Node::concat_many([
                Node::repeat(rules["c-wsp"].clone(), 0, None),
                lit_str("/"),
                Node::repeat(rules["c-wsp"].clone(), 0, None),
                rules["concatenation"].clone(),
            ]),
            0,
            None,
        ),
    );
    rules.insert("alternation", alternation.clone());
    option_inner_placeholder.set_alternatives(vec![alternation.clone()]);
    group_inner_placeholder.set_alternatives(vec![alternation]);

    rules.insert(
        "elements",
        Node::concat(rules["alternation"].clone(), Node::repeat(rules["c-wsp"].clone(), 0, None)),
    );

    rules.insert(
        "defined-as",
        Node::concat_many([
            Node::repeat(rules["c-wsp"].clone(), 0, None),
            Node::alt([lit_str("=/"), lit_str("=")]),
            Node::repeat(rules["c-wsp"].clone(), 0, None),
        ]),
    );

    rules.insert(
        "rule",
        Node::concat_many([
            rules["rulename"].clone(),
            rules["defined-as"].clone(),
            rules["elements"].clone(),
            rules["c-nl"].clone(),
        ]),
    );

    rules.insert(
        "rulelist",
        Node::repeat(
            Node::alt([
                rules["rule"].clone(),
                Node::concat(Node::repeat(rules["c-wsp"].clone(), 0, None), rules["c-nl"].clone()),
            ]),
            1,
            None,
        ),
    );

    rules
}

/// The bootstrap ABNF meta-grammar, built once and shared process-wide.
pub(crate) fn abnf_meta() -> &'static Ruleset {
    static META: OnceLock<Ruleset> = OnceLock::new();
    META.get_or_init(build)
}
