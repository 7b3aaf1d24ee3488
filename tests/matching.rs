use abnf_rs::{BacktrackingLimit, MatchError, Ruleset};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn fixed_repetition_of_a_core_rule() {
    init_logging();
    let mut rules = Ruleset::new();
    rules.update_from_source(b"foo = 2DIGIT\r\n").unwrap();

    let m = rules["foo"].evaluate(b"42", 0, BacktrackingLimit::default()).unwrap();
    assert_eq!(m.name(), "foo");
    assert_eq!(m.children().len(), 2);
    assert_eq!(m.children()[0].name(), "DIGIT");
    assert_eq!(m.children()[0].value(), b"4");
    assert_eq!(m.children()[1].value(), b"2");
}

#[test]
fn bounded_repetition_requires_full_consumption() {
    let mut rules = Ruleset::new();
    rules.update_from_source(b"foo = 1*3\"a\"\r\n").unwrap();

    assert!(rules["foo"]
        .try_evaluate(b"aaaa", 0, BacktrackingLimit::default())
        .unwrap()
        .is_none());

    let m = rules["foo"].evaluate(b"aaa", 0, BacktrackingLimit::default()).unwrap();
    assert_eq!(m.children().len(), 3);
}

#[test]
fn rfc3986_ipv4_address() {
    let rules = abnf_rs::rulesets::rfc3986::ruleset();

    assert!(rules
        .get("IPv4address")
        .unwrap()
        .try_evaluate(b"192.168.0.1", 0, BacktrackingLimit::default())
        .unwrap()
        .is_some());

    assert!(rules
        .get("IPv4address")
        .unwrap()
        .try_evaluate(b"999.1.1.1", 0, BacktrackingLimit::default())
        .unwrap()
        .is_none());
}

#[test]
fn forward_reference_to_a_rule_defined_later() {
    let mut rules = Ruleset::new();
    rules
        .update_from_source(b"x = \"a\" / \"b\" y\r\ny = \"c\"\r\n")
        .unwrap();

    let m = rules["x"].evaluate(b"bc", 0, BacktrackingLimit::default()).unwrap();
    assert_eq!(m.name(), "x");
    assert!(!m.search("y").is_empty());
    assert_eq!(m.search("y")[0].value(), b"c");
}

#[test]
fn forward_reference_order_does_not_change_the_result() {
    let mut forward = Ruleset::new();
    forward
        .update_from_source(b"x = \"a\" / \"b\" y\r\ny = \"c\"\r\n")
        .unwrap();

    let mut top_down = Ruleset::new();
    top_down
        .update_from_source(b"y = \"c\"\r\nx = \"a\" / \"b\" y\r\n")
        .unwrap();

    let a = forward["x"].evaluate(b"bc", 0, BacktrackingLimit::default()).unwrap();
    let b = top_down["x"].evaluate(b"bc", 0, BacktrackingLimit::default()).unwrap();
    assert_eq!(a.value(), b.value());
    assert_eq!(a.children().len(), b.children().len());
}

#[test]
fn case_insensitive_and_case_sensitive_literals() {
    let mut rules = Ruleset::new();
    rules
        .update_from_source(b"foo = \"abc\"\r\nbar = %s\"abc\"\r\n")
        .unwrap();

    assert!(rules["foo"]
        .try_evaluate(b"AbC", 0, BacktrackingLimit::default())
        .unwrap()
        .is_some());
    assert!(rules["bar"]
        .try_evaluate(b"AbC", 0, BacktrackingLimit::default())
        .unwrap()
        .is_none());
    assert!(rules["bar"]
        .try_evaluate(b"abc", 0, BacktrackingLimit::default())
        .unwrap()
        .is_some());
}

#[test]
fn numeric_ranges_and_dotted_sequences() {
    let mut rules = Ruleset::new();
    rules
        .update_from_source(b"digit = %x30-39\r\ncrlf = %d13.10\r\n")
        .unwrap();

    for b in 0x30u8..=0x39 {
        assert!(rules["digit"]
            .try_evaluate(&[b], 0, BacktrackingLimit::default())
            .unwrap()
            .is_some());
    }
    assert!(rules["digit"]
        .try_evaluate(b"a", 0, BacktrackingLimit::default())
        .unwrap()
        .is_none());

    assert!(rules["crlf"]
        .try_evaluate(b"\r\n", 0, BacktrackingLimit::default())
        .unwrap()
        .is_some());
}

#[test]
fn extends_an_existing_rule_with_slash_equals() {
    let mut rules = Ruleset::new();
    rules
        .update_from_source(b"digit-or-x = DIGIT\r\ndigit-or-x =/ \"x\"\r\n")
        .unwrap();

    let matched = rules["digit-or-x"]
        .try_evaluate(b"7", 0, BacktrackingLimit::default())
        .unwrap()
        .unwrap();
    assert_eq!(matched.name(), "digit-or-x");
    let children = matched.children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name(), "DIGIT");

    assert!(rules["digit-or-x"]
        .try_evaluate(b"x", 0, BacktrackingLimit::default())
        .unwrap()
        .is_some());
}

#[test]
fn slash_equals_keeps_prior_alternatives_through_a_forward_reference() {
    let mut rules = Ruleset::new();
    rules
        .update_from_source(b"foo = \"a\"\r\nfoo =/ bar\r\nbar = \"b\"\r\n")
        .unwrap();

    assert!(rules["foo"]
        .try_evaluate(b"a", 0, BacktrackingLimit::default())
        .unwrap()
        .is_some());
    assert!(rules["foo"]
        .try_evaluate(b"b", 0, BacktrackingLimit::default())
        .unwrap()
        .is_some());
}

#[test]
fn backtracking_limit_exhaustion_surfaces_as_an_error() {
    let mut rules = Ruleset::new();
    // Every "a" can be consumed by either alternative, so a run of "a"s followed by a
    // byte that never appears forces the repetition to shrink once per accumulated "a".
    rules
        .update_from_source(b"pathological = *(\"a\" / \"a\") \"z\"\r\n")
        .unwrap();

    let input = vec![b'a'; 64];
    let err = rules["pathological"]
        .evaluate(&input, 0, BacktrackingLimit::Fixed(1))
        .unwrap_err();
    assert!(matches!(err, MatchError::BacktrackingLimitReached { .. }));
}

#[test]
fn core_ruleset_fallback_survives_unrelated_inserts() {
    let mut rules = Ruleset::new();
    rules.update_from_source(b"foo = \"x\"\r\n").unwrap();

    assert!(rules
        .get("ALPHA")
        .unwrap()
        .try_evaluate(b"q", 0, BacktrackingLimit::default())
        .unwrap()
        .is_some());
}

#[test]
fn larger_backtracking_budget_never_turns_success_into_failure() {
    let mut rules = Ruleset::new();
    rules.update_from_source(b"foo = 1*(\"a\" / \"a\") \"a\"\r\n").unwrap();

    let input = vec![b'a'; 16];
    let unbounded = rules["foo"]
        .try_evaluate(&input, 0, BacktrackingLimit::Unbounded)
        .unwrap();
    assert!(unbounded.is_some());

    let generous = rules["foo"]
        .try_evaluate(&input, 0, BacktrackingLimit::Fixed(1_000))
        .unwrap();
    assert!(generous.is_some());
}

#[test]
fn zero_length_matches_are_never_kept_as_children() {
    let mut rules = Ruleset::new();
    rules.update_from_source(b"foo = *\"a\" \"b\"\r\n").unwrap();

    let m = rules["foo"].evaluate(b"b", 0, BacktrackingLimit::default()).unwrap();
    for child in m.children() {
        assert!(!child.is_empty());
    }
}
