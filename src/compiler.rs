//! Compiles ABNF (RFC 5234) rule definitions into a [`Ruleset`](crate::ruleset::Ruleset).
//!
//! The grammar source is first matched against the bootstrap ABNF meta-grammar
//! ([`crate::abnf_grammar`]); the resulting parse tree is then walked, rule by rule, to
//! build the corresponding [`Node`] graph.
use ahash::AHashMap;

use crate::context::BacktrackingLimit;
use crate::error::CompileError;
use crate::eval::Node;
use crate::node::MatchNode;
use crate::ruleset::Ruleset;

pub(crate) fn compile_into(ruleset: &mut Ruleset, source: &[u8]) -> Result<(), CompileError> {
    let rulelist = crate::abnf_grammar::abnf_meta()
        .get("rulelist")
        .expect("bootstrap meta-grammar always defines \"rulelist\"");

    log::debug!("parsing {} bytes of ABNF source", source.len());
    let tree = rulelist
        .evaluate(source, 0, BacktrackingLimit::default())
        .map_err(|e| CompileError::InvalidSyntax(Box::new(e)))?;

    let mut retries: Vec<(Node, MatchNode<'_>, Option<Node>)> = Vec::new();
    // Tracks each rule's own node exactly as parsed, before `Ruleset::insert` possibly
    // renames (or shallow-copies and renames) it. `extend_rule` reads from this instead of
    // from `ruleset` itself, since a bare alias like `foo = DIGIT` gets permanently renamed
    // to "foo" on insertion (by design, see DESIGN.md) — extending from the renamed copy
    // would leak that rename into the extension's child match names.
    let mut defined: AHashMap<Box<str>, Node> = AHashMap::default();

    for rule_node in tree.get_field_all("rule") {
        let name = String::from_utf8_lossy(
            rule_node
                .get_field("rulename")
                .expect("\"rule\" always has a \"rulename\" child")
                .value(),
        )
        .into_owned();

        let defined_as = rule_node
            .get_field("defined-as")
            .expect("\"rule\" always has a \"defined-as\" child")
            .value();
        let extends = defined_as.windows(2).any(|w| w == b"=/");

        let elements = rule_node
            .get_field("elements")
            .expect("\"rule\" always has an \"elements\" child");
        let alternation = elements
            .get_field("alternation")
            .expect("\"elements\" always has an \"alternation\" child");

        log::trace!("compiling rule \"{name}\" (extends existing: {extends})");

        match node_from_alternation(alternation, ruleset) {
            Ok(node) => {
                let installed = if extends {
                    extend_rule(defined.get(name.as_str()).cloned(), node)
                } else {
                    node
                };
                // Snapshot before `Ruleset::insert` below, which may rename `installed` in
                // place (when it is still default-named, e.g. a freshly parsed literal or
                // alternation) rather than copying it first — an in-place rename would
                // otherwise leak into this snapshot too, since both would share one `Rc`.
                let snapshot = installed.shallow_copy();
                ruleset.insert(&name, installed);
                defined.insert(name.into_boxed_str(), snapshot);
            }
            Err(CompileError::RuleNotFound(_)) => {
                log::debug!("rule \"{name}\" has an unresolved forward reference, deferring");
                // When extending, the rule's own pre-rename node (if any) must survive the
                // placeholder swap below, or the retry pass would silently discard its
                // alternatives instead of extending them.
                let prior = if extends { defined.get(name.as_str()).cloned() } else { None };
                let placeholder = Node::alternation_placeholder();
                ruleset.insert(&name, placeholder.clone());
                defined.insert(name.into_boxed_str(), placeholder.clone());
                retries.push((placeholder, alternation.clone(), prior));
            }
            Err(e) => return Err(e),
        }
    }

    for (placeholder, alternation, prior) in retries {
        let mut alternatives = nodes_from_alternation(&alternation, ruleset)?;
        if let Some(prior) = prior {
            let mut combined = prior.alternatives().unwrap_or_else(|| vec![prior]);
            combined.append(&mut alternatives);
            alternatives = combined;
        }
        placeholder.set_alternatives(alternatives);
    }

    Ok(())
}

/// Combines `existing` (the rule's own node as previously parsed, before any rename) with
/// `node`'s alternatives into one flat `Alternation`, rather than nesting a new
/// `Alternation` around the existing rule.
fn extend_rule(existing: Option<Node>, node: Node) -> Node {
    match existing {
        Some(existing) => {
            let mut alternatives = existing.alternatives().unwrap_or_else(|| vec![existing]);
            match node.alternatives() {
                Some(mut more) => alternatives.append(&mut more),
                None => alternatives.push(node),
            }
            Node::alt(alternatives)
        }
        None => node,
    }
}

/// Turns an ABNF `repetition` match into the node it denotes, applying `*n` / `n*m` / `n`
/// bounds from its optional `repeat` child.
fn node_from_repetition(repetition: &MatchNode<'_>, ruleset: &Ruleset) -> Result<Node, CompileError> {
    let element = repetition
        .get_field("element")
        .expect("\"repetition\" always has an \"element\" child");
    let choice = element
        .children()
        .first()
        .expect("\"element\" always has exactly one chosen child");

    let node = match choice.name() {
        "rulename" => {
            let name = String::from_utf8_lossy(choice.value());
            ruleset
                .get(&name)
                .cloned()
                .ok_or_else(|| CompileError::RuleNotFound(name.into_owned().into_boxed_str()))?
        }
        "group" => {
            let alternation = choice
                .search("alternation")
                .into_iter()
                .next()
                .expect("\"group\" always contains an \"alternation\" descendant");
            node_from_alternation(alternation, ruleset)?
        }
        "option" => {
            let alternation = choice
                .search("alternation")
                .into_iter()
                .next()
                .expect("\"option\" always contains an \"alternation\" descendant");
            Node::option(node_from_alternation(alternation, ruleset)?)
        }
        "char-val" => node_from_char_val(choice)?,
        "num-val" => node_from_num_val(choice)?,
        "prose-val" => return Err(CompileError::Unsupported("prose-val")),
        other => unreachable!("unexpected element child: {other}"),
    };

    match repetition.get_field("repeat") {
        Some(repeat) => {
            let (min, max) = parse_repeat(repeat.value())?;
            Ok(Node::repeat(node, min, max))
        }
        None => Ok(node),
    }
}

fn parse_repeat(value: &[u8]) -> Result<(usize, Option<usize>), CompileError> {
    let text = std::str::from_utf8(value)
        .map_err(|_| CompileError::Malformed("repeat count is not valid UTF-8".into()))?;
    match text.split_once('*') {
        Some((min, max)) => {
            let min = if min.is_empty() {
                0
            } else {
                min.parse()
                    .map_err(|_| CompileError::Malformed(format!("invalid repeat minimum: {min}")))?
            };
            let max = if max.is_empty() {
                None
            } else {
                Some(
                    max.parse()
                        .map_err(|_| CompileError::Malformed(format!("invalid repeat maximum: {max}")))?,
                )
            };
            Ok((min, max))
        }
        None => {
            let n: usize = text
                .parse()
                .map_err(|_| CompileError::Malformed(format!("invalid repeat count: {text}")))?;
            Ok((n, Some(n)))
        }
    }
}

fn node_from_char_val(char_val: &MatchNode<'_>) -> Result<Node, CompileError> {
    let variant = char_val
        .children()
        .first()
        .expect("\"char-val\" always has one chosen child");
    let quoted = variant
        .search("quoted-string")
        .into_iter()
        .next()
        .expect("a char-val variant always contains a \"quoted-string\" descendant");

    let mut value = Vec::new();
    for child in quoted.children() {
        if child.name() != "DQUOTE" {
            value.extend_from_slice(child.value());
        }
    }

    let case_sensitive = variant.name() == "case-sensitive-string";
    Ok(if case_sensitive {
        Node::literal_case_sensitive(value)
    } else {
        Node::literal(value)
    })
}

fn node_from_num_val(num_val: &MatchNode<'_>) -> Result<Node, CompileError> {
    let radix_node = num_val
        .children()
        .get(1)
        .expect("\"num-val\" always has a radix choice as its second child");
    let radix: u32 = match radix_node.name() {
        "bin-val" => 2,
        "dec-val" => 10,
        "hex-val" => 16,
        other => unreachable!("unexpected num-val child: {other}"),
    };

    let digits = &radix_node.value()[1..];
    let text = std::str::from_utf8(digits)
        .map_err(|_| CompileError::Malformed("numeric literal is not valid UTF-8".into()))?;

    if let Some((min, max)) = text.split_once('-') {
        let min = parse_byte(min, radix)?;
        let max = parse_byte(max, radix)?;
        Ok(Node::ranged(min, max))
    } else if text.contains('.') {
        let bytes = text
            .split('.')
            .map(|part| parse_byte(part, radix).map(|b| Node::literal([b])))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::concat_many(bytes))
    } else {
        Ok(Node::literal([parse_byte(text, radix)?]))
    }
}

fn parse_byte(text: &str, radix: u32) -> Result<u8, CompileError> {
    let value = u32::from_str_radix(text, radix)
        .map_err(|_| CompileError::Malformed(format!("invalid numeric literal: {text}")))?;
    u8::try_from(value).map_err(|_| CompileError::Malformed(format!("numeric literal out of byte range: {text}")))
}

fn nodes_from_concatenation(
    concatenation: &MatchNode<'_>,
    ruleset: &Ruleset,
) -> Result<Vec<Node>, CompileError> {
    concatenation
        .get_field_all("repetition")
        .into_iter()
        .map(|repetition| node_from_repetition(repetition, ruleset))
        .collect()
}

fn nodes_from_alternation(alternation: &MatchNode<'_>, ruleset: &Ruleset) -> Result<Vec<Node>, CompileError> {
    let mut concatenations = vec![alternation
        .get_field("concatenation")
        .expect("\"alternation\" always has at least one \"concatenation\" child")];
    for child in &alternation.children()[1..] {
        if let Some(c) = child.get_field("concatenation") {
            concatenations.push(c);
        }
    }

    concatenations
        .into_iter()
        .map(|concatenation| {
            let mut nodes = nodes_from_concatenation(concatenation, ruleset)?;
            Ok(if nodes.len() == 1 {
                nodes.pop().unwrap()
            } else {
                Node::concat_many(nodes)
            })
        })
        .collect()
}

fn node_from_alternation(alternation: &MatchNode<'_>, ruleset: &Ruleset) -> Result<Node, CompileError> {
    let mut nodes = nodes_from_alternation(alternation, ruleset)?;
    let node = if nodes.len() == 1 {
        nodes.pop().unwrap()
    } else {
        Node::alt(nodes)
    };
    log::trace!("compiled alternation into a {} node", node.category());
    Ok(node)
}
