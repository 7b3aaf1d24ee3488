//! RFC 7239 (Forwarded HTTP Extension) grammar, grounded on the retrieved original's
//! `rfc7239.py`.
use std::sync::OnceLock;

use super::{rfc3986, rfc9110};
use crate::ruleset::Ruleset;

const SOURCE: &[u8] = b"\
value = token / quoted-string\r\n\
forwarded-pair = token \"=\" value\r\n\
forwarded-element = [ forwarded-pair ] *( \";\" [ forwarded-pair ] )\r\n\
Forwarded = forwarded-element *( OWS \",\" OWS forwarded-element )\r\n\
obfport = \"_\" 1*(ALPHA / DIGIT / \".\" / \"_\" / \"-\")\r\n\
port = 1*5DIGIT\r\n\
node-port = port / obfport\r\n\
obfnode = \"_\" 1*( ALPHA / DIGIT / \".\" / \"_\" / \"-\")\r\n\
nodename = IPv4address / \"[\" IPv6address \"]\" / \"unknown\" / obfnode\r\n\
node = nodename [ \":\" node-port ]\r\n\
";

/// The RFC 7239 grammar, built once and shared process-wide.
///
/// The RFC's `Forwarded = 1#forwarded-element` uses the `#`-list construct from RFC 9110
/// Appendix A, which is not an RFC 5234 core construct and is outside this engine's
/// grammar (§4.6's Non-goal). `Forwarded` here is expressed as the RFC 5234-legal
/// equivalent `forwarded-element *( OWS "," OWS forwarded-element )`.
pub fn ruleset() -> &'static Ruleset {
    static RULESET: OnceLock<Ruleset> = OnceLock::new();
    RULESET.get_or_init(|| {
        let rfc3986 = rfc3986::ruleset();
        let rfc9110 = rfc9110::ruleset();
        let mut rules = Ruleset::new();
        rules.insert("token", rfc9110.get("token").unwrap().clone());
        rules.insert("quoted-string", rfc9110.get("quoted-string").unwrap().clone());
        rules.insert("OWS", rfc9110.get("OWS").unwrap().clone());
        rules.insert("IPv4address", rfc3986.get("IPv4address").unwrap().clone());
        rules.insert("IPv6address", rfc3986.get("IPv6address").unwrap().clone());
        rules
            .update_from_source(SOURCE)
            .expect("the embedded RFC 7239 grammar always compiles");
        rules
    })
}
