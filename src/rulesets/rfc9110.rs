//! RFC 9110 (HTTP Semantics) grammar — a subset covering tokens, field values, media types
//! and a handful of commonly needed headers, grounded on the retrieved original's
//! `rfc9110.py`.
use std::sync::OnceLock;

use super::rfc3986;
use crate::ruleset::Ruleset;

const SOURCE: &[u8] = b"\
OWS = *( SP / HTAB )\r\n\
RWS = 1*( SP / HTAB )\r\n\
BWS = OWS\r\n\
obs-text = %x80-FF\r\n\
quoted-pair = \"\\\" ( HTAB / SP / VCHAR / obs-text )\r\n\
qdtext = HTAB / SP / %x21 / %x23-5B / %x5D-7E / obs-text\r\n\
quoted-string = DQUOTE *( qdtext / quoted-pair ) DQUOTE\r\n\
field-vchar = VCHAR / obs-text\r\n\
field-content = field-vchar [ 1*( SP / HTAB / field-vchar ) field-vchar ]\r\n\
field-value = *field-content\r\n\
tchar = \"!\" / \"#\" / \"$\" / \"%\" / \"&\" / \"'\" / \"*\" / \"+\" / \"-\" / \".\" / \"^\" / \"_\" / \"`\" / \"|\" / \"~\" / DIGIT / ALPHA\r\n\
token = 1*tchar\r\n\
field-name = token\r\n\
absolute-path = 1*( \"/\" segment )\r\n\
parameter-value = ( token / quoted-string )\r\n\
parameter-name = token\r\n\
parameter = parameter-name \"=\" parameter-value\r\n\
parameters = *( OWS \";\" OWS [ parameter ] )\r\n\
Host = uri-host [ \":\" port ]\r\n\
subtype = token\r\n\
type = token\r\n\
media-type = type \"/\" subtype parameters\r\n\
Content-Type = media-type\r\n\
connection-option = token\r\n\
Connection = connection-option *( OWS \",\" OWS connection-option )\r\n\
";

/// The RFC 9110 grammar subset, built once and shared process-wide.
pub fn ruleset() -> &'static Ruleset {
    static RULESET: OnceLock<Ruleset> = OnceLock::new();
    RULESET.get_or_init(|| {
        let rfc3986 = rfc3986::ruleset();
        let mut rules = Ruleset::new();
        rules.insert("segment", rfc3986.get("segment").unwrap().clone());
        rules.insert("uri-host", rfc3986.get("host").unwrap().clone());
        rules.insert("port", rfc3986.get("port").unwrap().clone());
        rules
            .update_from_source(SOURCE)
            .expect("the embedded RFC 9110 grammar always compiles");
        rules
    })
}
