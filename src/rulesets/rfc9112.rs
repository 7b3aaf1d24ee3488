//! RFC 9112 (HTTP/1.1) grammar — a subset covering the start-line and header framing,
//! grounded on the retrieved original's `rfc9112.py`.
use std::sync::OnceLock;

use super::{rfc3986, rfc9110};
use crate::ruleset::Ruleset;

const SOURCE: &[u8] = b"\
message-body = *OCTET\r\n\
field-line = field-name \":\" OWS field-value OWS\r\n\
reason-phrase = 1*( HTAB / SP / VCHAR / obs-text)\r\n\
status-code = 3DIGIT\r\n\
HTTP-name = %s\"HTTP\"\r\n\
HTTP-version = HTTP-name \"/\" DIGIT \".\" DIGIT\r\n\
status-line = HTTP-version SP status-code SP [ reason-phrase ]\r\n\
asterisk-form = \"*\"\r\n\
authority-form = uri-host \":\" port\r\n\
absolute-form = absolute-URI\r\n\
origin-form = absolute-path [ \"?\" query ]\r\n\
request-target = origin-form / absolute-form / authority-form / asterisk-form\r\n\
method = token\r\n\
request-line = method SP request-target SP HTTP-version\r\n\
start-line = request-line / status-line\r\n\
HTTP-message = start-line CRLF *( field-line CRLF ) CRLF [ message-body ]\r\n\
";

/// The RFC 9112 grammar subset, built once and shared process-wide.
pub fn ruleset() -> &'static Ruleset {
    static RULESET: OnceLock<Ruleset> = OnceLock::new();
    RULESET.get_or_init(|| {
        let rfc3986 = rfc3986::ruleset();
        let rfc9110 = rfc9110::ruleset();
        let mut rules = Ruleset::new();
        for name in ["BWS", "OWS", "RWS", "absolute-path", "field-name", "field-value", "obs-text", "quoted-string", "token"] {
            rules.insert(name, rfc9110.get(name).unwrap().clone());
        }
        rules.insert("absolute-URI", rfc3986.get("absolute-URI").unwrap().clone());
        rules.insert("authority", rfc3986.get("authority").unwrap().clone());
        rules.insert("uri-host", rfc3986.get("host").unwrap().clone());
        rules.insert("port", rfc3986.get("port").unwrap().clone());
        rules.insert("query", rfc3986.get("query").unwrap().clone());
        rules
            .update_from_source(SOURCE)
            .expect("the embedded RFC 9112 grammar always compiles");
        rules
    })
}
