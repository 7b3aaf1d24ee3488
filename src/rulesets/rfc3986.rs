//! RFC 3986 (Uniform Resource Identifier) grammar.
//!
//! Not present in the material this crate is otherwise grounded on; authored directly from
//! RFC 3986 Appendix A, the generic-URI syntax referenced by several of the other
//! prepackaged rulesets.
use std::sync::OnceLock;

use crate::ruleset::Ruleset;

const SOURCE: &[u8] = b"\
URI = scheme \":\" hier-part [ \"?\" query ] [ \"#\" fragment ]\r\n\
hier-part = \"//\" authority path-abempty / path-absolute / path-rootless / path-empty\r\n\
URI-reference = URI / relative-ref\r\n\
absolute-URI = scheme \":\" hier-part [ \"?\" query ]\r\n\
relative-ref = relative-part [ \"?\" query ] [ \"#\" fragment ]\r\n\
relative-part = \"//\" authority path-abempty / path-absolute / path-noscheme / path-empty\r\n\
scheme = ALPHA *( ALPHA / DIGIT / \"+\" / \"-\" / \".\" )\r\n\
authority = [ userinfo \"@\" ] host [ \":\" port ]\r\n\
userinfo = *( unreserved / pct-encoded / sub-delims / \":\" )\r\n\
host = IP-literal / IPv4address / reg-name\r\n\
port = *DIGIT\r\n\
IP-literal = \"[\" ( IPv6address / IPvFuture ) \"]\"\r\n\
IPvFuture = \"v\" 1*HEXDIG \".\" 1*( unreserved / sub-delims / \":\" )\r\n\
IPv6address = 6( h16 \":\" ) ls32 / \"::\" 5( h16 \":\" ) ls32 / [ h16 ] \"::\" 4( h16 \":\" ) ls32 / [ *1( h16 \":\" ) h16 ] \"::\" 3( h16 \":\" ) ls32 / [ *2( h16 \":\" ) h16 ] \"::\" 2( h16 \":\" ) ls32 / [ *3( h16 \":\" ) h16 ] \"::\" h16 \":\" ls32 / [ *4( h16 \":\" ) h16 ] \"::\" ls32 / [ *5( h16 \":\" ) h16 ] \"::\" h16 / [ *6( h16 \":\" ) h16 ] \"::\"\r\n\
h16 = 1*4HEXDIG\r\n\
ls32 = ( h16 \":\" h16 ) / IPv4address\r\n\
IPv4address = dec-octet \".\" dec-octet \".\" dec-octet \".\" dec-octet\r\n\
dec-octet = \"25\" %x30-35 / \"2\" %x30-34 DIGIT / \"1\" 2DIGIT / %x31-39 DIGIT / DIGIT\r\n\
reg-name = *( unreserved / pct-encoded / sub-delims )\r\n\
path = path-abempty / path-absolute / path-noscheme / path-rootless / path-empty\r\n\
path-abempty = *( \"/\" segment )\r\n\
path-absolute = \"/\" [ segment-nz *( \"/\" segment ) ]\r\n\
path-noscheme = segment-nz-nc *( \"/\" segment )\r\n\
path-rootless = segment-nz *( \"/\" segment )\r\n\
path-empty = \"\"\r\n\
segment = *pchar\r\n\
segment-nz = 1*pchar\r\n\
segment-nz-nc = 1*( unreserved / pct-encoded / sub-delims / \"@\" )\r\n\
pchar = unreserved / pct-encoded / sub-delims / \":\" / \"@\"\r\n\
query = *( pchar / \"/\" / \"?\" )\r\n\
fragment = *( pchar / \"/\" / \"?\" )\r\n\
pct-encoded = \"%\" HEXDIG HEXDIG\r\n\
unreserved = ALPHA / DIGIT / \"-\" / \".\" / \"_\" / \"~\"\r\n\
reserved = gen-delims / sub-delims\r\n\
gen-delims = \":\" / \"/\" / \"?\" / \"#\" / \"[\" / \"]\" / \"@\"\r\n\
sub-delims = \"!\" / \"$\" / \"&\" / \"'\" / \"(\" / \")\" / \"*\" / \"+\" / \",\" / \";\" / \"=\"\r\n\
";

/// The RFC 3986 URI grammar, built once and shared process-wide.
pub fn ruleset() -> &'static Ruleset {
    static RULESET: OnceLock<Ruleset> = OnceLock::new();
    RULESET.get_or_init(|| {
        Ruleset::from_source(SOURCE).expect("the embedded RFC 3986 grammar always compiles")
    })
}
