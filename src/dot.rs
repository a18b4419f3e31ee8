//! Graphviz DOT vocabulary shared by the table and diagram models.

/// Arrow-end marker, resolved from a relationship end's cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    ZeroOrMore,
    OneOrMore,
    None,
}

impl Marker {
    /// Graphviz arrow-shape keyword for this marker.
    pub fn token(self) -> &'static str {
        match self {
            Marker::ZeroOrMore => "ocrow",
            Marker::OneOrMore => "noneotee",
            Marker::None => "none",
        }
    }
}

pub const CLOSER: &str = "}";

pub fn preamble(font_name: &str) -> String {
    let font = escape_quoted(font_name);
    format!(
        "\
digraph G {{
\tgraph [
\t\tnodesep=0.5,
\t\trankdir=\"LR\",
\t\tconcentrate=true,
\t\tsplines=\"spline\",
\t\tfontname=\"{font}\",
\t\tpad=\"0.2,0.2\",
\t\tlabel=\"\"
\t];

\tnode [shape=plain, fontname=\"{font}\"];
\tedge [
\t\tdir=both,
\t\tfontsize=12,
\t\tarrowsize=0.9,
\t\tpenwidth=1.0,
\t\tlabelangle=32,
\t\tlabeldistance=1.8,
\t\tfontname=\"{font}\"
\t];"
    )
}

/// One end of an edge: `node:port`.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub node: &'a str,
    pub port: &'a str,
}

pub fn edge_statement(
    left: Endpoint<'_>,
    right: Endpoint<'_>,
    head: Option<Marker>,
    tail: Option<Marker>,
) -> String {
    let mut out = format!(
        "\t{}:{} -> {}:{}",
        id(left.node),
        id(left.port),
        id(right.node),
        id(right.port)
    );

    let attrs: Vec<String> = [("arrowhead", head), ("arrowtail", tail)]
        .into_iter()
        .filter_map(|(key, marker)| marker.map(|m| format!("{key}={}", m.token())))
        .collect();
    if !attrs.is_empty() {
        out.push_str(&format!(" [ {} ]", attrs.join(", ")));
    }
    out.push(';');
    out
}

/// Render `s` as a DOT identifier, quoting it unless it is a plain ID.
pub fn id(s: &str) -> String {
    if is_plain_id(s) {
        s.to_string()
    } else {
        format!("\"{}\"", escape_quoted(s))
    }
}

const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

fn is_plain_id(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return false;
    }
    !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s))
}

fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape text placed inside an HTML-like label.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
