use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::editing::Document;
use crate::markup::tokens;
use crate::models::{MentionKind, Node};

/// Matches one element of the constrained markup subset the serializer
/// emits: `<tag attrs>inner</tag>`. The attribute section tolerates `>`
/// inside quoted values (`data-value="<@42>"`), and the inner text cannot
/// contain `<` because the serializer entity-encodes it. The grammar is
/// `(text | void-mention-element)*` with no nesting, so a regex scanner is
/// sufficient here; a growing surface would need a real parser.
fn element_re() -> &'static Regex {
    static ELEMENT_RE: OnceLock<Regex> = OnceLock::new();
    ELEMENT_RE.get_or_init(|| {
        Regex::new(
            r#"<([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>([^<]*)</[A-Za-z][A-Za-z0-9-]*\s*>"#,
        )
        .expect("invalid element regex")
    })
}

/// Matches a single attribute, with or without a quoted value.
fn attr_re() -> &'static Regex {
    static ATTR_RE: OnceLock<Regex> = OnceLock::new();
    ATTR_RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z][A-Za-z0-9_-]*)(?:\s*=\s*"([^"]*)")?"#)
            .expect("invalid attribute regex")
    })
}

/// The legacy inline-token alternation. Splits plain text into alternating
/// text and token spans; anything the alternation does not match (stray
/// `{`, lone `<@`) stays literal text.
fn legacy_token_re() -> &'static Regex {
    static LEGACY_TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    LEGACY_TOKEN_RE
        .get_or_init(|| Regex::new(r"(\{[^}]+\}|<@[^>]+>|<#[^>]+>)").expect("invalid token regex"))
}

/// Chooses the markup path over the legacy plain-text path. Serialized
/// output always contains at least one complete element (text runs are
/// wrapped in leaf spans), so requiring one here keeps legacy strings with
/// stray angle brackets on the token path. Legacy tokens like `<@42>`
/// never qualify.
pub fn looks_like_markup(input: &str) -> bool {
    element_re().is_match(input)
}

/// Parses a persisted value back into a document.
///
/// Accepts either previously serialized markup or legacy plain text with
/// inline raw tokens; both arrive at an equivalent node list. This never
/// fails: malformed input degrades to literal text, and the caret starts
/// at the end of the restored content.
pub fn deserialize(input: &str) -> Document {
    let nodes = if looks_like_markup(input) {
        parse_markup(input)
    } else {
        parse_plain(input)
    };
    Document::from_nodes(nodes)
}

/// Strips a persisted value down to the raw-token plain form sent to the
/// backend: every mention span is replaced by its `data-value`, every text
/// span by its decoded text. Plain legacy input passes through unchanged.
pub fn strip_to_plain(input: &str) -> String {
    deserialize(input).to_plain_text()
}

fn decode(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

fn push_text(nodes: &mut Vec<Node>, text: String) {
    if !text.is_empty() {
        nodes.push(Node::Text { text });
    }
}

fn parse_attrs(attrs: &str) -> HashMap<String, String> {
    attr_re()
        .captures_iter(attrs)
        .map(|caps| {
            let name = caps[1].to_string();
            let value = caps.get(2).map_or(String::new(), |v| decode(v.as_str()));
            (name, value)
        })
        .collect()
}

/// Reads a mention out of an element's attributes. `data-value` is
/// authoritative; the visible label may be stale or localized and is only
/// kept as a display cache. Returns `None` when the element is not flagged
/// as a mention or carries no usable value.
fn mention_from_attrs(attrs: &HashMap<String, String>, label: &str) -> Option<Node> {
    let flagged = attrs.get("data-type").map(String::as_str) == Some("mention")
        || attrs.contains_key("data-mention-type")
        || attrs.contains_key("data-value");
    if !flagged {
        return None;
    }
    let raw = attrs.get("data-value").filter(|v| !v.is_empty())?.clone();
    let kind = attrs
        .get("data-mention-type")
        .and_then(|v| MentionKind::parse(v))
        .or_else(|| tokens::kind_of(&raw))?;
    Some(Node::Mention {
        kind,
        raw_value: raw,
        display_value: (!label.is_empty()).then(|| label.to_string()),
    })
}

fn parse_markup(input: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;
    for caps in element_re().captures_iter(input) {
        let m = caps.get(0).expect("match group 0 always present");
        if m.start() > last {
            push_text(&mut nodes, decode(&input[last..m.start()]));
        }
        let attrs = parse_attrs(caps.get(2).map_or("", |a| a.as_str()));
        let label = decode(caps.get(3).map_or("", |i| i.as_str()));
        match mention_from_attrs(&attrs, &label) {
            Some(node) => nodes.push(node),
            // a non-mention element contributes its inner text
            None => push_text(&mut nodes, label),
        }
        last = m.end();
    }
    if last < input.len() {
        push_text(&mut nodes, decode(&input[last..]));
    }
    nodes
}

fn parse_plain(input: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;
    for m in legacy_token_re().find_iter(input) {
        if m.start() > last {
            push_text(&mut nodes, input[last..m.start()].to_string());
        }
        let token = m.as_str();
        match tokens::kind_of(token) {
            Some(kind) => nodes.push(Node::mention(kind, token)),
            None => push_text(&mut nodes, token.to_string()),
        }
        last = m.end();
    }
    if last < input.len() {
        push_text(&mut nodes, input[last..].to_string());
    }
    nodes
}
