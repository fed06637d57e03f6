use crate::markup::deserialize::deserialize;
use crate::models::Node;

/// Canonical signature of a persisted content string, used to decide
/// whether an edit left "real" unsaved changes.
///
/// `text` is the visible text outside mention spans with whitespace
/// collapsed; `mentions` is the sorted multiset of raw mention tokens.
/// Serialization noise (attribute order, intra-tag whitespace, stale
/// labels) never reaches the signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentSignature {
    pub text: String,
    pub mentions: Vec<String>,
}

/// Extracts the canonical signature of a persisted value (markup or legacy
/// plain text; both paths go through the same tokenizer as deserialization).
pub fn signature(input: &str) -> ContentSignature {
    let doc = deserialize(input);
    let mut text = String::new();
    let mut mentions = Vec::new();
    for node in doc.nodes() {
        match node {
            Node::Text { text: run } => text.push_str(run),
            Node::Mention { raw_value, .. } => mentions.push(raw_value.clone()),
            Node::Placeholder { .. } => {}
        }
    }
    mentions.sort();
    ContentSignature {
        text: collapse_whitespace(&text),
        mentions,
    }
}

/// Semantic equality of two persisted contents: equal normalized text and
/// equal mention-token multisets. Gates "unsaved changes" prompts.
pub fn is_equivalent(a: &str, b: &str) -> bool {
    signature(a) == signature(b)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
