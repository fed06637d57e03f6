use crate::editing::Document;
use crate::markup::tokens;
use crate::models::{MentionKind, Node, Roster};

/// The three fixed visual classes, one per mention kind.
pub const ROLE_CLASS: &str = "mention-role";
pub const CHANNEL_CLASS: &str = "mention-channel";
pub const VARIABLE_CLASS: &str = "mention-variable";

/// Generic labels shown when a roster lookup misses. The raw value is
/// preserved unchanged either way, so a renamed or deleted entity never
/// loses data.
pub const ROLE_FALLBACK_LABEL: &str = "@role";
pub const CHANNEL_FALLBACK_LABEL: &str = "#channel";

pub fn class_for(kind: MentionKind) -> &'static str {
    match kind {
        MentionKind::Role => ROLE_CLASS,
        MentionKind::Channel => CHANNEL_CLASS,
        MentionKind::Variable => VARIABLE_CLASS,
    }
}

/// Serializes a document to the portable markup string held by form state.
///
/// Every text run becomes an inline leaf span with entity-encoded content;
/// each mention becomes a non-editable span carrying its raw value in
/// `data-value` and a human-friendly label as its visible text. Wrapping
/// the text runs too keeps serialized output unambiguously distinguishable
/// from legacy plain strings.
///
/// A live placeholder in the document is a contract violation: callers must
/// finish or cancel the composition first. Debug builds assert; release
/// builds drop the placeholder rather than emit malformed output.
pub fn serialize(doc: &Document, roster: &Roster) -> String {
    let mut out = String::new();
    for node in doc.nodes() {
        match node {
            Node::Text { text } => {
                out.push_str("<span data-slate-leaf>");
                out.push_str(&html_escape::encode_text(text));
                out.push_str("</span>");
            }
            Node::Mention {
                kind, raw_value, ..
            } => {
                let label = mention_label(*kind, raw_value, roster);
                push_mention_span(&mut out, *kind, raw_value, &label);
            }
            Node::Placeholder { .. } => {
                debug_assert!(
                    false,
                    "serialize called on a document with a live placeholder"
                );
                log::warn!("dropping uncommitted mention placeholder during serialization");
            }
        }
    }
    out
}

/// Resolves the visible label for a mention against the roster.
///
/// Role and channel labels require a synchronous lookup; a miss degrades
/// to the generic fallback word. Variable labels are the raw `{key}` form
/// and need no lookup.
pub fn mention_label(kind: MentionKind, raw_value: &str, roster: &Roster) -> String {
    let addressable = tokens::parse_raw(raw_value)
        .filter(|(k, _)| *k == kind)
        .map(|(_, inner)| inner);
    match kind {
        MentionKind::Role => addressable
            .and_then(|id| roster.role_name(id))
            .map(|name| format!("@{name}"))
            .unwrap_or_else(|| ROLE_FALLBACK_LABEL.to_string()),
        MentionKind::Channel => addressable
            .and_then(|id| roster.channel_name(id))
            .map(|name| format!("#{name}"))
            .unwrap_or_else(|| CHANNEL_FALLBACK_LABEL.to_string()),
        MentionKind::Variable => raw_value.to_string(),
    }
}

fn push_mention_span(out: &mut String, kind: MentionKind, raw_value: &str, label: &str) {
    out.push_str("<span class=\"");
    out.push_str(class_for(kind));
    out.push_str(
        "\" data-slate-leaf data-slate-inline data-slate-void data-type=\"mention\" data-mention-type=\"",
    );
    out.push_str(kind.as_str());
    out.push_str("\" data-value=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(raw_value));
    out.push_str("\">");
    out.push_str(&html_escape::encode_text(label));
    out.push_str("</span>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::models::Role;

    fn roster_with_mods() -> Roster {
        Roster {
            roles: vec![Role {
                id: "42".into(),
                name: "Mods".into(),
            }],
            ..Roster::default()
        }
    }

    #[test]
    fn role_mention_resolves_label_from_roster() {
        let doc = Document::from_nodes(vec![
            Node::text("hi "),
            Node::mention(MentionKind::Role, "<@42>"),
        ]);
        let out = serialize(&doc, &roster_with_mods());
        assert_eq!(
            out,
            "<span data-slate-leaf>hi </span>\
             <span class=\"mention-role\" data-slate-leaf data-slate-inline data-slate-void \
             data-type=\"mention\" data-mention-type=\"role\" data-value=\"<@42>\">@Mods</span>"
        );
    }

    #[test]
    fn roster_miss_degrades_to_generic_label() {
        let doc = Document::from_nodes(vec![Node::mention(MentionKind::Role, "<@999>")]);
        let out = serialize(&doc, &roster_with_mods());
        assert!(out.contains(">@role</span>"));
        // the raw value survives the miss untouched
        assert!(out.contains("data-value=\"<@999>\""));
    }

    #[test]
    fn channel_miss_uses_channel_fallback() {
        let doc = Document::from_nodes(vec![Node::mention(MentionKind::Channel, "<#1>")]);
        let out = serialize(&doc, &Roster::new());
        assert!(out.contains(">#channel</span>"));
        assert!(out.contains("data-mention-type=\"channel\""));
    }

    #[test]
    fn variable_label_is_the_raw_form() {
        let doc = Document::from_nodes(vec![Node::mention(MentionKind::Variable, "{level}")]);
        let out = serialize(&doc, &Roster::new());
        assert!(out.contains(">{level}</span>"));
        assert!(out.contains("class=\"mention-variable\""));
    }

    #[test]
    fn text_runs_are_wrapped_and_entity_encoded() {
        let doc = Document::from_nodes(vec![Node::text("a < b & c")]);
        let out = serialize(&doc, &Roster::new());
        assert_eq!(out, "<span data-slate-leaf>a &lt; b &amp; c</span>");
    }

    #[test]
    fn empty_document_serializes_to_empty_string() {
        assert_eq!(serialize(&Document::new(), &Roster::new()), "");
    }

    #[test]
    fn stale_display_cache_does_not_leak_into_output() {
        // the cached label lost to the roster lookup; it is never the
        // source of truth
        let doc = Document::from_nodes(vec![Node::mention_with_label(
            MentionKind::Role,
            "<@42>",
            "@OldName",
        )]);
        let out = serialize(&doc, &roster_with_mods());
        assert!(out.contains(">@Mods</span>"));
    }
}
