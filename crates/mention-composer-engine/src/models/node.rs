use serde::{Deserialize, Serialize};

/// The closed set of mention flavors the editor understands.
///
/// The kind decides the raw-value syntax (`<@id>`, `<#id>`, `{key}`), the
/// trigger character that opens a composition, and the visual class the
/// serializer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    Role,
    Channel,
    Variable,
}

impl MentionKind {
    /// Stable string form used for `data-mention-type` attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            MentionKind::Role => "role",
            MentionKind::Channel => "channel",
            MentionKind::Variable => "variable",
        }
    }

    /// Parses the `data-mention-type` attribute form back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "role" => Some(MentionKind::Role),
            "channel" => Some(MentionKind::Channel),
            "variable" => Some(MentionKind::Variable),
            _ => None,
        }
    }
}

impl std::fmt::Display for MentionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document node. The document is a single paragraph holding a sequence
/// of these.
///
/// `Mention` and `Placeholder` are void nodes: they carry no editable text
/// and are only ever inserted or removed whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// A plain text run.
    Text { text: String },
    /// A committed mention. `raw_value` is the canonical addressable form
    /// and the only part that is persisted; `display_value` is a cached
    /// human label that may go stale.
    Mention {
        kind: MentionKind,
        raw_value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_value: Option<String>,
    },
    /// A transient marker for an in-progress mention composition. Never
    /// serialized; never outlives its composition session.
    Placeholder { kind: MentionKind },
}

impl Node {
    /// Creates a text run.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// Creates a committed mention with no cached label.
    pub fn mention(kind: MentionKind, raw_value: impl Into<String>) -> Self {
        Node::Mention {
            kind,
            raw_value: raw_value.into(),
            display_value: None,
        }
    }

    /// Creates a committed mention with a cached display label.
    pub fn mention_with_label(
        kind: MentionKind,
        raw_value: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Node::Mention {
            kind,
            raw_value: raw_value.into(),
            display_value: Some(label.into()),
        }
    }

    /// Creates a composition placeholder.
    pub fn placeholder(kind: MentionKind) -> Self {
        Node::Placeholder { kind }
    }

    /// True for the atomic, non-text node variants.
    pub fn is_void(&self) -> bool {
        !matches!(self, Node::Text { .. })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Node::Placeholder { .. })
    }

    /// Length of this node in caret units: one unit per character for text
    /// runs, exactly one unit for a void node. Unit arithmetic is what makes
    /// void nodes atomic under caret movement and deletion.
    pub fn unit_len(&self) -> usize {
        match self {
            Node::Text { text } => text.chars().count(),
            Node::Mention { .. } | Node::Placeholder { .. } => 1,
        }
    }
}
