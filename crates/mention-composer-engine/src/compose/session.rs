use std::ops::Range;

use crate::editing::{Cmd, Document, SavedCaret};
use crate::models::{MentionKind, Node};

/// One in-flight mention composition.
///
/// A session is opened by a trigger character (or a toolbar button),
/// carries the caret context captured at that moment, and ends in exactly
/// one of two ways: a commit that swaps the placeholder for a mention, or
/// a cancel that removes the placeholder. The placeholder never outlives
/// its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeSession {
    kind: MentionKind,
    saved: SavedCaret,
}

impl ComposeSession {
    /// Opens a session: inserts the placeholder at the caret (the trigger
    /// character itself is never inserted) and captures the caret context.
    pub fn begin(doc: &mut Document, kind: MentionKind) -> Self {
        doc.apply(Cmd::InsertNode {
            at: doc.caret(),
            node: Node::placeholder(kind),
        });
        Self {
            kind,
            saved: SavedCaret {
                position: doc.caret(),
                version: doc.version(),
            },
        }
    }

    pub fn kind(&self) -> MentionKind {
        self.kind
    }

    /// The caret context captured when composition began. Hosts use this
    /// to anchor the suggestion surface.
    pub fn saved(&self) -> SavedCaret {
        self.saved
    }

    /// The live search string: the text typed since the placeholder.
    pub fn search(&self, doc: &Document) -> String {
        match self.composed_span(doc) {
            Some(span) => doc.text_in((span.start + 1)..span.end),
            None => String::new(),
        }
    }

    /// The unit span from the placeholder through the caret, the region a
    /// commit replaces. `None` when the placeholder is gone.
    pub fn composed_span(&self, doc: &Document) -> Option<Range<usize>> {
        let idx = doc.find_placeholder()?;
        let start = doc.child_range(idx).start;
        let end = doc.caret().max(start + 1);
        Some(start..end)
    }

    /// Commits the session: replaces the placeholder and the typed search
    /// span with `mention` in a single operation and leaves the caret
    /// right after it.
    ///
    /// If the placeholder can no longer be located, the commit degrades to
    /// inserting at the current caret instead of aborting.
    pub fn commit(self, doc: &mut Document, mention: Node) {
        match self.composed_span(doc) {
            Some(span) => {
                doc.apply(Cmd::ReplaceRange {
                    range: span,
                    node: mention,
                });
            }
            None => {
                log::warn!("mention commit lost its placeholder; inserting at the caret");
                doc.apply(Cmd::InsertNode {
                    at: doc.caret(),
                    node: mention,
                });
            }
        }
    }

    /// Cancels the session: removes the placeholder and nothing else.
    /// Text typed as search stays behind as literal text.
    pub fn cancel(self, doc: &mut Document) {
        if let Some(idx) = doc.find_placeholder() {
            doc.remove_node_at(idx);
        }
    }
}
