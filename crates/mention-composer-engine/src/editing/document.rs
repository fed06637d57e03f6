use std::ops::Range;

use crate::editing::{Cmd, Patch, Point};
use crate::models::Node;

/// The in-memory document behind one editor surface: a single paragraph's
/// children plus the current selection.
///
/// Positions are measured in caret units (one per text character, one per
/// void node), which makes void nodes structurally atomic: arrow movement
/// is one unit and a single-unit deletion always removes a whole mention.
///
/// The tree exists only while a surface is mounted. The durable artifact is
/// the serialized string held by the surrounding form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The paragraph's children, in order.
    pub(crate) children: Vec<Node>,
    /// Current selection as unit offsets; collapsed when start == end.
    pub(crate) selection: Range<usize>,
    /// Version number that increments with each edit.
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with the caret at the start.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            selection: 0..0,
            version: 0,
        }
    }

    /// Creates a document from a node list, merging adjacent text runs.
    /// The caret starts at the end.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut doc = Self {
            children: nodes,
            selection: 0..0,
            version: 0,
        };
        doc.normalize();
        let len = doc.len();
        doc.selection = len..len;
        doc
    }

    /// Total length in caret units.
    pub fn len(&self) -> usize {
        self.children.iter().map(Node::unit_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Sets the selection, clamped to the document.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        let len = self.len();
        let start = selection.start.min(len);
        let end = selection.end.min(len).max(start);
        self.selection = start..end;
    }

    /// The caret position (focus end of the selection).
    pub fn caret(&self) -> usize {
        self.selection.end
    }

    /// Applies a command, transforming the selection through it.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let changed = crate::editing::commands::apply_command(self, &cmd);
        let new_selection =
            crate::editing::commands::transform_selection_for_command(&self.selection, &cmd);
        self.normalize();
        self.set_selection(new_selection);
        self.version += 1;

        Patch {
            changed,
            new_selection: self.selection.clone(),
            version: self.version,
        }
    }

    /// Moves the caret one unit left; a void neighbour is crossed whole.
    /// A non-collapsed selection collapses to its start instead.
    pub fn move_left(&mut self) {
        if !self.selection.is_empty() {
            let s = self.selection.start;
            self.selection = s..s;
            return;
        }
        let caret = self.selection.start;
        if caret > 0 {
            self.selection = (caret - 1)..(caret - 1);
        }
    }

    /// Moves the caret one unit right; a void neighbour is crossed whole.
    pub fn move_right(&mut self) {
        if !self.selection.is_empty() {
            let e = self.selection.end;
            self.selection = e..e;
            return;
        }
        let caret = self.selection.end;
        if caret < self.len() {
            self.selection = (caret + 1)..(caret + 1);
        }
    }

    /// Unit range occupied by child `idx`.
    pub fn child_range(&self, idx: usize) -> Range<usize> {
        let start: usize = self.children[..idx].iter().map(Node::unit_len).sum();
        start..start + self.children.get(idx).map_or(0, Node::unit_len)
    }

    /// Resolves a unit position to a child index plus local offset. The
    /// end-of-document position maps to `(children.len(), 0)`.
    pub fn point_at(&self, position: usize) -> Point {
        let mut pos = 0;
        for (i, node) in self.children.iter().enumerate() {
            let len = node.unit_len();
            if position < pos + len {
                return Point {
                    child: i,
                    offset: position - pos,
                };
            }
            pos += len;
        }
        Point {
            child: self.children.len(),
            offset: 0,
        }
    }

    /// The node occupying the unit at `position`, if any.
    pub fn node_at(&self, position: usize) -> Option<&Node> {
        let p = self.point_at(position);
        if p.child < self.children.len() && position < self.len() {
            self.children.get(p.child)
        } else {
            None
        }
    }

    /// Child index of the live placeholder, if one exists. The document
    /// invariant allows at most one.
    pub fn find_placeholder(&self) -> Option<usize> {
        self.children.iter().position(Node::is_placeholder)
    }

    /// Concatenated text of the text runs overlapping `range`. Void nodes
    /// contribute nothing.
    pub fn text_in(&self, range: Range<usize>) -> String {
        let mut out = String::new();
        let mut pos = 0;
        for node in &self.children {
            if pos >= range.end {
                break;
            }
            let len = node.unit_len();
            if let Node::Text { text } = node {
                for (i, ch) in text.chars().enumerate() {
                    let u = pos + i;
                    if u >= range.start && u < range.end {
                        out.push(ch);
                    }
                }
            }
            pos += len;
        }
        out
    }

    /// The raw-token plain form: text runs verbatim, mentions as their raw
    /// values. This is the shape sent to the backend on save. Placeholders
    /// contribute nothing.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text { text } => out.push_str(text),
                Node::Mention { raw_value, .. } => out.push_str(raw_value),
                Node::Placeholder { .. } => {}
            }
        }
        out
    }

    /// Inserts a node before child `idx` (`idx == children.len()` appends).
    pub fn insert_node_at(&mut self, idx: usize, node: Node) -> Patch {
        let at = self.child_range(idx.min(self.children.len())).start;
        self.apply(Cmd::InsertNode { at, node })
    }

    /// Removes child `idx` whole, returning it.
    pub fn remove_node_at(&mut self, idx: usize) -> Option<Node> {
        let node = self.children.get(idx).cloned()?;
        let range = self.child_range(idx);
        self.apply(Cmd::DeleteRange { range });
        Some(node)
    }

    /// Replaces child `idx` with `node` in a single operation.
    pub fn replace_node_at(&mut self, idx: usize, node: Node) -> Option<Patch> {
        if idx >= self.children.len() {
            return None;
        }
        let range = self.child_range(idx);
        Some(self.apply(Cmd::ReplaceRange { range, node }))
    }

    /// Merges adjacent text runs and drops empty ones. Unit positions are
    /// unaffected, so the selection stays valid.
    pub(crate) fn normalize(&mut self) {
        let mut out: Vec<Node> = Vec::with_capacity(self.children.len());
        for node in self.children.drain(..) {
            if let Node::Text { text } = &node {
                if text.is_empty() {
                    continue;
                }
                if let Some(Node::Text { text: prev }) = out.last_mut() {
                    prev.push_str(text);
                    continue;
                }
            }
            out.push(node);
        }
        self.children = out;
        debug_assert!(
            self.children.iter().filter(|n| n.is_placeholder()).count() <= 1,
            "at most one composition placeholder may exist"
        );
    }
}
