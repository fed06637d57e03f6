use std::ops::Range;

use crate::editing::Document;
use crate::models::Node;

/// Commands that can be applied to the document.
///
/// Positions and ranges are measured in caret units (one unit per text
/// character, one unit per void node), so a `DeleteRange` covering a void
/// node's unit always removes the node whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    InsertNode {
        at: usize,
        node: Node,
    },
    DeleteRange {
        range: Range<usize>,
    },
    /// Delete `range`, then insert `node` where it started. Used by the
    /// mention commit to swap the placeholder-plus-search span for the
    /// committed mention in one operation.
    ReplaceRange {
        range: Range<usize>,
        node: Node,
    },
}

/// Apply a command to the document's children, returning the unit range of
/// inserted content.
pub(crate) fn apply_command(doc: &mut Document, cmd: &Cmd) -> Range<usize> {
    match cmd {
        Cmd::InsertText { at, text } => {
            let at = (*at).min(doc.len());
            insert_text(doc, at, text);
            at..at + text.chars().count()
        }
        Cmd::InsertNode { at, node } => {
            let at = (*at).min(doc.len());
            insert_node(doc, at, node.clone());
            at..at + node.unit_len()
        }
        Cmd::DeleteRange { range } => {
            let range = clamp_range(doc, range);
            delete_units(doc, range.clone());
            range.start..range.start
        }
        Cmd::ReplaceRange { range, node } => {
            let range = clamp_range(doc, range);
            delete_units(doc, range.clone());
            insert_node(doc, range.start, node.clone());
            range.start..range.start + node.unit_len()
        }
    }
}

/// Transform a selection through the command being applied.
pub(crate) fn transform_selection_for_command(
    range: &Range<usize>,
    cmd: &Cmd,
) -> Range<usize> {
    match cmd {
        Cmd::InsertText { at, text } => shift_for_insert(range, *at, text.chars().count()),
        Cmd::InsertNode { at, node } => shift_for_insert(range, *at, node.unit_len()),
        Cmd::DeleteRange { range: del } => shift_for_delete(range, del),
        Cmd::ReplaceRange {
            range: replaced,
            node,
        } => {
            let inserted = node.unit_len();
            if replaced.end <= range.start {
                // Replacement is before the selection: shift by net change
                let net = inserted as isize - replaced.len() as isize;
                let start = range.start.saturating_add_signed(net);
                let end = range.end.saturating_add_signed(net);
                start..end
            } else if replaced.start >= range.end {
                range.clone()
            } else {
                // Selection touched the replaced span: land just after the node
                let p = replaced.start + inserted;
                p..p
            }
        }
    }
}

fn shift_for_insert(range: &Range<usize>, at: usize, len: usize) -> Range<usize> {
    if at <= range.start {
        (range.start + len)..(range.end + len)
    } else if at < range.end {
        // Insertion is within the selection: grow the end
        range.start..(range.end + len)
    } else {
        range.clone()
    }
}

fn shift_for_delete(range: &Range<usize>, del: &Range<usize>) -> Range<usize> {
    let del_len = del.len();
    if del.end <= range.start {
        (range.start - del_len)..(range.end - del_len)
    } else if del.start >= range.end {
        range.clone()
    } else {
        // Deletion overlaps the selection: collapse to the deletion point
        del.start..del.start
    }
}

fn clamp_range(doc: &Document, range: &Range<usize>) -> Range<usize> {
    let len = doc.len();
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    start..end
}

/// Byte offset of the `char_offset`-th character in `s`.
fn byte_offset(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

fn insert_text(doc: &mut Document, at: usize, text: &str) {
    if text.is_empty() {
        return;
    }
    let mut pos = 0;
    for i in 0..doc.children.len() {
        let len = doc.children[i].unit_len();
        let is_text = matches!(doc.children[i], Node::Text { .. });
        if is_text && at >= pos && at <= pos + len {
            if let Node::Text { text: run } = &mut doc.children[i] {
                let byte = byte_offset(run, at - pos);
                run.insert_str(byte, text);
            }
            return;
        }
        if !is_text && at == pos {
            doc.children.insert(i, Node::text(text));
            return;
        }
        pos += len;
    }
    doc.children.push(Node::text(text));
}

fn insert_node(doc: &mut Document, at: usize, node: Node) {
    let mut pos = 0;
    for i in 0..doc.children.len() {
        let len = doc.children[i].unit_len();
        if at == pos {
            doc.children.insert(i, node);
            return;
        }
        if at < pos + len {
            // A strictly interior position can only fall inside a text run;
            // voids occupy a single unit and cannot be split.
            let Node::Text { text: run } = &doc.children[i] else {
                doc.children.insert(i, node);
                return;
            };
            let byte = byte_offset(run, at - pos);
            let head = run[..byte].to_string();
            let tail = run[byte..].to_string();
            doc.children[i] = Node::text(head);
            doc.children.insert(i + 1, node);
            doc.children.insert(i + 2, Node::text(tail));
            return;
        }
        pos += len;
    }
    doc.children.push(node);
}

fn delete_units(doc: &mut Document, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    let mut pos = 0;
    let mut out = Vec::with_capacity(doc.children.len());
    for node in doc.children.drain(..) {
        let start = pos;
        pos += node.unit_len();
        if pos <= range.start || start >= range.end {
            out.push(node);
            continue;
        }
        match node {
            Node::Text { text } => {
                let kept: String = text
                    .chars()
                    .enumerate()
                    .filter(|&(i, _)| {
                        let u = start + i;
                        u < range.start || u >= range.end
                    })
                    .map(|(_, c)| c)
                    .collect();
                if !kept.is_empty() {
                    out.push(Node::text(kept));
                }
            }
            // A void overlapping the range is removed whole
            Node::Mention { .. } | Node::Placeholder { .. } => {}
        }
    }
    doc.children = out;
}
