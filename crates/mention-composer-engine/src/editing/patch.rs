use std::ops::Range;

/// Result of applying a command to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Unit range occupied by newly inserted content (empty for pure
    /// deletions, anchored at the deletion point).
    pub changed: Range<usize>,
    /// Selection after the edit, already transformed through it.
    pub new_selection: Range<usize>,
    /// Document version after the edit.
    pub version: u64,
}
