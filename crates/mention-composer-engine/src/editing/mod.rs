//! # Editing Core
//!
//! Command-based editing over a single-paragraph node tree.
//!
//! ## Architecture
//!
//! - The document is a flat sequence of nodes (text runs and void
//!   mentions) under one paragraph; positions are **caret units**: one
//!   unit per character, one unit per void node.
//! - All edits are `Cmd` values applied through [`Document::apply`], which
//!   returns a [`Patch`] and transforms the selection through the edit.
//! - Void atomicity falls out of the unit model: arrow movement is one
//!   unit and a one-unit deletion removes a whole mention. Partial edits
//!   of a mention are unrepresentable.
//!
//! ## Modules
//!
//! - **`document`**: the `Document` type, navigation, and path operations
//! - **`commands`**: the `Cmd` enum, node surgery, selection transforms
//! - **`patch`**: edit result metadata

pub mod commands;
pub mod document;
pub mod patch;

pub use commands::Cmd;
pub use document::Document;
pub use patch::Patch;

/// A resolved document position: child index plus local unit offset.
/// For a text run the offset is a character offset; void nodes only admit
/// offset 0 (positions inside a void do not exist).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub child: usize,
    pub offset: usize,
}

/// Caret context captured when a mention composition begins.
///
/// The commit step carries this value explicitly instead of re-deriving
/// ambient selection state, so a commit still lands correctly when the
/// host moved focus into a suggestion popover in between. If the live
/// placeholder can no longer be found, the saved position is the fallback
/// insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedCaret {
    /// Unit position immediately after the placeholder at capture time.
    pub position: usize,
    /// Document version at capture time.
    pub version: u64,
}
