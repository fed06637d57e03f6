//! # Mention Composition
//!
//! Trigger detection and the commit protocol that turns a typed `@`, `#`
//! or `{` into a committed mention node.
//!
//! ## Flow
//!
//! 1. A trigger character (or toolbar button) opens a [`ComposeSession`]:
//!    a placeholder void node is inserted at the caret and the caret
//!    context is captured.
//! 2. Subsequent typing accumulates as the search string; the suggestion
//!    surface filters already-resident candidate lists; nothing in the
//!    engine awaits I/O mid-session.
//! 3. The session ends with a commit (placeholder and search span swapped
//!    for the mention in one operation) or a cancel (placeholder removed,
//!    nothing else).
//!
//! ## Modules
//!
//! - **`trigger`**: trigger character table and the `Idle`/`Composing`
//!   state machine
//! - **`session`**: `ComposeSession` begin/search/commit/cancel
//! - **`suggest`**: candidate construction and filtering

pub mod session;
pub mod suggest;
pub mod trigger;

pub use session::ComposeSession;
pub use suggest::{Candidate, VariableGroup, candidates, filter_channels, filter_roles, filter_variables};
pub use trigger::{ComposeState, Trigger};

use thiserror::Error;

use crate::models::MentionKind;

/// Errors from driving the commit protocol outside its contract. The
/// recoverable conditions around composition (roster misses, malformed
/// legacy input, a lost placeholder) are deliberately not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("no mention composition is active")]
    NotComposing,
    #[error("selected a {candidate} candidate while composing a {active} mention")]
    KindMismatch {
        active: MentionKind,
        candidate: MentionKind,
    },
}
