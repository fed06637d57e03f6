use crate::compose::session::ComposeSession;
use crate::models::MentionKind;

/// The trigger characters that open a mention composition, plus the
/// closing brace that completes the variable fast path. All trigger
/// knowledge lives here; the editor never hardcodes `@`, `#` or `{`.
pub struct Trigger;

impl Trigger {
    pub const ROLE: char = '@';
    pub const CHANNEL: char = '#';
    pub const VARIABLE_OPEN: char = '{';
    pub const VARIABLE_CLOSE: char = '}';

    /// The mention kind a typed character triggers, if any.
    pub fn kind_for(c: char) -> Option<MentionKind> {
        match c {
            Self::ROLE => Some(MentionKind::Role),
            Self::CHANNEL => Some(MentionKind::Channel),
            Self::VARIABLE_OPEN => Some(MentionKind::Variable),
            _ => None,
        }
    }
}

/// Composition state of one editor surface.
///
/// At most one session exists at a time. While composing, further trigger
/// characters are consumed as ordinary search text, so a nested session is
/// unreachable from keyboard input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ComposeState {
    #[default]
    Idle,
    Composing(ComposeSession),
}

impl ComposeState {
    pub fn is_composing(&self) -> bool {
        matches!(self, ComposeState::Composing(_))
    }

    pub fn session(&self) -> Option<&ComposeSession> {
        match self {
            ComposeState::Composing(session) => Some(session),
            ComposeState::Idle => None,
        }
    }

    /// Takes the active session, leaving `Idle` behind.
    pub fn take(&mut self) -> Option<ComposeSession> {
        match std::mem::take(self) {
            ComposeState::Composing(session) => Some(session),
            ComposeState::Idle => None,
        }
    }
}
