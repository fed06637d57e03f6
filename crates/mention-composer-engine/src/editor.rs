use crate::compose::{Candidate, ComposeError, ComposeSession, ComposeState, Trigger};
use crate::editing::{Cmd, Document};
use crate::markup::tokens;
use crate::markup::{deserialize, serialize};
use crate::models::{MentionKind, Node, Roster};

/// Keyboard input the host surface forwards to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Left,
    Right,
    Escape,
}

/// Where focus went when the surface blurred. Focus moving into the
/// suggestion surface or the trigger button keeps the composition alive;
/// anywhere else cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurTarget {
    SuggestionSurface,
    TriggerButton,
    Other,
}

/// Events emitted synchronously from the handler that caused them. No
/// keystroke is ever processed between a `MentionStart` and its matching
/// `MentionEnd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A composition opened or its search string changed. `anchor` is the
    /// caret unit position; the host maps it to a screen rectangle when
    /// anchoring the suggestion surface.
    MentionStart {
        kind: MentionKind,
        search: String,
        anchor: usize,
    },
    MentionEnd,
    /// Committed content changed. `value` is the serialized string for the
    /// surrounding form state. Never emitted mid-composition, so the value
    /// never contains a placeholder.
    Changed { value: String },
    Focused,
    Blurred { target: BlurTarget },
}

/// One editing surface: a document, its composition state, and the roster
/// used to resolve labels.
///
/// Strictly event-driven: every mutation happens synchronously inside one
/// of the handler methods, on the caller's thread. The only asynchrony in
/// the wider feature (fetching candidate lists) lives outside; by the
/// time a session opens the roster is already resident.
#[derive(Debug, Clone)]
pub struct Editor {
    doc: Document,
    state: ComposeState,
    roster: Roster,
    /// Serialized committed content; the durable artifact handed to form
    /// state via `Changed` events.
    value: String,
    focused: bool,
}

impl Editor {
    /// Mounts a surface over a persisted value (serialized markup or
    /// legacy plain text).
    pub fn new(initial: &str, roster: Roster) -> Self {
        let doc = deserialize(initial);
        let value = serialize(&doc, &roster);
        Self {
            doc,
            state: ComposeState::Idle,
            roster,
            value,
            focused: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The current serialized value (committed content only).
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn is_composing(&self) -> bool {
        self.state.is_composing()
    }

    pub fn session(&self) -> Option<&ComposeSession> {
        self.state.session()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Swaps in a fresh roster. Labels re-resolve on the next
    /// serialization; raw values are untouched, so this is never a content
    /// change.
    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = roster;
        if !self.state.is_composing() {
            self.value = serialize(&self.doc, &self.roster);
        }
    }

    pub fn focus(&mut self) -> Vec<EditorEvent> {
        self.focused = true;
        vec![EditorEvent::Focused]
    }

    pub fn blur(&mut self, target: BlurTarget) -> Vec<EditorEvent> {
        self.focused = false;
        let mut events = Vec::new();
        if matches!(target, BlurTarget::Other) {
            self.cancel_active(&mut events);
        }
        events.push(EditorEvent::Blurred { target });
        events
    }

    /// Routes one keystroke through trigger detection and the document.
    pub fn handle_key(&mut self, key: Key) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        match key {
            Key::Char(c) => self.handle_char(c, &mut events),
            Key::Backspace => self.handle_backspace(&mut events),
            Key::Left => {
                self.cancel_active(&mut events);
                self.doc.move_left();
            }
            Key::Right => {
                self.cancel_active(&mut events);
                self.doc.move_right();
            }
            Key::Escape => self.cancel_active(&mut events),
        }
        events
    }

    /// Starts a composition from outside the keyboard path (a toolbar
    /// trigger button). An already-active session is cancelled first.
    pub fn begin_mention(&mut self, kind: MentionKind) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        self.cancel_active(&mut events);
        self.start_session(kind, &mut events);
        events
    }

    /// Commits the active composition with the selected candidate: the
    /// placeholder and typed search span are replaced by the mention in a
    /// single operation and the caret lands after it.
    pub fn commit_mention(&mut self, candidate: &Candidate) -> Result<Vec<EditorEvent>, ComposeError> {
        let Some(session) = self.state.take() else {
            return Err(ComposeError::NotComposing);
        };
        if candidate.kind != session.kind() {
            let active = session.kind();
            // a mismatched selection must not kill the session
            self.state = ComposeState::Composing(session);
            return Err(ComposeError::KindMismatch {
                active,
                candidate: candidate.kind,
            });
        }
        let mention = Node::mention_with_label(
            candidate.kind,
            candidate.raw_value.clone(),
            candidate.label.clone(),
        );
        session.commit(&mut self.doc, mention);
        let mut events = vec![EditorEvent::MentionEnd];
        self.refresh_value(&mut events);
        Ok(events)
    }

    /// Cancels the active composition, if any: the placeholder is removed
    /// with no other side effect.
    pub fn cancel_mention(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        self.cancel_active(&mut events);
        events
    }

    fn handle_char(&mut self, c: char, events: &mut Vec<EditorEvent>) {
        // single-block content model: line breaks are not insertable
        if c == '\n' || c == '\r' {
            return;
        }
        if let Some(session) = self.state.session().copied() {
            if session.kind() == MentionKind::Variable && c == Trigger::VARIABLE_CLOSE {
                self.finish_variable_fast_path(events);
                return;
            }
            self.doc.apply(Cmd::InsertText {
                at: self.doc.caret(),
                text: c.to_string(),
            });
            events.push(self.mention_start_event(&session));
            return;
        }
        if let Some(kind) = Trigger::kind_for(c) {
            self.start_session(kind, events);
            return;
        }
        self.replace_selection_if_any();
        self.doc.apply(Cmd::InsertText {
            at: self.doc.caret(),
            text: c.to_string(),
        });
        self.refresh_value(events);
    }

    fn handle_backspace(&mut self, events: &mut Vec<EditorEvent>) {
        if let Some(session) = self.state.session().copied() {
            if session.search(&self.doc).is_empty() {
                // the caret sits right after the placeholder: deleting it
                // ends the session
                self.state = ComposeState::Idle;
                session.cancel(&mut self.doc);
                events.push(EditorEvent::MentionEnd);
            } else {
                let caret = self.doc.caret();
                self.doc.apply(Cmd::DeleteRange {
                    range: (caret - 1)..caret,
                });
                events.push(self.mention_start_event(&session));
            }
            return;
        }
        let sel = self.doc.selection();
        if !sel.is_empty() {
            self.doc.apply(Cmd::DeleteRange { range: sel });
            self.refresh_value(events);
            return;
        }
        let caret = self.doc.caret();
        if caret == 0 {
            return;
        }
        // one unit back: a character, or a whole void node
        self.doc.apply(Cmd::DeleteRange {
            range: (caret - 1)..caret,
        });
        self.refresh_value(events);
    }

    fn start_session(&mut self, kind: MentionKind, events: &mut Vec<EditorEvent>) {
        self.replace_selection_if_any();
        let session = ComposeSession::begin(&mut self.doc, kind);
        self.state = ComposeState::Composing(session);
        events.push(self.mention_start_event(&session));
    }

    fn finish_variable_fast_path(&mut self, events: &mut Vec<EditorEvent>) {
        let Some(session) = self.state.take() else {
            return;
        };
        let name = session.search(&self.doc);
        if name.is_empty() {
            // `{}` commits nothing; the session just ends
            session.cancel(&mut self.doc);
        } else {
            let raw = tokens::raw_value(MentionKind::Variable, &name);
            session.commit(&mut self.doc, Node::mention(MentionKind::Variable, raw));
        }
        events.push(EditorEvent::MentionEnd);
        self.refresh_value(events);
    }

    fn cancel_active(&mut self, events: &mut Vec<EditorEvent>) {
        if let Some(session) = self.state.take() {
            session.cancel(&mut self.doc);
            events.push(EditorEvent::MentionEnd);
            self.refresh_value(events);
        }
    }

    fn replace_selection_if_any(&mut self) {
        let sel = self.doc.selection();
        if !sel.is_empty() {
            self.doc.apply(Cmd::DeleteRange { range: sel });
        }
    }

    fn mention_start_event(&self, session: &ComposeSession) -> EditorEvent {
        EditorEvent::MentionStart {
            kind: session.kind(),
            search: session.search(&self.doc),
            anchor: self.doc.caret(),
        }
    }

    fn refresh_value(&mut self, events: &mut Vec<EditorEvent>) {
        let value = serialize(&self.doc, &self.roster);
        if value != self.value {
            self.value = value.clone();
            events.push(EditorEvent::Changed { value });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(initial: &str) -> Editor {
        Editor::new(initial, Roster::new())
    }

    fn type_str(ed: &mut Editor, s: &str) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        for c in s.chars() {
            events.extend(ed.handle_key(Key::Char(c)));
        }
        events
    }

    // ============ Plain typing ============

    #[test]
    fn typing_emits_changed_with_serialized_value() {
        let mut ed = editor("");
        let events = type_str(&mut ed, "hi");
        assert_eq!(ed.value(), "<span data-slate-leaf>hi</span>");
        assert!(matches!(
            events.last(),
            Some(EditorEvent::Changed { value }) if value == ed.value()
        ));
    }

    #[test]
    fn line_breaks_are_ignored() {
        let mut ed = editor("");
        type_str(&mut ed, "a");
        assert!(ed.handle_key(Key::Char('\n')).is_empty());
        assert_eq!(ed.document().to_plain_text(), "a");
    }

    // ============ Trigger detection ============

    #[test]
    fn trigger_char_is_suppressed_and_opens_session() {
        let mut ed = editor("");
        let events = ed.handle_key(Key::Char('@'));
        assert!(ed.is_composing());
        // the @ itself never lands in the document
        assert_eq!(ed.document().to_plain_text(), "");
        assert_eq!(
            events,
            vec![EditorEvent::MentionStart {
                kind: MentionKind::Role,
                search: String::new(),
                anchor: 1,
            }]
        );
    }

    #[test]
    fn typing_while_composing_updates_search() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('#'));
        let events = type_str(&mut ed, "gen");
        match events.last() {
            Some(EditorEvent::MentionStart { kind, search, anchor }) => {
                assert_eq!(*kind, MentionKind::Channel);
                assert_eq!(search, "gen");
                assert_eq!(*anchor, 4);
            }
            other => panic!("expected MentionStart, got {other:?}"),
        }
    }

    #[test]
    fn no_changed_events_mid_composition() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('@'));
        let events = type_str(&mut ed, "mods");
        assert!(
            events
                .iter()
                .all(|e| !matches!(e, EditorEvent::Changed { .. }))
        );
    }

    #[test]
    fn further_trigger_chars_become_search_text() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('@'));
        ed.handle_key(Key::Char('#'));
        assert!(ed.is_composing());
        assert_eq!(ed.session().unwrap().kind(), MentionKind::Role);
        assert_eq!(ed.session().unwrap().search(ed.document()), "#");
        assert_eq!(ed.document().find_placeholder(), Some(0));
    }

    // ============ Escape and cancel ============

    #[test]
    fn escape_restores_pre_trigger_content() {
        let mut ed = editor("");
        type_str(&mut ed, "hey");
        let before = ed.value().to_string();
        ed.handle_key(Key::Char('#'));
        let events = ed.handle_key(Key::Escape);
        assert_eq!(ed.value(), before);
        assert_eq!(events, vec![EditorEvent::MentionEnd]);
        assert!(!ed.is_composing());
    }

    #[test]
    fn cancel_after_search_keeps_typed_text_as_literal() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('@'));
        type_str(&mut ed, "mo");
        let events = ed.handle_key(Key::Escape);
        assert_eq!(ed.document().to_plain_text(), "mo");
        assert!(events.contains(&EditorEvent::MentionEnd));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, EditorEvent::Changed { value } if value.contains(">mo</span>")))
        );
    }

    #[test]
    fn arrow_keys_cancel_composition() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('@'));
        let events = ed.handle_key(Key::Left);
        assert!(!ed.is_composing());
        assert!(events.contains(&EditorEvent::MentionEnd));
    }

    // ============ Backspace ============

    #[test]
    fn backspace_on_empty_search_ends_session() {
        let mut ed = editor("");
        type_str(&mut ed, "a");
        ed.handle_key(Key::Char('@'));
        let events = ed.handle_key(Key::Backspace);
        assert!(!ed.is_composing());
        assert_eq!(events, vec![EditorEvent::MentionEnd]);
        assert_eq!(ed.document().to_plain_text(), "a");
    }

    #[test]
    fn backspace_shrinks_search_first() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('@'));
        type_str(&mut ed, "ab");
        let events = ed.handle_key(Key::Backspace);
        assert!(ed.is_composing());
        match events.last() {
            Some(EditorEvent::MentionStart { search, .. }) => assert_eq!(search, "a"),
            other => panic!("expected MentionStart, got {other:?}"),
        }
    }

    #[test]
    fn backspace_after_committed_mention_removes_it_whole() {
        let mut ed = editor("hi <@42>");
        assert_eq!(ed.document().nodes().len(), 2);
        let events = ed.handle_key(Key::Backspace);
        assert_eq!(ed.document().to_plain_text(), "hi ");
        assert!(
            events
                .iter()
                .any(|e| matches!(e, EditorEvent::Changed { value } if value == "<span data-slate-leaf>hi </span>"))
        );
    }

    // ============ Commit ============

    #[test]
    fn commit_requires_active_session() {
        let mut ed = editor("");
        let candidate = Candidate {
            kind: MentionKind::Role,
            raw_value: "<@1>".into(),
            label: "@a".into(),
        };
        assert_eq!(
            ed.commit_mention(&candidate),
            Err(ComposeError::NotComposing)
        );
    }

    #[test]
    fn kind_mismatch_keeps_session_alive() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('@'));
        let candidate = Candidate {
            kind: MentionKind::Channel,
            raw_value: "<#1>".into(),
            label: "#a".into(),
        };
        assert_eq!(
            ed.commit_mention(&candidate),
            Err(ComposeError::KindMismatch {
                active: MentionKind::Role,
                candidate: MentionKind::Channel,
            })
        );
        assert!(ed.is_composing());
    }

    // ============ Focus and blur ============

    #[test]
    fn blur_into_suggestion_surface_keeps_session() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('@'));
        let events = ed.blur(BlurTarget::SuggestionSurface);
        assert!(ed.is_composing());
        assert_eq!(
            events,
            vec![EditorEvent::Blurred {
                target: BlurTarget::SuggestionSurface
            }]
        );
    }

    #[test]
    fn blur_elsewhere_cancels_session() {
        let mut ed = editor("");
        ed.handle_key(Key::Char('@'));
        let events = ed.blur(BlurTarget::Other);
        assert!(!ed.is_composing());
        assert!(events.contains(&EditorEvent::MentionEnd));
    }

    #[test]
    fn focus_emits_focused() {
        let mut ed = editor("");
        assert_eq!(ed.focus(), vec![EditorEvent::Focused]);
        assert!(ed.is_focused());
    }

    // ============ Roster swaps ============

    #[test]
    fn set_roster_reresolves_labels_without_changed_event() {
        use crate::models::Role;

        let mut ed = editor("hi <@42>");
        assert!(ed.value().contains(">@role</span>"));
        ed.set_roster(Roster {
            roles: vec![Role {
                id: "42".into(),
                name: "Mods".into(),
            }],
            ..Roster::default()
        });
        assert!(ed.value().contains(">@Mods</span>"));
    }
}
