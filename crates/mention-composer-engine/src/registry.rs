use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::Editor;

/// Logical identifier for an editor surface, stable across re-renders of
/// the host component tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorId(Uuid);

impl EditorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EditorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a mounted editor. Surfaces are single-threaded and
/// event-driven, so `Rc<RefCell<_>>` is the ownership model; no locking.
pub type SharedEditor = Rc<RefCell<Editor>>;

/// Locates live editor instances by logical id for consumers outside the
/// component tree, such as toolbar trigger buttons.
///
/// The registry is an explicit object passed by reference to whoever needs
/// it, never ambient global state. It holds weak handles: when a surface
/// unmounts and drops its editor, the entry dies with it and is pruned on
/// the next lookup.
#[derive(Debug, Default)]
pub struct EditorRegistry {
    editors: HashMap<EditorId, Weak<RefCell<Editor>>>,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mounted editor under `id`. Re-registering an id simply
    /// points it at the new instance (latest mount wins).
    pub fn register(&mut self, id: EditorId, editor: &SharedEditor) {
        self.editors.insert(id, Rc::downgrade(editor));
    }

    /// Removes an entry eagerly, typically on unmount.
    pub fn unregister(&mut self, id: EditorId) {
        self.editors.remove(&id);
    }

    /// Resolves an id to a live editor, pruning the entry when the editor
    /// has been dropped.
    pub fn get(&mut self, id: EditorId) -> Option<SharedEditor> {
        match self.editors.get(&id).and_then(Weak::upgrade) {
            Some(editor) => Some(editor),
            None => {
                self.editors.remove(&id);
                None
            }
        }
    }

    /// Runs `f` against the live editor for `id`, if any.
    pub fn with<R>(&mut self, id: EditorId, f: impl FnOnce(&mut Editor) -> R) -> Option<R> {
        let editor = self.get(id)?;
        let result = f(&mut editor.borrow_mut());
        Some(result)
    }

    /// Number of registered entries, dead or alive.
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MentionKind, Roster};

    fn mounted_editor() -> SharedEditor {
        Rc::new(RefCell::new(Editor::new("", Roster::new())))
    }

    #[test]
    fn register_and_resolve() {
        let mut registry = EditorRegistry::new();
        let id = EditorId::new();
        let editor = mounted_editor();
        registry.register(id, &editor);
        assert!(registry.get(id).is_some());
    }

    #[test]
    fn dropped_editor_is_pruned_on_lookup() {
        let mut registry = EditorRegistry::new();
        let id = EditorId::new();
        {
            let editor = mounted_editor();
            registry.register(id, &editor);
        }
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn with_drives_the_editor_from_outside() {
        let mut registry = EditorRegistry::new();
        let id = EditorId::new();
        let editor = mounted_editor();
        registry.register(id, &editor);

        // a toolbar button starting a mention without holding the editor
        registry.with(id, |ed| {
            ed.begin_mention(MentionKind::Role);
        });
        assert!(editor.borrow().is_composing());
    }

    #[test]
    fn latest_registration_wins() {
        let mut registry = EditorRegistry::new();
        let id = EditorId::new();
        let first = mounted_editor();
        let second = mounted_editor();
        registry.register(id, &first);
        registry.register(id, &second);
        let resolved = registry.get(id).unwrap();
        assert!(Rc::ptr_eq(&resolved, &second));
    }
}
