pub mod compose;
pub mod editing;
pub mod editor;
pub mod markup;
pub mod models;
pub mod registry;

// Re-export key types for easier usage
pub use compose::{Candidate, ComposeError, ComposeSession, ComposeState, Trigger, VariableGroup};
pub use editing::{Cmd, Document, Patch, Point, SavedCaret};
pub use editor::{BlurTarget, Editor, EditorEvent, Key};
pub use markup::{
    ContentSignature, deserialize, is_equivalent, serialize, signature, strip_to_plain,
};
pub use models::{Channel, MentionKind, Node, Role, Roster, TemplateVariable};
pub use registry::{EditorId, EditorRegistry, SharedEditor};
