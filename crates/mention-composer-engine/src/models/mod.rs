pub mod node;
pub mod roster;

pub use node::{MentionKind, Node};
pub use roster::{Channel, Role, Roster, TemplateVariable};
