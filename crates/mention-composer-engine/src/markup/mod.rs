//! # Markup Round-Trip
//!
//! Bidirectional conversion between the in-memory document and the
//! persisted string, plus the semantic-equality normalizer built on the
//! same tokenizers.
//!
//! ## Modules
//!
//! - **`tokens`**: the three raw-value syntaxes (`<@id>`, `<#id>`,
//!   `{key}`) with their delimiters owned in one place
//! - **`serialize`**: document → markup string with resolved labels
//! - **`deserialize`**: markup or legacy plain text → document; also the
//!   `strip_to_plain` submission boundary
//! - **`equivalence`**: content signatures for "unsaved changes" gating
//!
//! ## Round-trip contract
//!
//! `deserialize(serialize(doc))` reconstructs the same ordered
//! `(kind, raw_value)` sequence and the same text runs. Display labels are
//! a cache and may differ; raw values never do.

pub mod deserialize;
pub mod equivalence;
pub mod serialize;
pub mod tokens;

pub use deserialize::{deserialize, looks_like_markup, strip_to_plain};
pub use equivalence::{ContentSignature, is_equivalent, signature};
pub use serialize::{mention_label, serialize};
