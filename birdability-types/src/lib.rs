//! Core types for the birdability survey core.
//!
//! This crate provides the presentation-agnostic building blocks:
//! - `AnswerTree` - The nested tree of captured answers
//! - `FieldPath` - Dotted addresses of leaves in the tree
//! - `LeafValue` and `TriState` - What a single answer can be
//! - `Schema`, `FieldDef` and `FieldKind` - The declarative shape of a survey

mod field_path;
pub use field_path::FieldPath;

mod leaf_value;
pub use leaf_value::{LeafValue, TriState};

mod answer_tree;
pub use answer_tree::{AnswerTree, Node};

mod schema;
pub use schema::{FieldDef, FieldKind, Schema};

mod error;
pub use error::TreeError;
