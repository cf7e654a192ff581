//! Mesh interchange formats
//!
//! Only the text mesh format lives here for now. It is line oriented and
//! self-describing: every block starts with a `name=...` header and its data
//! lines start with the block name.

pub mod text_mesh;

pub use text_mesh::*;
