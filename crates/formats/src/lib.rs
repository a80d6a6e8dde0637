//! The fragment markup contract: parsing served HTML fragments into an owned
//! tree and reading the positional attributes (`xy`, `angle`, `size`) that
//! replace document flow on the world canvas.

pub mod attributes;
pub mod document;
pub mod markup;

pub use attributes::*;
pub use document::*;
pub use markup::{DOCUMENT_ROOT, MarkupError, decode_entities};
