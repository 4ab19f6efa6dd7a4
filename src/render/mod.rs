//! Rendering module for writing resolved documents.

mod json;

pub use json::{to_json, JsonFormat};
