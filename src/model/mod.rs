//! Document model types for the resolved structure.
//!
//! The model is the output of an extraction run: a [`Root`] holding the pages
//! and a tree of uniquely identified [`Element`]s. Every element records the
//! scope that owns it and every link its raw and resolved target.

mod chapter;
mod element;
mod figure;
mod link;
mod page;
mod paragraph;
mod position;
mod rect;
mod root;
mod table;

pub use chapter::Chapter;
pub use element::{Element, ElementKind, Scope};
pub use figure::Figure;
pub use link::{Link, TargetRef};
pub use page::Page;
pub use paragraph::Paragraph;
pub use position::{page_id, Position};
pub use rect::Rect;
pub use root::{Flattened, Root};
pub use table::{Cell, Table};
