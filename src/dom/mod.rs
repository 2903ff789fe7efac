//! Document model.
//!
//! An owned element tree standing in for the browser DOM:
//! - [`Document`]: element arena with class/attribute/style/checked state
//! - [`Node`]: declarative subtree builder
//! - [`Selector`]: the CSS subset components select with

mod document;
mod node;
mod selector;

pub use document::{Document, Element, ElementId};
pub use node::{format_px, parse_px, Node};
pub use selector::Selector;
