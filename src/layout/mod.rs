//! Layout Module
//!
//! Flexbox layout computation for documents using Taffy.
//!
//! # Architecture
//!
//! The layout module uses [Taffy](https://github.com/DioxusLabs/taffy) for
//! W3C-compliant flexbox computation. The bridge:
//!
//! 1. Converts element inline styles → Taffy styles
//! 2. Builds a Taffy tree from the document's rendered elements
//! 3. Provides measure functions for text intrinsic sizing
//! 4. Extracts border-box sizes back out, keyed by [`ElementId`](crate::dom::ElementId)
//!
//! Widgets never cache layout. Each query lays the document out again, so
//! the answer always reflects the current classes and visibility.
//!
//! # Example
//!
//! ```
//! use spark_components::dom::{Document, Node};
//! use spark_components::layout::{natural_width, resolved_width};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let nav = doc.insert(root, Node::new("ul").child(Node::new("li").width(50.0)));
//!
//! assert_eq!(natural_width(&doc, nav), 50.0);
//! assert_eq!(resolved_width(&doc, nav, 320.0, 240.0), 320.0);
//! ```

mod taffy_bridge;
mod text_measure;

pub use taffy_bridge::{
    compute_layout, natural_height, natural_size, natural_width, resolved_width, ComputedLayout,
    LayoutBox,
};
pub use text_measure::{measure_text_height, string_width};
