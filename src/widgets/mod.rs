//! Widgets - stateful behaviour attached to single elements.
//!
//! - [`ResponsiveTabs`]: horizontal tabs that overflow into a dropdown
//! - [`Selectable`]: checkbox row selection
//! - [`StickyHeader`]: header that shrinks on scroll
//! - [`ActionButton`]: floating action list
//! - [`tab_close`] / [`table_section`]: document-level click behaviours
//!
//! Instances live in the page's [`WidgetStore`]; at most one of each type
//! per element. Widgets never hold on to the page. Handlers look their
//! widget up again by element, so dropping an element drops the widget.

pub mod action_button;
pub mod responsive_tabs;
pub mod selectable;
pub mod sticky_header;
mod store;
pub mod tab_close;
pub mod table_section;

pub use action_button::ActionButton;
pub use responsive_tabs::{compute_breakpoints, visible_count, ResponsiveTabs, TabMode, TabOverflowState};
pub use selectable::Selectable;
pub use sticky_header::{HeaderState, StickyHeader};
pub use store::{Widget, WidgetStore};

use crate::dom::{Document, ElementId};

/// Whether a click on `target` belongs to a form control rather than the
/// row or section around it.
pub(crate) fn is_control_target(doc: &Document, target: ElementId) -> bool {
    matches!(doc.attr(target, "type"), Some("checkbox" | "button"))
        || doc.tag(target) == Some("a")
        || doc
            .parent(target)
            .is_some_and(|parent| doc.is(parent, "div.checkbox-custom"))
}
