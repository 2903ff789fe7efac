//! Table Section - expandable row groups.
//!
//! Clicking a `.table-section` toggles its `active` class and collapses its
//! sibling sections. Clicks that land on checkboxes, buttons or links are
//! left to those controls.

use crate::dom::{ElementId, Selector};
use crate::engine::{ActivationCx, ComponentHandler};
use crate::events::{Event, EventKind};
use crate::page::Page;

use super::is_control_target;

pub const SECTION_SELECTOR: &str = ".table-section";
pub const NAMESPACE: &str = "site.table";

/// Toggle `section`, collapsing its siblings when it opens.
pub fn toggle_section(page: &mut Page, section: ElementId) {
    let doc = &mut page.document;
    if doc.has_class(section, "active") {
        doc.remove_class(section, "active");
        return;
    }
    for sibling in doc.siblings(section) {
        if doc.is(sibling, SECTION_SELECTOR) {
            doc.remove_class(sibling, "active");
        }
    }
    doc.add_class(section, "active");
}

/// `table`: one document-level click handler for every section.
pub struct TableSectionHandler;

impl ComponentHandler for TableSectionHandler {
    fn activate_once(&self, page: &mut Page, _cx: &ActivationCx) {
        let Ok(section) = Selector::parse(SECTION_SELECTOR) else {
            return;
        };
        page.events
            .on_document(EventKind::Click, section, NAMESPACE, |page: &mut Page, event: &Event| {
                let (Some(section), Some(target)) = (event.current, event.target) else {
                    return;
                };
                if !is_control_target(&page.document, target) {
                    toggle_section(page, section);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn sections(page: &mut Page) -> Vec<ElementId> {
        let root = page.document.root();
        let section = || {
            Node::new("tbody")
                .class("table-section")
                .child(Node::new("tr").child(Node::new("td").text("summary")))
                .child(Node::new("tr").child(
                    Node::new("td").child(Node::new("input").attr("type", "checkbox")),
                ))
        };
        let table = page
            .document
            .insert(root, Node::new("table").children([section(), section(), section()]));
        page.document.children(table).to_vec()
    }

    fn wire(page: &mut Page) {
        let cx = ActivationCx {
            name: "table".into(),
            context: None,
            defaults: Default::default(),
        };
        TableSectionHandler.activate_once(page, &cx);
    }

    #[test]
    fn test_click_toggles_and_collapses_siblings() {
        let mut page = Page::new();
        let all = sections(&mut page);
        wire(&mut page);
        let summary = |page: &Page, i: usize| page.document.find_first(Some(all[i]), "td").unwrap();

        let first = summary(&page, 0);
        page.click(first);
        assert!(page.document.has_class(all[0], "active"));

        let second = summary(&page, 1);
        page.click(second);
        assert!(!page.document.has_class(all[0], "active"));
        assert!(page.document.has_class(all[1], "active"));

        page.click(second);
        assert!(!page.document.has_class(all[1], "active"));
    }

    #[test]
    fn test_checkbox_clicks_ignored() {
        let mut page = Page::new();
        let all = sections(&mut page);
        wire(&mut page);
        let checkbox = page.document.find_first(Some(all[2]), "input").unwrap();

        page.click(checkbox);
        assert!(!page.document.has_class(all[2], "active"));
        assert!(page.document.is_checked(checkbox));
    }
}
