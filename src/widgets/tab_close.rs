//! Tab Close - closable tabs.
//!
//! A `[data-close="tab"]` element inside a `[data-toggle="tab"]` link closes
//! that tab: the `li` and its pane are removed. Closing the active tab first
//! activates the first sibling tab. A `close.bs.tab` handler on the pane can
//! call `prevent_default` to keep the tab.

use tracing::trace;

use crate::dom::{ElementId, Selector};
use crate::engine::{ActivationCx, ComponentHandler};
use crate::events::{Event, EventKind};
use crate::page::Page;

pub const DISMISS_SELECTOR: &str = "[data-close=\"tab\"]";
pub const TOGGLE_SELECTOR: &str = "[data-toggle=\"tab\"]";
pub const CLOSE_EVENT: &str = "close.bs.tab";
pub const CLOSED_EVENT: &str = "closed.bs.tab";
pub const NAMESPACE: &str = "bs.tab-close.data-api";

/// Pane a tab toggle points at: `data-target`, else the `#fragment` of
/// `href`.
pub fn tab_target(page: &Page, toggle: ElementId) -> Option<ElementId> {
    let doc = &page.document;
    let reference = doc
        .attr(toggle, "data-target")
        .or_else(|| doc.attr(toggle, "href"))?;
    let fragment = &reference[reference.rfind('#')?..];
    let id = fragment.trim_start_matches('#');
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }
    doc.by_id(id)
}

/// Activate the tab of `toggle` and its pane.
pub fn show_tab(page: &mut Page, toggle: ElementId) {
    let Some(li) = page.document.parent(toggle) else {
        return;
    };
    if page.document.has_class(li, "active") {
        return;
    }

    for sibling in page.document.siblings(li) {
        page.document.remove_class(sibling, "active");
    }
    page.document.add_class(li, "active");

    if let Some(pane) = tab_target(page, toggle) {
        for sibling in page.document.siblings(pane) {
            page.document.remove_class(sibling, "active");
            page.document.remove_class(sibling, "in");
        }
        page.document.add_class(pane, "active");
        page.document.add_class(pane, "in");
    }
}

/// Close the tab containing `dismiss`. Returns true if it was removed.
pub fn close_tab(page: &mut Page, dismiss: ElementId) -> bool {
    let Some(toggle) = page.document.closest(dismiss, TOGGLE_SELECTOR) else {
        return false;
    };
    let pane = tab_target(page, toggle);
    let li = page
        .document
        .parent(toggle)
        .filter(|&li| page.document.tag(li) == Some("li"));

    if let Some(li) = li.filter(|&li| page.document.has_class(li, "active")) {
        let next = page
            .document
            .siblings(li)
            .first()
            .and_then(|&sibling| page.document.find_first(Some(sibling), &format!(">{TOGGLE_SELECTOR}")));
        if let Some(next) = next {
            show_tab(page, next);
        }
    }

    if let Some(pane) = pane {
        if !page.trigger(pane, EventKind::custom(CLOSE_EVENT), Vec::new()) {
            trace!(pane = pane.index(), "tab close cancelled");
            return false;
        }
        page.document.remove_class(pane, "in");
        page.trigger(pane, EventKind::custom(CLOSED_EVENT), Vec::new());
        page.remove_element(pane);
    }
    if let Some(li) = li {
        page.remove_element(li);
    }
    true
}

/// `tabClose`: one document-level click handler for every dismiss button.
pub struct TabCloseHandler;

impl ComponentHandler for TabCloseHandler {
    fn activate_once(&self, page: &mut Page, _cx: &ActivationCx) {
        let Ok(dismiss) = Selector::parse(DISMISS_SELECTOR) else {
            return;
        };
        page.events
            .on_document(EventKind::Click, dismiss, NAMESPACE, |page: &mut Page, event: &Event| {
                event.prevent_default();
                if let Some(dismiss) = event.current {
                    close_tab(page, dismiss);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;
    use crate::engine::{ComponentDefinition, ComponentRegistry, Components};

    fn tabs(page: &mut Page) -> (Vec<ElementId>, Vec<ElementId>) {
        let root = page.document.root();
        let tab = |i: usize, active: bool| {
            let li = Node::new("li").child(
                Node::new("a")
                    .attr("href", format!("#pane-{i}"))
                    .data("toggle", "tab")
                    .text(format!("Tab {i}"))
                    .child(Node::new("button").data("close", "tab")),
            );
            if active { li.class("active") } else { li }
        };
        let pane = |i: usize, active: bool| {
            let pane = Node::new("div").class("tab-pane").id(format!("pane-{i}"));
            if active { pane.class("active in") } else { pane }
        };

        let nav = page
            .document
            .insert(root, Node::new("ul").class("nav-tabs").children((0..3).map(|i| tab(i, i == 0))));
        let content = page
            .document
            .insert(root, Node::new("div").class("tab-content").children((0..3).map(|i| pane(i, i == 0))));
        (
            page.document.children(nav).to_vec(),
            page.document.children(content).to_vec(),
        )
    }

    fn wired() -> (Page, Components) {
        let mut registry = ComponentRegistry::new();
        registry
            .register(ComponentDefinition::api("tabClose", TabCloseHandler))
            .unwrap();
        let mut components = Components::new(registry);
        let mut page = Page::new();
        components.activate(&mut page, None);
        (page, components)
    }

    #[test]
    fn test_tab_target_from_href() {
        let (mut page, _) = wired();
        let (lis, panes) = tabs(&mut page);
        let toggle = page.document.children(lis[1])[0];
        assert_eq!(tab_target(&page, toggle), Some(panes[1]));
    }

    #[test]
    fn test_close_inactive_tab() {
        let (mut page, _) = wired();
        let (lis, panes) = tabs(&mut page);
        let dismiss = page.document.find_first(Some(lis[2]), "button").unwrap();

        page.click(dismiss);
        assert!(!page.document.contains(lis[2]));
        assert!(!page.document.contains(panes[2]));
        assert!(page.document.has_class(lis[0], "active"));
    }

    #[test]
    fn test_close_active_tab_activates_first_sibling() {
        let (mut page, _) = wired();
        let (lis, panes) = tabs(&mut page);
        let dismiss = page.document.find_first(Some(lis[0]), "button").unwrap();

        page.click(dismiss);
        assert!(!page.document.contains(lis[0]));
        assert!(page.document.has_class(lis[1], "active"));
        assert!(page.document.has_class(panes[1], "active"));
        assert!(page.document.has_class(panes[1], "in"));
    }

    #[test]
    fn test_close_can_be_cancelled() {
        let (mut page, _) = wired();
        let (lis, panes) = tabs(&mut page);
        page.events
            .on_element(panes[2], EventKind::custom(CLOSE_EVENT), None, |_, event| event.prevent_default());
        let dismiss = page.document.find_first(Some(lis[2]), "button").unwrap();

        page.click(dismiss);
        assert!(page.document.contains(lis[2]));
        assert!(page.document.contains(panes[2]));
    }
}
