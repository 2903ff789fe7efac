//! Buttons - `[data-more]` disclosure toggles.
//!
//! A click on any `[data-more="<selector>"]` element toggles the `show`
//! class on every element the selector names.

use tracing::trace;

use crate::dom::{ElementId, Selector};
use crate::engine::{ActivationCx, ComponentHandler};
use crate::events::{Event, EventKind};
use crate::page::Page;

pub const MORE_SELECTOR: &str = "[data-more]";
pub const NAMESPACE: &str = "site.morebutton";

/// Toggle `show` on the targets named by `button`'s `data-more`. Returns the
/// number of elements toggled.
pub fn toggle_more(page: &mut Page, button: ElementId) -> usize {
    let Some(targets) = page.document.attr(button, "data-more").map(str::to_string) else {
        return 0;
    };
    let found = page.document.find(None, &targets);
    for &target in &found {
        page.document.toggle_class(target, "show");
    }
    trace!(button = button.index(), %targets, toggled = found.len(), "more button");
    found.len()
}

/// `buttons`: one document-level click handler for every more button.
pub struct MoreButtonsHandler;

impl ComponentHandler for MoreButtonsHandler {
    fn activate_once(&self, page: &mut Page, _cx: &ActivationCx) {
        let Ok(buttons) = Selector::parse(MORE_SELECTOR) else {
            return;
        };
        page.events
            .on_document(EventKind::Click, buttons, NAMESPACE, |page: &mut Page, event: &Event| {
                if let Some(button) = event.current {
                    toggle_more(page, button);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn wire(page: &mut Page) {
        let cx = ActivationCx {
            name: "buttons".into(),
            context: None,
            defaults: Default::default(),
        };
        MoreButtonsHandler.activate_once(page, &cx);
    }

    #[test]
    fn test_click_toggles_targets() {
        let mut page = Page::new();
        let root = page.document.root();
        let button = page.document.insert(
            root,
            Node::new("button")
                .data("more", ".extra")
                .child(Node::new("span").text("More")),
        );
        let extras: Vec<ElementId> = (0..2)
            .map(|_| page.document.insert(root, Node::new("div").class("extra")))
            .collect();
        wire(&mut page);

        let label = page.document.find_first(Some(button), "span").unwrap();
        page.click(label);
        assert!(extras.iter().all(|&el| page.document.has_class(el, "show")));

        page.click(button);
        assert!(extras.iter().all(|&el| !page.document.has_class(el, "show")));
    }

    #[test]
    fn test_malformed_target_toggles_nothing() {
        let mut page = Page::new();
        let root = page.document.root();
        let button = page.document.insert(root, Node::new("button").data("more", "[oops"));

        assert_eq!(toggle_more(&mut page, button), 0);
    }
}
