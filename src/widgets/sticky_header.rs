//! Sticky Header - shrink a header as its container scrolls.
//!
//! The header is pinned to the top of the scrolling container and the
//! container is padded by the header's height. Two methods:
//!
//! - `toggle`: past `changeHeaderOn` the header snaps to `min` height and the
//!   container gets `activeClassName`; scrolling back restores it
//! - `scroll`: the header height follows `max(headerHeight - scrollTop, min)`
//!
//! Every transition fires `toggle:sticky` on the container.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::dom::{format_px, ElementId};
use crate::engine::ComponentHandler;
use crate::events::{EventKind, HandlerId};
use crate::layout::natural_height;
use crate::options::{merge_layers, OptionValue, Options};
use crate::page::Page;

use super::store::Widget;

pub const NAME: &str = "stickyHeader";

/// Event fired on the container on every header change.
pub const TOGGLE_EVENT: &str = "toggle:sticky";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StickyMethod {
    #[default]
    Toggle,
    Scroll,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderState {
    #[default]
    Normal,
    Shrunk,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StickyOptions {
    pub header_selector: String,
    pub change_header_on: f32,
    pub active_class_name: String,
    pub min: f32,
    pub method: StickyMethod,
}

impl StickyOptions {
    pub fn defaults() -> Options {
        Options::new()
            .with("headerSelector", ".header")
            .with("changeHeaderOn", 100)
            .with("activeClassName", "active-sticky-header")
            .with("min", 50)
            .with("method", "toggle")
    }

    pub fn from_options(options: &Options) -> Self {
        let merged = merge_layers([&Self::defaults(), options]);
        Self {
            header_selector: merged.get_str("headerSelector").unwrap_or(".header").to_string(),
            change_header_on: merged.get_f64("changeHeaderOn").unwrap_or(100.0) as f32,
            active_class_name: merged
                .get_str("activeClassName")
                .unwrap_or("active-sticky-header")
                .to_string(),
            min: merged.get_f64("min").unwrap_or(50.0) as f32,
            method: match merged.get_str("method") {
                Some("scroll") => StickyMethod::Scroll,
                _ => StickyMethod::Toggle,
            },
        }
    }
}

pub struct StickyHeader {
    element: ElementId,
    header: Cell<Option<ElementId>>,
    options: RefCell<StickyOptions>,
    header_height: Cell<f32>,
    state: Signal<HeaderState>,
    bindings: RefCell<Vec<HandlerId>>,
}

impl Widget for StickyHeader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn bindings(&self) -> Vec<HandlerId> {
        self.bindings.borrow().clone()
    }
}

impl StickyHeader {
    /// Attach to the scrolling container `element`. An existing instance is
    /// re-initialised with the new options.
    pub fn attach(page: &mut Page, element: ElementId, options: &Options) -> Rc<Self> {
        if let Some(existing) = page.widget::<Self>(element) {
            existing.init(page, options);
            return existing;
        }

        let widget = Rc::new(Self {
            element,
            header: Cell::new(None),
            options: RefCell::new(StickyOptions::from_options(options)),
            header_height: Cell::new(0.0),
            state: signal(HeaderState::Normal),
            bindings: RefCell::new(Vec::new()),
        });
        page.attach_widget(element, Rc::clone(&widget));
        widget.init(page, options);
        widget.bind(page);
        widget
    }

    /// Pin the header and measure it. Options layer as defaults, `options`,
    /// then the header's own `data-*` attributes.
    pub fn init(&self, page: &mut Page, options: &Options) {
        let selector = StickyOptions::from_options(options).header_selector;
        let header = page.document.find_first(Some(self.element), &selector);
        self.header.set(header);

        let doc = &mut page.document;
        doc.set_style(self.element, "transition", "none");
        let Some(header) = header else {
            debug!(element = self.element.index(), selector, "sticky header: no header found");
            *self.options.borrow_mut() = StickyOptions::from_options(options);
            return;
        };
        doc.set_style(header, "position", "absolute");
        doc.set_style(header, "top", "0");
        doc.set_style(header, "left", "0");

        let data = page.document.data(header);
        *self.options.borrow_mut() = StickyOptions::from_options(&merge_layers([options, &data]));

        let height = natural_height(&page.document, header);
        self.header_height.set(height);
        page.document.set_style(self.element, "padding-top", &format_px(height));
    }

    fn bind(&self, page: &mut Page) {
        let element = self.element;
        let id = page.events.on_element(element, EventKind::Scroll, None, move |page, _| {
            if let Some(widget) = page.widget::<StickyHeader>(element) {
                widget.on_scroll(page);
            }
        });
        self.bindings.borrow_mut().push(id);
    }

    fn on_scroll(&self, page: &mut Page) {
        let Some(header) = self.header.get() else {
            return;
        };
        let options = self.options.borrow().clone();
        let top = page.document.scroll_top(self.element);
        let class = options.active_class_name.as_str();

        match options.method {
            StickyMethod::Toggle => {
                let shrunk = self.state.get() == HeaderState::Shrunk;
                if top > options.change_header_on && !shrunk {
                    page.document.add_class(self.element, class);
                    page.document.set_style(header, "height", &format_px(options.min));
                    self.transition(page, HeaderState::Shrunk);
                } else if top <= options.change_header_on && shrunk {
                    page.document.remove_class(self.element, class);
                    page.document
                        .set_style(header, "height", &format_px(self.header_height.get()));
                    self.transition(page, HeaderState::Normal);
                }
            }
            StickyMethod::Scroll => {
                let full = self.header_height.get();
                let offset = f32::max(full - top, options.min);
                let state = if offset == full {
                    page.document.remove_class(self.element, class);
                    HeaderState::Normal
                } else {
                    page.document.add_class(self.element, class);
                    HeaderState::Shrunk
                };
                page.document.set_style(header, "height", &format_px(offset));
                self.transition(page, state);
            }
        }
    }

    fn transition(&self, page: &mut Page, state: HeaderState) {
        self.state.set(state);
        page.trigger(
            self.element,
            EventKind::custom(TOGGLE_EVENT),
            vec![OptionValue::Bool(state == HeaderState::Shrunk)],
        );
    }

    pub fn state(&self) -> HeaderState {
        self.state.get()
    }

    pub fn state_signal(&self) -> Signal<HeaderState> {
        self.state.clone()
    }

    pub fn is_active(&self) -> bool {
        self.state() == HeaderState::Shrunk
    }

    pub fn header(&self) -> Option<ElementId> {
        self.header.get()
    }

    /// Height measured at the last init.
    pub fn header_height(&self) -> f32 {
        self.header_height.get()
    }

    pub fn options(&self) -> StickyOptions {
        self.options.borrow().clone()
    }
}

/// `stickyHeader`: attaches to `data-plugin="stickyHeader"` containers.
pub struct StickyHeaderHandler;

impl ComponentHandler for StickyHeaderHandler {
    fn selector(&self) -> Option<&str> {
        Some("[data-plugin=\"stickyHeader\"]")
    }

    fn activate_per_element(&self, page: &mut Page, element: ElementId, options: &Options) {
        StickyHeader::attach(page, element, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn container(page: &mut Page, header: Node) -> ElementId {
        let root = page.document.root();
        page.document.insert(
            root,
            Node::new("div")
                .data("plugin", "stickyHeader")
                .height(400.0)
                .child(header)
                .child(Node::new("div").height(2000.0)),
        )
    }

    #[test]
    fn test_init_pins_and_pads() {
        let mut page = Page::new();
        let el = container(&mut page, Node::new("div").class("header").height(120.0));
        let widget = StickyHeader::attach(&mut page, el, &Options::new());

        let header = widget.header().unwrap();
        assert_eq!(widget.header_height(), 120.0);
        assert_eq!(page.document.style(header, "position"), Some("absolute"));
        assert_eq!(page.document.style(el, "padding-top"), Some("120px"));
    }

    #[test]
    fn test_toggle_method() {
        let mut page = Page::new();
        let el = container(&mut page, Node::new("div").class("header").height(120.0));
        let widget = StickyHeader::attach(&mut page, el, &Options::new());
        let header = widget.header().unwrap();

        let toggles = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&toggles);
        page.events.on_element(el, EventKind::custom(TOGGLE_EVENT), None, move |_, event| {
            seen.borrow_mut().push(event.detail[0].as_bool().unwrap_or(false));
        });

        page.scroll_to(el, 50.0);
        assert_eq!(widget.state(), HeaderState::Normal);

        page.scroll_to(el, 150.0);
        assert!(widget.is_active());
        assert!(page.document.has_class(el, "active-sticky-header"));
        assert_eq!(page.document.style(header, "height"), Some("50px"));

        page.scroll_to(el, 200.0);
        page.scroll_to(el, 100.0);
        assert_eq!(widget.state(), HeaderState::Normal);
        assert!(!page.document.has_class(el, "active-sticky-header"));
        assert_eq!(page.document.style(header, "height"), Some("120px"));

        assert_eq!(*toggles.borrow(), vec![true, false]);
    }

    #[test]
    fn test_scroll_method_from_header_data() {
        let mut page = Page::new();
        let el = container(
            &mut page,
            Node::new("div").class("header").height(120.0).data("method", "scroll").data("min", "60"),
        );
        let widget = StickyHeader::attach(&mut page, el, &Options::new());
        let header = widget.header().unwrap();
        assert_eq!(widget.options().method, StickyMethod::Scroll);

        page.scroll_to(el, 30.0);
        assert_eq!(page.document.style(header, "height"), Some("90px"));
        assert!(widget.is_active());

        page.scroll_to(el, 500.0);
        assert_eq!(page.document.style(header, "height"), Some("60px"));

        page.scroll_to(el, 0.0);
        assert_eq!(page.document.style(header, "height"), Some("120px"));
        assert!(!page.document.has_class(el, "active-sticky-header"));
    }

    #[test]
    fn test_reattach_applies_new_options() {
        let mut page = Page::new();
        let el = container(&mut page, Node::new("div").class("header").height(120.0));
        let first = StickyHeader::attach(&mut page, el, &Options::new());
        let second = StickyHeader::attach(&mut page, el, &Options::new().with("changeHeaderOn", 10));

        assert!(Rc::ptr_eq(&first, &second));
        page.scroll_to(el, 20.0);
        assert!(first.is_active());
    }
}
