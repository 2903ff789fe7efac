//! Action Button - a floating button that reveals a list of actions.
//!
//! Registered as a manual component: page code decides when to construct it.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, warn};

use crate::dom::{ElementId, Selector};
use crate::events::{EventKind, HandlerId};
use crate::options::{merge_layers, OptionFn, OptionValue, Options};
use crate::page::Page;

use super::store::Widget;

pub const NAME: &str = "actionBtn";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Trigger {
    #[default]
    Click,
    Hover,
}

#[derive(Clone)]
pub struct ActionButtonOptions {
    pub trigger: Trigger,
    pub toggle_selector: String,
    pub list_selector: String,
    pub active_class: String,
    pub on_show: Option<OptionFn>,
    pub on_hide: Option<OptionFn>,
}

impl ActionButtonOptions {
    pub fn defaults() -> Options {
        Options::new()
            .with("trigger", "click")
            .with("toggleSelector", ".site-action-toggle")
            .with("listSelector", ".site-action-buttons")
            .with("activeClass", "active")
            .with("onShow", OptionValue::Null)
            .with("onHide", OptionValue::Null)
    }

    pub fn from_options(options: &Options) -> Self {
        let merged = merge_layers([&Self::defaults(), options]);
        let read = |key: &str, fallback: &str| merged.get_str(key).unwrap_or(fallback).to_string();
        Self {
            trigger: match merged.get_str("trigger") {
                Some("hover") => Trigger::Hover,
                _ => Trigger::Click,
            },
            toggle_selector: read("toggleSelector", ".site-action-toggle"),
            list_selector: read("listSelector", ".site-action-buttons"),
            active_class: read("activeClass", "active"),
            on_show: merged.get_fn("onShow").cloned(),
            on_hide: merged.get_fn("onHide").cloned(),
        }
    }
}

pub struct ActionButton {
    element: ElementId,
    options: ActionButtonOptions,
    toggle: Option<ElementId>,
    list: Option<ElementId>,
    shown: Signal<bool>,
    bindings: RefCell<Vec<HandlerId>>,
}

impl Widget for ActionButton {
    fn name(&self) -> &'static str {
        NAME
    }

    fn bindings(&self) -> Vec<HandlerId> {
        self.bindings.borrow().clone()
    }
}

impl ActionButton {
    /// Construct on `element`. Options layer as defaults, the element's
    /// `data-*` attributes, then `options`. An existing instance is returned
    /// unchanged.
    pub fn attach(page: &mut Page, element: ElementId, options: &Options) -> Rc<Self> {
        if let Some(existing) = page.widget::<Self>(element) {
            return existing;
        }

        let data = page.document.data(element);
        let options = ActionButtonOptions::from_options(&merge_layers([&data, options]));
        let toggle = page.document.find_first(Some(element), &options.toggle_selector);
        let list = page.document.find_first(Some(element), &options.list_selector);
        debug!(element = element.index(), trigger = ?options.trigger, "attaching action button");

        let widget = Rc::new(Self {
            element,
            options,
            toggle,
            list,
            shown: signal(false),
            bindings: RefCell::new(Vec::new()),
        });
        page.attach_widget(element, Rc::clone(&widget));
        widget.bind(page);
        widget
    }

    fn bind(&self, page: &mut Page) {
        let element = self.element;
        let toggle = match Selector::parse(&self.options.toggle_selector) {
            Ok(selector) => selector,
            Err(err) => {
                warn!(selector = %self.options.toggle_selector, %err, "action button: bad toggle selector");
                return;
            }
        };

        let mut ids = Vec::new();
        match self.options.trigger {
            Trigger::Hover => {
                ids.push(page.events.on_element(element, EventKind::MouseEnter, Some(toggle.clone()), move |page, _| {
                    if let Some(widget) = page.widget::<ActionButton>(element) {
                        widget.show(page);
                    }
                }));
                ids.push(page.events.on_element(element, EventKind::MouseLeave, Some(toggle), move |page, _| {
                    if let Some(widget) = page.widget::<ActionButton>(element) {
                        widget.hide(page);
                    }
                }));
            }
            Trigger::Click => {
                ids.push(page.events.on_element(element, EventKind::Click, Some(toggle), move |page, _| {
                    if let Some(widget) = page.widget::<ActionButton>(element) {
                        widget.toggle(page);
                    }
                }));
            }
        }
        self.bindings.borrow_mut().extend(ids);
    }

    pub fn show(&self, page: &mut Page) {
        if self.shown.get() {
            return;
        }
        page.document.add_class(self.element, &self.options.active_class);
        self.shown.set(true);
        if let Some(on_show) = &self.options.on_show {
            on_show(&[]);
        }
    }

    pub fn hide(&self, page: &mut Page) {
        if !self.shown.get() {
            return;
        }
        page.document.remove_class(self.element, &self.options.active_class);
        self.shown.set(false);
        if let Some(on_hide) = &self.options.on_hide {
            on_hide(&[]);
        }
    }

    pub fn toggle(&self, page: &mut Page) {
        if self.shown.get() {
            self.hide(page);
        } else {
            self.show(page);
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown.get()
    }

    pub fn shown_signal(&self) -> Signal<bool> {
        self.shown.clone()
    }

    pub fn toggle_element(&self) -> Option<ElementId> {
        self.toggle
    }

    pub fn list_element(&self) -> Option<ElementId> {
        self.list
    }

    pub fn options(&self) -> &ActionButtonOptions {
        &self.options
    }
}
