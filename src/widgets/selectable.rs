//! Selectable - checkbox selection of rows.
//!
//! Markup: a container with a select-all checkbox and one item checkbox per
//! row. Checking an item marks its row with `rowActiveClass`; the select-all
//! box follows the items and drives them.
//!
//! Fires `asSelectable::change` on the container with the selected count and
//! calls `onChange(count)` after every item change.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, warn};

use crate::dom::{ElementId, Selector};
use crate::engine::ComponentHandler;
use crate::events::{EventKind, HandlerId};
use crate::options::{merge_layers, OptionFn, OptionValue, Options};
use crate::page::Page;

use super::store::Widget;
use super::is_control_target;

pub const NAME: &str = "asSelectable";

/// Event fired on the container after an item changes.
pub const CHANGE_EVENT: &str = "asSelectable::change";

#[derive(Clone)]
pub struct SelectableOptions {
    pub all_selector: String,
    pub item_selector: String,
    pub row_selector: String,
    pub row_selectable: bool,
    pub row_active_class: String,
    pub on_change: Option<OptionFn>,
}

impl SelectableOptions {
    pub fn defaults() -> Options {
        Options::new()
            .with("allSelector", ".selectable-all")
            .with("itemSelector", ".selectable-item")
            .with("rowSelector", "tr")
            .with("rowSelectable", false)
            .with("rowActiveClass", "active")
            .with("onChange", OptionValue::Null)
    }

    pub fn from_options(options: &Options) -> Self {
        let merged = merge_layers([&Self::defaults(), options]);
        let read = |key: &str, fallback: &str| merged.get_str(key).unwrap_or(fallback).to_string();
        Self {
            all_selector: read("allSelector", ".selectable-all"),
            item_selector: read("itemSelector", ".selectable-item"),
            row_selector: read("rowSelector", "tr"),
            row_selectable: merged.get_bool("rowSelectable").unwrap_or(false),
            row_active_class: read("rowActiveClass", "active"),
            on_change: merged.get_fn("onChange").cloned(),
        }
    }
}

pub struct Selectable {
    element: ElementId,
    options: SelectableOptions,
    selected: Signal<usize>,
    bindings: RefCell<Vec<HandlerId>>,
}

impl Widget for Selectable {
    fn name(&self) -> &'static str {
        NAME
    }

    fn bindings(&self) -> Vec<HandlerId> {
        self.bindings.borrow().clone()
    }
}

impl Selectable {
    /// Attach to `element`. Options layer as defaults, the element's
    /// `data-*` attributes, then `options`. An existing instance is returned
    /// unchanged.
    pub fn attach(page: &mut Page, element: ElementId, options: &Options) -> Rc<Self> {
        if let Some(existing) = page.widget::<Self>(element) {
            return existing;
        }

        let data = page.document.data(element);
        let options = SelectableOptions::from_options(&merge_layers([&data, options]));
        let widget = Rc::new(Self {
            element,
            options,
            selected: signal(0),
            bindings: RefCell::new(Vec::new()),
        });
        debug!(element = element.index(), "attaching selectable");

        page.attach_widget(element, Rc::clone(&widget));
        widget.bind(page);
        widget.selected.set(widget.selected_items(page).len());
        widget
    }

    fn delegate(&self, selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(selector) => Some(selector),
            Err(err) => {
                warn!(selector, %err, "selectable: bad selector, binding skipped");
                None
            }
        }
    }

    fn bind(&self, page: &mut Page) {
        let element = self.element;
        let mut ids = Vec::new();

        if let Some(all) = self.delegate(&self.options.all_selector) {
            ids.push(page.events.on_element(element, EventKind::Change, Some(all), move |page, event| {
                let (Some(widget), Some(all)) = (page.widget::<Selectable>(element), event.current) else {
                    return;
                };
                let value = page.document.is_checked(all);
                for item in widget.items(page) {
                    page.document.set_checked(item, value);
                    page.trigger(item, EventKind::Change, vec![OptionValue::Bool(true)]);
                    widget.select_row(page, item, value);
                }
            }));
        }

        if let Some(item) = self.delegate(&self.options.item_selector) {
            ids.push(page.events.on_element(element, EventKind::Click, Some(item.clone()), move |page, event| {
                let (Some(widget), Some(item)) = (page.widget::<Selectable>(element), event.current) else {
                    return;
                };
                let value = page.document.is_checked(item);
                widget.select_row(page, item, value);
                event.stop_propagation();
            }));

            ids.push(page.events.on_element(element, EventKind::Change, Some(item), move |page, _| {
                if let Some(widget) = page.widget::<Selectable>(element) {
                    widget.sync(page);
                }
            }));
        }

        if self.options.row_selectable {
            if let Some(row) = self.delegate(&self.options.row_selector) {
                ids.push(page.events.on_element(element, EventKind::Click, Some(row), move |page, event| {
                    let (Some(widget), Some(row), Some(target)) =
                        (page.widget::<Selectable>(element), event.current, event.target)
                    else {
                        return;
                    };
                    if is_control_target(&page.document, target) {
                        return;
                    }
                    let Some(checkbox) = page.document.find_first(Some(row), &widget.options.item_selector) else {
                        return;
                    };
                    let value = !page.document.is_checked(checkbox);
                    page.document.set_checked(checkbox, value);
                    widget.select_row(page, checkbox, value);
                }));
            }
        }

        self.bindings.borrow_mut().extend(ids);
    }

    /// Bring the select-all box in line with the items and report the count.
    fn sync(&self, page: &mut Page) {
        let total = self.items(page).len();
        let checked = self.selected_items(page).len();
        for all in page.document.find(Some(self.element), &self.options.all_selector) {
            page.document.set_checked(all, total == checked);
        }

        self.selected.set(checked);
        page.trigger(
            self.element,
            EventKind::custom(CHANGE_EVENT),
            vec![OptionValue::from(checked)],
        );
        if let Some(on_change) = &self.options.on_change {
            on_change(&[OptionValue::from(checked)]);
        }
    }

    /// Mark (or unmark) the rows containing `item`.
    pub fn select_row(&self, page: &mut Page, item: ElementId, value: bool) {
        let class = self.options.row_active_class.as_str();
        for row in page.document.parents(item, &self.options.row_selector) {
            if value {
                page.document.add_class(row, class);
            } else {
                page.document.remove_class(row, class);
            }
        }
    }

    pub fn items(&self, page: &Page) -> Vec<ElementId> {
        page.document.find(Some(self.element), &self.options.item_selector)
    }

    pub fn selected_items(&self, page: &Page) -> Vec<ElementId> {
        self.items(page)
            .into_iter()
            .filter(|&item| page.document.is_checked(item))
            .collect()
    }

    /// Selected count as of the last change.
    pub fn selected(&self) -> usize {
        self.selected.get()
    }

    pub fn selected_signal(&self) -> Signal<usize> {
        self.selected.clone()
    }

    pub fn options(&self) -> &SelectableOptions {
        &self.options
    }
}

/// `selectable`: attaches to `data-plugin="selectable"` and
/// `data-selectable="selectable"` containers.
pub struct SelectableHandler;

impl ComponentHandler for SelectableHandler {
    fn selector(&self) -> Option<&str> {
        Some("[data-plugin=\"selectable\"], [data-selectable=\"selectable\"]")
    }

    fn activate_per_element(&self, page: &mut Page, element: ElementId, options: &Options) {
        Selectable::attach(page, element, options);
    }
}
