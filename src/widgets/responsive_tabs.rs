//! Responsive Tabs - collapse horizontal tabs into an overflow dropdown.
//!
//! A tab strip holds `n` items and one dropdown whose menu mirrors the
//! items. When the nav is too narrow the trailing items are hidden and
//! their dropdown counterparts shown:
//!
//! ```text
//! Expanded     [Home][Profile][Messages][Settings]
//! Partial(2)   [Home][Profile][More ▾]   → Messages, Settings
//! SingleItem   [Home]                      (mechanism disabled)
//! ```
//!
//! # Breakpoints
//!
//! With natural item widths `w` and dropdown width `d`:
//!
//! ```text
//! bp[0] = w0 + d
//! bp[i] = bp[i-1] + wi        for 0 < i < n-2
//! bp[last] = Σw
//! ```
//!
//! Entries are clamped to `Σw`, so the array is non-decreasing and always
//! ends at `Σw`. For a nav width `W` the number of visible items is the
//! smallest `i` with `bp[i] > W`; no such `i` means everything fits.
//!
//! Reflow runs on every window resize. It compares the computed index with
//! the last applied one and skips all writes when they are equal.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, trace};

use crate::dom::ElementId;
use crate::engine::ComponentHandler;
use crate::events::{EventKind, HandlerId};
use crate::options::{merge_layers, Options};
use crate::page::Page;

use super::store::Widget;

// =============================================================================
// BREAKPOINTS
// =============================================================================

/// Cumulative width thresholds for `widths` with an overflow affordance of
/// `affordance`. Empty when there are fewer than two items.
pub fn compute_breakpoints(widths: &[f32], affordance: f32) -> Vec<f32> {
    let n = widths.len();
    if n <= 1 {
        return Vec::new();
    }

    let total: f32 = widths.iter().sum();
    let mut breakpoints = Vec::with_capacity(n - 1);
    for i in 0..n - 2 {
        let bp = match i {
            0 => widths[0] + affordance,
            _ => breakpoints[i - 1] + widths[i],
        };
        breakpoints.push(f32::min(bp, total));
    }
    breakpoints.push(total);
    breakpoints
}

/// Smallest index `i` with `breakpoints[i] > width`, or `breakpoints.len()`
/// when every breakpoint fits.
pub fn visible_count(breakpoints: &[f32], width: f32) -> usize {
    breakpoints
        .iter()
        .position(|&bp| bp > width)
        .unwrap_or(breakpoints.len())
}

/// Layout state of a tab strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TabMode {
    /// Every item visible, dropdown hidden.
    #[default]
    Expanded,
    /// First `k` items visible, the rest in the dropdown.
    Partial(usize),
    /// At most one real item. Dropdown hidden for good.
    SingleItem,
}

impl TabMode {
    /// Mode for a visible count computed against `breakpoints`.
    pub fn from_index(breakpoints: &[f32], index: usize) -> Self {
        if breakpoints.is_empty() {
            Self::SingleItem
        } else if index >= breakpoints.len() {
            Self::Expanded
        } else {
            Self::Partial(index)
        }
    }
}

/// Measurements and bookkeeping of one tab strip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabOverflowState {
    /// Natural width of each item.
    pub widths: Vec<f32>,
    /// Natural width of the dropdown.
    pub affordance: f32,
    pub breakpoints: Vec<f32>,
    /// Index of the active pane at the last reflow.
    pub active: Option<usize>,
    /// Visible count written by the last reflow.
    pub last_applied: Option<usize>,
}

// =============================================================================
// OPTIONS
// =============================================================================

pub const NAME: &str = "responsiveHorizontalTabs";

#[derive(Clone, Debug, PartialEq)]
pub struct TabsOptions {
    pub nav_selector: String,
    pub item_selector: String,
    pub dropdown_selector: String,
    pub dropdown_item_selector: String,
    pub tab_selector: String,
    pub active_class_name: String,
}

impl TabsOptions {
    pub fn defaults() -> Options {
        Options::new()
            .with("navSelector", ".nav-tabs")
            .with("itemSelector", ">li")
            .with("dropdownSelector", ">.dropdown")
            .with("dropdownItemSelector", "li")
            .with("tabSelector", ".tab-pane")
            .with("activeClassName", "active")
    }

    /// Read options, falling back to the defaults for missing or non-string
    /// values.
    pub fn from_options(options: &Options) -> Self {
        let merged = merge_layers([&Self::defaults(), options]);
        let read = |key: &str, fallback: &str| {
            merged.get_str(key).unwrap_or(fallback).to_string()
        };
        Self {
            nav_selector: read("navSelector", ".nav-tabs"),
            item_selector: read("itemSelector", ">li"),
            dropdown_selector: read("dropdownSelector", ">.dropdown"),
            dropdown_item_selector: read("dropdownItemSelector", "li"),
            tab_selector: read("tabSelector", ".tab-pane"),
            active_class_name: read("activeClassName", "active"),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Parts {
    nav: Option<ElementId>,
    dropdown: Option<ElementId>,
    items: Vec<ElementId>,
    dropdown_items: Vec<ElementId>,
    panes: Vec<ElementId>,
}

// =============================================================================
// WIDGET
// =============================================================================

pub struct ResponsiveTabs {
    element: ElementId,
    options: TabsOptions,
    parts: Parts,
    state: RefCell<TabOverflowState>,
    mode: Signal<TabMode>,
    bindings: RefCell<Vec<HandlerId>>,
}

impl Widget for ResponsiveTabs {
    fn name(&self) -> &'static str {
        NAME
    }

    fn bindings(&self) -> Vec<HandlerId> {
        self.bindings.borrow().clone()
    }
}

impl ResponsiveTabs {
    /// Attach to `element`. An element that already has an instance is
    /// re-measured instead.
    pub fn attach(page: &mut Page, element: ElementId, options: &Options) -> Rc<Self> {
        if let Some(existing) = page.widget::<Self>(element) {
            trace!(element = element.index(), "re-initialising tabs");
            existing.init(page);
            return existing;
        }

        let options = TabsOptions::from_options(options);
        let parts = Self::collect_parts(page, element, &options);
        debug!(
            element = element.index(),
            items = parts.items.len(),
            dropdown = parts.dropdown.is_some(),
            "attaching responsive tabs"
        );

        let tabs = Rc::new(Self {
            element,
            options,
            parts,
            state: RefCell::new(TabOverflowState::default()),
            mode: signal(TabMode::Expanded),
            bindings: RefCell::new(Vec::new()),
        });
        page.attach_widget(element, Rc::clone(&tabs));
        tabs.init(page);
        tabs.bind(page);
        tabs
    }

    fn collect_parts(page: &Page, element: ElementId, options: &TabsOptions) -> Parts {
        let doc = &page.document;
        let nav = doc.find_first(Some(element), &options.nav_selector);
        let dropdown = nav.and_then(|nav| doc.find_first(Some(nav), &options.dropdown_selector));
        let items = nav
            .map(|nav| doc.find(Some(nav), &options.item_selector))
            .unwrap_or_default()
            .into_iter()
            .filter(|&item| Some(item) != dropdown)
            .collect();
        let dropdown_items = dropdown
            .map(|dd| doc.find(Some(dd), &options.dropdown_item_selector))
            .unwrap_or_default();
        // Panes of a strip nested inside one of ours belong to that strip.
        let panes = doc
            .find(Some(element), &options.tab_selector)
            .into_iter()
            .filter(|&pane| {
                !doc.parents(pane, &options.tab_selector)
                    .into_iter()
                    .any(|outer| doc.is_ancestor(element, outer))
            })
            .collect();

        Parts {
            nav,
            dropdown,
            items,
            dropdown_items,
            panes,
        }
    }

    fn bind(&self, page: &mut Page) {
        let element = self.element;
        let id = page.events.on_window(EventKind::Resize, element, move |page, _| {
            if let Some(tabs) = page.widget::<ResponsiveTabs>(element) {
                tabs.layout(page);
            }
        });
        self.bindings.borrow_mut().push(id);
    }

    /// Measure items and compute breakpoints, then lay out. Strips without a
    /// dropdown are left alone.
    pub fn init(&self, page: &mut Page) {
        let Some(dropdown) = self.parts.dropdown else {
            return;
        };

        page.document.show(dropdown);
        let widths: Vec<f32> = self
            .parts
            .items
            .iter()
            .map(|&item| page.natural_width_of(item))
            .collect();
        let affordance = page.natural_width_of(dropdown);
        let breakpoints = compute_breakpoints(&widths, affordance);
        trace!(?widths, affordance, ?breakpoints, "measured tabs");

        let single = breakpoints.is_empty();
        {
            let mut state = self.state.borrow_mut();
            state.widths = widths;
            state.affordance = affordance;
            state.breakpoints = breakpoints;
            state.last_applied = None;
        }

        if single {
            page.document.hide(dropdown);
            self.mode.set(TabMode::SingleItem);
            return;
        }
        self.layout(page);
    }

    /// Reflow for the nav's current width.
    pub fn layout(&self, page: &mut Page) {
        let (Some(nav), Some(dropdown)) = (self.parts.nav, self.parts.dropdown) else {
            return;
        };
        let breakpoints = self.state.borrow().breakpoints.clone();
        if breakpoints.is_empty() {
            return;
        }

        let width = page.width_of(nav);
        let index = visible_count(&breakpoints, width);
        if self.state.borrow().last_applied == Some(index) {
            return;
        }
        trace!(element = self.element.index(), width, index, "reflow tabs");

        let active_class = self.options.active_class_name.as_str();
        let active = self
            .parts
            .panes
            .iter()
            .position(|&pane| page.document.has_class(pane, active_class));

        let doc = &mut page.document;
        for &el in self.parts.items.iter().chain(&self.parts.dropdown_items) {
            doc.remove_class(el, active_class);
        }
        doc.remove_class(dropdown, active_class);

        if index == breakpoints.len() {
            doc.hide(dropdown);
            for &item in &self.parts.items {
                doc.show(item);
            }
            if let Some(&item) = active.and_then(|a| self.parts.items.get(a)) {
                doc.add_class(item, active_class);
            }
        } else {
            doc.show(dropdown);
            for (j, &item) in self.parts.items.iter().enumerate() {
                let visible = j < index;
                doc.set_hidden(item, !visible);
                if let Some(&mirror) = self.parts.dropdown_items.get(j) {
                    doc.set_hidden(mirror, visible);
                }
            }

            match active {
                Some(a) if a < index => {
                    if let Some(&item) = self.parts.items.get(a) {
                        doc.add_class(item, active_class);
                    }
                }
                Some(a) => {
                    doc.add_class(dropdown, active_class);
                    if let Some(&mirror) = self.parts.dropdown_items.get(a) {
                        doc.add_class(mirror, active_class);
                    }
                }
                None => {}
            }
        }

        {
            let mut state = self.state.borrow_mut();
            state.active = active;
            state.last_applied = Some(index);
        }
        self.mode.set(TabMode::from_index(&breakpoints, index));
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn options(&self) -> &TabsOptions {
        &self.options
    }

    pub fn mode(&self) -> TabMode {
        self.mode.get()
    }

    /// Reactive handle on the mode.
    pub fn mode_signal(&self) -> Signal<TabMode> {
        self.mode.clone()
    }

    pub fn state(&self) -> TabOverflowState {
        self.state.borrow().clone()
    }

    pub fn breakpoints(&self) -> Vec<f32> {
        self.state.borrow().breakpoints.clone()
    }

    pub fn nav(&self) -> Option<ElementId> {
        self.parts.nav
    }

    pub fn dropdown(&self) -> Option<ElementId> {
        self.parts.dropdown
    }

    pub fn items(&self) -> &[ElementId] {
        &self.parts.items
    }

    pub fn dropdown_items(&self) -> &[ElementId] {
        &self.parts.dropdown_items
    }

    /// Panes owned by this strip, excluding those of nested strips.
    pub fn panes(&self) -> &[ElementId] {
        &self.parts.panes
    }
}

// =============================================================================
// COMPONENT
// =============================================================================

/// `horizontalTab`: responsive tabs on every `.nav-tabs-horizontal`.
pub struct HorizontalTabHandler;

impl ComponentHandler for HorizontalTabHandler {
    fn selector(&self) -> Option<&str> {
        Some(".nav-tabs-horizontal")
    }

    fn activate_per_element(&self, page: &mut Page, element: ElementId, options: &Options) {
        ResponsiveTabs::attach(page, element, options);
    }
}
