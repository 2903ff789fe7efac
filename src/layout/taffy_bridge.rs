//! Taffy Bridge - Integration with Taffy layout engine
//!
//! Converts document elements to Taffy styles, runs layout computation,
//! and extracts border-box sizes back out.
//!
//! Style mapping (inline styles, pixel values):
//! - `display: none` or a hidden element → left out of the tree
//! - `display: block` / `flex-direction: column` → column flow
//! - `display: flex|inline` / `flex-direction: row` → row flow
//! - otherwise block tags (`body`, `div`, `table`, ...) flow in a column and
//!   everything else in a row
//! - `width`, `height`, `min-width`, `max-width` (px or %)
//! - `padding`, `padding-{side}`, `margin-{side}`, `border-width`, `gap`
//! - `position: absolute` → out of flow (does not size its parent)
//!
//! Leaf elements with text are measured with [`string_width`].

use std::collections::HashMap;

use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display, FlexDirection as TaffyFlexDirection,
    LengthPercentage, LengthPercentageAuto, NodeId, Position as TaffyPosition, Rect, Size, Style,
    TaffyTree,
};
use tracing::trace;

use crate::dom::{parse_px, Document, Element, ElementId};

use super::text_measure::{measure_text_height, string_width};

const BLOCK_TAGS: &[&str] = &[
    "body", "div", "section", "article", "main", "header", "footer", "aside", "form", "table",
    "thead", "tbody", "p",
];

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Border-box geometry of one element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Layout of every rendered element of a document.
#[derive(Clone, Debug, Default)]
pub struct ComputedLayout {
    boxes: HashMap<ElementId, LayoutBox>,
}

impl ComputedLayout {
    pub fn get(&self, id: ElementId) -> Option<LayoutBox> {
        self.boxes.get(&id).copied()
    }

    /// Border-box width, 0 for elements that are not rendered.
    pub fn width(&self, id: ElementId) -> f32 {
        self.get(id).map(|b| b.width).unwrap_or(0.0)
    }

    pub fn height(&self, id: ElementId) -> f32 {
        self.get(id).map(|b| b.height).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn to_taffy_dimension(value: Option<&str>) -> TaffyDimension {
    let Some(value) = value.map(str::trim) else {
        return TaffyDimension::Auto;
    };
    if let Some(percent) = value.strip_suffix('%') {
        return percent
            .trim()
            .parse::<f32>()
            .map(|p| TaffyDimension::Percent(p / 100.0))
            .unwrap_or(TaffyDimension::Auto);
    }
    parse_px(value)
        .map(TaffyDimension::Length)
        .unwrap_or(TaffyDimension::Auto)
}

fn px(el: &Element, property: &str) -> Option<f32> {
    el.style(property).and_then(parse_px)
}

fn side(el: &Element, shorthand: &str, side: &str) -> f32 {
    px(el, &format!("{shorthand}-{side}"))
        .or_else(|| px(el, shorthand))
        .unwrap_or(0.0)
}

fn flow_direction(el: &Element) -> TaffyFlexDirection {
    match (el.style("flex-direction"), el.style("display")) {
        (Some("column"), _) | (None, Some("block")) => TaffyFlexDirection::Column,
        (Some("row"), _) | (None, Some("flex" | "inline" | "inline-block")) => {
            TaffyFlexDirection::Row
        }
        _ if BLOCK_TAGS.contains(&el.tag()) => TaffyFlexDirection::Column,
        _ => TaffyFlexDirection::Row,
    }
}

/// Build a Taffy Style from an element's inline styles.
fn build_style(el: &Element) -> Style {
    let length = |side_value: f32| LengthPercentage::Length(side_value);
    let border = px(el, "border-width").unwrap_or(0.0);

    Style {
        display: Display::Flex,
        position: if el.style("position") == Some("absolute") {
            TaffyPosition::Absolute
        } else {
            TaffyPosition::Relative
        },
        flex_direction: flow_direction(el),
        size: Size {
            width: to_taffy_dimension(el.style("width")),
            height: to_taffy_dimension(el.style("height")),
        },
        min_size: Size {
            width: to_taffy_dimension(el.style("min-width")),
            height: to_taffy_dimension(el.style("min-height")),
        },
        max_size: Size {
            width: to_taffy_dimension(el.style("max-width")),
            height: to_taffy_dimension(el.style("max-height")),
        },
        padding: Rect {
            top: length(side(el, "padding", "top")),
            right: length(side(el, "padding", "right")),
            bottom: length(side(el, "padding", "bottom")),
            left: length(side(el, "padding", "left")),
        },
        margin: Rect {
            top: LengthPercentageAuto::Length(side(el, "margin", "top")),
            right: LengthPercentageAuto::Length(side(el, "margin", "right")),
            bottom: LengthPercentageAuto::Length(side(el, "margin", "bottom")),
            left: LengthPercentageAuto::Length(side(el, "margin", "left")),
        },
        border: Rect {
            top: length(border),
            right: length(border),
            bottom: length(border),
            left: length(border),
        },
        gap: Size {
            width: length(px(el, "gap").unwrap_or(0.0)),
            height: length(px(el, "gap").unwrap_or(0.0)),
        },
        ..Default::default()
    }
}

fn is_rendered(el: &Element) -> bool {
    !el.is_hidden() && el.style("display") != Some("none")
}

// =============================================================================
// TREE BUILDING
// =============================================================================

struct Bridge<'a> {
    doc: &'a Document,
    tree: TaffyTree<ElementId>,
    nodes: HashMap<ElementId, NodeId>,
}

impl<'a> Bridge<'a> {
    fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            tree: TaffyTree::new(),
            nodes: HashMap::new(),
        }
    }

    /// Add `id` and its rendered descendants. `force` renders `id` even when
    /// it is hidden (used to measure an element "as if shown").
    fn add(&mut self, id: ElementId, force: bool, style_override: Option<Style>) -> Option<NodeId> {
        let el = self.doc.get(id)?;
        if !force && !is_rendered(el) {
            return None;
        }

        let style = style_override.unwrap_or_else(|| build_style(el));
        let children = self.doc.children(id).to_vec();

        let node = if children.is_empty() && !el.text().is_empty() {
            self.tree.new_leaf_with_context(style, id).ok()?
        } else {
            self.tree.new_leaf(style).ok()?
        };
        self.nodes.insert(id, node);

        for child in children {
            if let Some(child_node) = self.add(child, false, None) {
                let _ = self.tree.add_child(node, child_node);
            }
        }
        Some(node)
    }

    fn compute(&mut self, root: NodeId, available: Size<AvailableSpace>) {
        let doc = self.doc;
        let mut measure_fn = |known_dimensions: Size<Option<f32>>,
                              available_space: Size<AvailableSpace>,
                              _node_id: NodeId,
                              context: Option<&mut ElementId>,
                              _style: &Style| {
            let Some(&mut id) = context else {
                return Size::ZERO;
            };
            measure_text(doc.text(id), known_dimensions, available_space)
        };
        let _ = self
            .tree
            .compute_layout_with_measure(root, available, &mut measure_fn);
    }

    fn extract(&self) -> ComputedLayout {
        let boxes = self
            .nodes
            .iter()
            .filter_map(|(&id, &node)| {
                let layout = self.tree.layout(node).ok()?;
                Some((
                    id,
                    LayoutBox {
                        x: layout.location.x,
                        y: layout.location.y,
                        width: layout.size.width,
                        height: layout.size.height,
                    },
                ))
            })
            .collect();
        ComputedLayout { boxes }
    }
}

/// Measure function for text content.
fn measure_text(
    content: &str,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    if content.is_empty() {
        return Size::ZERO;
    }

    let text_width = string_width(content);
    let wrap_at = match available_space.width {
        AvailableSpace::Definite(w) => w,
        AvailableSpace::MinContent => 1.0,
        AvailableSpace::MaxContent => f32::INFINITY,
    };
    let width = known_dimensions.width.unwrap_or(text_width.min(wrap_at.max(1.0)));
    Size {
        width,
        height: known_dimensions
            .height
            .unwrap_or(measure_text_height(content, width)),
    }
}

// =============================================================================
// MAIN ENTRY POINTS
// =============================================================================

/// Lay out the whole document inside a viewport of the given size.
///
/// The root element is pinned to the viewport width; height grows with
/// content.
pub fn compute_layout(doc: &Document, viewport_width: f32, viewport_height: f32) -> ComputedLayout {
    let mut bridge = Bridge::new(doc);
    let root = doc.root();
    let Some(root_el) = doc.get(root) else {
        return ComputedLayout::default();
    };

    let mut root_style = build_style(root_el);
    root_style.size.width = TaffyDimension::Length(viewport_width);

    let Some(root_node) = bridge.add(root, true, Some(root_style)) else {
        return ComputedLayout::default();
    };
    bridge.compute(
        root_node,
        Size {
            width: AvailableSpace::Definite(viewport_width),
            height: AvailableSpace::Definite(viewport_height),
        },
    );

    let layout = bridge.extract();
    trace!(viewport_width, nodes = layout.len(), "computed document layout");
    layout
}

/// Natural (max-content) border-box size of an element, measured as if it
/// were shown. Hidden descendants stay out of the measurement.
pub fn natural_size(doc: &Document, id: ElementId) -> Option<LayoutBox> {
    let mut bridge = Bridge::new(doc);
    let node = bridge.add(id, true, None)?;
    bridge.compute(
        node,
        Size {
            width: AvailableSpace::MaxContent,
            height: AvailableSpace::MaxContent,
        },
    );
    bridge.extract().get(id)
}

/// Natural border-box width (0 for dead ids).
pub fn natural_width(doc: &Document, id: ElementId) -> f32 {
    natural_size(doc, id).map(|b| b.width).unwrap_or(0.0)
}

/// Natural border-box height (0 for dead ids).
pub fn natural_height(doc: &Document, id: ElementId) -> f32 {
    natural_size(doc, id).map(|b| b.height).unwrap_or(0.0)
}

/// Width an element actually gets inside the viewport. 0 when it or an
/// ancestor is not rendered.
pub fn resolved_width(doc: &Document, id: ElementId, viewport_width: f32, viewport_height: f32) -> f32 {
    compute_layout(doc, viewport_width, viewport_height).width(id)
}
