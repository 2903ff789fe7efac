//! Node - declarative description of an element subtree.
//!
//! Used to build markup before inserting it into a [`Document`](super::Document):
//!
//! ```
//! use spark_components::dom::{Document, Node};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let nav = doc.insert(
//!     root,
//!     Node::new("ul")
//!         .class("nav nav-tabs")
//!         .child(Node::new("li").class("active").text("Home"))
//!         .child(Node::new("li").text("Profile")),
//! );
//! assert_eq!(doc.children(nav).len(), 2);
//! ```

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub(crate) tag: String,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) styles: Vec<(String, String)>,
    pub(crate) text: String,
    pub(crate) checked: bool,
    pub(crate) hidden: bool,
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Add one or more whitespace separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == "class" {
            return self.class(&value);
        }
        self.attributes.retain(|(n, _)| *n != name);
        self.attributes.push((name, value));
        self
    }

    /// `data-<name>` attribute.
    pub fn data(self, name: &str, value: impl Into<String>) -> Self {
        self.attr(format!("data-{name}"), value)
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let property = property.into();
        self.styles.retain(|(p, _)| *p != property);
        self.styles.push((property, value.into()));
        self
    }

    /// Fixed border-box width in pixels.
    pub fn width(self, px: f32) -> Self {
        self.style("width", format_px(px))
    }

    /// Fixed border-box height in pixels.
    pub fn height(self, px: f32) -> Self {
        self.style("height", format_px(px))
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Format a pixel length the way inline styles are written (`50px`, `12.5px`).
pub fn format_px(px: f32) -> String {
    if px.fract() == 0.0 {
        format!("{}px", px as i64)
    } else {
        format!("{px}px")
    }
}

/// Parse a pixel length (`50px`, `50`, `12.5px`). Other units yield `None`.
pub fn parse_px(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f32>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_dedup() {
        let node = Node::new("LI").class("active tab").class("active").attr("class", "extra");
        assert_eq!(node.tag, "li");
        assert_eq!(node.classes, vec!["active", "tab", "extra"]);
    }

    #[test]
    fn test_attr_replaces() {
        let node = Node::new("a").attr("href", "#a").attr("href", "#b");
        assert_eq!(node.attributes, vec![("href".to_string(), "#b".to_string())]);
    }

    #[test]
    fn test_px_round_trip() {
        assert_eq!(format_px(50.0), "50px");
        assert_eq!(format_px(12.5), "12.5px");
        assert_eq!(parse_px("50px"), Some(50.0));
        assert_eq!(parse_px(" 12.5 "), Some(12.5));
        assert_eq!(parse_px("50%"), None);
        assert_eq!(parse_px("auto"), None);
    }
}
