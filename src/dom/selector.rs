//! Selector engine.
//!
//! Supports the subset of CSS selectors that component markup uses:
//!
//! - type (`li`), universal (`*`), id (`#tab-1`), class (`.nav-tabs`)
//! - attribute presence and equality (`[data-plugin]`, `[data-plugin="selectable"]`)
//! - `:checked`
//! - descendant (` `) and child (`>`) combinators
//! - selector lists (`a, b`)
//! - a leading `>` that anchors the selector to the scope element
//!   (`>li` = direct `li` children of the scope)

use crate::error::SelectorError;

use super::{Document, ElementId};

// =============================================================================
// TYPES
// =============================================================================

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

#[derive(Clone, Debug, PartialEq)]
struct Complex {
    /// Leading `>`: the leftmost compound must be a child of the scope.
    scoped: bool,
    /// Compounds left to right. The combinator of entry `k` joins it to `k - 1`.
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
    checked: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

impl Selector {
    /// Parse a selector list.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        if source.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut parser = Parser {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
        };

        let mut alternatives = vec![parser.complex()?];
        while parser.eat(',') {
            alternatives.push(parser.complex()?);
        }
        if let Some((offset, found)) = parser.peek_indexed() {
            return Err(SelectorError::Unexpected {
                selector: source.to_string(),
                offset,
                found,
            });
        }

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// The original selector text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether any alternative is anchored to the scope with a leading `>`.
    pub fn is_scoped(&self) -> bool {
        self.alternatives.iter().any(|c| c.scoped)
    }

    /// Test an element against the selector.
    ///
    /// `scope` anchors selectors with a leading `>`; without a scope they
    /// never match.
    pub fn matches(&self, doc: &Document, element: ElementId, scope: Option<ElementId>) -> bool {
        self.alternatives.iter().any(|complex| {
            let last = complex.parts.len() - 1;
            match_from(doc, element, complex, last, scope)
        })
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_indexed(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek_indexed() {
            Some((offset, found)) => SelectorError::Unexpected {
                selector: self.source.to_string(),
                offset,
                found,
            },
            None => SelectorError::Empty,
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        let scoped = if self.peek() == Some('>') {
            self.pos += 1;
            self.skip_ws();
            true
        } else {
            false
        };

        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let compound = self.compound()?;
            parts.push((combinator, compound));

            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinator = Combinator::Child;
                }
                Some(_) if had_ws => combinator = Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            }
        }

        Ok(Complex { scoped, parts })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let start = self.pos;

        if self.peek() == Some('*') {
            self.pos += 1;
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident().to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    let class = self.ident();
                    if class.is_empty() {
                        return Err(self.unexpected());
                    }
                    compound.classes.push(class);
                }
                Some('#') => {
                    self.pos += 1;
                    let id = self.ident();
                    if id.is_empty() {
                        return Err(self.unexpected());
                    }
                    compound.id = Some(id);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attributes.push(self.attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    let pseudo = self.ident();
                    match pseudo.as_str() {
                        "checked" => compound.checked = true,
                        _ => return Err(SelectorError::UnsupportedPseudo(pseudo)),
                    }
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttributeMatch, SelectorError> {
        self.skip_ws();
        let name = self.ident();
        if name.is_empty() {
            return Err(self.unexpected());
        }
        self.skip_ws();

        let value = match self.bump() {
            Some(']') => return Ok(AttributeMatch { name, value: None }),
            Some('=') => {
                self.skip_ws();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.pos += 1;
                        let mut value = String::new();
                        loop {
                            match self.bump() {
                                Some(c) if c == quote => break,
                                Some(c) => value.push(c),
                                None => {
                                    return Err(SelectorError::UnterminatedAttribute(
                                        self.source.to_string(),
                                    ));
                                }
                            }
                        }
                        value
                    }
                    _ => self.ident(),
                };
                self.skip_ws();
                value
            }
            None => {
                return Err(SelectorError::UnterminatedAttribute(self.source.to_string()));
            }
            Some(_) => {
                self.pos -= 1;
                return Err(self.unexpected());
            }
        };

        match self.bump() {
            Some(']') => Ok(AttributeMatch {
                name,
                value: Some(value),
            }),
            None => Err(SelectorError::UnterminatedAttribute(self.source.to_string())),
            Some(_) => {
                self.pos -= 1;
                Err(self.unexpected())
            }
        }
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

// =============================================================================
// MATCHING
// =============================================================================

fn match_from(
    doc: &Document,
    element: ElementId,
    complex: &Complex,
    k: usize,
    scope: Option<ElementId>,
) -> bool {
    let (combinator, compound) = &complex.parts[k];
    if !compound_matches(doc, element, compound) {
        return false;
    }

    if k == 0 {
        if complex.scoped {
            return scope.is_some() && doc.parent(element) == scope;
        }
        return true;
    }

    match combinator {
        Combinator::Child => doc
            .parent(element)
            .is_some_and(|parent| match_from(doc, parent, complex, k - 1, scope)),
        Combinator::Descendant => {
            let mut current = doc.parent(element);
            while let Some(ancestor) = current {
                if match_from(doc, ancestor, complex, k - 1, scope) {
                    return true;
                }
                current = doc.parent(ancestor);
            }
            false
        }
    }
}

fn compound_matches(doc: &Document, element: ElementId, compound: &Compound) -> bool {
    let Some(el) = doc.get(element) else {
        return false;
    };

    if let Some(tag) = &compound.tag {
        if el.tag() != tag.as_str() {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if el.attribute("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| el.has_class(c)) {
        return false;
    }
    if compound.checked && !el.is_checked() {
        return false;
    }
    compound.attributes.iter().all(|attr| {
        let actual = if attr.name == "class" {
            Some(el.class_name())
        } else {
            el.attribute(&attr.name).map(str::to_string)
        };
        match (&attr.value, actual) {
            (None, actual) => actual.is_some(),
            (Some(expected), Some(actual)) => *expected == actual,
            (Some(_), None) => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn fixture() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let nav = doc.insert(
            root,
            Node::new("ul")
                .class("nav nav-tabs")
                .child(Node::new("li").class("active").text("Home"))
                .child(Node::new("li").text("Profile"))
                .child(
                    Node::new("li")
                        .class("dropdown")
                        .child(Node::new("ul").child(Node::new("li").text("Home"))),
                ),
        );
        let first = doc.children(nav)[0];
        let dropdown = doc.children(nav)[2];
        (doc, nav, first, dropdown)
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("li!"),
            Err(SelectorError::Unexpected { found: '!', .. })
        ));
        assert!(matches!(
            Selector::parse("[data-plugin=\"x"),
            Err(SelectorError::UnterminatedAttribute(_))
        ));
        assert_eq!(
            Selector::parse("li:hover"),
            Err(SelectorError::UnsupportedPseudo("hover".into()))
        );
    }

    #[test]
    fn test_compound_matching() {
        let (doc, nav, first, _) = fixture();

        assert!(Selector::parse("ul.nav-tabs").unwrap().matches(&doc, nav, None));
        assert!(Selector::parse(".nav.nav-tabs").unwrap().matches(&doc, nav, None));
        assert!(!Selector::parse("ol.nav-tabs").unwrap().matches(&doc, nav, None));
        assert!(Selector::parse("li.active").unwrap().matches(&doc, first, None));
        assert!(Selector::parse("*").unwrap().matches(&doc, first, None));
    }

    #[test]
    fn test_combinators() {
        let (doc, nav, first, dropdown) = fixture();
        let nested = doc.children(doc.children(dropdown)[0])[0];

        let descendant = Selector::parse(".nav-tabs li").unwrap();
        assert!(descendant.matches(&doc, first, None));
        assert!(descendant.matches(&doc, nested, None));

        let child = Selector::parse(".nav-tabs > li").unwrap();
        assert!(child.matches(&doc, first, None));
        assert!(!child.matches(&doc, nested, None));

        let scoped = Selector::parse(">li").unwrap();
        assert!(scoped.is_scoped());
        assert!(scoped.matches(&doc, first, Some(nav)));
        assert!(!scoped.matches(&doc, nested, Some(nav)));
        assert!(!scoped.matches(&doc, first, None));
    }

    #[test]
    fn test_attribute_selectors() {
        let mut doc = Document::new();
        let root = doc.root();
        let table = doc.insert(
            root,
            Node::new("table").data("plugin", "selectable").attr("id", "users"),
        );

        assert!(Selector::parse("[data-plugin]").unwrap().matches(&doc, table, None));
        assert!(Selector::parse("[data-plugin=\"selectable\"]").unwrap().matches(&doc, table, None));
        assert!(Selector::parse("[data-plugin='selectable']").unwrap().matches(&doc, table, None));
        assert!(Selector::parse("[data-plugin=selectable]").unwrap().matches(&doc, table, None));
        assert!(!Selector::parse("[data-plugin=\"toastr\"]").unwrap().matches(&doc, table, None));
        assert!(Selector::parse("#users").unwrap().matches(&doc, table, None));
    }

    #[test]
    fn test_selector_list_and_checked() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(root, Node::new("input").attr("type", "checkbox").checked(true));
        let b = doc.insert(root, Node::new("input").attr("type", "checkbox"));

        let checked = Selector::parse("input:checked").unwrap();
        assert!(checked.matches(&doc, a, None));
        assert!(!checked.matches(&doc, b, None));

        let list = Selector::parse("[data-plugin=\"selectable\"], input").unwrap();
        assert!(list.matches(&doc, b, None));
    }
}
