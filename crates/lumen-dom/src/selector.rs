//! CSS selector subset
//!
//! Enough of Selectors Level 3 for querying page markup: selector lists,
//! descendant and child combinators, type/id/class/universal selectors and
//! attribute selectors. No pseudo-classes.

use crate::{DomTree, ElementData, NodeId};
use thiserror::Error;

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character `{ch}` at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unterminated attribute selector starting at offset {offset}")]
    UnterminatedAttribute { offset: usize },

    #[error("unterminated string at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("dangling combinator at offset {offset}")]
    DanglingCombinator { offset: usize },
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(val) = value else {
            return false;
        };
        match &self.matcher {
            None => true,
            Some(AttributeMatcher::Exact(expected)) => val == expected,
            Some(AttributeMatcher::Contains(expected)) => {
                val.split_whitespace().any(|w| w == expected)
            }
            Some(AttributeMatcher::DashMatch(expected)) => {
                val == expected || val.starts_with(&format!("{expected}-"))
            }
            // An empty operand never matches for ^= $= *=
            Some(AttributeMatcher::Prefix(expected)) => {
                !expected.is_empty() && val.starts_with(expected.as_str())
            }
            Some(AttributeMatcher::Suffix(expected)) => {
                !expected.is_empty() && val.ends_with(expected.as_str())
            }
            Some(AttributeMatcher::Substring(expected)) => {
                !expected.is_empty() && val.contains(expected.as_str())
            }
        }
    }
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name, lowercase)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
}

impl SelectorComponent {
    fn matches(&self, el: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Type(tag) => el.tag == *tag,
            Self::Id(id) => el.id() == Some(id.as_str()),
            Self::Class(class) => el.has_class(class),
            Self::Attribute(attr) => attr.matches(el.get_attr(&attr.name)),
        }
    }
}

/// Sequence of simple selectors without combinators (`a.nav-link[href]`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    pub fn matches(&self, el: &ElementData) -> bool {
        self.components.iter().all(|c| c.matches(el))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
}

/// Compounds joined by combinators
///
/// `rest` holds the leftward part in reverse order: each entry is the
/// combinator linking it to the compound on its right.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub subject: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(el) = tree.element(node) else {
            return false;
        };
        self.subject.matches(el) && self.matches_rest(tree, node, 0)
    }

    fn matches_rest(&self, tree: &DomTree, node: NodeId, depth: usize) -> bool {
        let Some((combinator, compound)) = self.rest.get(depth) else {
            return true;
        };
        match combinator {
            Combinator::Child => tree.parent(node).is_some_and(|parent| {
                tree.element(parent).is_some_and(|el| compound.matches(el))
                    && self.matches_rest(tree, parent, depth + 1)
            }),
            Combinator::Descendant => tree.ancestors(node).any(|ancestor| {
                tree.element(ancestor).is_some_and(|el| compound.matches(el))
                    && self.matches_rest(tree, ancestor, depth + 1)
            }),
        }
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// Check if an element matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(tree, node))
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar {
                ch,
                offset: self.pos,
            },
            None => SelectorError::Empty,
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                None => break,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(',') | None => break,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if matches!(self.peek(), Some(',') | None) {
                return Err(SelectorError::DanglingCombinator { offset: self.pos });
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        let subject = compounds.pop().unwrap_or_default();
        let rest = combinators.into_iter().rev().zip(compounds.into_iter().rev()).collect();
        Ok(ComplexSelector { subject, rest })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                components.push(SelectorComponent::Universal);
            }
            Some(c) if is_ident_char(c) => {
                let tag = self.parse_ident();
                components.push(SelectorComponent::Type(tag.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    let class = self.parse_required_ident()?;
                    components.push(SelectorComponent::Class(class));
                }
                Some('#') => {
                    self.pos += 1;
                    let id = self.parse_required_ident()?;
                    components.push(SelectorComponent::Id(id));
                }
                Some('[') => {
                    let attr = self.parse_attribute()?;
                    components.push(SelectorComponent::Attribute(attr));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { components })
    }

    fn parse_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_required_ident(&mut self) -> Result<String, SelectorError> {
        let ident = self.parse_ident();
        if ident.is_empty() {
            return Err(self.unexpected());
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        let open = self.pos;
        self.pos += 1;
        self.skip_whitespace();

        let name = self.parse_required_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let operator = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttributeSelector {
                    name,
                    matcher: None,
                });
            }
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.chars.get(self.pos + 1) != Some(&'=') {
                    return Err(self.unexpected());
                }
                self.pos += 2;
                op
            }
            None => return Err(SelectorError::UnterminatedAttribute { offset: open }),
            Some(_) => return Err(self.unexpected()),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_string(quote)?,
            Some(_) => self.parse_ident(),
            None => return Err(SelectorError::UnterminatedAttribute { offset: open }),
        };
        self.skip_whitespace();

        match self.peek() {
            Some(']') => self.pos += 1,
            None => return Err(SelectorError::UnterminatedAttribute { offset: open }),
            Some(_) => return Err(self.unexpected()),
        }

        let matcher = match operator {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
        })
    }

    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let open = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek() {
                        value.push(escaped);
                        self.pos += 1;
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
                None => return Err(SelectorError::UnterminatedString { offset: open }),
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let list = SelectorList::parse("a.nav-link#home[href^=\"#\"]").unwrap();
        let subject = &list.selectors[0].subject;
        assert_eq!(subject.components.len(), 4);
        assert_eq!(subject.components[0], SelectorComponent::Type("a".into()));
        assert!(matches!(
            &subject.components[3],
            SelectorComponent::Attribute(AttributeSelector {
                matcher: Some(AttributeMatcher::Prefix(v)),
                ..
            }) if v == "#"
        ));
    }

    #[test]
    fn test_parse_list_and_combinators() {
        let list = SelectorList::parse(".nav-menu > li a, .gallery-item img").unwrap();
        assert_eq!(list.selectors.len(), 2);

        let first = &list.selectors[0];
        assert_eq!(first.subject.components, vec![SelectorComponent::Type("a".into())]);
        assert_eq!(first.rest[0].0, Combinator::Descendant);
        assert_eq!(first.rest[1].0, Combinator::Child);
        assert_eq!(first.rest[1].1.components, vec![SelectorComponent::Class("nav-menu".into())]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
        assert!(matches!(
            SelectorList::parse(".a >"),
            Err(SelectorError::DanglingCombinator { .. })
        ));
        assert!(matches!(
            SelectorList::parse("[href"),
            Err(SelectorError::UnterminatedAttribute { .. })
        ));
        assert!(matches!(
            SelectorList::parse("div:hover"),
            Err(SelectorError::UnexpectedChar { ch: ':', .. })
        ));
    }

    #[test]
    fn test_attribute_matchers() {
        let attr = |m| AttributeSelector {
            name: "href".into(),
            matcher: Some(m),
        };
        assert!(attr(AttributeMatcher::Prefix("#".into())).matches(Some("#about")));
        assert!(!attr(AttributeMatcher::Prefix("#".into())).matches(Some("/about")));
        assert!(attr(AttributeMatcher::Suffix(".jpg".into())).matches(Some("a.jpg")));
        assert!(attr(AttributeMatcher::Contains("b".into())).matches(Some("a b c")));
        assert!(attr(AttributeMatcher::DashMatch("en".into())).matches(Some("en-US")));
        assert!(!attr(AttributeMatcher::Substring(String::new())).matches(Some("x")));
        assert!(!attr(AttributeMatcher::Exact("x".into())).matches(None));
    }

    #[test]
    fn test_matching_against_tree() {
        let mut tree = DomTree::new();
        let nav = tree.create_element("ul");
        tree.element_mut(nav).unwrap().set_attr("class", "nav-menu");
        let li = tree.create_element("li");
        let a = tree.create_element("a");
        tree.element_mut(a).unwrap().set_attr("href", "#services");
        tree.append_child(tree.root(), nav);
        tree.append_child(nav, li);
        tree.append_child(li, a);

        let descendant = SelectorList::parse(".nav-menu a[href^='#']").unwrap();
        let child = SelectorList::parse(".nav-menu > a").unwrap();
        let nested_child = SelectorList::parse(".nav-menu > li > a").unwrap();

        assert!(descendant.matches(&tree, a));
        assert!(!child.matches(&tree, a));
        assert!(nested_child.matches(&tree, a));
        assert!(!descendant.matches(&tree, li));
    }
}
