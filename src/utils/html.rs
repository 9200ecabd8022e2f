//! Optional-chaining helpers over `scraper` element handles.
//!
//! A [`Node`] is either an element or nothing. Every lookup on an absent
//! node yields another absent node, so a chain such as
//! `card.find(&a).find(&span).text()` returns `None` at the first missing
//! link instead of failing. Call [`Node::require`] where a link in the
//! chain is mandatory.

use crate::utils::error::{HarvestError, Result};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| HarvestError::SelectorError {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Trimmed text, with empty-after-trim treated as absent.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A required link in a lookup chain was missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("required element not found: {what}")]
pub struct MissingNode {
    pub what: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(Option<ElementRef<'a>>);

impl<'a> Node<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self(Some(element))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn root(document: &'a Html) -> Self {
        Self(Some(document.root_element()))
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// First descendant matching `sel`.
    pub fn find(&self, sel: &Selector) -> Node<'a> {
        Node(self.0.and_then(|el| el.select(sel).next()))
    }

    pub fn find_all(&self, sel: &Selector) -> Vec<ElementRef<'a>> {
        match self.0 {
            Some(el) => el.select(sel).collect(),
            None => Vec::new(),
        }
    }

    /// First element matching `sel` that follows this one in document order,
    /// starting with its own descendants.
    pub fn find_next(&self, sel: &Selector) -> Node<'a> {
        let Some(el) = self.0 else {
            return Node::absent();
        };
        let matching = |n| ElementRef::wrap(n).filter(|e| sel.matches(e));

        if let Some(found) = el.descendants().skip(1).find_map(matching) {
            return Node::new(found);
        }

        let mut current = Some(*el);
        while let Some(node) = current {
            for sibling in node.next_siblings() {
                if let Some(found) = sibling.descendants().find_map(matching) {
                    return Node::new(found);
                }
            }
            current = node.parent();
        }
        Node::absent()
    }

    pub fn text(&self) -> Option<String> {
        self.0
            .and_then(|el| normalize_text(&el.text().collect::<String>()))
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.and_then(|el| el.value().attr(name))
    }

    pub fn require(self, what: &str) -> std::result::Result<ElementRef<'a>, MissingNode> {
        self.0.ok_or_else(|| MissingNode {
            what: what.to_string(),
        })
    }
}
