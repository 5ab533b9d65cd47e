//! Parsed document and candidate references

use std::collections::VecDeque;

use html5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::selectors::{ElementSelector, SELECTORS};

/// Parsed HTML document
pub struct Document {
    dom: RcDom,
}

/// An element reference governed by a fetch directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Directive governing the element, e.g. `script-src`
    pub directive: &'static str,
    /// Lowercase element name
    pub tag: String,
    /// Raw URL attribute value, unresolved; `None` for inline content
    pub url: Option<String>,
    pub nonce: Option<String>,
    /// Concatenated text content
    pub text: String,
}

impl Candidate {
    pub fn is_inline(&self) -> bool {
        self.url.is_none()
    }

    /// `<style>` or `<link rel=stylesheet>`
    pub fn is_stylesheet(&self) -> bool {
        self.directive == csp_policy::names::STYLE_SRC
    }
}

impl Document {
    pub(crate) fn new(dom: RcDom) -> Self {
        Self { dom }
    }

    /// Candidate references in document order
    pub fn candidates(&self) -> Candidates {
        Candidates {
            stack: vec![self.dom.document.clone()],
            pending: VecDeque::new(),
        }
    }
}

/// Depth-first walk over the document, yielding candidates lazily
pub struct Candidates {
    stack: Vec<Handle>,
    pending: VecDeque<Candidate>,
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(candidate) = self.pending.pop_front() {
                return Some(candidate);
            }
            let node = self.stack.pop()?;
            self.stack.extend(node.children.borrow().iter().rev().cloned());

            if let NodeData::Element { name, attrs, .. } = &node.data {
                let attrs = attrs.borrow();
                let tag = name.local.to_ascii_lowercase();
                let rel = attr(&attrs, "rel");
                for selector in SELECTORS.iter().filter(|s| s.matches(&tag, rel)) {
                    if let Some(candidate) = candidate(selector, &tag, &attrs, &node) {
                        self.pending.push_back(candidate);
                    }
                }
            }
        }
    }
}

fn candidate(
    selector: &'static ElementSelector,
    tag: &str,
    attrs: &[Attribute],
    node: &Handle,
) -> Option<Candidate> {
    let url = selector
        .url
        .names()
        .iter()
        .find_map(|name| attr(attrs, name))
        .filter(|url| !url.is_empty());

    if url.is_none() && !selector.inline {
        tracing::trace!("Skipping <{}> without a URL", tag);
        return None;
    }

    Some(Candidate {
        directive: selector.directive,
        tag: tag.to_string(),
        url: url.map(str::to_string),
        nonce: attr(attrs, "nonce").map(str::to_string),
        text: text_content(node),
    })
}

fn attr<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| &*a.value)
}

fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        if let NodeData::Text { contents } = &current.data {
            text.push_str(&contents.borrow());
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    text
}
