//! CSP HTML traversal
//!
//! Parses HTML with html5ever and enumerates the elements a Content Security
//! Policy governs, as [`Candidate`] references in document order.

mod document;
mod parser;
mod selectors;

pub use document::{Candidate, Candidates, Document};
pub use parser::HtmlParser;
pub use selectors::{ElementSelector, SELECTORS, UrlAttribute};

/// Parse an HTML string
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// HTML parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML: {0}")]
    Read(#[from] std::io::Error),
}
