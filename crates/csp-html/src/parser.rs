//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom; the tree is walked lazily by [`Document::candidates`].

use std::io::Read;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

use crate::{Document, HtmlError};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_reader(&mut html.as_bytes())
    }

    /// Parse UTF-8 HTML from a reader
    pub fn parse_reader<R: Read>(&self, reader: &mut R) -> Result<Document, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(reader)?;

        tracing::debug!("Parsed HTML document");
        Ok(Document::new(dom))
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();
        assert_eq!(doc.candidates().count(), 0);
    }

    #[test]
    fn test_parse_fragment() {
        let doc = HtmlParser::new().parse(r#"<img src="a.png">"#).unwrap();
        // Fragments get wrapped in html/head/body by html5ever
        assert_eq!(doc.candidates().count(), 1);
    }

    #[test]
    fn test_parse_reader_error() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("boom"))
            }
        }
        assert!(matches!(
            HtmlParser::new().parse_reader(&mut Failing),
            Err(HtmlError::Read(_))
        ));
    }
}
