//! CSP stylesheet scanning
//!
//! Finds the resource references inside a stylesheet that a Content Security
//! Policy governs: `@import` targets (`style-src`) and `@font-face` sources
//! (`font-src`). Other url() uses such as `background-image` are not reported.

mod scanner;

pub use scanner::StylesheetScanner;

/// Scan a CSS stylesheet
pub fn scan(css: &str) -> Result<Vec<StyleReference>, CssError> {
    StylesheetScanner::new().scan(css)
}

/// Kind of stylesheet reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Import,
    FontFace,
}

impl ReferenceKind {
    /// Directive governing this kind of reference
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Import => csp_policy::names::STYLE_SRC,
            Self::FontFace => csp_policy::names::FONT_SRC,
        }
    }
}

/// A URL referenced from a stylesheet, unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleReference {
    pub kind: ReferenceKind,
    pub url: String,
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
