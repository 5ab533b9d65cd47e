//! Stylesheet scanner using lightningcss

use lightningcss::rules::font_face::{FontFaceProperty, Source};
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};

use crate::{CssError, ReferenceKind, StyleReference};

/// Extracts `@import` and `@font-face` references
pub struct StylesheetScanner;

impl StylesheetScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan a stylesheet for references, in source order
    pub fn scan(&self, css: &str) -> Result<Vec<StyleReference>, CssError> {
        // Invalid rules are skipped the way browsers skip them.
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };

        let stylesheet = StyleSheet::parse(css, options).map_err(|e| CssError::ParseError {
            line: e.loc.as_ref().map_or(0, |loc| loc.line + 1),
            message: e.kind.to_string(),
        })?;

        let mut references = Vec::new();
        self.collect(&stylesheet.rules, &mut references);

        tracing::debug!("Scanned stylesheet: {} references", references.len());
        Ok(references)
    }

    fn collect(&self, rules: &CssRuleList<'_>, out: &mut Vec<StyleReference>) {
        for rule in rules.0.iter() {
            match rule {
                CssRule::Import(import) => out.push(StyleReference {
                    kind: ReferenceKind::Import,
                    url: (*import.url).to_owned(),
                }),
                CssRule::FontFace(font_face) => {
                    for property in &font_face.properties {
                        let FontFaceProperty::Source(sources) = property else {
                            continue;
                        };
                        for source in sources {
                            match source {
                                Source::Url(source) => out.push(StyleReference {
                                    kind: ReferenceKind::FontFace,
                                    url: (*source.url.url).to_owned(),
                                }),
                                Source::Local(_) => {}
                            }
                        }
                    }
                }
                // Nested blocks may carry @font-face
                CssRule::Media(media) => self.collect(&media.rules, out),
                CssRule::Supports(supports) => self.collect(&supports.rules, out),
                _ => {}
            }
        }
    }
}

impl Default for StylesheetScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(css: &str) -> Vec<StyleReference> {
        StylesheetScanner::new().scan(css).unwrap()
    }

    #[test]
    fn test_import_forms() {
        let refs = scan(
            r#"
            @import url("a.css");
            @import url('b.css') screen;
            @import "c.css";
            @import 'd.css';
        "#,
        );
        let urls: Vec<_> = refs.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["a.css", "b.css", "c.css", "d.css"]);
        assert!(refs.iter().all(|r| r.kind == ReferenceKind::Import));
    }

    #[test]
    fn test_font_face_skips_local() {
        let refs = scan(
            r#"@font-face {
                font-family: "Open Sans";
                src: local(blah),
                     url("/fonts/OpenSans.woff2") format("woff2"),
                     url(/fonts/OpenSans.woff) format("woff");
            }"#,
        );
        assert_eq!(
            refs,
            vec![
                StyleReference {
                    kind: ReferenceKind::FontFace,
                    url: "/fonts/OpenSans.woff2".into(),
                },
                StyleReference {
                    kind: ReferenceKind::FontFace,
                    url: "/fonts/OpenSans.woff".into(),
                },
            ]
        );
    }

    #[test]
    fn test_other_urls_ignored() {
        let refs = scan("body { background-image: url(bg.png); }");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_nested_font_face() {
        let refs = scan(
            r#"@media screen {
                @font-face { font-family: x; src: url(f.woff); }
            }"#,
        );
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind.directive(), "font-src");
    }

    #[test]
    fn test_invalid_rules_recovered() {
        assert!(scan("bar").is_empty());
        assert_eq!(scan("@import url('blah.html')").len(), 1);
    }
}
