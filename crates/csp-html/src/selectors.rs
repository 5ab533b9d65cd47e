//! Directive-to-element table

use csp_policy::names::*;

/// Attribute carrying an element's resource URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlAttribute {
    Src,
    Href,
    /// `data`, falling back to `src` (`<object>`)
    Data,
}

impl UrlAttribute {
    /// Attribute names to try, in order
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Self::Src => &["src"],
            Self::Href => &["href"],
            Self::Data => &["data", "src"],
        }
    }
}

/// Elements governed by one fetch directive
#[derive(Debug)]
pub struct ElementSelector {
    pub directive: &'static str,
    pub tags: &'static [&'static str],
    /// Required `rel` tokens (any of), empty for no constraint
    pub rel: &'static [&'static str],
    pub url: UrlAttribute,
    /// Without a URL the element's text is inline script or style
    pub inline: bool,
}

impl ElementSelector {
    pub fn matches(&self, tag: &str, rel: Option<&str>) -> bool {
        if !self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        if self.rel.is_empty() {
            return true;
        }
        rel.is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| self.rel.iter().any(|r| r.eq_ignore_ascii_case(token)))
        })
    }
}

pub const SELECTORS: &[ElementSelector] = &[
    ElementSelector {
        directive: SCRIPT_SRC,
        tags: &["script"],
        rel: &[],
        url: UrlAttribute::Src,
        inline: true,
    },
    ElementSelector {
        directive: IMG_SRC,
        tags: &["img"],
        rel: &[],
        url: UrlAttribute::Src,
        inline: false,
    },
    ElementSelector {
        directive: IMG_SRC,
        tags: &["link"],
        rel: &["icon", "apple-touch-icon"],
        url: UrlAttribute::Href,
        inline: false,
    },
    ElementSelector {
        directive: MEDIA_SRC,
        tags: &["audio", "video", "track"],
        rel: &[],
        url: UrlAttribute::Src,
        inline: false,
    },
    ElementSelector {
        directive: FRAME_SRC,
        tags: &["iframe"],
        rel: &[],
        url: UrlAttribute::Src,
        inline: false,
    },
    ElementSelector {
        directive: OBJECT_SRC,
        tags: &["object"],
        rel: &[],
        url: UrlAttribute::Data,
        inline: false,
    },
    ElementSelector {
        directive: OBJECT_SRC,
        tags: &["embed", "applet"],
        rel: &[],
        url: UrlAttribute::Src,
        inline: false,
    },
    ElementSelector {
        directive: STYLE_SRC,
        tags: &["style"],
        rel: &[],
        url: UrlAttribute::Src,
        inline: true,
    },
    ElementSelector {
        directive: STYLE_SRC,
        tags: &["link"],
        rel: &["stylesheet"],
        url: UrlAttribute::Href,
        inline: false,
    },
    ElementSelector {
        directive: BASE_URI,
        tags: &["base"],
        rel: &[],
        url: UrlAttribute::Href,
        inline: false,
    },
    ElementSelector {
        directive: PREFETCH_SRC,
        tags: &["link"],
        rel: &["prefetch", "prerender"],
        url: UrlAttribute::Href,
        inline: false,
    },
    ElementSelector {
        directive: MANIFEST_SRC,
        tags: &["link"],
        rel: &["manifest"],
        url: UrlAttribute::Href,
        inline: false,
    },
];
