//! Source contexts and violation reports

use url::Url;

use crate::Directive;

/// A single resource reference being evaluated against a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    /// Resolved URL being loaded; `None` for inline content
    pub url: Option<Url>,
    /// URL of the document making the reference
    pub page: Url,
    /// Inline content interpreted as script or style text
    pub unsafe_inline: bool,
    /// Dynamic code execution (`eval` and friends)
    pub unsafe_eval: bool,
    /// Value of the `nonce` attribute; empty when absent
    pub nonce: String,
    /// Inline body, used for hash sources
    pub body: Vec<u8>,
}

impl SourceContext {
    /// Context for a reference to an external resource
    pub fn external(page: Url, url: Url) -> Self {
        Self {
            url: Some(url),
            page,
            unsafe_inline: false,
            unsafe_eval: false,
            nonce: String::new(),
            body: Vec::new(),
        }
    }

    /// Context for inline script or style text
    pub fn inline(page: Url, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: None,
            page,
            unsafe_inline: true,
            unsafe_eval: false,
            nonce: String::new(),
            body: body.into(),
        }
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = nonce.into();
        self
    }

    /// `scheme://host[:port]` of the referenced URL.
    ///
    /// Path, query, fragment and credentials are dropped. Opaque URLs such as
    /// `data:` reduce to `scheme:`. Inline content has no origin.
    pub fn scheme_host(&self) -> String {
        let Some(url) = &self.url else {
            return String::new();
        };
        match url.host_str() {
            Some(host) => match url.port() {
                Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
                None => format!("{}://{}", url.scheme(), host),
            },
            None => format!("{}:", url.scheme()),
        }
    }

    /// Whether the referenced URL shares scheme and host with the page
    pub fn is_same_origin(&self) -> bool {
        self.url.as_ref().is_some_and(|url| {
            url.scheme() == self.page.scheme()
                && url.host_str() == self.page.host_str()
                && url.port() == self.page.port()
        })
    }

    /// Scheme of the referenced URL; empty for inline content
    pub fn scheme(&self) -> &str {
        self.url.as_ref().map(Url::scheme).unwrap_or_default()
    }

    /// Build a violation report for this context
    pub fn report(&self, directive_name: &str, directive: &Directive) -> Report {
        Report {
            document: self.page.to_string(),
            blocked: self
                .url
                .as_ref()
                .map_or_else(|| "inline".to_string(), Url::to_string),
            directive_name: directive_name.to_string(),
            directive: directive.clone(),
            context: self.clone(),
        }
    }
}

/// CSP violation report
#[derive(Debug, Clone)]
pub struct Report {
    pub document: String,
    pub blocked: String,
    pub directive_name: String,
    pub directive: Directive,
    pub context: SourceContext,
}
