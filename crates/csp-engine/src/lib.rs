//! CSP Engine
//!
//! Offline Content Security Policy enforcement: checks what a browser would
//! block when loading an HTML page or stylesheet under a given policy.
//!
//! # Example
//! ```
//! let result = csp_engine::validate_page(
//!     "default-src 'self'",
//!     "https://a.com",
//!     r#"<script src="https://a.com/x.js"></script><img src="https://b.com/y.png">"#,
//! )
//! .unwrap();
//!
//! assert!(!result.passed);
//! assert_eq!(result.reports[0].blocked, "https://b.com/y.png");
//! ```

mod config;
pub mod mixed;
mod validator;

pub use config::{Config, Fallback};
pub use validator::{Validation, Validator};

pub use csp_policy::{Directive, Policy, PolicyError, Report, SourceContext, SourceDirective};

// Re-export sub-crates for advanced usage
pub use csp_css as css;
pub use csp_html as html;
pub use csp_policy as policy;

use url::Url;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse `policy` and check an HTML page served from `page`
pub fn validate_page(policy: &str, page: &str, html: &str) -> Result<Validation, ValidationError> {
    let policy = Policy::parse(policy)?;
    Validator::new(policy).validate_page(&parse_page(page)?, html)
}

/// Parse `policy` and check a stylesheet applied to `page`
pub fn validate_stylesheet(
    policy: &str,
    page: &str,
    css: &str,
) -> Result<Validation, ValidationError> {
    let policy = Policy::parse(policy)?;
    Validator::new(policy).validate_stylesheet(&parse_page(page)?, css)
}

fn parse_page(page: &str) -> Result<Url, ContentError> {
    Url::parse(page).map_err(|source| ContentError::Url {
        url: page.to_string(),
        source,
    })
}

/// Validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Malformed document, stylesheet or URL
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("HTML: {0}")]
    Html(#[from] csp_html::HtmlError),

    #[error("CSS: {0}")]
    Css(#[from] csp_css::CssError),

    #[error("Invalid URL {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
