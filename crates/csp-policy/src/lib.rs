//! Content Security Policy
//!
//! Offline CSP parsing and enforcement. A policy string compiles into a
//! [`Policy`] of named [`Directive`]s; each resource reference is described
//! by a [`SourceContext`] and checked against the directive that governs it.
//!
//! ```
//! use csp_policy::{Policy, SourceContext};
//! use url::Url;
//!
//! let policy: Policy = "default-src 'self'".parse().unwrap();
//! let page = Url::parse("https://a.com").unwrap();
//! let script = Url::parse("https://a.com/x.js").unwrap();
//!
//! let ctx = SourceContext::external(page, script);
//! assert!(policy.directive("script-src").check(&ctx));
//! ```

mod context;
mod directive;
mod hash;
mod host;
mod policy;
mod source;

pub use context::{Report, SourceContext};
pub use directive::Directive;
pub use hash::{HashAlgorithm, HashSource};
pub use host::HostPattern;
pub use policy::{Policy, names};
pub use source::SourceDirective;

/// Policy parse error
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("empty directive field")]
    EmptyDirective,

    #[error("unknown directive {0:?}")]
    UnknownDirective(String),

    #[error("{directive} expects {expected} field(s); got {got:?}")]
    FieldCount {
        directive: &'static str,
        expected: usize,
        got: String,
    },

    #[error("invalid report-uri {value:?}: {source}")]
    InvalidReportUri {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unknown source {0:?}")]
    UnknownSource(String),

    #[error("'none' must only be specified")]
    NoneNotAlone,

    #[error("invalid host source {token:?}: {source}")]
    HostPattern {
        token: String,
        #[source]
        source: regex::Error,
    },
}
