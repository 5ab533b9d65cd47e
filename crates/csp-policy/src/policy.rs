//! Policy parsing and directive resolution

use std::collections::HashMap;
use std::str::FromStr;

use url::Url;

use crate::{Directive, PolicyError, SourceDirective};

/// CSP directive names
pub mod names {
    pub const DEFAULT_SRC: &str = "default-src";
    pub const SCRIPT_SRC: &str = "script-src";
    pub const STYLE_SRC: &str = "style-src";
    pub const IMG_SRC: &str = "img-src";
    pub const FONT_SRC: &str = "font-src";
    pub const CONNECT_SRC: &str = "connect-src";
    pub const MEDIA_SRC: &str = "media-src";
    pub const OBJECT_SRC: &str = "object-src";
    pub const FRAME_SRC: &str = "frame-src";
    pub const CHILD_SRC: &str = "child-src";
    pub const WORKER_SRC: &str = "worker-src";
    pub const MANIFEST_SRC: &str = "manifest-src";
    pub const PREFETCH_SRC: &str = "prefetch-src";
    pub const BASE_URI: &str = "base-uri";
    pub const FORM_ACTION: &str = "form-action";
    pub const FRAME_ANCESTORS: &str = "frame-ancestors";
    pub const REPORT_URI: &str = "report-uri";
    pub const UPGRADE_INSECURE: &str = "upgrade-insecure-requests";
    pub const BLOCK_ALL_MIXED: &str = "block-all-mixed-content";

    /// Directives whose value is a source list
    pub const SOURCE_LISTS: &[&str] = &[
        BASE_URI,
        CHILD_SRC,
        CONNECT_SRC,
        DEFAULT_SRC,
        FONT_SRC,
        FORM_ACTION,
        FRAME_ANCESTORS,
        FRAME_SRC,
        IMG_SRC,
        MANIFEST_SRC,
        MEDIA_SRC,
        OBJECT_SRC,
        SCRIPT_SRC,
        STYLE_SRC,
        WORKER_SRC,
    ];
}

use names::*;

static ALLOW: Directive = Directive::Allow;

/// Parsed Content Security Policy
#[derive(Debug, Clone)]
pub struct Policy {
    directives: HashMap<String, Directive>,
    pub upgrade_insecure_requests: bool,
    pub block_all_mixed_content: bool,
    /// Rule used when neither the directive nor `default-src` is set
    fallback: Directive,
}

impl Policy {
    /// Parse all the directives in a CSP policy
    pub fn parse(policy: &str) -> Result<Self, PolicyError> {
        let mut parsed = Self {
            directives: HashMap::new(),
            upgrade_insecure_requests: false,
            block_all_mixed_content: false,
            fallback: Directive::allow_any_origin(),
        };

        for definition in policy.split(';') {
            let mut fields = definition.split_whitespace();
            let Some(name) = fields.next() else {
                return Err(PolicyError::EmptyDirective);
            };
            let values: Vec<&str> = fields.collect();

            match name {
                REPORT_URI => {
                    let [value] = values.as_slice() else {
                        return Err(field_count(REPORT_URI, 1, definition));
                    };
                    check_reference(value)?;
                }
                UPGRADE_INSECURE => {
                    if !values.is_empty() {
                        return Err(field_count(UPGRADE_INSECURE, 0, definition));
                    }
                    parsed.upgrade_insecure_requests = true;
                }
                BLOCK_ALL_MIXED => {
                    if !values.is_empty() {
                        return Err(field_count(BLOCK_ALL_MIXED, 0, definition));
                    }
                    parsed.block_all_mixed_content = true;
                }
                _ if SOURCE_LISTS.contains(&name) => {
                    let source = SourceDirective::parse(values)?;
                    if parsed.directives.insert(name.to_string(), source.into()).is_some() {
                        tracing::warn!("Duplicate {} directive replaces the earlier one", name);
                    }
                }
                _ => return Err(PolicyError::UnknownDirective(definition.trim().to_string())),
            }
        }

        tracing::debug!(
            "Parsed CSP with {} source directives (upgrade={}, block-mixed={})",
            parsed.directives.len(),
            parsed.upgrade_insecure_requests,
            parsed.block_all_mixed_content
        );
        Ok(parsed)
    }

    /// Replace the rule used when a directive has no explicit or
    /// `default-src` rule
    pub fn with_fallback(mut self, fallback: Directive) -> Self {
        self.fallback = fallback;
        self
    }

    /// Explicitly set directive, without fallback
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.directives.get(name)
    }

    /// Names of the explicitly set directives
    pub fn directive_names(&self) -> impl Iterator<Item = &str> {
        self.directives.keys().map(String::as_str)
    }

    /// Resolve the rule governing `name`: the directive itself, then
    /// `default-src`, then the fallback. `frame-ancestors` never falls back
    /// to `default-src` and allows everything when unset.
    pub fn directive(&self, name: &str) -> &Directive {
        if let Some(directive) = self.directives.get(name) {
            return directive;
        }
        if name == FRAME_ANCESTORS {
            return &ALLOW;
        }
        self.directives.get(DEFAULT_SRC).unwrap_or(&self.fallback)
    }
}

impl FromStr for Policy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn field_count(directive: &'static str, expected: usize, definition: &str) -> PolicyError {
    PolicyError::FieldCount {
        directive,
        expected,
        got: definition.trim().to_string(),
    }
}

/// Accept absolute URLs and relative references such as `/csp-report`
fn check_reference(value: &str) -> Result<(), PolicyError> {
    let invalid = |source| PolicyError::InvalidReportUri {
        value: value.to_string(),
        source,
    };
    match Url::parse(value) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("https://report.invalid/").map_err(invalid)?;
            base.join(value).map(|_| ()).map_err(invalid)
        }
        Err(e) => Err(invalid(e)),
    }
}
