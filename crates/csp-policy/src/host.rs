//! Host source patterns
//!
//! A host source such as `*.example.com` or `https://cdn.example.com:*` is
//! compiled into an anchored, case-insensitive regex where `*` matches any run
//! of characters other than `/`. Everything between wildcards is escaped.

use regex::Regex;

use crate::PolicyError;

/// Compiled host pattern, matched against `scheme://host[:port]` strings
#[derive(Debug, Clone)]
pub struct HostPattern {
    source: String,
    regex: Regex,
}

impl HostPattern {
    /// Compile a glob where `*` is the only metacharacter
    pub fn compile(pattern: &str) -> Result<Self, PolicyError> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("[^/]*");
        let regex = Regex::new(&format!("(?i)^{body}$")).map_err(|source| {
            PolicyError::HostPattern {
                token: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Compile both variants of a host-source token: as written, and prefixed
    /// with `*://` so a bare host also matches under any explicit scheme.
    pub fn compile_pair(token: &str) -> Result<[Self; 2], PolicyError> {
        Ok([Self::compile(token)?, Self::compile(&format!("*://{token}"))?])
    }

    /// Pattern matching every `scheme://host` string
    pub fn any_origin() -> Self {
        Self::compile("*://*").expect("static host pattern")
    }

    pub fn matches(&self, scheme_host: &str) -> bool {
        self.regex.is_match(scheme_host)
    }

    /// The glob as written in the policy
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for HostPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for HostPattern {}
