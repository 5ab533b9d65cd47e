//! Source-list directives
//!
//! A directive value such as `'self' https: *.cdn.com 'nonce-abc'` compiles
//! into a [`SourceDirective`]. [`SourceDirective::check`] then decides whether
//! a [`SourceContext`] is allowed.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::{HashAlgorithm, HashSource, HostPattern, PolicyError, SourceContext};

/// CSP source keywords
pub const SELF: &str = "'self'";
pub const NONE: &str = "'none'";
pub const UNSAFE_INLINE: &str = "'unsafe-inline'";
pub const UNSAFE_EVAL: &str = "'unsafe-eval'";
pub const STRICT_DYNAMIC: &str = "'strict-dynamic'";
pub const REPORT_SAMPLE: &str = "'report-sample'";

/// `[scheme:[//]]host[.host]*[:port]`, unanchored
static HOST_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((\w+|\*):(//)?)?(\*|\w+)(\.\w+)*(:(\d+|\*))?")
        .expect("host source grammar")
});

/// Compiled source list of one directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDirective {
    rule_count: usize,

    pub none: bool,
    pub self_origin: bool,
    pub unsafe_inline: bool,
    pub unsafe_eval: bool,
    pub schemes: HashSet<String>,
    pub nonces: HashSet<String>,
    pub hashes: Vec<HashSource>,
    pub hosts: Vec<HostPattern>,
}

impl SourceDirective {
    /// Parse the source expressions of a directive
    pub fn parse<'a, I>(sources: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut directive = Self::default();
        for source in sources {
            directive.parse_source(source)?;
        }
        directive.validate()?;
        Ok(directive)
    }

    /// Rule set that allows any `scheme://host` origin
    pub fn any_origin() -> Self {
        Self {
            hosts: vec![HostPattern::any_origin()],
            ..Self::default()
        }
    }

    /// Rule set equivalent to `'none'`
    pub fn none() -> Self {
        Self {
            rule_count: 1,
            none: true,
            ..Self::default()
        }
    }

    /// Parse one source expression and add it to the rule set
    pub fn parse_source(&mut self, source: &str) -> Result<(), PolicyError> {
        self.rule_count += 1;

        if source.len() >= 2 && source.starts_with('\'') && source.ends_with('\'') {
            match source {
                SELF => self.self_origin = true,
                UNSAFE_INLINE => self.unsafe_inline = true,
                UNSAFE_EVAL => self.unsafe_eval = true,
                NONE => self.none = true,
                STRICT_DYNAMIC | REPORT_SAMPLE => {
                    tracing::debug!("{} has no effect", source);
                }
                _ => self.parse_keyed_source(source)?,
            }
            return Ok(());
        }

        if let Some(scheme) = source.strip_suffix(':') {
            if scheme.is_empty() {
                return Err(PolicyError::UnknownSource(source.to_string()));
            }
            self.schemes.insert(scheme.to_ascii_lowercase());
            return Ok(());
        }

        if HOST_SOURCE.is_match(source) {
            self.hosts.extend(HostPattern::compile_pair(source)?);
            return Ok(());
        }

        Err(PolicyError::UnknownSource(source.to_string()))
    }

    /// `'nonce-<value>'` or `'<algorithm>-<digest>'`
    fn parse_keyed_source(&mut self, source: &str) -> Result<(), PolicyError> {
        let inner = &source[1..source.len() - 1];
        let Some((kind, value)) = inner.split_once('-') else {
            return Err(PolicyError::UnknownSource(source.to_string()));
        };
        if kind == "nonce" {
            self.nonces.insert(value.to_string());
            return Ok(());
        }
        match HashAlgorithm::from_name(kind) {
            Some(algorithm) => {
                self.hashes.push(HashSource::new(algorithm, value));
                Ok(())
            }
            None => Err(PolicyError::UnknownSource(source.to_string())),
        }
    }

    /// Check that `'none'` was not combined with other sources
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.none && self.rule_count != 1 {
            return Err(PolicyError::NoneNotAlone);
        }
        Ok(())
    }

    /// Check that the context is allowed by this rule set
    pub fn check(&self, ctx: &SourceContext) -> bool {
        if self.none {
            return false;
        }
        if ctx.unsafe_eval && !self.unsafe_eval {
            return false;
        }

        let mut origin_allow = false;
        let mut is_unsafe = ctx.unsafe_inline;

        // Any nonce in the directive disables 'unsafe-inline'. Hashes do not.
        if ctx.unsafe_inline && self.nonces.is_empty() && self.unsafe_inline {
            is_unsafe = false;
            origin_allow = true;
        }

        if self.self_origin && ctx.is_same_origin() {
            origin_allow = true;
        }

        let scheme = ctx.scheme();
        if self.schemes.contains(scheme) || (scheme == "https" && self.schemes.contains("http")) {
            origin_allow = true;
        }

        if !ctx.nonce.is_empty() && self.nonces.contains(&ctx.nonce) {
            origin_allow = true;
            is_unsafe = false;
        }

        for hash in &self.hashes {
            if hash.check(ctx) {
                origin_allow = true;
                is_unsafe = false;
            }
        }

        let scheme_host = ctx.scheme_host();
        if self.hosts.iter().any(|host| host.matches(&scheme_host)) {
            origin_allow = true;
        }

        origin_allow && !is_unsafe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const PAGE: &str = "https://a.com/index.html";

    fn parse(value: &str) -> SourceDirective {
        SourceDirective::parse(value.split_whitespace()).unwrap()
    }

    fn external(target: &str) -> SourceContext {
        SourceContext::external(Url::parse(PAGE).unwrap(), Url::parse(target).unwrap())
    }

    fn inline(body: &str) -> SourceContext {
        SourceContext::inline(Url::parse(PAGE).unwrap(), body)
    }

    #[test]
    fn test_parse_keywords() {
        let d = parse("'self' 'unsafe-inline' 'unsafe-eval' 'strict-dynamic' 'report-sample'");
        assert!(d.self_origin);
        assert!(d.unsafe_inline);
        assert!(d.unsafe_eval);
        assert!(!d.none);
        assert!(d.hosts.is_empty());
    }

    #[test]
    fn test_parse_nonces_and_hashes() {
        let d = parse("'nonce-abc' 'nonce-a-b' 'sha384-xyz=' 'sha512-q'");
        assert!(d.nonces.contains("abc"));
        assert!(d.nonces.contains("a-b"));
        assert_eq!(d.hashes.len(), 2);
        assert_eq!(d.hashes[0].algorithm, HashAlgorithm::Sha384);
        assert_eq!(d.hashes[0].value, "xyz=");
    }

    #[test]
    fn test_parse_schemes() {
        let d = parse("https: DATA:");
        assert!(d.schemes.contains("https"));
        assert!(d.schemes.contains("data"));
        assert!(d.hosts.is_empty());
    }

    #[test]
    fn test_parse_hosts_compile_twice() {
        let d = parse("example.com https://cdn.com");
        assert_eq!(d.hosts.len(), 4);
        assert_eq!(d.hosts[1].as_str(), "*://example.com");
    }

    #[test]
    fn test_parse_unknown_quoted() {
        let err = SourceDirective::parse(["'unsafe-hashes'"]).unwrap_err();
        assert!(err.to_string().contains("unknown source"));
        assert!(SourceDirective::parse(["'md5-abc'"]).is_err());
        assert!(SourceDirective::parse(["'bogus'"]).is_err());
    }

    #[test]
    fn test_parse_unknown_unquoted() {
        assert!(SourceDirective::parse(["!!!"]).is_err());
        assert!(SourceDirective::parse([":"]).is_err());
        assert!(SourceDirective::parse(["'"]).is_err());
    }

    #[test]
    fn test_none_must_be_alone() {
        assert!(SourceDirective::parse(["'none'"]).is_ok());
        let err = SourceDirective::parse(["'none'", "'self'"]).unwrap_err();
        assert!(matches!(err, PolicyError::NoneNotAlone));
    }

    #[test]
    fn test_none_rejects_everything() {
        let d = parse("'none'");
        assert!(!d.check(&external("https://a.com/x.js")));
        assert!(!d.check(&inline("x")));
    }

    #[test]
    fn test_empty_rejects_everything() {
        let d = parse("");
        assert!(!d.check(&external("https://a.com/x.js")));
    }

    #[test]
    fn test_self() {
        let d = parse("'self'");
        assert!(d.check(&external("https://a.com/x.js")));
        assert!(!d.check(&external("http://a.com/x.js")));
        assert!(!d.check(&external("https://b.com/x.js")));
        assert!(!d.check(&inline("x")));
    }

    #[test]
    fn test_scheme_upgrade_compatibility() {
        assert!(parse("http:").check(&external("https://b.com/x.js")));
        assert!(parse("http:").check(&external("http://b.com/x.js")));
        assert!(!parse("https:").check(&external("http://b.com/x.js")));
        assert!(parse("data:").check(&external("data:image/png;base64,AA==")));
    }

    #[test]
    fn test_unsafe_eval() {
        let mut ctx = external("https://a.com/x.js");
        ctx.unsafe_eval = true;
        assert!(!parse("'self'").check(&ctx));
        assert!(parse("'self' 'unsafe-eval'").check(&ctx));
    }

    #[test]
    fn test_unsafe_inline() {
        assert!(parse("'unsafe-inline'").check(&inline("x")));
        assert!(!parse("'unsafe-inline' 'nonce-foo'").check(&inline("x")));
        assert!(parse("'unsafe-inline' 'nonce-foo'").check(&inline("x").with_nonce("foo")));
    }

    #[test]
    fn test_hash_keeps_unsafe_inline() {
        let d = parse("'unsafe-inline' 'sha256-LCa0a2j/xo/5m0U8HTBBNBNCLXBkg7+g+YpeiGJm564='");
        assert!(d.check(&inline("foo")));
        assert!(d.check(&inline("bar")));
    }

    #[test]
    fn test_nonce() {
        let d = parse("'nonce-foo'");
        assert!(d.check(&external("https://b.com/x.js").with_nonce("foo")));
        assert!(!d.check(&external("https://b.com/x.js").with_nonce("bar")));
        assert!(!d.check(&external("https://b.com/x.js")));
        assert!(d.check(&inline("x").with_nonce("foo")));
    }

    #[test]
    fn test_hash() {
        let d = parse("'sha256-LCa0a2j/xo/5m0U8HTBBNBNCLXBkg7+g+YpeiGJm564='");
        assert!(d.check(&inline("foo")));
        assert!(!d.check(&inline("bar")));
    }

    #[test]
    fn test_host_does_not_clear_inline() {
        let d = parse("a.com");
        assert!(d.check(&external("https://a.com/x.js")));
        assert!(!d.check(&inline("x")));
    }

    #[test]
    fn test_any_origin() {
        let d = SourceDirective::any_origin();
        assert!(d.check(&external("https://b.com/x.js")));
        assert!(d.check(&external("http://b.com:8080/x.js")));
        assert!(!d.check(&inline("x")));
    }
}
