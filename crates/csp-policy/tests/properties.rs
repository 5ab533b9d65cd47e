//! Property tests for source matching

use csp_policy::{Policy, SourceContext, SourceDirective};
use proptest::prelude::*;
use url::Url;

const TOKENS: &[&str] = &[
    "'self'",
    "'unsafe-inline'",
    "'unsafe-eval'",
    "'nonce-abc'",
    "'sha256-LCa0a2j/xo/5m0U8HTBBNBNCLXBkg7+g+YpeiGJm564='",
    "http:",
    "https:",
    "data:",
    "*",
    "*.example.com",
    "example.com",
    "https://cdn.example.com",
    "a.com:8080",
];

const SCHEMES: &[&str] = &["http", "https", "ftp"];
const SUBDOMAINS: &[&str] = &["", "www.", "cdn."];
const DOMAINS: &[&str] = &["com", "example.com"];
const NONCES: &[&str] = &["", "abc", "xyz"];

fn arb_tokens() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(TOKENS), 0..6)
}

fn arb_context() -> impl Strategy<Value = SourceContext> {
    (
        prop::sample::select(SCHEMES),
        "[a-z]{1,6}",
        prop::sample::select(SUBDOMAINS),
        prop::sample::select(DOMAINS),
        any::<bool>(),
        prop::sample::select(NONCES),
        "[a-z]{0,4}",
    )
        .prop_map(|(scheme, label, sub, tld, inline, nonce, body)| {
            let page = Url::parse("https://a.com/").unwrap();
            let ctx = if inline {
                SourceContext::inline(page, body)
            } else {
                let target = format!("{scheme}://{sub}{label}.{tld}/x");
                SourceContext::external(page, Url::parse(&target).unwrap())
            };
            ctx.with_nonce(nonce)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Checking the same context twice yields the same verdict.
    #[test]
    fn prop_check_is_deterministic(tokens in arb_tokens(), ctx in arb_context()) {
        let directive = SourceDirective::parse(tokens.iter().copied()).unwrap();
        let first = directive.check(&ctx);
        prop_assert_eq!(first, directive.check(&ctx));
        prop_assert_eq!(first, directive.clone().check(&ctx));
    }

    /// 'none' rejects every context.
    #[test]
    fn prop_none_rejects_all(ctx in arb_context()) {
        let directive = SourceDirective::parse(["'none'"]).unwrap();
        prop_assert!(!directive.check(&ctx));
    }

    /// 'none' combined with anything else is a parse error.
    #[test]
    fn prop_none_must_be_alone(tokens in arb_tokens().prop_filter("non-empty", |t| !t.is_empty())) {
        let mut all = vec!["'none'"];
        all.extend(tokens);
        prop_assert!(SourceDirective::parse(all).is_err());
    }

    /// A nonce in the directive disables 'unsafe-inline' for inline content
    /// without a matching nonce. Hash sources leave 'unsafe-inline' in effect.
    #[test]
    fn prop_nonce_disables_unsafe_inline(body in "[a-z]{1,8}") {
        let page = Url::parse("https://a.com/").unwrap();
        let ctx = SourceContext::inline(page, body);
        let plain = SourceDirective::parse(["'unsafe-inline'"]).unwrap();
        let with_nonce = SourceDirective::parse(["'unsafe-inline'", "'nonce-zzz'"]).unwrap();
        prop_assert!(plain.check(&ctx));
        prop_assert!(!with_nonce.check(&ctx));

        let with_hash = SourceDirective::parse([
            "'unsafe-inline'",
            "'sha256-LCa0a2j/xo/5m0U8HTBBNBNCLXBkg7+g+YpeiGJm564='",
        ])
        .unwrap();
        prop_assert!(with_hash.check(&ctx));
    }

    /// Resolving default-src returns the same rule as parsing it alone.
    #[test]
    fn prop_default_src_round_trip(
        tokens in arb_tokens().prop_filter("non-empty", |t| !t.is_empty())
    ) {
        let policy = Policy::parse(&format!("default-src {}", tokens.join(" "))).unwrap();
        let alone = SourceDirective::parse(tokens.iter().copied()).unwrap();
        prop_assert_eq!(policy.directive("default-src").as_source(), Some(&alone));
        prop_assert_eq!(policy.directive("img-src").as_source(), Some(&alone));
    }
}
