//! Mixed content
//!
//! Insecure `http` references from `https` pages are upgraded to `https`
//! when they are passive content (unless `block-all-mixed-content` is set) or
//! when the policy opts in with `upgrade-insecure-requests`.

use csp_policy::{Policy, SourceContext};
use url::Url;

/// Elements whose insecure loads are upgraded automatically
pub const PASSIVE_ELEMENTS: &[&str] = &["img", "audio", "video", "object"];

pub fn is_passive(tag: &str) -> bool {
    PASSIVE_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

pub fn is_mixed(page: &Url, url: &Url) -> bool {
    page.scheme() == "https" && url.scheme() == "http"
}

/// Whether the browser would fetch `url` over `https` instead
pub fn should_upgrade(page: &Url, url: &Url, passive: bool, policy: &Policy) -> bool {
    is_mixed(page, url)
        && ((passive && !policy.block_all_mixed_content) || policy.upgrade_insecure_requests)
}

/// Rewrite the context URL scheme to `https` when the request is upgraded
pub fn upgrade(ctx: &mut SourceContext, passive: bool, policy: &Policy) {
    let Some(url) = ctx.url.as_mut() else {
        return;
    };
    if should_upgrade(&ctx.page, url, passive, policy) && url.set_scheme("https").is_ok() {
        tracing::trace!("Upgraded mixed content request to {}", url);
    }
}
