//! Example: check an HTML file against a CSP policy
//!
//! ```sh
//! cargo run --example check_page -- "default-src 'self'" https://a.com page.html
//! ```
//!
//! Set `CSP_CONFIG` to a JSON object to override the validator config,
//! e.g. `{"fallback": "deny-all", "parallelism": 0}`.

use anyhow::{Context, bail};
use csp_engine::{Config, Policy, Validator};
use tracing_subscriber::EnvFilter;
use url::Url;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [policy, page, path] = args.as_slice() else {
        bail!("usage: check_page <policy> <page-url> <html-file>");
    };

    let config = match std::env::var("CSP_CONFIG") {
        Ok(json) => Config::from_json(&json).context("CSP_CONFIG")?,
        Err(_) => Config::default(),
    };

    let policy = Policy::parse(policy).context("invalid policy")?;
    let page = Url::parse(page).with_context(|| format!("invalid page URL {page:?}"))?;
    let html = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;

    println!("CSP Engine v{}", csp_engine::VERSION);

    let validator = Validator::with_config(policy, config);
    let result = validator.validate_page(&page, &html)?;

    for report in &result.reports {
        println!("blocked {} by {}", report.blocked, report.directive_name);
    }
    if result.passed {
        println!("{} passes", page);
    } else {
        println!("{} violation(s)", result.reports.len());
        std::process::exit(1);
    }
    Ok(())
}
