//! Content validation
//!
//! Walks the candidate references of a document, evaluates each against the
//! directive that governs it and collects a [`Report`] for every violation.

use std::collections::HashMap;

use csp_html::Candidate;
use csp_policy::names::BLOCK_ALL_MIXED;
use csp_policy::{Directive, Policy, Report, SourceContext};
use url::Url;

use crate::{Config, ContentError, ValidationError, mixed};

/// Outcome of a validation run
#[derive(Debug, Clone)]
pub struct Validation {
    /// No reports were generated
    pub passed: bool,
    pub reports: Vec<Report>,
}

impl Validation {
    fn from_reports(reports: Vec<Report>) -> Self {
        Self {
            passed: reports.is_empty(),
            reports,
        }
    }
}

/// Validates documents and stylesheets against one policy
#[derive(Debug, Clone)]
pub struct Validator {
    policy: Policy,
    config: Config,
    /// Bodies of linked stylesheets, keyed by absolute URL
    stylesheets: HashMap<Url, String>,
}

impl Validator {
    pub fn new(policy: Policy) -> Self {
        Self::with_config(policy, Config::default())
    }

    pub fn with_config(policy: Policy, config: Config) -> Self {
        Self {
            policy: policy.with_fallback(config.fallback.directive()),
            config,
            stylesheets: HashMap::new(),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Register the content of a linked stylesheet so `<link rel=stylesheet>`
    /// references to `url` are scanned like inline `<style>` bodies
    pub fn add_stylesheet(&mut self, url: Url, css: impl Into<String>) {
        self.stylesheets.insert(url, css.into());
    }

    /// Check that an HTML page passes the policy
    pub fn validate_page(&self, page: &Url, html: &str) -> Result<Validation, ValidationError> {
        let document = csp_html::parse(html).map_err(ContentError::from)?;
        let candidates: Vec<Candidate> = document.candidates().collect();
        tracing::debug!("Validating {} candidates on {}", candidates.len(), page);

        let reports = self.evaluate_all(page, &candidates)?;
        Ok(Validation::from_reports(reports))
    }

    /// Check the `@import` and `@font-face` references of a stylesheet
    pub fn validate_stylesheet(
        &self,
        page: &Url,
        css: &str,
    ) -> Result<Validation, ValidationError> {
        let mut reports = Vec::new();
        self.check_stylesheet(page, css, &mut reports)?;
        Ok(Validation::from_reports(reports))
    }

    fn evaluate_all(
        &self,
        page: &Url,
        candidates: &[Candidate],
    ) -> Result<Vec<Report>, ValidationError> {
        let workers = self.config.worker_count(candidates.len());
        if workers <= 1 {
            let mut reports = Vec::new();
            for candidate in candidates {
                self.evaluate(page, candidate, &mut reports)?;
            }
            return Ok(reports);
        }

        // Each worker accumulates its own reports; chunks are merged in
        // document order.
        let chunk_size = candidates.len().div_ceil(workers);
        std::thread::scope(|s| -> Result<Vec<Report>, ValidationError> {
            let handles: Vec<_> = candidates
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || -> Result<Vec<Report>, ValidationError> {
                        let mut reports = Vec::new();
                        for candidate in chunk {
                            self.evaluate(page, candidate, &mut reports)?;
                        }
                        Ok(reports)
                    })
                })
                .collect();

            let mut reports = Vec::new();
            for handle in handles {
                let chunk = handle
                    .join()
                    .map_err(|_| ValidationError::Internal("evaluation worker panicked".into()))?;
                reports.extend(chunk?);
            }
            Ok(reports)
        })
    }

    fn evaluate(
        &self,
        page: &Url,
        candidate: &Candidate,
        out: &mut Vec<Report>,
    ) -> Result<(), ValidationError> {
        let mut ctx = match &candidate.url {
            Some(raw) => SourceContext::external(page.clone(), resolve(page, raw)?),
            None => SourceContext::inline(page.clone(), candidate.text.as_bytes()),
        };
        if let Some(nonce) = &candidate.nonce {
            ctx.nonce = nonce.clone();
        }

        let stylesheet = match &ctx.url {
            _ if !candidate.is_stylesheet() => None,
            None => Some(candidate.text.as_str()),
            Some(url) => self.stylesheets.get(url).map(String::as_str),
        };

        self.check(candidate.directive, ctx, mixed::is_passive(&candidate.tag), out);

        if let Some(css) = stylesheet {
            self.check_stylesheet(page, css, out)?;
        }
        Ok(())
    }

    fn check_stylesheet(
        &self,
        page: &Url,
        css: &str,
        out: &mut Vec<Report>,
    ) -> Result<(), ValidationError> {
        let references = csp_css::scan(css).map_err(ContentError::from)?;
        for reference in references {
            let url = resolve(page, &reference.url)?;
            let ctx = SourceContext::external(page.clone(), url);
            self.check(reference.kind.directive(), ctx, false, out);
        }
        Ok(())
    }

    /// Apply the mixed content rules, then the governing directive.
    /// A reference produces at most one report.
    fn check(
        &self,
        directive_name: &str,
        mut ctx: SourceContext,
        passive: bool,
        out: &mut Vec<Report>,
    ) {
        mixed::upgrade(&mut ctx, passive, &self.policy);

        if self.policy.block_all_mixed_content && !Directive::BlockMixedContent.check(&ctx) {
            out.push(ctx.report(BLOCK_ALL_MIXED, &Directive::BlockMixedContent));
            return;
        }

        let directive = self.policy.directive(directive_name);
        if !directive.check(&ctx) {
            tracing::debug!("{} blocked by {}", ctx.scheme_host(), directive_name);
            out.push(ctx.report(directive_name, directive));
        }
    }
}

fn resolve(page: &Url, raw: &str) -> Result<Url, ContentError> {
    page.join(raw).map_err(|source| ContentError::Url {
        url: raw.to_string(),
        source,
    })
}
