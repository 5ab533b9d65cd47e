//! Directive rules

use crate::{SourceContext, SourceDirective};

/// Rule governing one directive name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Allows every context (`frame-ancestors` when unset)
    Allow,
    /// Rejects `http` references made from `https` pages
    BlockMixedContent,
    /// Compiled source list
    Source(SourceDirective),
}

impl Directive {
    /// Check the context and return whether or not it's allowed
    pub fn check(&self, ctx: &SourceContext) -> bool {
        let allowed = match self {
            Self::Allow => true,
            Self::BlockMixedContent => {
                !(ctx.page.scheme() == "https" && ctx.scheme() == "http")
            }
            Self::Source(source) => source.check(ctx),
        };
        tracing::trace!(
            "{} {} -> {}",
            ctx.scheme_host(),
            if ctx.unsafe_inline { "(inline)" } else { "" },
            allowed
        );
        allowed
    }

    /// Source list allowing any origin
    pub fn allow_any_origin() -> Self {
        Self::Source(SourceDirective::any_origin())
    }

    /// Source list equivalent to `'none'`
    pub fn deny_all() -> Self {
        Self::Source(SourceDirective::none())
    }

    pub fn as_source(&self) -> Option<&SourceDirective> {
        match self {
            Self::Source(source) => Some(source),
            _ => None,
        }
    }
}

impl From<SourceDirective> for Directive {
    fn from(source: SourceDirective) -> Self {
        Self::Source(source)
    }
}
