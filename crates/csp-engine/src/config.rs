//! Validator Configuration

use serde::Deserialize;

use csp_policy::Directive;

use crate::ConfigError;

/// Rule applied when neither a directive nor `default-src` is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Any scheme and host is allowed (browser behaviour for unset policies)
    #[default]
    AllowAll,
    /// Behave as if `default-src 'none'` was set
    DenyAll,
}

impl Fallback {
    pub fn directive(&self) -> Directive {
        match self {
            Self::AllowAll => Directive::allow_any_origin(),
            Self::DenyAll => Directive::deny_all(),
        }
    }
}

/// Validator configuration options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fourth-tier directive resolution
    pub fallback: Fallback,

    /// Worker threads for candidate evaluation (0 = available parallelism)
    pub parallelism: usize,

    /// Documents with fewer candidates are always evaluated sequentially
    pub min_parallel_candidates: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback: Fallback::AllowAll,
            parallelism: 1,
            min_parallel_candidates: 4,
        }
    }
}

impl Config {
    /// Load configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of workers to use for `candidates` references
    pub fn worker_count(&self, candidates: usize) -> usize {
        if candidates < self.min_parallel_candidates {
            return 1;
        }
        let threads = match self.parallelism {
            0 => std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4),
            n => n,
        };
        threads.min(candidates).max(1)
    }
}
