//! Hash sources (`'sha256-...'` and friends)

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ring::digest;

use crate::SourceContext;

/// Digest algorithm of a hash source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Parse the algorithm prefix of a hash source
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    fn ring_algorithm(&self) -> &'static digest::Algorithm {
        match self {
            Self::Sha256 => &digest::SHA256,
            Self::Sha384 => &digest::SHA384,
            Self::Sha512 => &digest::SHA512,
        }
    }

    /// Base64 (standard alphabet, padded) digest of `data`
    pub fn digest_base64(&self, data: &[u8]) -> String {
        STANDARD.encode(digest::digest(self.ring_algorithm(), data).as_ref())
    }
}

/// Source rule that matches inline content by its digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashSource {
    pub algorithm: HashAlgorithm,
    pub value: String,
}

impl HashSource {
    pub fn new(algorithm: HashAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }

    /// Check if the context body hashes to the expected value
    pub fn check(&self, ctx: &SourceContext) -> bool {
        self.algorithm.digest_base64(&ctx.body) == self.value
    }
}
