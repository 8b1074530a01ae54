use itertools::Itertools;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

use super::normalize::NormalizedText;

const ID_HEX_LEN: usize = 8;
const MIN_WORD_LEN: usize = 4;
const MAX_SLUG_WORDS: usize = 3;
const MAX_SLUG_LEN: usize = 20;
const FALLBACK_SLUG: &str = "spec";

/// First 8 hex characters of the SHA-256 of the normalized text.
///
/// Only 32 bits wide, so two different requirements can share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SpecificationId(String);

impl SpecificationId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecificationId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `spec_<slug>.json`, where the slug is at most 20 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SpecificationFilename(String);

impl SpecificationFilename {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part between `spec_` and `.json`
    #[inline]
    pub fn slug(&self) -> &str {
        self.0
            .strip_prefix("spec_")
            .and_then(|rest| rest.strip_suffix(".json"))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for SpecificationFilename {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[inline]
pub fn derive_id(normalized: &NormalizedText) -> SpecificationId {
    let digest = format!("{:x}", Sha256::digest(normalized.as_str().as_bytes()));
    SpecificationId(digest.chars().take(ID_HEX_LEN).collect())
}

#[inline]
pub fn derive_filename(normalized: &NormalizedText) -> SpecificationFilename {
    let joined = normalized
        .words()
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .take(MAX_SLUG_WORDS)
        .join("_");

    let slug = if joined.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        joined.chars().take(MAX_SLUG_LEN).collect()
    };

    SpecificationFilename(format!("spec_{}.json", slug))
}
