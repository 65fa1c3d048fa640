use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::constants::{MULTI_WORD_BRANDS, SINGLE_WORD_BRANDS};
use crate::error::Result;
use crate::pipeline::text::strip_promotional;

static BUILTIN_MULTI_WORD: Lazy<Vec<BrandPattern>> = Lazy::new(|| {
    MULTI_WORD_BRANDS
        .iter()
        .map(|(pattern, canonical)| BrandPattern::compile(pattern, canonical).unwrap())
        .collect()
});

static BUILTIN_SINGLE_WORD: Lazy<Vec<BrandPattern>> = Lazy::new(|| {
    SINGLE_WORD_BRANDS
        .iter()
        .map(|name| BrandPattern::compile(&regex::escape(name), name).unwrap())
        .collect()
});

/// How a brand was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandMatchKind {
    MultiWord,
    SingleWord,
    /// No known brand matched; the phrase's first token was used.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandMatch {
    pub brand: String,
    pub kind: BrandMatchKind,
}

/// A matcher anchored at the start of a phrase paired with the name it
/// stands for.
#[derive(Debug, Clone)]
struct BrandPattern {
    matcher: Regex,
    canonical: String,
}

impl BrandPattern {
    fn compile(pattern: &str, canonical: &str) -> Result<Self> {
        Ok(Self {
            matcher: Regex::new(&format!(r"(?i)^(?:{pattern})(?:$|\W)"))?,
            canonical: canonical.to_string(),
        })
    }

    /// Pattern for a configured brand name, tolerant of spacing differences.
    fn from_name(name: &str) -> Result<Self> {
        let pattern = name
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        Self::compile(&pattern, name.trim())
    }
}

/// Maps a raw brand+model phrase to a canonical brand name.
///
/// Multi-word brands are always tried first so that "Grand Seiko" is never
/// cut down to "SEIKO". Within each list, authored order decides overlaps.
#[derive(Debug, Clone)]
pub struct BrandNormalizer {
    multi_word: Vec<BrandPattern>,
    single_word: Vec<BrandPattern>,
}

impl Default for BrandNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BrandNormalizer {
    pub fn new() -> Self {
        Self {
            multi_word: BUILTIN_MULTI_WORD.clone(),
            single_word: BUILTIN_SINGLE_WORD.clone(),
        }
    }

    /// Built-in brands followed by configured ones, each class keeping its order.
    pub fn with_extra_brands(multi_word: &[String], single_word: &[String]) -> Result<Self> {
        let mut normalizer = Self::new();
        for name in multi_word {
            normalizer.multi_word.push(BrandPattern::from_name(name)?);
        }
        for name in single_word {
            normalizer.single_word.push(BrandPattern::from_name(name)?);
        }
        Ok(normalizer)
    }

    pub fn normalize(&self, phrase: &str) -> BrandMatch {
        let cleaned = strip_promotional(phrase);

        if let Some(pattern) = self.multi_word.iter().find(|p| p.matcher.is_match(&cleaned)) {
            return BrandMatch {
                brand: pattern.canonical.clone(),
                kind: BrandMatchKind::MultiWord,
            };
        }

        if let Some(pattern) = self.single_word.iter().find(|p| p.matcher.is_match(&cleaned)) {
            return BrandMatch {
                brand: pattern.canonical.to_uppercase(),
                kind: BrandMatchKind::SingleWord,
            };
        }

        let first_token = cleaned.split_whitespace().next().unwrap_or_default();
        debug!(phrase = %cleaned, brand = first_token, "No known brand matched, using first token");
        BrandMatch {
            brand: first_token.to_string(),
            kind: BrandMatchKind::Fallback,
        }
    }

    pub fn canonical_brand(&self, phrase: &str) -> String {
        self.normalize(phrase).brand
    }
}
