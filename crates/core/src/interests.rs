//! Interest-tag vocabulary and membership checks.
//!
//! The vocabulary is the server-held set of valid interest identifiers
//! (the `interest_tags` table). Membership checks are pure: they report
//! every unknown identifier at once instead of stopping at the first.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Minimum number of interests a completed profile carries.
pub const MIN_INTERESTS: usize = 5;

/// Maximum number of interests a completed profile carries.
pub const MAX_INTERESTS: usize = 10;

/// The fixed set of known interest tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestVocabulary {
    tags: BTreeSet<String>,
}

impl InterestVocabulary {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

/// Whether `tag` belongs to `vocabulary`.
pub fn is_valid_interest(tag: &str, vocabulary: &InterestVocabulary) -> bool {
    vocabulary.contains(tag)
}

/// Return every submitted identifier that is not in the vocabulary.
///
/// Submission order is preserved and each unknown identifier is reported
/// once, even if it was submitted several times.
pub fn find_invalid_interests(
    submitted: &[String],
    vocabulary: &InterestVocabulary,
) -> Vec<String> {
    let mut seen = BTreeSet::new();
    submitted
        .iter()
        .filter(|tag| !is_valid_interest(tag, vocabulary))
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

/// Trim each identifier and drop repeats, keeping the first occurrence.
pub fn dedup_interests(submitted: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    submitted
        .into_iter()
        .map(|tag| tag.trim().to_owned())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
