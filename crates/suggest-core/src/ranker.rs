//! Merge, count, deduplicate, order.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::entry::Entry;
use crate::matcher::MatchScore;

/// Where an entry came from: source stream index, then line position.
/// Ordering by origin reconstructs the concatenated stream order no matter
/// how the sources were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Origin {
    pub source: usize,
    pub position: usize,
}

/// An entry after matching, before ranking.
#[derive(Debug, Clone)]
pub struct Scored {
    pub entry: Entry,
    pub score: MatchScore,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// The first-seen entry carrying this text.
    pub entry: Entry,
    pub score: MatchScore,
    /// How many times the text occurred across all matched sources.
    pub usage: usize,
    pub origin: Origin,
}

impl Candidate {
    pub fn text(&self) -> &str {
        &self.entry.text
    }
}

/// Ordered, duplicate-free candidates. Empty means "no suggestions".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedList {
    candidates: Vec<Candidate>,
}

impl RankedList {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.candidates.iter().map(Candidate::text).collect()
    }

    pub fn get(&self, text: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.text() == text)
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    /// Join the texts for the picker. Texts containing the delimiter cannot
    /// round-trip through it and are left out.
    pub fn payload(&self, delimiter: char) -> String {
        let mut out = String::new();
        for text in self.candidates.iter().map(Candidate::text) {
            if text.contains(delimiter) {
                debug!(text, %delimiter, "left out of payload");
                continue;
            }
            if !out.is_empty() {
                out.push(delimiter);
            }
            out.push_str(text);
        }
        out
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Rank matched entries: drop rejects, count each text, sort by count
/// (descending) with first-seen order breaking ties, keep one per text.
pub fn rank(scored: impl IntoIterator<Item = Scored>) -> RankedList {
    let _span = debug_span!("rank").entered();

    let mut pool: Vec<Scored> = scored
        .into_iter()
        .filter(|s| s.score.is_match())
        .collect();
    pool.sort_by_key(|s| s.origin);

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for s in pool {
        if let Some(&i) = slots.get(&s.entry.text) {
            candidates[i].usage += 1;
            continue;
        }
        slots.insert(s.entry.text.clone(), candidates.len());
        candidates.push(Candidate {
            entry: s.entry,
            score: s.score,
            usage: 1,
            origin: s.origin,
        });
    }

    // Stable: equal usage keeps first-seen order.
    candidates.sort_by(|a, b| b.usage.cmp(&a.usage));
    debug!(distinct = candidates.len());
    RankedList { candidates }
}
