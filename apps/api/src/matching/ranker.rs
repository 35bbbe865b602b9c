//! Ranker — scores job postings against a resume by lexical overlap and keeps the top-k.
//!
//! Algorithm:
//! 1. Resume word set = lowercase, whitespace-split, deduplicated.
//! 2. Each posting's description word set is built the same way.
//! 3. score = |resume ∩ description|. No weighting, stemming, or stopword removal.
//! 4. Stable descending sort on score, so equal scores keep corpus order.
//! 5. Take the first `top_k`.
//!
//! Scoring runs against the whole resume text, not against its chunks.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::job::JobPosting;

pub const DEFAULT_TOP_K: usize = 5;

/// A posting paired with its overlap score against one resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredMatch<'a> {
    pub score: usize,
    pub posting: &'a JobPosting,
}

/// Lowercased, deduplicated whitespace tokens of `text`.
pub fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn overlap_score(resume_words: &HashSet<String>, description: &str) -> usize {
    word_set(description)
        .iter()
        .filter(|w| resume_words.contains(*w))
        .count()
}

/// Scores every posting and returns the `top_k` best, highest score first.
pub fn rank_scored<'a>(
    resume_text: &str,
    postings: &'a [JobPosting],
    top_k: usize,
) -> Vec<ScoredMatch<'a>> {
    if top_k == 0 || postings.is_empty() {
        return Vec::new();
    }

    let resume_words = word_set(resume_text);

    let mut scored: Vec<ScoredMatch<'a>> = postings
        .iter()
        .map(|posting| ScoredMatch {
            score: overlap_score(&resume_words, &posting.description),
            posting,
        })
        .collect();

    // sort_by is stable: ties keep their input order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_k);
    scored
}

/// Score-free view of [`rank_scored`]: the top-k postings in ranked order.
///
/// The match pipeline calls `rank_scored` directly because it reports scores;
/// this is the entry point for callers that only need the postings.
#[allow(dead_code)]
pub fn rank<'a>(
    resume_text: &str,
    postings: &'a [JobPosting],
    top_k: usize,
) -> Vec<&'a JobPosting> {
    rank_scored(resume_text, postings, top_k)
        .into_iter()
        .map(|m| m.posting)
        .collect()
}
