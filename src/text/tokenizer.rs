use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const DENSITY_LIMIT: usize = 30;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "get", "got", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "let", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
    "yourself", "yourselves", "s", "t", "ll", "re", "ve", "d", "m",
];

fn is_builtin_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Lowercase alphanumeric tokens with stopwords removed.
///
/// Anything that is not alphanumeric separates tokens. `extra_stopwords` are
/// matched case-insensitively on top of the built-in set.
pub fn tokenize<S: AsRef<str>>(text: &str, extra_stopwords: &[S]) -> Vec<String> {
    let extra: HashSet<String> = extra_stopwords
        .iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    split_words(text)
        .into_iter()
        .filter(|w| !is_builtin_stopword(w) && !extra.contains(w))
        .collect()
}

/// Lowercased words before any stopword filtering.
///
/// Lowercasing happens before the split: some characters lowercase into
/// combining marks, which must not end up inside a token.
fn split_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct tokens by descending count; ties keep first-appearance order.
pub fn rank_by_frequency<S: AsRef<str>>(tokens: &[S], limit: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in tokens {
        let token = token.as_ref();
        match index.get(token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(token, _)| token.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordDensity {
    pub word: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityReport {
    pub keywords: Vec<KeywordDensity>,
    /// Words left after stopword removal; the denominator of every percentage.
    pub total_filtered_words: usize,
    /// Every word in the input, stopwords included.
    pub raw_word_count: usize,
}

/// Keyword density over the full filtered token set, untruncated.
pub fn density_all<S: AsRef<str>>(text: &str, extra_stopwords: &[S]) -> Vec<KeywordDensity> {
    let tokens = tokenize(text, extra_stopwords);
    let total = tokens.len();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &tokens {
        *counts.entry(token.as_str()).or_default() += 1;
    }

    rank_by_frequency(&tokens, usize::MAX)
        .into_iter()
        .map(|word| {
            let count = counts.get(word.as_str()).copied().unwrap_or_default();
            KeywordDensity {
                percentage: count as f64 / total as f64 * 100.0,
                word,
                count,
            }
        })
        .collect()
}

/// Top keywords by density, at most [`DENSITY_LIMIT`] entries.
pub fn density<S: AsRef<str>>(text: &str, extra_stopwords: &[S]) -> Vec<KeywordDensity> {
    let mut all = density_all(text, extra_stopwords);
    all.truncate(DENSITY_LIMIT);
    all
}

pub fn density_report<S: AsRef<str>>(text: &str, extra_stopwords: &[S]) -> DensityReport {
    DensityReport {
        keywords: density(text, extra_stopwords),
        total_filtered_words: tokenize(text, extra_stopwords).len(),
        raw_word_count: split_words(text).len(),
    }
}
