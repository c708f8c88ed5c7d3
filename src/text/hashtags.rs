use std::collections::HashSet;

use super::tokenizer::{rank_by_frequency, tokenize};

const POPULAR_HASHTAGS: &[&str] = &[
    "#youtube", "#viral", "#trending", "#subscribe", "#explore", "#fyp", "#video", "#youtuber",
    "#new", "#shorts",
];

/// Curated hashtags for a niche, most important first.
pub fn curated_hashtags(niche: &str) -> &'static [&'static str] {
    match niche.trim().to_lowercase().as_str() {
        "gaming" | "games" | "game" => &[
            "#gaming", "#gamer", "#gameplay", "#videogames", "#twitch", "#ps5", "#xbox", "#pcgaming",
        ],
        "tech" | "technology" => &[
            "#tech", "#technology", "#gadgets", "#innovation", "#techreview", "#smartphone",
        ],
        "fitness" | "health" | "workout" => &[
            "#fitness", "#workout", "#gym", "#health", "#fitnessmotivation", "#training",
        ],
        "cooking" | "food" | "recipes" => &[
            "#cooking", "#food", "#recipe", "#foodie", "#homemade", "#easyrecipes",
        ],
        "travel" => &[
            "#travel", "#wanderlust", "#travelvlog", "#adventure", "#explore", "#travelgram",
        ],
        "music" => &["#music", "#newmusic", "#musician", "#cover", "#song", "#singer"],
        "education" | "tutorial" => &[
            "#education", "#learning", "#tutorial", "#howto", "#learnontiktok", "#study",
        ],
        "beauty" | "makeup" => &["#beauty", "#makeup", "#skincare", "#makeuptutorial", "#glam"],
        "finance" | "money" => &[
            "#finance", "#money", "#investing", "#personalfinance", "#stocks", "#crypto",
        ],
        "comedy" | "funny" => &["#comedy", "#funny", "#memes", "#lol", "#humor", "#skit"],
        "vlog" | "lifestyle" => &["#vlog", "#lifestyle", "#dayinmylife", "#dailyvlog", "#life"],
        _ => &[],
    }
}

pub fn to_hashtag(token: &str) -> String {
    let body: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
    format!("#{}", body.to_lowercase())
}

struct HashtagSet {
    items: Vec<String>,
    seen: HashSet<String>,
    limit: usize,
}

impl HashtagSet {
    fn new(limit: usize) -> Self {
        Self {
            items: Vec::with_capacity(limit),
            seen: HashSet::new(),
            limit,
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    fn push(&mut self, tag: String) {
        if tag.len() <= 1 || self.is_full() {
            return;
        }
        if self.seen.insert(tag.clone()) {
            self.items.push(tag);
        }
    }
}

fn curated_budget(curated: &[&str], count: usize) -> usize {
    if curated.is_empty() || count == 0 {
        0
    } else {
        curated.len().min((count / 2).max(1))
    }
}

/// Leading `tags`, cut short so the niche's curated hashtags always fit, then
/// the curated ones, then the rest of `tags`, then `padding`. Never more than
/// `count`.
pub fn blend_with_curated(tags: &[String], niche: &str, count: usize, padding: &[&str]) -> Vec<String> {
    let curated = curated_hashtags(niche);
    let lead = count - curated_budget(curated, count);

    let mut set = HashtagSet::new(count);
    for tag in &tags[..lead.min(tags.len())] {
        set.push(tag.clone());
    }
    for tag in curated {
        set.push(tag.to_string());
    }
    for tag in tags.iter().skip(lead) {
        set.push(tag.clone());
    }
    for tag in padding {
        set.push(tag.to_string());
    }
    set.items
}

/// Ranked keyword hashtags, then curated niche hashtags, then popular ones as
/// padding. Never more than `count`.
pub fn economy_hashtags(subject: &str, niche: &str, count: usize) -> Vec<String> {
    let reserved = curated_budget(curated_hashtags(niche), count);
    let tokens = tokenize(&format!("{} {}", subject, niche), &[] as &[&str]);
    let ranked: Vec<String> = rank_by_frequency(&tokens, count - reserved)
        .iter()
        .map(|token| to_hashtag(token))
        .collect();
    blend_with_curated(&ranked, niche, count, POPULAR_HASHTAGS)
}

/// Curated and popular hashtags only, led by the subject as a single tag.
pub fn rule_based_hashtags(subject: &str, niche: &str, count: usize) -> Vec<String> {
    let mut set = HashtagSet::new(count);
    let compact = to_hashtag(&subject.split_whitespace().collect::<String>());
    if compact.len() <= 30 {
        set.push(compact);
    }
    for tag in curated_hashtags(niche).iter().chain(POPULAR_HASHTAGS) {
        set.push(tag.to_string());
    }
    set.items
}

/// Hashtags already written into a piece of text, in order of appearance.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .filter_map(|word| word.strip_prefix('#'))
        .map(|rest| {
            rest.chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|body| !body.is_empty())
        .map(|body| format!("#{}", body))
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}
