use std::collections::HashSet;

use super::tokenizer::{rank_by_frequency, tokenize};

/// Joins the words of a multi-word tag with hyphens.
pub fn hyphenate(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Most frequent keywords of `title` + `description`.
pub fn rule_based_tags(title: &str, description: &str, count: usize) -> Vec<String> {
    let tokens = tokenize(&format!("{} {}", title, description), &[] as &[&str]);
    rank_by_frequency(&tokens, count)
        .iter()
        .map(|t| hyphenate(t))
        .collect()
}

/// Adjacent keyword pairs first (as hyphenated phrases), then single keywords.
///
/// The title is counted twice so its phrases outrank ones that only appear in
/// the description.
pub fn economy_tags(title: &str, description: &str, count: usize) -> Vec<String> {
    let no_extra: &[&str] = &[];
    let title_tokens = tokenize(title, no_extra);
    let body_tokens = tokenize(description, no_extra);

    let mut pairs: Vec<String> = Vec::new();
    for tokens in [&title_tokens, &title_tokens, &body_tokens] {
        pairs.extend(tokens.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    }

    let mut singles = title_tokens.clone();
    singles.extend(title_tokens.iter().cloned());
    singles.extend(body_tokens);

    let phrase_budget = count / 2;
    let mut seen = HashSet::new();
    let mut tags = Vec::with_capacity(count);

    for phrase in rank_by_frequency(&pairs, phrase_budget) {
        let tag = hyphenate(&phrase);
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }
    for single in rank_by_frequency(&singles, count) {
        if tags.len() >= count {
            break;
        }
        if seen.insert(single.clone()) {
            tags.push(single);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenate() {
        assert_eq!(hyphenate("Web  Development Basics"), "web-development-basics");
        assert_eq!(hyphenate(""), "");
    }

    #[test]
    fn test_rule_based_tags() {
        let tags = rule_based_tags(
            "The Best Web Development Tutorial for Web Developers",
            "Learn web development",
            3,
        );
        assert_eq!(tags, vec!["web", "development", "best"]);
    }

    #[test]
    fn test_economy_tags_lead_with_phrases() {
        let tags = economy_tags("Rust Web Server", "Building a rust web server with axum", 6);
        assert_eq!(tags.len(), 6);
        assert_eq!(tags[0], "rust-web");
        assert!(tags.contains(&"web-server".to_string()));
        assert!(tags.contains(&"rust".to_string()));
    }

    #[test]
    fn test_economy_tags_bounded_and_empty() {
        assert!(economy_tags("", "", 5).is_empty());
        assert_eq!(economy_tags("one two three four", "", 1), vec!["one"]);
    }
}
