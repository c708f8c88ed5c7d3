use super::hashtags::{economy_hashtags, rule_based_hashtags};
use super::titles::ContentCategory;
use super::tokenizer::{rank_by_frequency, tokenize};

const CALL_TO_ACTION: &str =
    "If this video helped you, hit like and subscribe for more. Questions? Drop them in the comments!";
const HASHTAG_LINE_COUNT: usize = 3;
const MAX_BULLETS: usize = 5;

fn hook(category: ContentCategory, title: &str) -> String {
    if title.is_empty() {
        return "Thanks for watching!".to_string();
    }
    match category {
        ContentCategory::Tutorial => format!("Want to get better at {}? This step-by-step walkthrough has you covered.", title),
        ContentCategory::Review => format!("Thinking about {}? Here's my honest take before you decide.", title),
        ContentCategory::Gaming => format!("Welcome back! Today it's all about {}.", title),
        ContentCategory::Cooking => format!("Let's make {} together - simple, tasty and quick.", title),
        ContentCategory::Fitness => format!("Ready to train? Today's session: {}.", title),
        ContentCategory::Tech => format!("Everything you need to know about {}, explained clearly.", title),
        ContentCategory::Finance => format!("Let's talk about {} and what it means for your money.", title),
        ContentCategory::Travel => format!("Come along as we explore {}.", title),
        ContentCategory::Vlog => format!("Hey everyone! Today's vlog: {}.", title),
        ContentCategory::Generic => format!("In this video: {}.", title),
    }
}

/// Non-empty trimmed lines of `details`, one bullet each.
pub fn parse_bullets(details: &str) -> Vec<String> {
    details
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .take(MAX_BULLETS)
        .map(str::to_string)
        .collect()
}

fn render(title: &str, bullets: &[String], hashtags: &[String]) -> String {
    let title = title.trim();
    let mut out = hook(ContentCategory::classify(title), title);

    if !bullets.is_empty() {
        out.push_str("\n\nIn this video:");
        for bullet in bullets {
            out.push_str("\n• ");
            out.push_str(bullet);
        }
    }

    out.push_str("\n\n");
    out.push_str(CALL_TO_ACTION);

    if !hashtags.is_empty() {
        out.push_str("\n\n");
        out.push_str(&hashtags.join(" "));
    }
    out
}

/// The fixed template with the caller's bullets. Always one description,
/// even for empty input.
pub fn rule_based_description(title: &str, niche: &str, details: &str) -> Vec<String> {
    let hashtags = rule_based_hashtags(title, niche, HASHTAG_LINE_COUNT);
    vec![render(title, &parse_bullets(details), &hashtags)]
}

/// Like the rule-based template, but fills in keyword bullets when none were
/// supplied and picks hashtags by relevance. Empty when there is no title.
pub fn economy_description(title: &str, niche: &str, details: &str) -> Vec<String> {
    if title.trim().is_empty() {
        return Vec::new();
    }

    let mut bullets = parse_bullets(details);
    if bullets.is_empty() {
        let tokens = tokenize(title, &[] as &[&str]);
        bullets = rank_by_frequency(&tokens, 3)
            .into_iter()
            .map(|keyword| format!("Key insights on {}", keyword))
            .collect();
    }

    let hashtags = economy_hashtags(title, niche, HASHTAG_LINE_COUNT);
    vec![render(title, &bullets, &hashtags)]
}
