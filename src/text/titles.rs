use super::tokenizer::{rank_by_frequency, tokenize};

pub const MAX_TITLE_LEN: usize = 100;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCategory {
    Tutorial,
    Review,
    Gaming,
    Cooking,
    Fitness,
    Tech,
    Finance,
    Travel,
    Vlog,
    Generic,
}

impl ContentCategory {
    /// Classification order. The first category with a matching keyword wins.
    pub const PRIORITY: [ContentCategory; 9] = [
        Self::Tutorial,
        Self::Review,
        Self::Gaming,
        Self::Cooking,
        Self::Fitness,
        Self::Tech,
        Self::Finance,
        Self::Travel,
        Self::Vlog,
    ];

    pub fn classify(subject: &str) -> Self {
        let lowered = subject.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|category| category.keywords().iter().any(|k| lowered.contains(k)))
            .unwrap_or(Self::Generic)
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Tutorial => &["how to", "tutorial", "guide", "learn", "course", "step by step", "beginner"],
            Self::Review => &["review", "unboxing", " vs ", "versus", "comparison", "worth it", "hands on"],
            Self::Gaming => &["game", "gaming", "gameplay", "playthrough", "minecraft", "fortnite", "speedrun", "walkthrough"],
            Self::Cooking => &["recipe", "cook", "bake", "baking", "kitchen", "meal", "dinner", "food"],
            Self::Fitness => &["workout", "fitness", "exercise", "gym", "yoga", "training", "weight loss", "abs"],
            Self::Tech => &["tech", "iphone", "android", "laptop", "software", "coding", "programming", "gadget"],
            Self::Finance => &["money", "invest", "stock", "crypto", "budget", "finance", "income", "passive"],
            Self::Travel => &["travel", "trip", "visit", "tour", "vacation", "destination", "backpacking"],
            Self::Vlog => &["vlog", "day in the life", "my life", "morning routine", "storytime", "routine"],
            Self::Generic => &[],
        }
    }

    /// Title templates; `{}` is replaced with the subject.
    fn templates(&self) -> &'static [&'static str] {
        match self {
            Self::Tutorial => &[
                "{} - Complete Beginner's Guide",
                "How to Master {} (Step by Step)",
                "{} Tutorial: Everything You Need to Know",
                "Learn {} in 10 Minutes",
                "{} Explained Simply",
                "The Ultimate {} Guide for 2024",
                "{}: Tips Nobody Tells You",
                "Stop Struggling With {} - Do This Instead",
                "{} Made Easy",
                "I Learned {} So You Don't Have To",
            ],
            Self::Review => &[
                "{} Review: Is It Worth It?",
                "{} - Honest Review After 30 Days",
                "The Truth About {}",
                "{}: Watch This Before You Buy",
                "{} - Pros and Cons",
                "Is {} Overrated?",
                "{} Review: The Good, The Bad, The Ugly",
                "I Tried {} So You Don't Have To",
                "{} - My Honest Opinion",
                "Don't Buy {} Until You Watch This",
            ],
            Self::Gaming => &[
                "{} - Epic Gameplay Moments",
                "I Tried {} for 24 Hours",
                "{}: Tips and Tricks to Win Every Time",
                "{} - Best Moments Compilation",
                "This {} Strategy Is Insane",
                "{} Gameplay Walkthrough",
                "Pro Tips for {}",
                "{} - Things You Didn't Know",
                "Beating {} the Hard Way",
                "{} Is Better Than You Think",
            ],
            Self::Cooking => &[
                "{} - Easy Recipe Anyone Can Make",
                "The Best {} You'll Ever Make",
                "{} in 15 Minutes",
                "How I Make Perfect {}",
                "{}: Restaurant Quality at Home",
                "Simple {} for Beginners",
                "{} - My Secret Recipe",
                "You've Been Making {} Wrong",
                "{} on a Budget",
                "Healthy {} Made Easy",
            ],
            Self::Fitness => &[
                "{} - Full Routine for Beginners",
                "{}: 30 Day Transformation",
                "The Only {} You Need",
                "{} - No Equipment Needed",
                "Do This {} Every Day",
                "{} Mistakes You're Making",
                "{} for Fast Results",
                "I Did {} Every Day for a Month",
                "{} - Follow Along",
                "Science-Based {}",
            ],
            Self::Tech => &[
                "{} - Everything You Need to Know",
                "{}: Hidden Features You Should Try",
                "Is {} Worth It in 2024?",
                "{} Explained in Plain English",
                "{} Tips and Tricks",
                "Why Everyone Is Talking About {}",
                "{} - First Impressions",
                "Setting Up {} the Right Way",
                "{}: Beginner to Pro",
                "The Future of {}",
            ],
            Self::Finance => &[
                "{} - The Complete Beginner's Guide",
                "How I Started With {}",
                "{}: Mistakes That Cost Me Money",
                "{} Explained in 10 Minutes",
                "The Truth About {}",
                "{} Strategies That Actually Work",
                "{} for Beginners in 2024",
                "Why {} Changed My Life",
                "{} - What Nobody Tells You",
                "Smart {} Tips",
            ],
            Self::Travel => &[
                "{} - Ultimate Travel Guide",
                "{} on a Budget",
                "Things to Know Before Visiting {}",
                "{}: Hidden Gems",
                "48 Hours in {}",
                "{} Travel Vlog",
                "Is {} Worth Visiting?",
                "{} - Best Places to See",
                "My Perfect Day in {}",
                "{}: Travel Tips and Mistakes to Avoid",
            ],
            Self::Vlog => &[
                "{} - A Day in My Life",
                "{} | Vlog",
                "Real Talk: {}",
                "{} (Not What I Expected)",
                "Spend the Day With Me: {}",
                "{} - Story Time",
                "My Honest Thoughts on {}",
                "{} Changed Everything",
                "{} | Weekly Vlog",
                "Behind the Scenes: {}",
            ],
            Self::Generic => &[
                "{} - Everything You Need to Know",
                "The Truth About {}",
                "{}: What Nobody Tells You",
                "Why {} Matters",
                "{} Explained",
                "The Ultimate {} Guide",
                "{} - Watch Before You Start",
                "{}: Top Tips",
                "Everything Wrong With {}",
                "{} in Under 10 Minutes",
            ],
        }
    }
}

/// Shortens `title` to at most [`MAX_TITLE_LEN`] characters, ending with an
/// ellipsis when anything was cut.
pub fn ellipsize(title: &str) -> String {
    let title = title.trim();
    if title.chars().count() <= MAX_TITLE_LEN {
        return title.to_string();
    }
    let keep = MAX_TITLE_LEN - ELLIPSIS.len();
    let cut: String = title.chars().take(keep).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

fn fill(template: &str, subject: &str) -> String {
    ellipsize(&template.replace("{}", subject))
}

/// Capitalize each word, leaving words that already contain uppercase alone.
fn title_case(subject: &str) -> String {
    subject
        .split_whitespace()
        .map(|word| {
            if word.chars().any(char::is_uppercase) {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Category templates with the subject filled in.
pub fn rule_based_titles(subject: &str, count: usize) -> Vec<String> {
    let subject = title_case(subject);
    if subject.is_empty() {
        return Vec::new();
    }
    ContentCategory::classify(&subject)
        .templates()
        .iter()
        .take(count)
        .map(|t| fill(t, &subject))
        .collect()
}

/// Category templates followed by variants built around the subject's
/// strongest keywords.
pub fn economy_titles(subject: &str, niche: &str, count: usize) -> Vec<String> {
    let mut titles = rule_based_titles(subject, count);
    if titles.is_empty() {
        return titles;
    }

    let tokens = tokenize(&format!("{} {}", subject, niche), &[] as &[&str]);
    let keywords = rank_by_frequency(&tokens, 3);
    let subject = title_case(subject);
    let niche = title_case(niche);

    let mut variants = Vec::new();
    for keyword in &keywords {
        let keyword = title_case(keyword);
        variants.push(format!("{} Secrets: {}", keyword, subject));
        variants.push(format!("Why {} Is the Key to {}", keyword, subject));
    }
    if !niche.is_empty() {
        variants.push(format!("{} ({} Edition)", subject, niche));
        variants.push(format!("Best {} Videos: {}", niche, subject));
    }

    // interleave so the keyword variants survive a small count
    let mut merged = Vec::with_capacity(titles.len() + variants.len());
    let mut templates = titles.drain(..);
    let mut extras = variants.into_iter().map(|v| ellipsize(&v));
    loop {
        let t = templates.next();
        let e = extras.next();
        if t.is_none() && e.is_none() {
            break;
        }
        merged.extend(t);
        merged.extend(e);
    }

    let mut seen = std::collections::HashSet::new();
    merged.retain(|t| seen.insert(t.to_lowercase()));
    merged.truncate(count);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(ContentCategory::classify("How to bake sourdough"), ContentCategory::Tutorial);
        // "review" outranks "game"
        assert_eq!(ContentCategory::classify("Zelda game review"), ContentCategory::Review);
        assert_eq!(ContentCategory::classify("Minecraft speedrun"), ContentCategory::Gaming);
        assert_eq!(ContentCategory::classify("Lake Como"), ContentCategory::Generic);
    }

    #[test]
    fn test_rule_based_titles_interpolate_subject() {
        let titles = rule_based_titles("sourdough recipe", 10);
        assert_eq!(titles.len(), 10);
        assert!(titles.iter().all(|t| t.contains("Sourdough Recipe")));
    }

    #[test]
    fn test_titles_never_exceed_max_len() {
        let subject = "an extremely long subject ".repeat(10);
        for title in economy_titles(&subject, "gaming", 20) {
            assert!(title.chars().count() <= MAX_TITLE_LEN, "{}", title);
        }
        let cut = ellipsize(&"x".repeat(150));
        assert_eq!(cut.chars().count(), MAX_TITLE_LEN);
        assert!(cut.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_economy_titles_respect_count_and_are_unique() {
        let titles = economy_titles("rust web server tutorial", "tech", 6);
        assert_eq!(titles.len(), 6);
        let lowered: std::collections::HashSet<_> = titles.iter().map(|t| t.to_lowercase()).collect();
        assert_eq!(lowered.len(), titles.len());
        assert!(titles.iter().any(|t| t.contains("Secrets")));
    }

    #[test]
    fn test_empty_subject_yields_nothing() {
        assert!(rule_based_titles("   ", 5).is_empty());
        assert!(economy_titles("", "gaming", 5).is_empty());
    }
}
