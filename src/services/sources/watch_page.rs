// html scrape of the public watch page, last resort
use async_trait::async_trait;
use scraper::{Html, Selector};

use super::{MetadataSource, RawPayload, SourceError};
use crate::models::VideoId;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Raw strings lifted from the page's meta tags and microdata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrapedPage {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub channel_id: Option<String>,
    pub duration: Option<String>,
    pub interaction_count: Option<String>,
    pub keywords: Option<String>,
    pub upload_date: Option<String>,
    pub regions_allowed: Option<String>,
    pub is_live_broadcast: bool,
    pub broadcast_ended: bool,
}

pub struct WatchPageSource {
    http: reqwest::Client,
    base_url: String,
}

impl WatchPageSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MetadataSource for WatchPageSource {
    fn name(&self) -> &'static str {
        "watch_page"
    }

    async fn fetch(&self, id: &VideoId) -> Result<RawPayload, SourceError> {
        let response = self
            .http
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", id.as_str()), ("hl", "en")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let html = response.text().await?;
        Ok(RawPayload::Scraped(parse_watch_page(&html)))
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

/// Reads whatever the page exposes. Missing tags leave fields empty; an
/// empty title is how a failed scrape shows up.
pub fn parse_watch_page(html: &str) -> ScrapedPage {
    let document = Html::parse_document(html);

    let title = meta_content(&document, r#"meta[property="og:title"]"#)
        .or_else(|| meta_content(&document, r#"meta[name="title"]"#))
        .or_else(|| {
            let selector = Selector::parse("title").ok()?;
            let text: String = document.select(&selector).next()?.text().collect();
            // only video pages carry the suffix; consent walls and the bare
            // "YouTube" error page do not
            let text = text.trim().strip_suffix(" - YouTube")?.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .unwrap_or_default();

    ScrapedPage {
        title,
        description: meta_content(&document, r#"meta[property="og:description"]"#)
            .or_else(|| meta_content(&document, r#"meta[name="description"]"#)),
        author: meta_content(&document, r#"[itemprop="author"] [itemprop="name"]"#),
        channel_id: meta_content(&document, r#"meta[itemprop="channelId"]"#),
        duration: meta_content(&document, r#"meta[itemprop="duration"]"#),
        interaction_count: meta_content(&document, r#"meta[itemprop="interactionCount"]"#),
        keywords: meta_content(&document, r#"meta[name="keywords"]"#),
        upload_date: meta_content(&document, r#"meta[itemprop="uploadDate"]"#)
            .or_else(|| meta_content(&document, r#"meta[itemprop="datePublished"]"#)),
        regions_allowed: meta_content(&document, r#"meta[itemprop="regionsAllowed"]"#),
        is_live_broadcast: meta_content(&document, r#"meta[itemprop="isLiveBroadcast"]"#)
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        broadcast_ended: meta_content(&document, r#"[itemprop="publication"] meta[itemprop="endDate"]"#)
            .is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head>
<title>Rust in 100 Seconds - YouTube</title>
<meta property="og:title" content="Rust in 100 Seconds">
<meta property="og:description" content="Learn the basics of Rust.">
<meta name="keywords" content="rust, programming, systems">
</head><body>
<div itemscope itemtype="http://schema.org/VideoObject">
  <meta itemprop="duration" content="PT2M29S">
  <meta itemprop="channelId" content="UCsBjURrPoezykLs9EqgamOA">
  <span itemprop="author" itemscope itemtype="http://schema.org/Person">
    <link itemprop="name" content="Fireship">
  </span>
  <meta itemprop="interactionCount" content="2000000">
  <meta itemprop="uploadDate" content="2021-09-22T10:00:00-07:00">
  <meta itemprop="regionsAllowed" content="US,GB,DE">
</div>
</body></html>"#;

    #[test]
    fn test_parse_watch_page() {
        let page = parse_watch_page(PAGE);
        assert_eq!(page.title, "Rust in 100 Seconds");
        assert_eq!(page.description.as_deref(), Some("Learn the basics of Rust."));
        assert_eq!(page.author.as_deref(), Some("Fireship"));
        assert_eq!(page.channel_id.as_deref(), Some("UCsBjURrPoezykLs9EqgamOA"));
        assert_eq!(page.duration.as_deref(), Some("PT2M29S"));
        assert_eq!(page.interaction_count.as_deref(), Some("2000000"));
        assert_eq!(page.keywords.as_deref(), Some("rust, programming, systems"));
        assert_eq!(page.regions_allowed.as_deref(), Some("US,GB,DE"));
        assert!(!page.is_live_broadcast);
    }

    #[test]
    fn test_title_falls_back_to_title_tag() {
        let page = parse_watch_page("<html><head><title>Some Video - YouTube</title></head></html>");
        assert_eq!(page.title, "Some Video");
    }

    #[test]
    fn test_consent_wall_has_no_title() {
        let html = r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8">
<title>Before you continue to YouTube</title>
</head><body>
<form action="https://consent.youtube.com/save" method="POST">
  <input type="hidden" name="continue" value="https://www.youtube.com/watch?v=dQw4w9WgXcQ">
  <button>Accept all</button>
</form>
</body></html>"#;
        assert!(parse_watch_page(html).title.is_empty());
    }

    #[test]
    fn test_bare_site_title_is_not_a_video_title() {
        assert!(parse_watch_page("<html><head><title>YouTube</title></head></html>").title.is_empty());
        assert!(parse_watch_page("<html><head><title> - YouTube</title></head></html>").title.is_empty());
    }
}
