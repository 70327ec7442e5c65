use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};

use crate::models::ExtractionResult;

const DOWNLOAD_TIMEOUT_SECS: u64 = 15;
const MIN_TEXT_LENGTH: usize = 50;

/// Fetches article pages and reduces them to title, text, authors and date.
///
/// Network and parse failures never escape as errors: they come back inside
/// the `ExtractionResult` with `success: false`. Only malformed input (an
/// empty URL or one without an http/https scheme) is an `Err`.
pub struct ArticleExtractor {
    client: Client,
}

/// Fields pulled out of a downloaded page.
#[derive(Debug, Default)]
struct ParsedArticle {
    title: Option<String>,
    text: String,
    authors: Vec<String>,
    publish_date: Option<String>,
}

impl ArticleExtractor {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .user_agent("Mozilla/5.0 (compatible; AiContentAnalyzer/1.0)")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Download and parse one article. `language` is sent as Accept-Language
    /// and defaults to "en" at the call sites.
    pub async fn extract(&self, url: &str, language: &str) -> Result<ExtractionResult> {
        validate_url(url)?;

        let mut result = ExtractionResult::pending(url);

        eprintln!("Extracting article from: {}", url);

        let html = match self.download(url, language).await {
            Ok(html) => html,
            Err(e) => {
                let message = if e.downcast_ref::<reqwest::Error>().is_some_and(|e| e.is_timeout())
                {
                    timeout_error_message(url)
                } else {
                    format!("Failed to extract article from {}: {}", url, e)
                };
                eprintln!("{}", message);
                return Ok(ExtractionResult::failed(url, message));
            }
        };

        let parsed = parse_article(&html);

        result.title = parsed.title;
        result.text = Some(parsed.text);
        result.authors = if parsed.authors.is_empty() {
            None
        } else {
            Some(parsed.authors)
        };
        result.publish_date = parsed.publish_date;
        result.success = true;

        // Guard against paywalls and JS-rendered shells that parse cleanly
        // but hold no real article body.
        if !has_enough_text(result.text.as_deref()) {
            result.success = false;
            result.error = Some(
                "Extracted text is too short or empty. Article may not have been parsed correctly."
                    .to_string(),
            );
            eprintln!("Warning: {}", result.error.as_deref().unwrap_or_default());
        } else {
            eprintln!(
                "Successfully extracted article: '{}' ({} characters)",
                result.title.as_deref().unwrap_or("Untitled"),
                result.text.as_deref().map(str::len).unwrap_or(0)
            );
        }

        Ok(result)
    }

    /// Convenience wrapper returning just the article text, or None when the
    /// extraction failed for any reason.
    pub async fn extract_text(&self, url: &str) -> Option<String> {
        match self.extract(url, "en").await {
            Ok(result) if result.success => result.text,
            Ok(result) => {
                eprintln!(
                    "Extraction failed: {}",
                    result.error.unwrap_or_else(|| "Unknown error".to_string())
                );
                None
            }
            Err(e) => {
                eprintln!("Extraction failed: {}", e);
                None
            }
        }
    }

    async fn download(&self, url: &str, language: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header("Accept-Language", language)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error: {}", status);
        }

        let html = response.text().await?;
        Ok(html)
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("URL must be a non-empty string");
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!(
            "Invalid URL format: {}. Must start with http:// or https://",
            url
        );
    }
    Ok(())
}

fn timeout_error_message(url: &str) -> String {
    format!(
        "Request timed out after {} seconds while downloading from {}",
        DOWNLOAD_TIMEOUT_SECS, url
    )
}

fn has_enough_text(text: Option<&str>) -> bool {
    text.map(|t| t.trim().len() >= MIN_TEXT_LENGTH)
        .unwrap_or(false)
}

fn parse_article(html: &str) -> ParsedArticle {
    let document = Html::parse_document(html);
    let mut parsed = ParsedArticle::default();

    parsed.title = meta_content(&document, "meta[property=\"og:title\"]").or_else(|| {
        Selector::parse("title").ok().and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
        })
    });

    for selector in [
        "meta[name=\"author\"]",
        "meta[property=\"article:author\"]",
    ] {
        if let Ok(sel) = Selector::parse(selector) {
            for element in document.select(&sel) {
                if let Some(author) = element.value().attr("content") {
                    let author = author.trim();
                    if !author.is_empty() && !parsed.authors.iter().any(|a| a == author) {
                        parsed.authors.push(author.to_string());
                    }
                }
            }
        }
    }

    parsed.publish_date = meta_content(&document, "meta[property=\"article:published_time\"]")
        .or_else(|| meta_content(&document, "meta[name=\"date\"]"));

    parsed.text = extract_body_text(html, &document);

    parsed
}

/// Prefer the `<article>` element when the page has one; otherwise render the
/// whole document. html2text strips tags and collapses navigation chrome into
/// something close to the main text.
fn extract_body_text(html: &str, document: &Html) -> String {
    if let Ok(selector) = Selector::parse("article") {
        if let Some(article) = document.select(&selector).next() {
            let fragment = article.html();
            return html2text::from_read(fragment.as_bytes(), 100)
                .trim()
                .to_string();
        }
    }

    html2text::from_read(html.as_bytes(), 100).trim().to_string()
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    Selector::parse(selector).ok().and_then(|sel| {
        document
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    })
}
