use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::models::Headline;
use crate::weather::describe_request_error;

const TOP_HEADLINES_URL: &str = "https://newsapi.org/v2/top-headlines";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl RawArticle {
    fn into_headline(self) -> Headline {
        Headline {
            title: self.title.unwrap_or_else(|| "No Title".to_string()),
            description: self
                .description
                .unwrap_or_else(|| "No Description".to_string()),
        }
    }
}

/// NewsAPI top-headlines client. Like the weather client, every failure mode
/// is logged and reduced to an empty list; callers treat "no headlines" as
/// the unavailable signal.
pub struct NewsClient {
    client: Client,
    api_key: String,
}

impl NewsClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, api_key })
    }

    pub async fn fetch_top_headlines(&self, country: &str) -> Vec<Headline> {
        match self.try_fetch_top_headlines(country).await {
            Ok(headlines) => headlines,
            Err(e) => {
                eprintln!("News fetch failed: {}", describe_request_error(&e));
                Vec::new()
            }
        }
    }

    async fn try_fetch_top_headlines(&self, country: &str) -> Result<Vec<Headline>> {
        let url = format!(
            "{}?country={}",
            TOP_HEADLINES_URL,
            urlencoding::encode(country)
        );

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("Failed to send request to NewsAPI")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error {}", status);
        }

        let headlines_response = response
            .json::<HeadlinesResponse>()
            .await
            .context("Failed to parse NewsAPI response")?;

        Ok(headlines_response
            .articles
            .into_iter()
            .map(RawArticle::into_headline)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_articles_map_to_headlines_in_order() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"title": "First story", "description": "What happened first."},
                {"title": "Second story", "description": "What happened next."}
            ]
        }"#;
        let response: HeadlinesResponse = serde_json::from_str(json).unwrap();
        let headlines: Vec<Headline> = response
            .articles
            .into_iter()
            .map(RawArticle::into_headline)
            .collect();

        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "First story");
        assert_eq!(headlines[1].description, "What happened next.");
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let json = r#"{"articles": [{"title": null}, {}]}"#;
        let response: HeadlinesResponse = serde_json::from_str(json).unwrap();
        let headlines: Vec<Headline> = response
            .articles
            .into_iter()
            .map(RawArticle::into_headline)
            .collect();

        assert_eq!(headlines[0].title, "No Title");
        assert_eq!(headlines[0].description, "No Description");
        assert_eq!(headlines[1].title, "No Title");
    }

    #[test]
    fn test_empty_response_means_no_headlines() {
        let response: HeadlinesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.articles.is_empty());
    }
}
