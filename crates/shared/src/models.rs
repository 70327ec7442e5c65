use serde::{Deserialize, Serialize};

/// Outcome of fetching and parsing an article from a URL.
///
/// `success` is true only when real article text was found: at least 50
/// characters after trimming. Everything else (timeouts, parse failures,
/// paywall shells) comes back as `success: false` with `error` filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub url: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publish_date: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Empty result for a URL, before any download has happened.
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            text: None,
            authors: None,
            publish_date: None,
            success: false,
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        let mut result = Self::pending(url);
        result.error = Some(error.into());
        result
    }
}

/// Three-way sentiment classification returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Token counts reported by the chat-completion API for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokensUsed {
    pub prompt: u32,
    pub completion: u32,
    pub total: u32,
}

impl TokensUsed {
    pub fn new(prompt: u32, completion: u32) -> Self {
        Self {
            prompt,
            completion,
            total: prompt + completion,
        }
    }
}

/// Structured analysis of one article, plus usage accounting.
///
/// `tokens_used` and `cost_usd` stay populated even when `success` is false
/// because the model returned unparseable output: the call was still billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub sentiment: Sentiment,
    pub key_points: Vec<String>,
    pub reading_time_minutes: u32,
    pub tokens_used: TokensUsed,
    pub cost_usd: f64,
    pub success: bool,
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Zeroed-out result used before the API has been contacted.
    pub fn empty() -> Self {
        Self {
            summary: String::new(),
            sentiment: Sentiment::default(),
            key_points: Vec::new(),
            reading_time_minutes: 0,
            tokens_used: TokensUsed::default(),
            cost_usd: 0.0,
            success: false,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        let mut result = Self::empty();
        result.error = Some(error.into());
        result
    }
}

/// Current conditions for one city, already reduced to what the briefing
/// prompt needs. Fetch failures surface as `None` at the client, not as a
/// partially-filled snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    pub summary: String,
    pub temperature: Option<f64>,
    pub precipitation_total: Option<f64>,
    pub precipitation_type: Option<String>,
}

/// One news headline, title and description only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub description: String,
}

/// Generated morning-update monologue and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub text: String,
    pub cost_usd: f64,
}

/// Combined extraction + analysis data as persisted to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub article: ExtractionResult,
    pub analysis: AnalysisResult,
    pub saved_at: String,
}
