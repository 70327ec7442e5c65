use anyhow::Result;
use serde_json::Value;

use crate::models::{AnalysisResult, ExtractionResult, Sentiment, TokensUsed};
use crate::openai::{calculate_cost, OpenAiClient};

const ANALYSIS_TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = r#"You are an AI assistant that analyzes news/articles.
You MUST respond with ONLY valid JSON. Do NOT include any explanations,
comments, or extra text outside of the JSON.

The JSON MUST have this exact structure:
{
  "summary": "3-5 sentence summary",
  "sentiment": {
    "label": "positive|neutral|negative",
    "confidence": 0.85
  },
  "key_points": ["point 1", "point 2", "point 3"],
  "reading_time_minutes": 5
}

Rules:
- "summary" should be 3-5 sentences describing the main ideas of the article.
- "sentiment.label" must be exactly one of: "positive", "neutral", "negative".
- "sentiment.confidence" must be a number between 0 and 1.
- "key_points" must be a JSON array of short bullet-point style strings.
- "reading_time_minutes" must be an integer estimate of reading time."#;

/// Analyzes article text with the chat-completion endpoint.
///
/// All failures are absorbed into the returned `AnalysisResult`: callers
/// check `success` instead of matching on errors. The one exception worth
/// noting is that a malformed model response still carries the token counts
/// and cost, because those were billed regardless.
pub struct ArticleAnalyzer<'a> {
    openai: &'a OpenAiClient,
}

impl<'a> ArticleAnalyzer<'a> {
    pub fn new(openai: &'a OpenAiClient) -> Self {
        Self { openai }
    }

    pub async fn analyze(&self, article: &ExtractionResult) -> AnalysisResult {
        let title = article.title.as_deref().unwrap_or("Untitled article");
        let text = article.text.as_deref().unwrap_or("");

        if text.trim().is_empty() {
            let msg = "Article text is empty. Cannot analyze.";
            eprintln!("{}", msg);
            return AnalysisResult::failed(msg);
        }

        match self.try_analyze(title, text).await {
            Ok(result) => result,
            Err(e) => {
                let msg = format!("Error during article analysis: {}", e);
                eprintln!("{}", msg);
                AnalysisResult::failed(msg)
            }
        }
    }

    async fn try_analyze(&self, title: &str, text: &str) -> Result<AnalysisResult> {
        eprintln!("Calling OpenAI API for article analysis...");

        let user_prompt = build_user_prompt(title, text);
        let outcome = self
            .openai
            .chat(SYSTEM_PROMPT, &user_prompt, Some(ANALYSIS_TEMPERATURE))
            .await?;

        let mut result = AnalysisResult::empty();
        result.tokens_used = TokensUsed::new(outcome.prompt_tokens, outcome.completion_tokens);
        result.cost_usd = calculate_cost(outcome.prompt_tokens, outcome.completion_tokens);

        if outcome.content.is_empty() {
            result.error = Some("OpenAI response content is empty.".to_string());
            return Ok(result);
        }

        apply_model_output(&mut result, &outcome.content);

        if result.success {
            eprintln!(
                "Article analysis completed. Tokens used: prompt={}, completion={}, cost=${:.6}",
                result.tokens_used.prompt, result.tokens_used.completion, result.cost_usd
            );
        } else if let Some(error) = &result.error {
            eprintln!("{}", error);
        }

        Ok(result)
    }
}

fn build_user_prompt(title: &str, text: &str) -> String {
    format!(
        "Analyze the following article and return ONLY the JSON object in the exact format\n\
        described in the system prompt. Do not wrap it in backticks and do not add\n\
        any explanation text.\n\n\
        Article title:\n{}\n\n\
        Article text:\n{}",
        title, text
    )
}

/// Copy the model's JSON output into `result`, defaulting any missing or
/// mis-typed field instead of rejecting the whole response. Only output that
/// is not JSON at all counts as a failure, and even then the token/cost
/// fields already set on `result` are left alone.
fn apply_model_output(result: &mut AnalysisResult, content: &str) {
    let parsed: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            result.error = Some(format!("Failed to parse JSON from model response: {}", e));
            return;
        }
    };

    result.summary = parsed
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    result.sentiment = parsed
        .get("sentiment")
        .map(|v| Sentiment {
            label: v
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            confidence: v.get("confidence").and_then(Value::as_f64).unwrap_or(0.0),
        })
        .unwrap_or_default();

    result.key_points = parsed
        .get("key_points")
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    result.reading_time_minutes = parsed
        .get("reading_time_minutes")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    result.success = true;
    result.error = None;
}
