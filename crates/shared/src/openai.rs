use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";

pub const CHAT_MODEL: &str = "gpt-4o-mini";
pub const TTS_MODEL: &str = "tts-1";

// gpt-4o-mini pricing per 1M tokens; these figures are part of the cost
// contract, not just display values.
const INPUT_PRICE_PER_MILLION: f64 = 0.150;
const OUTPUT_PRICE_PER_MILLION: f64 = 0.600;

/// Cost in USD of one gpt-4o-mini call, from raw token counts.
pub fn calculate_cost(prompt_tokens: u32, completion_tokens: u32) -> f64 {
    let input_cost = (prompt_tokens as f64 / 1_000_000.0) * INPUT_PRICE_PER_MILLION;
    let output_cost = (completion_tokens as f64 / 1_000_000.0) * OUTPUT_PRICE_PER_MILLION;
    input_cost + output_cost
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Serialize)]
struct SpeechRequest {
    model: String,
    voice: String,
    input: String,
    response_format: String,
}

/// Generated text plus the token counts the API billed for it.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub content: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Thin client over the OpenAI chat-completion and speech endpoints.
///
/// Constructed once at startup and passed by reference into the components
/// that need it.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, api_key })
    }

    /// One system+user chat completion against gpt-4o-mini.
    ///
    /// Pass `temperature: None` to keep the API default sampling.
    pub async fn chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: Option<f32>,
    ) -> Result<ChatOutcome> {
        let request = ChatRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature,
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("OpenAI API error {}: {}", status, error_text);
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse OpenAI API response")?;

        let (prompt_tokens, completion_tokens) = chat_response
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(ChatOutcome {
            content,
            prompt_tokens,
            completion_tokens,
        })
    }

    /// Synthesize `text` into MP3 bytes with the tts-1 model.
    ///
    /// Unlike the analyzer path, failures here propagate to the caller.
    pub async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            model: TTS_MODEL.to_string(),
            voice: voice.to_string(),
            input: text.to_string(),
            response_format: "mp3".to_string(),
        };

        let response = self
            .client
            .post(SPEECH_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI speech API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("OpenAI speech API error {}: {}", status, error_text);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read audio bytes from speech response")?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Cost Calculation Tests ====================

    #[test]
    fn test_cost_zero_tokens() {
        assert_eq!(calculate_cost(0, 0), 0.0);
    }

    #[test]
    fn test_cost_one_million_prompt_tokens() {
        assert_eq!(calculate_cost(1_000_000, 0), 0.150);
    }

    #[test]
    fn test_cost_one_million_completion_tokens() {
        assert_eq!(calculate_cost(0, 1_000_000), 0.600);
    }

    #[test]
    fn test_cost_mixed_tokens() {
        let cost = calculate_cost(1000, 2000);
        assert!((cost - 0.00135).abs() < 1e-12);
    }

    // ==================== Response Parsing Tests ====================

    #[test]
    fn test_chat_response_parses_usage() {
        let json = r#"{
            "choices": [{"message": {"content": "hello"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 7);
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn test_chat_response_tolerates_missing_usage() {
        let json = r#"{"choices": [{"message": {"content": "hi"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_chat_request_omits_temperature_when_default() {
        let request = ChatRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![],
            temperature: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
    }
}
