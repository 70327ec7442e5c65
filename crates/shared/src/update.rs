use anyhow::Result;

use crate::models::{Headline, UpdateResult, WeatherSnapshot};
use crate::openai::{calculate_cost, OpenAiClient};

const SYSTEM_PROMPT: &str = "You are an AI assistant tasked with generating a 'Morning Update' text that's engaging and enjoyable for the user to listen to while having their morning coffee. The update should be about 2-5 minutes long, incorporating both a weather forecast and top news headlines in a way that feels conversational, lively, and fits a specific tone (such as funny, serious, sarcastic, or motivational). Do not output anything else than the text, don't include any markup, lists, or other structural elements. The text will be sent to a text-to-speech API to generate an MP3, so make sure the output contains nothing that should not be read out loud.

Structure the monologue as follows:

1. Greeting: Start with a warm and welcoming greeting.
2. Weather Summary: Describe the day's weather and name EXPLICITLY the city, infusing the chosen tone (e.g., funny, serious, etc.) to make it engaging.
3. News Headlines: Present each headline in the chosen tone, followed by a one-line expansion to give the listener a deeper insight into the headline.
4. Closing: Wrap up with a concluding remark that leaves the listener with a smile, positive thought, or playful nudge.

Be creative in how you incorporate the tone and style, ensuring that the text is engaging and enjoyable to listen to.";

/// Composes the spoken-style morning briefing from weather + headlines.
///
/// Unlike the article analyzer, errors here are not absorbed: a failed API
/// call propagates to the caller, which aborts the run.
pub struct UpdateGenerator<'a> {
    openai: &'a OpenAiClient,
}

impl<'a> UpdateGenerator<'a> {
    pub fn new(openai: &'a OpenAiClient) -> Self {
        Self { openai }
    }

    pub async fn generate(
        &self,
        weather: &WeatherSnapshot,
        headlines: &[Headline],
    ) -> Result<UpdateResult> {
        let user_prompt = build_user_prompt(weather, headlines)?;

        // Default sampling: no temperature override for the creative monologue
        let outcome = self.openai.chat(SYSTEM_PROMPT, &user_prompt, None).await?;

        if outcome.content.trim().is_empty() {
            anyhow::bail!("OpenAI returned an empty morning update");
        }

        Ok(UpdateResult {
            text: outcome.content,
            cost_usd: calculate_cost(outcome.prompt_tokens, outcome.completion_tokens),
        })
    }
}

fn build_user_prompt(weather: &WeatherSnapshot, headlines: &[Headline]) -> Result<String> {
    let weather_json = serde_json::to_string(weather)?;
    let headlines_json = serde_json::to_string(headlines)?;

    Ok(format!(
        "Please generate a 'Morning Update' text in a funny and light tone.\n\
        Here is the Weather Forecast for the city of {}:\n{}\n\
        Here are the News Headlines in JSON format:\n{}\n\
        Generate the text as specified in the system prompt, following the structure of \
        greeting, weather summary, {} headlines, and a closing remark.",
        weather.name,
        weather_json,
        headlines_json,
        headlines.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_weather() -> WeatherSnapshot {
        WeatherSnapshot {
            name: "Dakar".to_string(),
            summary: "Sunny".to_string(),
            temperature: Some(28.0),
            precipitation_total: None,
            precipitation_type: None,
        }
    }

    #[test]
    fn test_user_prompt_names_the_city() {
        let prompt = build_user_prompt(&sample_weather(), &[]).unwrap();
        assert!(prompt.contains("the city of Dakar"));
    }

    #[test]
    fn test_user_prompt_embeds_headlines_and_count() {
        let headlines = vec![
            Headline {
                title: "Local team wins".to_string(),
                description: "A narrow victory.".to_string(),
            },
            Headline {
                title: "Markets up".to_string(),
                description: "Broad gains.".to_string(),
            },
        ];
        let prompt = build_user_prompt(&sample_weather(), &headlines).unwrap();
        assert!(prompt.contains("Local team wins"));
        assert!(prompt.contains("Markets up"));
        assert!(prompt.contains("2 headlines"));
    }

    #[test]
    fn test_system_prompt_forbids_markup() {
        assert!(SYSTEM_PROMPT.contains("don't include any markup"));
        assert!(SYSTEM_PROMPT.contains("text-to-speech"));
        assert!(SYSTEM_PROMPT.contains("name EXPLICITLY the city"));
    }
}
