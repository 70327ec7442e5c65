use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    ensure_output_dir, save_audio, Headline, MorningConfig, NewsClient, OpenAiClient,
    UpdateGenerator, WeatherClient, WeatherSnapshot,
};

#[derive(Parser)]
#[command(name = "morning-update")]
#[command(about = "Generate a spoken-style morning briefing from weather and news")]
struct Args {
    /// City for the weather forecast
    #[arg(short, long, default_value = "Dakar, Senegal")]
    city: String,

    /// Country code for the news headlines
    #[arg(long, default_value = "us")]
    country: String,

    /// Number of headlines to include
    #[arg(short = 'n', long, default_value = "3")]
    headlines: usize,

    /// Voice for the text-to-speech conversion
    #[arg(short, long, default_value = "alloy")]
    voice: String,

    /// Skip MP3 generation and only print the update text
    #[arg(long)]
    no_audio: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = MorningConfig::from_env()?;

    let openai = OpenAiClient::new(config.openai_api_key)?;
    let weather_client = WeatherClient::new(config.meteosource_api_key)?;
    let news_client = NewsClient::new(config.newsapi_api_key)?;

    println!("🌤  Fetching weather for {}...", args.city);
    let weather = weather_client.fetch_forecast(&args.city).await;

    println!("📰 Fetching top headlines ({})...", args.country);
    let mut headlines = news_client.fetch_top_headlines(&args.country).await;
    headlines.truncate(args.headlines);

    let (weather, headlines) = check_data_availability(weather, headlines)?;
    println!(
        "✓ Weather for {} and {} headlines ready",
        weather.name,
        headlines.len()
    );

    println!("\n🤖 Generating morning update...");
    let generator = UpdateGenerator::new(&openai);
    let update = generator
        .generate(&weather, &headlines)
        .await
        .context("Failed to generate morning update")?;

    println!("\n{}\n", update.text);
    println!("Cost: ${:.6} USD", update.cost_usd);

    if args.no_audio {
        return Ok(());
    }

    println!("\n🔊 Converting to speech (voice: {})...", args.voice);
    let audio = openai
        .synthesize_speech(&update.text, &args.voice)
        .await
        .context("Failed to synthesize speech")?;

    let output_dir = ensure_output_dir()?;
    let audio_path = save_audio(&output_dir, &audio)?;

    println!("✅ Audio saved to: {}", audio_path.display());

    Ok(())
}

/// Both sources must have produced something before we spend tokens on the
/// update. Weather `None` and an empty headline list are the fetchers'
/// uniform failure signals.
fn check_data_availability(
    weather: Option<WeatherSnapshot>,
    headlines: Vec<Headline>,
) -> Result<(WeatherSnapshot, Vec<Headline>)> {
    let weather = weather.ok_or_else(|| {
        anyhow::anyhow!("No weather data available. Please check the city name or API connection.")
    })?;

    if headlines.is_empty() {
        anyhow::bail!("No news headlines available. Please check your news API connection.");
    }

    Ok((weather, headlines))
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
    fn test_missing_weather_is_fatal() {
        let headlines = vec![Headline {
            title: "A story".to_string(),
            description: "Details.".to_string(),
        }];
        let err = check_data_availability(None, headlines).unwrap_err();
        assert!(err.to_string().contains("No weather data available"));
    }

    #[test]
    fn test_empty_headlines_are_fatal() {
        let err = check_data_availability(Some(sample_weather()), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("No news headlines available"));
    }

    #[test]
    fn test_available_data_passes_through() {
        let headlines = vec![Headline {
            title: "A story".to_string(),
            description: "Details.".to_string(),
        }];
        let (weather, headlines) =
            check_data_availability(Some(sample_weather()), headlines).unwrap();
        assert_eq!(weather.name, "Dakar");
        assert_eq!(headlines.len(), 1);
    }
}
