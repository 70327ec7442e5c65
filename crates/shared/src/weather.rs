use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::models::WeatherSnapshot;

const FIND_PLACES_URL: &str = "https://www.meteosource.com/api/v1/free/find_places_prefix";
const POINT_URL: &str = "https://www.meteosource.com/api/v1/free/point";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct PlaceMatch {
    place_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    #[serde(default)]
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    precipitation: Option<Precipitation>,
}

#[derive(Debug, Deserialize)]
struct Precipitation {
    #[serde(default)]
    total: Option<f64>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Meteosource client. Failures of any kind (network, bad status, city not
/// found) are logged and collapse to `None`; callers treat `None` as
/// "weather unavailable" rather than matching on error variants.
pub struct WeatherClient {
    client: Client,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, api_key })
    }

    /// Resolve a free-text city query to a place id, then fetch the current
    /// conditions for it. The first place match wins.
    pub async fn fetch_forecast(&self, city: &str) -> Option<WeatherSnapshot> {
        match self.try_fetch_forecast(city).await {
            Ok(Some(snapshot)) => Some(snapshot),
            Ok(None) => {
                eprintln!("No place found for city: {}", city);
                None
            }
            Err(e) => {
                eprintln!("Weather fetch failed: {}", describe_request_error(&e));
                None
            }
        }
    }

    async fn try_fetch_forecast(&self, city: &str) -> Result<Option<WeatherSnapshot>> {
        let url = format!("{}?text={}", FIND_PLACES_URL, urlencoding::encode(city));
        let places: Vec<PlaceMatch> = self.get_json(&url).await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let url = format!(
            "{}?place_id={}&language=en&units=metric",
            POINT_URL,
            urlencoding::encode(&place.place_id)
        );
        let point: PointResponse = self.get_json(&url).await?;

        let current = point.current.unwrap_or(CurrentConditions {
            summary: None,
            temperature: None,
            precipitation: None,
        });

        let (precipitation_total, precipitation_type) = current
            .precipitation
            .map(|p| (p.total, p.kind))
            .unwrap_or((None, None));

        Ok(Some(WeatherSnapshot {
            name: place.name,
            summary: current
                .summary
                .unwrap_or_else(|| "No summary available".to_string()),
            temperature: current.temperature,
            precipitation_total,
            precipitation_type,
        }))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("Failed to send request to Meteosource")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error {}", status);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse Meteosource response")
    }
}

pub(crate) fn describe_request_error(e: &anyhow::Error) -> String {
    if let Some(req_err) = e.downcast_ref::<reqwest::Error>() {
        if req_err.is_timeout() {
            return "Request timed out".to_string();
        }
        if req_err.is_connect() {
            return "Network connection failed".to_string();
        }
    }
    format!("{:#}", e)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT_JSON: &str = r#"{
        "current": {
            "summary": "Partly sunny",
            "temperature": 24.5,
            "precipitation": {"total": 0.2, "type": "rain"}
        }
    }"#;

    #[test]
    fn test_point_response_maps_all_fields() {
        let point: PointResponse = serde_json::from_str(POINT_JSON).unwrap();
        let current = point.current.unwrap();
        assert_eq!(current.summary.as_deref(), Some("Partly sunny"));
        assert_eq!(current.temperature, Some(24.5));
        let precipitation = current.precipitation.unwrap();
        assert_eq!(precipitation.total, Some(0.2));
        assert_eq!(precipitation.kind.as_deref(), Some("rain"));
    }

    #[test]
    fn test_point_response_tolerates_missing_sections() {
        let point: PointResponse = serde_json::from_str("{}").unwrap();
        assert!(point.current.is_none());

        let point: PointResponse =
            serde_json::from_str(r#"{"current": {"temperature": 12.0}}"#).unwrap();
        let current = point.current.unwrap();
        assert!(current.summary.is_none());
        assert!(current.precipitation.is_none());
        assert_eq!(current.temperature, Some(12.0));
    }

    #[test]
    fn test_place_matches_parse_in_order() {
        let json = r#"[
            {"place_id": "dakar", "name": "Dakar", "country": "Senegal"},
            {"place_id": "dakar-2", "name": "Dakar Region", "country": "Senegal"}
        ]"#;
        let places: Vec<PlaceMatch> = serde_json::from_str(json).unwrap();
        assert_eq!(places[0].place_id, "dakar");
        assert_eq!(places[0].name, "Dakar");
    }

    #[test]
    fn test_describe_request_error_passes_through_other_errors() {
        let err = anyhow::anyhow!("HTTP error 502 Bad Gateway");
        assert_eq!(describe_request_error(&err), "HTTP error 502 Bad Gateway");
    }
}
