//! OpenWeatherMap current-conditions client.

use super::{ApiError, WeatherApi, user_agent};
use crate::consts::dash_consts::{http, weather::API_URL};
use crate::state::WeatherSnapshot;
use chrono::{DateTime, Local};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Vec<Condition>,
    main: Readings,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Readings {
    /// Celsius, since requests ask for metric units.
    temp: f64,
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .timeout(http::request_timeout())
            .user_agent(user_agent())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl WeatherApi for WeatherClient {
    async fn fetch(
        &self,
        api_key: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, ApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let body: CurrentWeather = response.json().await?;
        into_snapshot(body, Local::now())
    }
}

fn into_snapshot(
    body: CurrentWeather,
    fetched_at: DateTime<Local>,
) -> Result<WeatherSnapshot, ApiError> {
    let condition = body
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Malformed("no weather conditions in response".to_string()))?;
    Ok(WeatherSnapshot::new(
        capitalize(&condition.description),
        body.main.temp,
        fetched_at,
    ))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
