use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::payload::RawPayload;

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// WeatherAPI.com forecast endpoint, with air quality included.
#[derive(Debug, Clone)]
pub struct WeatherApiSource {
    api_key: String,
    days: u8,
    base_url: String,
    http: Client,
}

impl WeatherApiSource {
    pub fn new(api_key: String, days: u8) -> Self {
        Self {
            api_key,
            days: days.max(1),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point at another host, e.g. a local proxy or a test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast.json", self.base_url)
    }
}

#[async_trait]
impl WeatherSource for WeatherApiSource {
    async fn fetch(&self, city: &str) -> Result<RawPayload> {
        let url = self.forecast_url();
        let days = self.days.to_string();
        debug!(%url, city, days = self.days, "requesting forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", days.as_str()),
                ("aqi", "yes"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (forecast)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read WeatherAPI forecast response body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "WeatherAPI forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse WeatherAPI forecast JSON")
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
