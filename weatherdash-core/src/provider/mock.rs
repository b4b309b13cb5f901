use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::payload::RawPayload;

use super::WeatherSource;

const MOCK_LONDON: &str = include_str!("../../data/mock_london.json");

/// Serves a bundled London forecast for any city, relabelled with the
/// requested name. Used offline and as the fallback for failed live loads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

impl MockSource {
    pub fn payload_for(&self, city: &str) -> Result<RawPayload> {
        let mut payload: RawPayload =
            serde_json::from_str(MOCK_LONDON).context("Bundled mock payload is not valid JSON")?;

        let city = city.trim();
        if !city.is_empty() {
            if let Some(location) = payload.location.as_mut() {
                location.name = Some(city.to_string());
            }
        }
        Ok(payload)
    }
}

#[async_trait]
impl WeatherSource for MockSource {
    async fn fetch(&self, city: &str) -> Result<RawPayload> {
        self.payload_for(city)
    }
}
