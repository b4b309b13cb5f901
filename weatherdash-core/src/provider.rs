use crate::{
    Config,
    payload::RawPayload,
    provider::{mock::MockSource, weatherapi::WeatherApiSource},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod mock;
pub mod weatherapi;

/// Where forecast payloads come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    Live,
    Mock,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Mock => "mock",
        }
    }

    pub const fn all() -> &'static [DataSource] {
        &[DataSource::Live, DataSource::Mock]
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DataSource {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "live" | "weatherapi" => Ok(DataSource::Live),
            "mock" => Ok(DataSource::Mock),
            _ => Err(anyhow::anyhow!("Unknown data source '{value}'. Supported sources: live, mock.")),
        }
    }
}

/// Fetches the raw forecast payload for a city. Shaping happens elsewhere.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> anyhow::Result<RawPayload>;
}

/// Construct a source from config and an explicit [`DataSource`].
pub fn source_from_config(
    id: DataSource,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherSource>> {
    let boxed: Box<dyn WeatherSource> = match id {
        DataSource::Mock => Box::new(MockSource),
        DataSource::Live => {
            let api_key = config.api_key().ok_or_else(|| {
                anyhow::anyhow!(
                    "No WeatherAPI key configured.\n\
                     Hint: run `weatherdash configure` and enter your API key."
                )
            })?;
            let mut source = WeatherApiSource::new(api_key.to_owned(), config.forecast_days);
            if let Some(base_url) = config.base_url() {
                source = source.with_base_url(base_url);
            }
            Box::new(source)
        }
    };

    Ok(boxed)
}

/// Construct the configured default source.
pub fn default_source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let id = config.data_source_id()?;
    source_from_config(id, config)
}
