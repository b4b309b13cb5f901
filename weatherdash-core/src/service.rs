//! Fetch → shape orchestration for the dashboard.

use tracing::{info, warn};

use crate::{
    Config,
    error::LoadError,
    model::WeatherSnapshot,
    provider::{DataSource, WeatherSource, mock::MockSource, source_from_config},
    request::{RequestId, RequestTracker},
    shaper::shape_forecast,
};

/// A finished load, tagged with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub request: RequestId,
    pub snapshot: WeatherSnapshot,
    /// The source failed and bundled mock data was served instead.
    pub from_fallback: bool,
}

#[derive(Debug)]
pub struct DashboardService {
    source: Box<dyn WeatherSource>,
    fallback: Option<MockSource>,
    tracker: RequestTracker,
}

impl DashboardService {
    pub fn new(source: Box<dyn WeatherSource>) -> Self {
        Self { source, fallback: None, tracker: RequestTracker::new() }
    }

    /// Serve mock data when the source fails or returns an unusable payload.
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled.then_some(MockSource);
        self
    }

    pub fn from_config(config: &Config, id: DataSource) -> anyhow::Result<Self> {
        let source = source_from_config(id, config)?;
        let fallback = config.fallback_to_mock && id == DataSource::Live;
        Ok(Self::new(source).with_fallback(fallback))
    }

    /// Load a city under a fresh request id.
    ///
    /// Callers that may have issued a newer load in the meantime should pass
    /// the result through [`DashboardService::accept`].
    pub async fn load(&self, city: &str) -> Result<Loaded, LoadError> {
        let request = self.tracker.issue();
        info!(%request, city, "loading weather");

        let (snapshot, from_fallback) = self.fetch_with_fallback(city).await?;
        Ok(Loaded { request, snapshot, from_fallback })
    }

    /// Fetch and shape without issuing a request id, serving mock data on
    /// failure when fallback is enabled. Used for side loads such as the
    /// comparison city. The flag is `true` when mock data was served.
    pub async fn fetch_with_fallback(
        &self,
        city: &str,
    ) -> Result<(WeatherSnapshot, bool), LoadError> {
        match self.fetch_snapshot(city).await {
            Ok(snapshot) => Ok((snapshot, false)),
            Err(err) => {
                let Some(mock) = self.fallback else {
                    return Err(err);
                };
                warn!(city, error = %err, "load failed, serving mock data");
                Ok((shape_payload(city, mock.payload_for(city))?, true))
            }
        }
    }

    /// Fetch and shape without a request id or fallback.
    pub async fn fetch_snapshot(&self, city: &str) -> Result<WeatherSnapshot, LoadError> {
        shape_payload(city, self.source.fetch(city).await)
    }

    pub fn is_current(&self, request: RequestId) -> bool {
        self.tracker.is_current(request)
    }

    /// `Some` only if no newer load was issued after this one.
    pub fn accept(&self, loaded: Loaded) -> Option<Loaded> {
        self.tracker.accept(loaded.request, loaded)
    }
}

fn shape_payload(
    city: &str,
    payload: anyhow::Result<crate::payload::RawPayload>,
) -> Result<WeatherSnapshot, LoadError> {
    let payload =
        payload.map_err(|e| LoadError::Fetch { city: city.to_string(), source: e.into() })?;
    shape_forecast(&payload).map_err(|source| LoadError::Shape { city: city.to_string(), source })
}
