use thiserror::Error;

/// Failures of the normalization core.
///
/// Unrecognized condition strings and wind labels are not errors; they resolve
/// to documented fallbacks in [`crate::condition`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// The payload lacks the structure needed to build a forecast.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A converter was handed NaN or an infinity.
    #[error("invalid numeric input: {value}")]
    InvalidInput { value: f64 },
}

/// Why a dashboard load failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch weather for '{city}'")]
    Fetch {
        city: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("weather data for '{city}' is unusable")]
    Shape {
        city: String,
        #[source]
        source: ShapeError,
    },
}
