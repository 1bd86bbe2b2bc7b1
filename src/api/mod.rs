//! Weather and headline service clients
//!
//! The producers only see the [`WeatherApi`] and [`NewsApi`] traits; the
//! HTTP clients behind them are swappable and mocked in tests.

use crate::state::WeatherSnapshot;

pub mod error;
pub mod news;
pub mod weather;

pub use error::ApiError;
pub use news::NewsClient;
pub use weather::WeatherClient;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait WeatherApi: Send + Sync {
    /// Fetch current conditions for a location. One round trip per call.
    async fn fetch(
        &self,
        api_key: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, ApiError>;
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait NewsApi: Send + Sync {
    /// Fetch the current headline titles, most prominent first.
    async fn fetch(&self, api_key: &str) -> Result<Vec<String>, ApiError>;
}

/// User agent sent with every request.
pub(crate) fn user_agent() -> String {
    format!("oled-dash/{}", env!("CARGO_PKG_VERSION"))
}
