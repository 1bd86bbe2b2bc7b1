//! Display state
//!
//! The aggregate of the latest value seen from every producer. Only the
//! coordinator ever holds a mutable `DisplayState`; everyone else receives
//! clones of it.

use crate::consts::dash_consts::{PLACEHOLDER_DATE, PLACEHOLDER_TIME};
use chrono::{DateTime, Local};

/// Current conditions as returned by a successful weather fetch.
///
/// Temperature is stored in degrees Celsius only; unit conversion happens
/// when the content is built.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub summary: String,
    pub temperature_c: f64,
    pub fetched_at: DateTime<Local>,
}

impl WeatherSnapshot {
    pub fn new(
        summary: impl Into<String>,
        temperature_c: f64,
        fetched_at: DateTime<Local>,
    ) -> Self {
        Self {
            summary: summary.into(),
            temperature_c,
            fetched_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    /// Wall-clock time, "HH:MM:SS"
    pub time: String,
    /// Calendar day, e.g. "Mon Jan 2 2006"
    pub date: String,
    pub weather: Option<WeatherSnapshot>,
    pub news: Vec<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    /// Startup state: placeholders for time and date, nothing else known.
    pub fn new() -> Self {
        Self {
            time: PLACEHOLDER_TIME.to_string(),
            date: PLACEHOLDER_DATE.to_string(),
            weather: None,
            news: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_holds_placeholders() {
        let state = DisplayState::new();
        assert_eq!(state.time, PLACEHOLDER_TIME);
        assert_eq!(state.date, PLACEHOLDER_DATE);
        assert!(state.weather.is_none());
        assert!(state.news.is_empty());
    }
}
