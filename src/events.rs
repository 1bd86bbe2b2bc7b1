//! Event System
//!
//! Messages flowing from the producers into the coordinator and the
//! dispatcher. Every payload travels by value.

use crate::state::WeatherSnapshot;
use std::fmt::Display;

/// Identifies which producer an event or log line came from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Producer {
    /// Heartbeat: time of day, plus the date on day change.
    Clock,
    /// Periodic weather fetch.
    Weather,
    /// Periodic headline fetch.
    News,
    /// Hardware mode button.
    ModeSwitch,
}

/// A single field update for the display state.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    Time(String),
    Date(String),
    Weather(WeatherSnapshot),
    News(Vec<String>),
}

impl StateEvent {
    pub fn producer(&self) -> Producer {
        match self {
            StateEvent::Time(_) | StateEvent::Date(_) => Producer::Clock,
            StateEvent::Weather(_) => Producer::Weather,
            StateEvent::News(_) => Producer::News,
        }
    }

    /// Only time events pace publication downstream.
    pub fn is_heartbeat(&self) -> bool {
        matches!(self, StateEvent::Time(_))
    }
}

impl Display for StateEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateEvent::Time(t) => write!(f, "time {}", t),
            StateEvent::Date(d) => write!(f, "date {}", d),
            StateEvent::Weather(w) => write!(f, "weather {} {:.1}C", w.summary, w.temperature_c),
            StateEvent::News(n) => write!(f, "news ({} headlines)", n.len()),
        }
    }
}

/// Signal from the mode button.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ModeSignal {
    Advance,
}
