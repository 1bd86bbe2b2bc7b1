//! Producers
//!
//! Independent sources of display-state updates. Each one owns its own
//! schedule (timer or hardware wait) and only ever talks to the rest of the
//! system through its channel.

pub mod button;
pub mod clock;
pub mod periodic;

pub use button::run_mode_switch;
pub use clock::{ClockProducer, SystemClock};
pub use periodic::{NewsFetch, WeatherFetch, run_periodic};
