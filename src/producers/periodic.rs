//! Periodic network producers (weather, headlines)
//!
//! Fetch once immediately, then on a fixed interval. A failed fetch is logged
//! and produces nothing, so the last good value stays on screen; the schedule
//! itself never stops.

use crate::api::{ApiError, NewsApi, WeatherApi};
use crate::error_classifier::ErrorClassifier;
use crate::events::{Producer, StateEvent};
use log::{Level, info, log};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

/// One fetch, turned into the event it should produce.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_event(&self) -> Result<StateEvent, ApiError>;
}

pub struct WeatherFetch {
    api: Box<dyn WeatherApi>,
    api_key: String,
    latitude: f64,
    longitude: f64,
}

impl WeatherFetch {
    pub fn new(api: Box<dyn WeatherApi>, api_key: String, latitude: f64, longitude: f64) -> Self {
        Self {
            api,
            api_key,
            latitude,
            longitude,
        }
    }
}

#[async_trait::async_trait]
impl Fetch for WeatherFetch {
    async fn fetch_event(&self) -> Result<StateEvent, ApiError> {
        self.api
            .fetch(&self.api_key, self.latitude, self.longitude)
            .await
            .map(StateEvent::Weather)
    }
}

pub struct NewsFetch {
    api: Box<dyn NewsApi>,
    api_key: String,
}

impl NewsFetch {
    pub fn new(api: Box<dyn NewsApi>, api_key: String) -> Self {
        Self { api, api_key }
    }
}

#[async_trait::async_trait]
impl Fetch for NewsFetch {
    async fn fetch_event(&self) -> Result<StateEvent, ApiError> {
        self.api.fetch(&self.api_key).await.map(StateEvent::News)
    }
}

/// Run a fetch schedule until the coordinator goes away.
pub async fn run_periodic(
    source: Producer,
    fetch: Box<dyn Fetch>,
    period: Duration,
    sender: mpsc::Sender<StateEvent>,
) {
    info!("{} producer started ({} s interval)", source, period.as_secs());
    let classifier = ErrorClassifier::new();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match fetch.fetch_event().await {
            Ok(event) => {
                info!("{} updated: {}", source, event);
                if sender.send(event).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                let level: Level = classifier.classify_fetch_error(&e).into();
                log!(level, "{} fetch failed, keeping previous value: {}", source, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockNewsApi, MockWeatherApi};
    use crate::state::WeatherSnapshot;
    use chrono::Local;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    const PERIOD: Duration = Duration::from_secs(600);

    fn outage() -> ApiError {
        ApiError::Http {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    // The first fetch happens right away, not after one interval.
    async fn test_fetches_immediately() {
        let mut api = MockWeatherApi::new();
        api.expect_fetch()
            .withf(|key, lat, lon| key == "k" && *lat == 1.5 && *lon == -2.5)
            .returning(|_, _, _| Ok(WeatherSnapshot::new("Clear", 12.0, Local::now())));
        let fetch = WeatherFetch::new(Box::new(api), "k".to_string(), 1.5, -2.5);

        let (tx, mut rx) = mpsc::channel(4);
        let start = Instant::now();
        let handle = tokio::spawn(run_periodic(Producer::Weather, Box::new(fetch), PERIOD, tx));

        match rx.recv().await {
            Some(StateEvent::Weather(w)) => assert_eq!(w.summary, "Clear"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(start.elapsed() < PERIOD);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    // A failure emits nothing and the schedule carries on to the next fetch.
    async fn test_failure_is_silent_and_schedule_continues() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut api = MockWeatherApi::new();
        api.expect_fetch().returning(move |_, _, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(outage())
            } else {
                Ok(WeatherSnapshot::new("Cloudy", 20.0, Local::now()))
            }
        });
        let fetch = WeatherFetch::new(Box::new(api), "k".to_string(), 0.0, 0.0);

        let (tx, mut rx) = mpsc::channel(4);
        let start = Instant::now();
        let handle = tokio::spawn(run_periodic(Producer::Weather, Box::new(fetch), PERIOD, tx));

        match rx.recv().await {
            Some(StateEvent::Weather(w)) => assert_eq!(w.summary, "Cloudy"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(start.elapsed() >= PERIOD);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_news_fetch_emits_headlines() {
        let mut api = MockNewsApi::new();
        api.expect_fetch()
            .withf(|key| key == "news-key")
            .returning(|_| Ok(vec!["Story".to_string()]));
        let fetch = NewsFetch::new(Box::new(api), "news-key".to_string());

        let (tx, mut rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_periodic(Producer::News, Box::new(fetch), PERIOD, tx));
        assert_eq!(
            rx.recv().await,
            Some(StateEvent::News(vec!["Story".to_string()]))
        );
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    // The producer stops once nobody is listening.
    async fn test_stops_when_receiver_dropped() {
        let mut api = MockNewsApi::new();
        api.expect_fetch().returning(|_| Ok(vec![]));
        let fetch = NewsFetch::new(Box::new(api), "k".to_string());

        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        run_periodic(Producer::News, Box::new(fetch), PERIOD, tx).await;
    }
}
