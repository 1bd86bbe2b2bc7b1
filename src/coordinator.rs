//! State coordinator
//!
//! Single writer of the [`DisplayState`]. Merges the producer streams and
//! publishes a full snapshot on every heartbeat.

use crate::events::StateEvent;
use crate::state::DisplayState;
use log::{debug, info};
use tokio::sync::{mpsc, watch};

/// Inbound producer streams, one receiver per producer.
///
/// Within a stream events keep their send order, so the clock producer's
/// date update always lands before the tick that accompanies it.
#[derive(Debug)]
pub struct StateInbox {
    pub clock: mpsc::Receiver<StateEvent>,
    pub weather: mpsc::Receiver<StateEvent>,
    pub news: mpsc::Receiver<StateEvent>,
}

/// Create the single-slot handoff between the coordinator and the dispatcher.
///
/// A `watch` channel only keeps the latest value, so a slow consumer simply
/// skips intermediate snapshots and the heartbeat never waits on it.
pub fn snapshot_channel() -> (watch::Sender<DisplayState>, watch::Receiver<DisplayState>) {
    watch::channel(DisplayState::new())
}

pub struct StateCoordinator {
    state: DisplayState,
    publisher: watch::Sender<DisplayState>,
    published: u64,
}

impl StateCoordinator {
    pub fn new(publisher: watch::Sender<DisplayState>) -> Self {
        Self {
            state: DisplayState::new(),
            publisher,
            published: 0,
        }
    }

    /// Apply one event. Returns `true` when the event caused a publish.
    ///
    /// Each field is replaced wholesale; nothing is merged with its
    /// previous value.
    pub fn apply(&mut self, event: StateEvent) -> bool {
        let heartbeat = event.is_heartbeat();
        match event {
            StateEvent::Date(date) => self.state.date = date,
            StateEvent::Weather(weather) => self.state.weather = Some(weather),
            StateEvent::News(news) => self.state.news = news,
            StateEvent::Time(time) => self.state.time = time,
        }
        if heartbeat {
            self.publish();
        }
        heartbeat
    }

    fn publish(&mut self) {
        // The receiver gets its own copy; the coordinator keeps mutating `state`.
        self.publisher.send_replace(self.state.clone());
        self.published += 1;
    }

    /// Merge loop. Blocks until at least one stream has an event; a stream
    /// whose producer has gone away drops out of the wait. Returns once every
    /// stream is closed.
    pub async fn run(mut self, mut inbox: StateInbox) {
        info!("State coordinator started");
        loop {
            let event = tokio::select! {
                // Field updates first so a simultaneous tick carries them.
                biased;
                Some(event) = inbox.weather.recv() => event,
                Some(event) = inbox.news.recv() => event,
                Some(event) = inbox.clock.recv() => event,
                else => break,
            };
            debug!("{} event: {}", event.producer(), event);
            self.apply(event);
        }
        info!(
            "State coordinator stopped after {} snapshots",
            self.published
        );
    }
}
