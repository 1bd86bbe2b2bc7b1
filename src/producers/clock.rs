//! Clock tick producer: the heartbeat.

use crate::consts::dash_consts::clock::{DATE_FORMAT, TIME_FORMAT};
use crate::events::StateEvent;
use chrono::{DateTime, Local};
use log::info;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

/// Source of wall-clock time. Reading it cannot fail.
pub trait Clock: Send + 'static {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Formats ticks and remembers the last day it announced.
#[derive(Debug, Default)]
pub struct ClockProducer {
    last_date: Option<String>,
}

impl ClockProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for one tick: a date event first when the day changed (always
    /// on the first tick), then the time event.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<StateEvent> {
        let mut events = Vec::with_capacity(2);
        let date = now.format(DATE_FORMAT).to_string();
        if self.last_date.as_deref() != Some(date.as_str()) {
            self.last_date = Some(date.clone());
            events.push(StateEvent::Date(date));
        }
        events.push(StateEvent::Time(now.format(TIME_FORMAT).to_string()));
        events
    }

    /// Tick forever. Returns only when the coordinator has gone away.
    pub async fn run<C: Clock>(
        mut self,
        clock: C,
        period: Duration,
        sender: mpsc::Sender<StateEvent>,
    ) {
        info!("Clock producer started ({} ms tick)", period.as_millis());
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            for event in self.tick(clock.now()) {
                if sender.send(event).await.is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2006, 1, day, h, m, s).unwrap()
    }

    #[test]
    fn test_first_tick_announces_date() {
        let mut producer = ClockProducer::new();
        assert_eq!(
            producer.tick(at(2, 15, 4, 5)),
            vec![
                StateEvent::Date("Mon Jan 2 2006".to_string()),
                StateEvent::Time("15:04:05".to_string()),
            ]
        );
    }

    #[test]
    // The date is sent only when the day rolls over, and before the time.
    fn test_date_only_on_day_change() {
        let mut producer = ClockProducer::new();
        producer.tick(at(2, 23, 59, 59));
        assert_eq!(
            producer.tick(at(2, 23, 59, 59)),
            vec![StateEvent::Time("23:59:59".to_string())]
        );
        assert_eq!(
            producer.tick(at(3, 0, 0, 0)),
            vec![
                StateEvent::Date("Tue Jan 3 2006".to_string()),
                StateEvent::Time("00:00:00".to_string()),
            ]
        );
    }

    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_emits_on_interval() {
        let (tx, mut rx) = mpsc::channel(16);
        let handle = tokio::spawn(ClockProducer::new().run(
            FixedClock(at(2, 9, 15, 30)),
            Duration::from_millis(100),
            tx,
        ));

        assert_eq!(rx.recv().await, Some(StateEvent::Date("Mon Jan 2 2006".to_string())));
        assert_eq!(rx.recv().await, Some(StateEvent::Time("09:15:30".to_string())));
        assert_eq!(rx.recv().await, Some(StateEvent::Time("09:15:30".to_string())));

        drop(rx);
        tokio::time::advance(Duration::from_millis(200)).await;
        handle.await.unwrap();
    }
}
