//! Runtime wiring: spawns every task and watches the ones that can fail.

use crate::api::{NewsApi, WeatherApi};
use crate::config::Config;
use crate::consts::dash_consts::{FRAME_QUEUE_SIZE, MODE_QUEUE_SIZE, PRODUCER_QUEUE_SIZE};
use crate::content::ContentBuilder;
use crate::coordinator::{StateCoordinator, StateInbox, snapshot_channel};
use crate::devices::{ButtonInput, DisplaySink, InputError, SinkError};
use crate::dispatcher::Dispatcher;
use crate::events::Producer;
use crate::producers::{
    ClockProducer, NewsFetch, SystemClock, WeatherFetch, run_mode_switch, run_periodic,
};
use crate::render::{PixelBuffer, RenderError, Renderer};
use log::{info, warn};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("display output failed: {0}")]
    Sink(#[from] SinkError),

    #[error("mode button failed: {0}")]
    Input(#[from] InputError),

    #[error("task panicked or was cancelled: {0}")]
    Task(#[from] JoinError),
}

/// Everything the dashboard needs, assembled by `main` (or a test).
pub struct Dashboard {
    config: Config,
    renderer: Renderer,
    sink: Box<dyn DisplaySink>,
    weather: Option<(Box<dyn WeatherApi>, String)>,
    news: Option<(Box<dyn NewsApi>, String)>,
    button: Option<Box<dyn ButtonInput>>,
    max_frames: Option<u64>,
}

impl Dashboard {
    pub fn new(config: Config, renderer: Renderer, sink: Box<dyn DisplaySink>) -> Self {
        Self {
            config,
            renderer,
            sink,
            weather: None,
            news: None,
            button: None,
            max_frames: None,
        }
    }

    pub fn with_weather(mut self, api: Box<dyn WeatherApi>, api_key: String) -> Self {
        self.weather = Some((api, api_key));
        self
    }

    pub fn with_news(mut self, api: Box<dyn NewsApi>, api_key: String) -> Self {
        self.news = Some((api, api_key));
        self
    }

    pub fn with_button(mut self, input: Box<dyn ButtonInput>) -> Self {
        self.button = Some(input);
        self
    }

    /// Stop after this many frames have been presented.
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Run until the frame limit is reached or a fatal error occurs. Without
    /// a limit this only returns on error.
    pub async fn run(self) -> Result<(), RuntimeError> {
        let Dashboard {
            config,
            renderer,
            sink,
            weather,
            news,
            button,
            max_frames,
        } = self;

        let (clock_tx, clock) = mpsc::channel(PRODUCER_QUEUE_SIZE);
        let (weather_tx, weather_rx) = mpsc::channel(PRODUCER_QUEUE_SIZE);
        let (news_tx, news_rx) = mpsc::channel(PRODUCER_QUEUE_SIZE);
        let (mode_tx, mode_rx) = mpsc::channel(MODE_QUEUE_SIZE);
        let (frame_tx, frame_rx) = mpsc::channel(FRAME_QUEUE_SIZE);
        let (publisher, snapshots) = snapshot_channel();

        let mut background: Vec<JoinHandle<()>> = Vec::new();
        background.push(tokio::spawn(ClockProducer::new().run(
            SystemClock,
            config.tick_interval(),
            clock_tx,
        )));

        match weather {
            Some((api, key)) => {
                let fetch = WeatherFetch::new(api, key, config.latitude, config.longitude);
                background.push(tokio::spawn(run_periodic(
                    Producer::Weather,
                    Box::new(fetch),
                    config.weather_interval(),
                    weather_tx,
                )));
            }
            None => {
                // A closed stream drops out of the coordinator's wait.
                drop(weather_tx);
                warn!("No weather API key set, weather will not update");
            }
        }

        match news {
            Some((api, key)) => {
                background.push(tokio::spawn(run_periodic(
                    Producer::News,
                    Box::new(NewsFetch::new(api, key)),
                    config.news_interval(),
                    news_tx,
                )));
            }
            None => {
                drop(news_tx);
                warn!("No news API key set, headlines will not update");
            }
        }

        let inbox = StateInbox {
            clock,
            weather: weather_rx,
            news: news_rx,
        };
        background.push(tokio::spawn(StateCoordinator::new(publisher).run(inbox)));

        let mut button = match button {
            Some(input) => Some(tokio::task::spawn_blocking(move || {
                run_mode_switch(input, mode_tx)
            })),
            None => {
                drop(mode_tx);
                info!("No mode button configured, staying in default mode");
                None
            }
        };

        let dispatcher = Dispatcher::new(ContentBuilder::new(config.temperature), renderer);
        let mut dispatcher = tokio::spawn(dispatcher.run(snapshots, mode_rx, frame_tx));
        let mut output =
            tokio::task::spawn_blocking(move || present_frames(sink, frame_rx, max_frames));

        let result = loop {
            tokio::select! {
                rendered = &mut dispatcher => break flatten(rendered),
                presented = &mut output => {
                    break flatten(presented).map(|count| info!("Presented {} frames", count));
                }
                pressed = finished(&mut button) => {
                    button = None;
                    match flatten(pressed) {
                        Ok(()) => info!("Mode button input closed, current mode is kept"),
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        dispatcher.abort();
        for handle in background {
            handle.abort();
        }
        result
    }
}

/// Output loop. Runs on a blocking thread since sinks do synchronous I/O.
fn present_frames(
    mut sink: Box<dyn DisplaySink>,
    mut frames: mpsc::Receiver<PixelBuffer>,
    max_frames: Option<u64>,
) -> Result<u64, SinkError> {
    let mut presented = 0;
    while let Some(frame) = frames.blocking_recv() {
        sink.present(frame)?;
        presented += 1;
        if max_frames.is_some_and(|max| presented >= max) {
            break;
        }
    }
    Ok(presented)
}

fn flatten<T, E>(joined: Result<Result<T, E>, JoinError>) -> Result<T, RuntimeError>
where
    RuntimeError: From<E>,
{
    Ok(joined??)
}

/// Resolves when the task finishes; never resolves without one.
async fn finished<T>(handle: &mut Option<JoinHandle<T>>) -> Result<T, JoinError> {
    match handle {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}
