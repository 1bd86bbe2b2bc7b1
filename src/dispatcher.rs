//! Mode and render dispatch
//!
//! Owns the mode state machine. Every published snapshot and every mode
//! advance turns into one freshly rendered frame handed to the output task.

use crate::content::ContentBuilder;
use crate::events::ModeSignal;
use crate::mode::{Mode, ModeStateMachine};
use crate::render::{PixelBuffer, RenderError, Renderer};
use crate::state::DisplayState;
use log::{debug, info};
use tokio::sync::{mpsc, watch};

pub struct Dispatcher {
    modes: ModeStateMachine,
    builder: ContentBuilder,
    renderer: Renderer,
}

impl Dispatcher {
    pub fn new(builder: ContentBuilder, renderer: Renderer) -> Self {
        Self {
            modes: ModeStateMachine::new(),
            builder,
            renderer,
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    /// Build and render `state` in the current mode.
    pub fn frame_for(&self, state: &DisplayState) -> Result<PixelBuffer, RenderError> {
        self.renderer
            .render(self.builder.build(state, self.modes.current()))
    }

    /// Dispatch loop. Ends with `Ok` when both inputs are closed or the
    /// output task is gone, and with the render error if a frame cannot be
    /// drawn.
    pub async fn run(
        mut self,
        mut snapshots: watch::Receiver<DisplayState>,
        mut signals: mpsc::Receiver<ModeSignal>,
        frames: mpsc::Sender<PixelBuffer>,
    ) -> Result<(), RenderError> {
        info!("Dispatcher started in {} mode", self.mode());
        let mut snapshots_open = true;

        loop {
            tokio::select! {
                biased;
                Some(ModeSignal::Advance) = signals.recv() => {
                    let mode = self.modes.advance();
                    info!("Mode switched to {}", mode);
                }
                changed = snapshots.changed(), if snapshots_open => {
                    if changed.is_err() {
                        snapshots_open = false;
                        continue;
                    }
                }
                else => break,
            }

            // Always render from the latest snapshot, including after a
            // mode advance between heartbeats.
            let state = snapshots.borrow_and_update().clone();
            let frame = self.frame_for(&state)?;
            if frames.send(frame).await.is_err() {
                debug!("Output closed, dispatcher stopping");
                break;
            }
        }
        info!("Dispatcher stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::snapshot_channel;
    use crate::render::FontRegistry;
    use std::collections::BTreeMap;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            ContentBuilder::default(),
            Renderer::new(FontRegistry::default()),
        )
    }

    fn expected(state: &DisplayState, mode: Mode) -> PixelBuffer {
        Renderer::new(FontRegistry::default())
            .render(ContentBuilder::default().build(state, mode))
            .unwrap()
    }

    async fn collect(mut frames: mpsc::Receiver<PixelBuffer>) -> Vec<PixelBuffer> {
        let mut out = Vec::new();
        while let Some(frame) = frames.recv().await {
            out.push(frame);
        }
        out
    }

    #[tokio::test]
    // Four presses walk weather, headlines, time and back to default, with
    // a re-render after each one.
    async fn test_mode_cycle_renders_each_mode() {
        let (publisher, snapshots) = snapshot_channel();
        let (signal_tx, signals) = mpsc::channel(8);
        let (frame_tx, frames) = mpsc::channel(1);

        for _ in 0..4 {
            signal_tx.send(ModeSignal::Advance).await.unwrap();
        }
        drop(signal_tx);
        drop(publisher);

        let handle = tokio::spawn(dispatcher().run(snapshots, signals, frame_tx));
        let rendered = collect(frames).await;
        handle.await.unwrap().unwrap();

        let state = DisplayState::new();
        let modes = [Mode::Weather, Mode::Headlines, Mode::Time, Mode::Default];
        let wanted: Vec<PixelBuffer> = modes.iter().map(|m| expected(&state, *m)).collect();
        assert_eq!(rendered, wanted);
    }

    #[tokio::test]
    async fn test_snapshot_renders_current_mode() {
        let (publisher, snapshots) = snapshot_channel();
        let (_signal_tx, signals) = mpsc::channel(8);
        let (frame_tx, mut frames) = mpsc::channel(1);
        let handle = tokio::spawn(dispatcher().run(snapshots, signals, frame_tx));

        let mut state = DisplayState::new();
        state.time = "09:15:30".to_string();
        state.date = "Mon Jan 2".to_string();
        publisher.send_replace(state.clone());

        assert_eq!(frames.recv().await, Some(expected(&state, Mode::Default)));
        drop(frames);
        publisher.send_replace(state);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    // An unregistered font ends the dispatcher with an error.
    async fn test_unknown_font_is_fatal() {
        let fonts = FontRegistry::from_table(&BTreeMap::new()).unwrap();
        let dispatcher = Dispatcher::new(ContentBuilder::default(), Renderer::new(fonts));
        let (publisher, snapshots) = snapshot_channel();
        let (_signal_tx, signals) = mpsc::channel(8);
        let (frame_tx, _frames) = mpsc::channel(1);

        publisher.send_replace(DisplayState::new());
        let result = dispatcher.run(snapshots, signals, frame_tx).await;
        assert!(matches!(result, Err(RenderError::UnknownFont(_))));
    }

    #[test]
    fn test_starts_in_default_mode() {
        assert_eq!(dispatcher().mode(), Mode::Default);
    }
}
