//! Mode-switch producer.

use crate::devices::{ButtonInput, InputError};
use crate::events::{ModeSignal, Producer};
use log::{debug, info};
use tokio::sync::mpsc;

/// Emit one `Advance` per press (falling edge). Blocking; run it on a
/// blocking thread.
///
/// Returns `Ok` when the input closes or nobody listens any more, and the
/// input's error if the line cannot be read.
pub fn run_mode_switch(
    mut input: Box<dyn ButtonInput>,
    sender: mpsc::Sender<ModeSignal>,
) -> Result<(), InputError> {
    info!("{} producer started", Producer::ModeSwitch);
    loop {
        match input.wait_for_edge() {
            Ok(()) => {}
            Err(InputError::Closed) => return Ok(()),
            Err(e) => return Err(e),
        }
        if !input.read()? {
            debug!("Mode button pressed");
            if sender.blocking_send(ModeSignal::Advance).is_err() {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::ConsoleButton;
    use crate::devices::button::MockButtonInput;
    use mockall::Sequence;
    use std::io::{self, Cursor};

    #[test]
    // Three presses on the console give three advances, then the input ends.
    fn test_one_signal_per_press() {
        let (tx, mut rx) = mpsc::channel(8);
        let input = ConsoleButton::new(Cursor::new("\n\n\n"));
        run_mode_switch(Box::new(input), tx).unwrap();

        let mut signals = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            signals.push(signal);
        }
        assert_eq!(signals, vec![ModeSignal::Advance; 3]);
    }

    #[test]
    // Rising edges (release) do not advance the mode.
    fn test_release_edge_ignored() {
        let mut seq = Sequence::new();
        let mut input = MockButtonInput::new();
        input
            .expect_wait_for_edge()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        input
            .expect_read()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(true));
        input
            .expect_wait_for_edge()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(InputError::Closed));

        let (tx, mut rx) = mpsc::channel(8);
        run_mode_switch(Box::new(input), tx).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_read_failure_propagates() {
        let mut input = MockButtonInput::new();
        input.expect_wait_for_edge().returning(|| Ok(()));
        input
            .expect_read()
            .returning(|| Err(InputError::Read(io::Error::other("bus fault"))));

        let (tx, _rx) = mpsc::channel(8);
        assert!(matches!(
            run_mode_switch(Box::new(input), tx),
            Err(InputError::Read(_))
        ));
    }
}
