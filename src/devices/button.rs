//! Mode button inputs
//!
//! The button is wired active-low with a pull-up: pressing it pulls the line
//! to 0, so a press is a falling edge. Debouncing is the input's job, not the
//! producer's.

use crate::devices::gpio;
use linux_embedded_hal::SysfsPin;
use linux_embedded_hal::sysfs_gpio::{self, Direction, Edge, PinPoller};
use std::io::{self, BufRead, BufReader, Stdin};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    /// The input line could not be acquired at startup.
    #[error("GPIO {pin} is not available: {source}")]
    Unavailable {
        pin: u32,
        #[source]
        source: sysfs_gpio::Error,
    },

    #[error("Failed to read GPIO: {0}")]
    Gpio(#[from] sysfs_gpio::Error),

    #[error("Failed to read input: {0}")]
    Read(#[from] io::Error),

    /// The input source reached its end; no further edges will come.
    #[error("Input closed")]
    Closed,
}

/// A single binary input line.
#[cfg_attr(test, mockall::automock)]
pub trait ButtonInput: Send {
    /// Block until the line changes level.
    fn wait_for_edge(&mut self) -> Result<(), InputError>;

    /// Current level: `true` high (released), `false` low (pressed).
    fn read(&mut self) -> Result<bool, InputError>;
}

/// A pin driven through the Linux sysfs GPIO interface, woken by the kernel
/// on both edges.
///
/// Sysfs cannot enable the internal pull-up; the line needs an external one
/// (or a device tree overlay) so that it idles high.
pub struct SysfsButton {
    line: SysfsPin,
    poller: PinPoller,
}

impl SysfsButton {
    /// Export `pin` as an input with edge interrupts.
    pub fn open(pin: u32) -> Result<Self, InputError> {
        let unavailable = |source| InputError::Unavailable { pin, source };
        let line = gpio::export(pin, Direction::In).map_err(unavailable)?;
        line.set_edge(Edge::BothEdges).map_err(unavailable)?;
        let poller = line.get_poller().map_err(unavailable)?;
        Ok(Self { line, poller })
    }
}

impl ButtonInput for SysfsButton {
    fn wait_for_edge(&mut self) -> Result<(), InputError> {
        // A negative timeout blocks until the kernel reports an edge.
        while self.poller.poll(-1)?.is_none() {}
        Ok(())
    }

    fn read(&mut self) -> Result<bool, InputError> {
        Ok(self.line.get_value()? != 0)
    }
}

/// Keyboard stand-in for a physical button: every line read is one press
/// followed by a release.
pub struct ConsoleButton<R> {
    reader: R,
    pressed: bool,
}

impl ConsoleButton<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> ConsoleButton<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pressed: false,
        }
    }
}

impl<R: BufRead + Send> ButtonInput for ConsoleButton<R> {
    fn wait_for_edge(&mut self) -> Result<(), InputError> {
        if self.pressed {
            // Release edge follows the press immediately.
            self.pressed = false;
            return Ok(());
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }
        self.pressed = true;
        Ok(())
    }

    fn read(&mut self) -> Result<bool, InputError> {
        Ok(!self.pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_console_press_then_release() {
        let mut button = ConsoleButton::new(Cursor::new("\n\n"));
        assert!(button.read().unwrap());

        button.wait_for_edge().unwrap();
        assert!(!button.read().unwrap());
        button.wait_for_edge().unwrap();
        assert!(button.read().unwrap());

        button.wait_for_edge().unwrap();
        assert!(!button.read().unwrap());
        button.wait_for_edge().unwrap();

        assert!(matches!(button.wait_for_edge(), Err(InputError::Closed)));
    }

    #[test]
    // Without a matching GPIO line the button fails at startup, not on first use.
    fn test_sysfs_unknown_pin_is_unavailable() {
        let result = SysfsButton::open(u32::MAX);
        assert!(matches!(
            result,
            Err(InputError::Unavailable { pin: u32::MAX, .. })
        ));
    }
}
