//! Hardware seams: the mode button and the display output.

pub mod button;
mod gpio;
pub mod sink;

pub use button::{ButtonInput, ConsoleButton, InputError, SysfsButton};
pub use sink::{DisplaySink, PbmSink, SinkError, Ssd1306Sink, TerminalSink};
