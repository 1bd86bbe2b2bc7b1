//! Display outputs
//!
//! A sink takes ownership of each finished frame and pushes it to wherever
//! the pixels are shown.

use crate::consts::dash_consts::panel::{SPI_SPEED_HZ, reset_pulse};
use crate::devices::gpio;
use crate::render::PixelBuffer;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use embedded_graphics::pixelcolor::BinaryColor;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{I2cdev, SpidevDevice, SysfsPin};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use std::fmt::Debug;
use std::fs;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Display I/O error: {0}")]
    Io(#[from] io::Error),

    /// The display bus or one of its control lines could not be opened.
    #[error("{device} is not available: {reason}")]
    Unavailable { device: String, reason: String },

    #[error("Display bus error: {0}")]
    Bus(String),
}

pub trait DisplaySink: Send {
    fn present(&mut self, frame: PixelBuffer) -> Result<(), SinkError>;
}

/// Draws frames in a terminal, two pixel rows per character cell.
pub struct TerminalSink<W: Write + Send> {
    out: W,
}

impl TerminalSink<Stdout> {
    pub fn stdout() -> Result<Self, SinkError> {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(mut out: W) -> Result<Self, SinkError> {
        execute!(out, Clear(ClearType::All), Hide)?;
        Ok(Self { out })
    }
}

impl<W: Write + Send> Drop for TerminalSink<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show);
    }
}

fn cell(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (true, true) => '█',
        (true, false) => '▀',
        (false, true) => '▄',
        (false, false) => ' ',
    }
}

impl<W: Write + Send> DisplaySink for TerminalSink<W> {
    fn present(&mut self, frame: PixelBuffer) -> Result<(), SinkError> {
        let lit = |x, y| frame.pixel(x, y) == Some(BinaryColor::On);
        queue!(self.out, MoveTo(0, 0))?;
        for y in (0..frame.height()).step_by(2) {
            let row: String = (0..frame.width())
                .map(|x| cell(lit(x, y), lit(x, y + 1)))
                .collect();
            writeln!(self.out, "{}", row)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Rewrites a binary PBM (P4) image on every frame.
///
/// Lit pixels are written white, so viewers show the frame the way the OLED
/// does. The file is replaced by rename, so readers never see half a frame.
#[derive(Debug, Clone)]
pub struct PbmSink {
    path: PathBuf,
}

impl PbmSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

pub fn encode_pbm(frame: &PixelBuffer) -> Vec<u8> {
    let header = format!("P4\n{} {}\n", frame.width(), frame.height());
    let mut out = Vec::with_capacity(header.len() + frame.as_bytes().len());
    out.extend_from_slice(header.as_bytes());
    // PBM: 1 is black.
    out.extend(frame.as_bytes().iter().map(|byte| !byte));
    out
}

impl DisplaySink for PbmSink {
    fn present(&mut self, frame: PixelBuffer) -> Result<(), SinkError> {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        fs::write(&staging, encode_pbm(&frame))?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

type BufferedSsd1306<DI> =
    Ssd1306<DI, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// A 128x64 SSD1306 panel on SPI or I2C.
pub struct Ssd1306Sink<DI> {
    display: BufferedSsd1306<DI>,
}

fn unavailable(device: impl Into<String>, reason: impl Debug) -> SinkError {
    SinkError::Unavailable {
        device: device.into(),
        reason: format!("{:?}", reason),
    }
}

fn bus_error(e: impl Debug) -> SinkError {
    SinkError::Bus(format!("{:?}", e))
}

/// Coordinates of the lit pixels, row by row.
fn lit_points(frame: &PixelBuffer) -> impl Iterator<Item = (u32, u32)> + '_ {
    (0..frame.height()).flat_map(move |y| {
        (0..frame.width())
            .filter(move |&x| frame.pixel(x, y) == Some(BinaryColor::On))
            .map(move |x| (x, y))
    })
}

impl<DI: WriteOnlyDataCommand> Ssd1306Sink<DI> {
    fn start(interface: DI) -> Result<Self, SinkError> {
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        display.init().map_err(bus_error)?;
        display.clear_buffer();
        display.flush().map_err(bus_error)?;
        Ok(Self { display })
    }
}

impl Ssd1306Sink<SPIInterface<SpidevDevice, SysfsPin>> {
    /// Open the panel on a spidev node with sysfs data/command and reset
    /// lines. The reset line is pulsed low before the controller is set up.
    pub fn open_spi(device: &str, dc_pin: u32, reset_pin: u32) -> Result<Self, SinkError> {
        let mut spi = SpidevDevice::open(device).map_err(|e| unavailable(device, e))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(SPI_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.0
            .configure(&options)
            .map_err(|e| unavailable(device, e))?;

        let dc = gpio::export(dc_pin, Direction::Out)
            .map_err(|e| unavailable(format!("GPIO {}", dc_pin), e))?;
        let reset = gpio::export(reset_pin, Direction::Out)
            .map_err(|e| unavailable(format!("GPIO {}", reset_pin), e))?;
        reset.set_value(0).map_err(bus_error)?;
        std::thread::sleep(reset_pulse());
        reset.set_value(1).map_err(bus_error)?;

        Self::start(SPIInterface::new(spi, dc))
    }
}

impl Ssd1306Sink<I2CInterface<I2cdev>> {
    /// Open the panel at its default address on an I2C bus.
    pub fn open_i2c(device: &str) -> Result<Self, SinkError> {
        let i2c = I2cdev::new(device).map_err(|e| unavailable(device, e))?;
        Self::start(I2CDisplayInterface::new(i2c))
    }
}

impl<DI: WriteOnlyDataCommand + Send> DisplaySink for Ssd1306Sink<DI> {
    fn present(&mut self, frame: PixelBuffer) -> Result<(), SinkError> {
        self.display.clear_buffer();
        for (x, y) in lit_points(&frame) {
            self.display.set_pixel(x, y, true);
        }
        self.display.flush().map_err(bus_error)
    }
}
