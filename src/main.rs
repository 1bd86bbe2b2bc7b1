mod api;
mod config;
mod consts;
mod content;
mod coordinator;
mod devices;
mod dispatcher;
mod error_classifier;
mod events;
mod logging;
mod mode;
mod producers;
mod render;
mod runtime;
mod state;

use crate::api::{NewsClient, WeatherClient};
use crate::config::Config;
use crate::consts::dash_consts::panel;
use crate::content::TemperatureUnit;
use crate::devices::{
    ButtonInput, ConsoleButton, DisplaySink, PbmSink, Ssd1306Sink, SysfsButton, TerminalSink,
};
use crate::render::Renderer;
use crate::runtime::Dashboard;
use clap::{Parser, ValueEnum};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

/// How long to wait for blocking tasks (the mode button) after the dashboard stops.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    /// Draw in this terminal
    Terminal,
    /// Rewrite a PBM image file on every frame
    Pbm,
    /// SSD1306 panel on SPI, with data/command and reset GPIO lines
    Ssd1306Spi,
    /// SSD1306 panel on I2C
    Ssd1306I2c,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Clock, weather and headline dashboard for small monochrome displays
struct Args {
    /// OpenWeatherMap API key. Weather is not fetched without one.
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    weather_key: Option<String>,

    /// NewsAPI key. Headlines are not fetched without one.
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    news_key: Option<String>,

    /// JSON configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Latitude for the weather forecast.
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Longitude for the weather forecast.
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Temperature units to display.
    #[arg(long, value_enum)]
    units: Option<TemperatureUnit>,

    /// Where frames are shown.
    #[arg(long, value_enum, default_value_t = SinkKind::Terminal)]
    sink: SinkKind,

    /// Output file for the pbm sink.
    #[arg(long, value_name = "PATH", default_value = "oled-dash.pbm")]
    pbm_path: PathBuf,

    /// Bus device of the SSD1306 panel [default: /dev/spidev0.0 or /dev/i2c-1]
    #[arg(long, value_name = "PATH")]
    display_device: Option<String>,

    /// GPIO pin of the panel's data/command line (SPI only).
    #[arg(long, value_name = "PIN", default_value_t = panel::DC_PIN)]
    dc_pin: u32,

    /// GPIO pin of the panel's reset line (SPI only).
    #[arg(long, value_name = "PIN", default_value_t = panel::RESET_PIN)]
    reset_pin: u32,

    /// GPIO pin of the mode button (sysfs).
    #[arg(long, value_name = "PIN", conflicts_with = "console_button")]
    button_pin: Option<u32>,

    /// Use Enter on stdin as the mode button.
    #[arg(long)]
    console_button: bool,

    /// Exit after presenting this many frames.
    #[arg(long, value_name = "N")]
    max_frames: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(start(args));
    // A console button read can block forever; don't wait on it.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Treat empty keys (e.g. `WEATHER_API_KEY=`) as absent.
fn non_empty(key: Option<String>) -> Option<String> {
    key.filter(|k| !k.trim().is_empty())
}

/// Apply flags on top of the file configuration.
fn load_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
        None => Config::default(),
    };
    if let Some(latitude) = args.latitude {
        config.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        config.longitude = longitude;
    }
    if let Some(unit) = args.units {
        config.temperature.unit = unit;
    }
    config.validate()?;
    Ok(config)
}

/// Startup checks, then run until Ctrl+C, the frame limit, or a fatal error.
async fn start(args: Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args)?;
    let fonts = config
        .font_registry()
        .map_err(|e| format!("Invalid font table: {}", e))?;
    let renderer = Renderer::new(fonts);

    let weather = match non_empty(args.weather_key) {
        Some(key) => Some((WeatherClient::new()?, key)),
        None => None,
    };
    let news = match non_empty(args.news_key) {
        Some(key) => Some((
            NewsClient::new(config.news_country.clone(), config.max_headlines)?,
            key,
        )),
        None => None,
    };

    // Hardware first: a missing pin must fail before the terminal is taken over.
    let button: Option<Box<dyn ButtonInput>> = match args.button_pin {
        Some(pin) => Some(Box::new(
            SysfsButton::open(pin).map_err(|e| format!("Mode button: {}", e))?,
        )),
        None if args.console_button => Some(Box::new(ConsoleButton::stdin())),
        None => None,
    };

    let sink: Box<dyn DisplaySink> = match args.sink {
        SinkKind::Terminal => Box::new(TerminalSink::stdout()?),
        SinkKind::Pbm => Box::new(PbmSink::new(args.pbm_path)),
        SinkKind::Ssd1306Spi => {
            let device = args.display_device.as_deref().unwrap_or(panel::SPI_DEVICE);
            let display = Ssd1306Sink::open_spi(device, args.dc_pin, args.reset_pin)
                .map_err(|e| format!("Failed to open display: {}", e))?;
            Box::new(display)
        }
        SinkKind::Ssd1306I2c => {
            let device = args.display_device.as_deref().unwrap_or(panel::I2C_DEVICE);
            let display = Ssd1306Sink::open_i2c(device)
                .map_err(|e| format!("Failed to open display: {}", e))?;
            Box::new(display)
        }
    };

    let mut dashboard = Dashboard::new(config, renderer, sink).with_max_frames(args.max_frames);
    if let Some((client, key)) = weather {
        dashboard = dashboard.with_weather(Box::new(client), key);
    }
    if let Some((client, key)) = news {
        dashboard = dashboard.with_news(Box::new(client), key);
    }
    if let Some(input) = button {
        dashboard = dashboard.with_button(input);
    }

    info!("Starting oled-dash {}", env!("CARGO_PKG_VERSION"));
    tokio::select! {
        result = dashboard.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down..."),
    }
    Ok(())
}
