pub mod dash_consts {
    //! Dashboard Configuration Constants
    //!
    //! Defaults for every tunable of the dashboard, grouped by the stage of
    //! the pipeline that consumes them. Values here are what the JSON config
    //! file falls back to when a field is absent.

    // =============================================================================
    // CHANNEL CONFIGURATION
    // =============================================================================

    /// Buffer size for each producer -> coordinator stream
    pub const PRODUCER_QUEUE_SIZE: usize = 16;

    /// Buffer size for mode-advance signals from the button
    pub const MODE_QUEUE_SIZE: usize = 8;

    /// Rendered frames waiting for the output sink. One slot: a frame is handed
    /// over wholesale and the dispatcher waits if the sink is still busy.
    pub const FRAME_QUEUE_SIZE: usize = 1;

    // =============================================================================
    // DISPLAY GEOMETRY
    // =============================================================================

    /// Panel width in pixels (SSD1306 class OLED)
    pub const DISPLAY_WIDTH: u32 = 128;

    /// Panel height in pixels
    pub const DISPLAY_HEIGHT: u32 = 64;

    // =============================================================================
    // PLACEHOLDERS
    // =============================================================================

    /// Shown until the first clock tick arrives
    pub const PLACEHOLDER_TIME: &str = "New Time";

    /// Shown until the first day boundary is observed
    pub const PLACEHOLDER_DATE: &str = "New Date";

    /// Shown while no weather snapshot has been received
    pub const PLACEHOLDER_WEATHER: &str = "No weather yet";

    /// Shown in place of a temperature while no weather snapshot exists
    pub const PLACEHOLDER_TEMPERATURE: &str = "--.-";

    /// Shown in headline mode while the news stream is empty
    pub const PLACEHOLDER_HEADLINES: &str = "No headlines";

    // =============================================================================
    // CLOCK
    // =============================================================================

    pub mod clock {
        /// Heartbeat interval (milliseconds)
        pub const TICK_INTERVAL_MS: u64 = 100;

        /// strftime pattern for the time field
        pub const TIME_FORMAT: &str = "%H:%M:%S";

        /// strftime pattern for the date field, e.g. "Mon Jan 2 2006"
        pub const DATE_FORMAT: &str = "%a %b %-d %Y";
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Weather fetching schedule
    pub mod weather {
        /// Interval between weather fetches (seconds)
        /// Ten minutes keeps well inside free-tier rate limits
        pub const FETCH_INTERVAL_SECS: u64 = 600;

        /// Default location (latitude)
        pub const DEFAULT_LATITUDE: f64 = 47.5566;

        /// Default location (longitude)
        pub const DEFAULT_LONGITUDE: f64 = -122.3760;

        /// OpenWeatherMap current conditions endpoint
        pub const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
    }

    /// Headline fetching schedule
    pub mod news {
        /// Interval between headline fetches (seconds)
        pub const FETCH_INTERVAL_SECS: u64 = 900;

        /// Country passed to the headline endpoint
        pub const DEFAULT_COUNTRY: &str = "us";

        /// Headlines kept from each fetch
        pub const MAX_HEADLINES: usize = 10;

        /// NewsAPI top headlines endpoint
        pub const API_URL: &str = "https://newsapi.org/v2/top-headlines";
    }

    /// Shared HTTP client settings
    pub mod http {
        use std::time::Duration;

        /// Per-request timeout (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // HARDWARE
    // =============================================================================

    /// Default wiring of the SSD1306 panel
    pub mod panel {
        use std::time::Duration;

        /// SPI device node
        pub const SPI_DEVICE: &str = "/dev/spidev0.0";

        /// I2C bus device node
        pub const I2C_DEVICE: &str = "/dev/i2c-1";

        /// SPI clock (Hz)
        pub const SPI_SPEED_HZ: u32 = 8_000_000;

        /// Data/command select line
        pub const DC_PIN: u32 = 23;

        /// Reset line, held low for `RESET_PULSE_MS` at startup
        pub const RESET_PIN: u32 = 24;

        pub const RESET_PULSE_MS: u64 = 500;

        pub const fn reset_pulse() -> Duration {
            Duration::from_millis(RESET_PULSE_MS)
        }
    }
}
