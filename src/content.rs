//! Content builder
//!
//! Projects a display-state snapshot and the active mode into the list of
//! styled text lines the renderer draws. Building is pure: the same inputs
//! always produce the same document, and every mode yields at least one line.

use crate::consts::dash_consts::clock::TIME_FORMAT;
use crate::consts::dash_consts::{
    DISPLAY_WIDTH, PLACEHOLDER_HEADLINES, PLACEHOLDER_TEMPERATURE, PLACEHOLDER_WEATHER,
};
use crate::mode::Mode;
use crate::state::DisplayState;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Logical font used for ordinary text lines.
pub const TEXT_FONT: &str = "mt";

/// Logical font used for the large clock and temperature.
pub const DISPLAY_FONT: &str = "phage";

/// Text lines available below the headline title.
const HEADLINE_BODY_LINES: usize = 4;

/// Lines one headline may wrap onto.
const HEADLINE_WRAP_LINES: usize = 2;

/// Characters per line for headline text (`mt` at 10px is 6px wide).
const HEADLINE_COLUMNS: usize = (DISPLAY_WIDTH / 6) as usize;

/// Seconds before the headline screen moves on by one story.
const HEADLINE_DWELL_SECS: u32 = 5;

/// One line of text with the font it should be drawn in.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Logical font name, resolved by the font registry at render time.
    pub font: String,
    /// Point size (72 DPI, so also the pixel height).
    pub size: f32,
}

impl TextLine {
    pub fn new(text: impl Into<String>, font: &str, size: f32) -> Self {
        Self {
            text: text.into(),
            font: font.to_string(),
            size,
        }
    }
}

/// Render-ready description of one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentDocument {
    pub lines: Vec<TextLine>,
}

impl ContentDocument {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    /// Fahrenheit followed by Celsius.
    #[default]
    Both,
}

/// How temperatures are presented.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureFormat {
    pub unit: TemperatureUnit,
    /// Digits after the decimal point.
    pub precision: usize,
}

impl Default for TemperatureFormat {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::Both,
            precision: 1,
        }
    }
}

impl TemperatureFormat {
    pub fn format(&self, celsius: f64) -> String {
        let p = self.precision;
        let fahrenheit = celsius * 1.8 + 32.0;
        match self.unit {
            TemperatureUnit::Celsius => format!("{:.p$}°C", celsius),
            TemperatureUnit::Fahrenheit => format!("{:.p$}°F", fahrenheit),
            TemperatureUnit::Both => format!("{:.p$}°F {:.p$}°C", fahrenheit, celsius),
        }
    }

    /// Single-unit rendering for the large weather view. `Both` shows Celsius.
    pub fn format_compact(&self, celsius: f64) -> String {
        match self.unit {
            TemperatureUnit::Fahrenheit => self.format(celsius),
            TemperatureUnit::Celsius | TemperatureUnit::Both => TemperatureFormat {
                unit: TemperatureUnit::Celsius,
                precision: self.precision,
            }
            .format(celsius),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentBuilder {
    temperature: TemperatureFormat,
}

impl ContentBuilder {
    pub fn new(temperature: TemperatureFormat) -> Self {
        Self { temperature }
    }

    pub fn build(&self, state: &DisplayState, mode: Mode) -> ContentDocument {
        let lines = match mode {
            Mode::Default => self.default_lines(state),
            Mode::Weather => self.weather_lines(state),
            Mode::Headlines => headline_lines(state),
            Mode::Time => time_lines(state),
        };
        ContentDocument { lines }
    }

    fn default_lines(&self, state: &DisplayState) -> Vec<TextLine> {
        let (summary, temperature) = match &state.weather {
            Some(weather) => (
                weather.summary.clone(),
                self.temperature.format(weather.temperature_c),
            ),
            None => (
                PLACEHOLDER_WEATHER.to_string(),
                PLACEHOLDER_TEMPERATURE.to_string(),
            ),
        };
        vec![
            TextLine::new(state.date.as_str(), TEXT_FONT, 14.0),
            TextLine::new(summary, TEXT_FONT, 12.0),
            TextLine::new(temperature, TEXT_FONT, 14.0),
            TextLine::new(state.time.as_str(), DISPLAY_FONT, 26.0),
        ]
    }

    fn weather_lines(&self, state: &DisplayState) -> Vec<TextLine> {
        match &state.weather {
            Some(weather) => vec![
                TextLine::new(weather.summary.as_str(), TEXT_FONT, 12.0),
                TextLine::new(
                    self.temperature.format_compact(weather.temperature_c),
                    DISPLAY_FONT,
                    18.0,
                ),
                TextLine::new(
                    format!("Updated {}", weather.fetched_at.format("%H:%M")),
                    TEXT_FONT,
                    10.0,
                ),
            ],
            None => vec![
                TextLine::new(PLACEHOLDER_WEATHER, TEXT_FONT, 12.0),
                TextLine::new(PLACEHOLDER_TEMPERATURE, DISPLAY_FONT, 18.0),
            ],
        }
    }
}

/// Greedy word wrap to `columns` characters. Words longer than a line are
/// split; text past `max_lines` is cut and the last line ends in "...".
fn wrap(text: &str, columns: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let used = current.chars().count();
            let len = word.chars().count();
            if used == 0 && len > columns {
                let split = word.char_indices().nth(columns).map_or(word.len(), |(i, _)| i);
                lines.push(word[..split].to_string());
                word = &word[split..];
            } else if used == 0 {
                current.push_str(word);
                break;
            } else if used + 1 + len <= columns {
                current.push(' ');
                current.push_str(word);
                break;
            } else {
                lines.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let kept: String = last.chars().take(columns.saturating_sub(3)).collect();
            *last = format!("{}...", kept.trim_end());
        }
    }
    lines
}

/// Index of the first story to show, stepping every `HEADLINE_DWELL_SECS`
/// of the displayed time. Placeholder time shows the first story.
fn headline_rotation(time: &str) -> usize {
    NaiveTime::parse_from_str(time, TIME_FORMAT)
        .map(|t| (t.num_seconds_from_midnight() / HEADLINE_DWELL_SECS) as usize)
        .unwrap_or(0)
}

fn headline_lines(state: &DisplayState) -> Vec<TextLine> {
    let mut lines = vec![TextLine::new("Headlines", DISPLAY_FONT, 13.0)];
    if state.news.is_empty() {
        lines.push(TextLine::new(PLACEHOLDER_HEADLINES, TEXT_FONT, 10.0));
        return lines;
    }

    let start = headline_rotation(&state.time) % state.news.len();
    let mut budget = HEADLINE_BODY_LINES;
    for headline in state.news.iter().cycle().skip(start).take(state.news.len()) {
        if budget == 0 {
            break;
        }
        let wrapped = wrap(headline, HEADLINE_COLUMNS, budget.min(HEADLINE_WRAP_LINES));
        budget -= wrapped.len();
        lines.extend(wrapped.into_iter().map(|text| TextLine::new(text, TEXT_FONT, 10.0)));
    }
    lines
}

fn time_lines(state: &DisplayState) -> Vec<TextLine> {
    vec![
        TextLine::new(state.date.as_str(), TEXT_FONT, 12.0),
        TextLine::new(state.time.as_str(), DISPLAY_FONT, 26.0),
    ]
}
