//! Font registry
//!
//! Logical font names ("mt", "phage", ...) are bound to a family of
//! monospace bitmap faces once at startup. The table is immutable afterwards;
//! looking up a name that was never registered is a render-fatal error.

use super::RenderError;
use crate::content::{DISPLAY_FONT, TEXT_FONT};
use super::buffer::PixelBuffer;
use embedded_graphics::Drawable;
use embedded_graphics::mono_font::iso_8859_1::{
    FONT_5X8, FONT_6X10, FONT_6X12, FONT_6X13, FONT_6X13_BOLD, FONT_7X14, FONT_7X14_BOLD,
    FONT_9X15, FONT_9X15_BOLD, FONT_9X18, FONT_9X18_BOLD, FONT_10X20,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use embedded_graphics::text::{Baseline, Text};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use thiserror::Error;

/// Foreground for all text.
pub const FOREGROUND: BinaryColor = BinaryColor::On;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontError {
    #[error("font '{name}' uses unknown family '{family}' (expected one of: mono, mono-bold)")]
    UnknownFamily { name: String, family: String },

    #[error("no font is registered as '{0}'")]
    Missing(String),
}

/// Available face families. Faces are ordered by ascending pixel height.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FontFamily {
    Mono,
    MonoBold,
}

const MONO_FACES: &[&MonoFont<'static>] = &[
    &FONT_5X8, &FONT_6X10, &FONT_6X12, &FONT_6X13, &FONT_7X14, &FONT_9X15, &FONT_9X18,
    &FONT_10X20,
];

// No bold cut exists above 18px; 10x20 regular tops the family.
const MONO_BOLD_FACES: &[&MonoFont<'static>] = &[
    &FONT_6X13_BOLD,
    &FONT_7X14_BOLD,
    &FONT_9X15_BOLD,
    &FONT_9X18_BOLD,
    &FONT_10X20,
];

/// Logical fonts used by the content builder and the families behind them.
const DEFAULT_FONTS: [(&str, FontFamily); 2] = [
    (TEXT_FONT, FontFamily::Mono),
    (DISPLAY_FONT, FontFamily::MonoBold),
];

impl FontFamily {
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Mono => "mono",
            FontFamily::MonoBold => "mono-bold",
        }
    }

    fn faces(self) -> &'static [&'static MonoFont<'static>] {
        match self {
            FontFamily::Mono => MONO_FACES,
            FontFamily::MonoBold => MONO_BOLD_FACES,
        }
    }

    /// Tallest face no taller than `size` pixels, or the smallest face.
    pub fn face_for(self, size: f32) -> &'static MonoFont<'static> {
        let faces = self.faces();
        let limit = size.round().max(0.0) as u32;
        faces
            .iter()
            .rev()
            .find(|face| face.character_size.height <= limit)
            .copied()
            .unwrap_or(faces[0])
    }
}

impl FromStr for FontFamily {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mono" => Ok(FontFamily::Mono),
            "mono-bold" | "bold" => Ok(FontFamily::MonoBold),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FontRegistry {
    fonts: HashMap<String, FontFamily>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        let fonts = DEFAULT_FONTS
            .iter()
            .map(|(name, family)| (name.to_string(), *family))
            .collect();
        Self { fonts }
    }
}

/// The default registry as a config table.
pub fn default_font_table() -> BTreeMap<String, String> {
    DEFAULT_FONTS
        .iter()
        .map(|(name, family)| (name.to_string(), family.name().to_string()))
        .collect()
}

impl FontRegistry {
    /// Build the registry from a `name -> family` table.
    ///
    /// # Errors
    /// Returns `FontError::UnknownFamily` for the first entry naming a family
    /// that does not exist.
    pub fn from_table(table: &BTreeMap<String, String>) -> Result<Self, FontError> {
        let mut fonts = HashMap::with_capacity(table.len());
        for (name, family) in table {
            let parsed = family
                .parse::<FontFamily>()
                .map_err(|()| FontError::UnknownFamily {
                    name: name.clone(),
                    family: family.clone(),
                })?;
            fonts.insert(name.clone(), parsed);
        }
        Ok(Self { fonts })
    }

    /// Check that every name in `names` is registered.
    pub fn require(&self, names: &[&str]) -> Result<(), FontError> {
        match names.iter().find(|name| !self.fonts.contains_key(**name)) {
            Some(name) => Err(FontError::Missing(name.to_string())),
            None => Ok(()),
        }
    }

    pub fn resolve(
        &self,
        name: &str,
        size: f32,
    ) -> Result<&'static MonoFont<'static>, RenderError> {
        self.fonts
            .get(name)
            .map(|family| family.face_for(size))
            .ok_or_else(|| RenderError::UnknownFont(name.to_string()))
    }

    /// Draw `text` with its baseline at `origin`.
    pub fn rasterize(
        &self,
        name: &str,
        size: f32,
        text: &str,
        origin: Point,
        target: &mut PixelBuffer,
    ) -> Result<(), RenderError> {
        let face = self.resolve(name, size)?;
        let style = MonoTextStyle::new(face, FOREGROUND);
        // Drawing into a PixelBuffer cannot fail.
        let _ = Text::with_baseline(text, origin, style, Baseline::Alphabetic).draw(target);
        Ok(())
    }
}
