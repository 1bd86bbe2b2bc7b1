use super::RenderError;
use super::buffer::PixelBuffer;
use super::fonts::FontRegistry;
use crate::consts::dash_consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::content::ContentDocument;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;

pub const BACKGROUND: BinaryColor = BinaryColor::Off;

/// Lines below this size get extra spacing underneath.
const PADDED_BELOW_SIZE: f32 = 20.0;
const SMALL_LINE_PADDING: f32 = 2.0;

/// Stacks text lines top to bottom, left aligned.
#[derive(Debug, Clone)]
pub struct Renderer {
    fonts: FontRegistry,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(fonts: FontRegistry) -> Self {
        Self::with_size(fonts, DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }

    pub fn with_size(fonts: FontRegistry, width: u32, height: u32) -> Self {
        Self {
            fonts,
            width,
            height,
        }
    }

    /// Render a fresh frame. The document is consumed.
    ///
    /// # Errors
    /// `RenderError::UnknownFont` if any line names an unregistered font.
    pub fn render(&self, document: ContentDocument) -> Result<PixelBuffer, RenderError> {
        let mut frame = PixelBuffer::new(self.width, self.height);
        frame.fill(BACKGROUND);

        let mut baseline = 0.0_f32;
        for line in document.lines {
            baseline += line.size / 1.2;
            self.fonts.rasterize(
                &line.font,
                line.size,
                &line.text,
                Point::new(0, baseline.round() as i32),
                &mut frame,
            )?;
            if line.size < PADDED_BELOW_SIZE {
                baseline += SMALL_LINE_PADDING;
            }
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBuilder, TextLine};
    use crate::mode::Mode;
    use crate::state::DisplayState;

    #[test]
    // An empty document still yields a full-size, background-only frame.
    fn test_empty_document_renders_background() {
        let frame = Renderer::new(FontRegistry::default())
            .render(ContentDocument::default())
            .unwrap();
        assert_eq!((frame.width(), frame.height()), (128, 64));
        assert_eq!(frame.lit_pixels(), 0);
    }

    #[test]
    // Output size does not depend on how much text there is.
    fn test_dimensions_fixed() {
        let renderer = Renderer::new(FontRegistry::default());
        let long = ContentDocument {
            lines: (0..20)
                .map(|i| TextLine::new(format!("A very long line number {}", i), "mt", 14.0))
                .collect(),
        };
        let frame = renderer.render(long).unwrap();
        assert_eq!((frame.width(), frame.height()), (128, 64));
    }

    #[test]
    // Frames never accumulate: each render starts from a blank buffer.
    fn test_no_ghosting_between_frames() {
        let renderer = Renderer::new(FontRegistry::default());
        let busy = ContentDocument {
            lines: vec![TextLine::new("########", "phage", 26.0)],
        };
        let quiet = ContentDocument {
            lines: vec![TextLine::new(".", "mt", 10.0)],
        };
        let busy_frame = renderer.render(busy).unwrap();
        let quiet_frame = renderer.render(quiet.clone()).unwrap();
        assert!(busy_frame.lit_pixels() > quiet_frame.lit_pixels());
        assert_eq!(quiet_frame, renderer.render(quiet).unwrap());
    }

    #[test]
    fn test_unknown_font_fails() {
        let renderer = Renderer::new(FontRegistry::default());
        let doc = ContentDocument {
            lines: vec![TextLine::new("x", "nope", 12.0)],
        };
        assert!(matches!(renderer.render(doc), Err(RenderError::UnknownFont(_))));
    }

    #[test]
    fn test_every_mode_renders() {
        let renderer = Renderer::new(FontRegistry::default());
        let builder = ContentBuilder::default();
        let state = DisplayState::new();
        for mode in Mode::ALL {
            let frame = renderer.render(builder.build(&state, mode)).unwrap();
            assert!(frame.lit_pixels() > 0, "{} drew nothing", mode);
        }
    }
}
