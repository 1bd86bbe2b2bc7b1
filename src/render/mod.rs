//! Render pipeline
//!
//! Turns a [`ContentDocument`](crate::content::ContentDocument) into a
//! [`PixelBuffer`] sized for the panel.

pub mod buffer;
pub mod fonts;
pub mod pipeline;

pub use buffer::PixelBuffer;
pub use fonts::{FontError, FontRegistry};
pub use pipeline::Renderer;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A content line referenced a logical font that was never registered.
    #[error("Font '{0}' is not registered")]
    UnknownFont(String),
}
