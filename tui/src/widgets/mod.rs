//! Custom widgets

mod content_block;
mod palette;

pub use content_block::{ContentBlock, ContentBlockState};
pub use palette::PaletteStrip;
