//! Animation playback: the frame state machine, the procedural rain shown
//! when no frames are loaded, and the palette strip.

mod engine;
mod palette;
mod rain;

pub use engine::{PlaybackEngine, PlaybackOptions, PlaybackState, TickOutcome, DEFAULT_RATE};
pub use palette::{palette_strip, static_palette, PaletteRows, SWATCHES};
pub use rain::{glyph_width, procedural_frame, RainMode, CLOUD, GLYPH_ROWS, RAIN_CHARS};
