//! Palette strip
//!
//! Two rows of eight ANSI color swatches. The animated strip is a pure
//! function of the time elapsed since playback started: two sine waves run
//! across the rows in opposite directions and each swatch picks its color
//! set from the wave's intensity at its position.

use std::f64::consts::TAU;
use std::time::Duration;

/// Swatches per row
pub const SWATCHES: usize = 8;

/// Two rows of ANSI color indices
pub type PaletteRows = [[u8; SWATCHES]; 2];

const TOP_LOW: [u8; SWATCHES] = [1, 2, 3, 4, 5, 6, 8, 9];
const TOP_HIGH: [u8; SWATCHES] = [10, 11, 12, 13, 14, 15, 9, 10];

const BOTTOM_LOW: [u8; SWATCHES] = [8, 9, 10, 11, 12, 13, 14, 15];
const BOTTOM_MID: [u8; SWATCHES] = [11, 12, 13, 14, 15, 9, 10, 11];
const BOTTOM_HIGH: [u8; SWATCHES] = [2, 3, 4, 5, 6, 8, 9, 1];

/// Wave intensity in `[0, 1]` for a position on the unit circle
fn intensity(turns: f64) -> f64 {
    ((turns * TAU).sin() + 1.0) / 2.0
}

/// Pick from three color sets by intensity band
fn band(intensity: f64, low: u8, mid: u8, high: u8) -> u8 {
    if intensity < 0.33 {
        low
    } else if intensity < 0.66 {
        mid
    } else {
        high
    }
}

/// Animated palette at `elapsed` since playback start
pub fn palette_strip(elapsed: Duration) -> PaletteRows {
    let phase = (elapsed.as_secs_f64() * 1.5).sin() * 0.5 + 0.5;
    let mut rows = [[0u8; SWATCHES]; 2];

    for i in 0..SWATCHES {
        let top = intensity(i as f64 / SWATCHES as f64 + phase);
        rows[0][i] = band(top, TOP_LOW[i], 8 + i as u8, TOP_HIGH[i]);

        let bottom = intensity((SWATCHES - 1 - i) as f64 / SWATCHES as f64 + phase * 1.3 + 0.7);
        rows[1][i] = band(bottom, BOTTOM_LOW[i], BOTTOM_MID[i], BOTTOM_HIGH[i]);
    }

    rows
}

/// Fixed palette for static mode: colors 1..=8 and 9..=16
pub fn static_palette() -> PaletteRows {
    let mut rows = [[0u8; SWATCHES]; 2];
    for i in 0..SWATCHES {
        rows[0][i] = i as u8 + 1;
        rows[1][i] = i as u8 + 9;
    }
    rows
}
