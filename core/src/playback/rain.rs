//! Procedural cloud-and-rain animation
//!
//! Shown whenever no frame file could be loaded. The glyph is a small
//! two-line cloud with six rows of rain beneath it, all the same width.

use rand::Rng;

use crate::frames::{Frame, FrameColor};

/// The cloud motif drawn above the rain
pub const CLOUD: [&str; 2] = ["  (   ).  ", " (___(__) "];

/// Total rows in the glyph (cloud plus rain)
pub const GLYPH_ROWS: usize = 8;

/// Characters a rain cell can hold
pub const RAIN_CHARS: [char; 5] = ['\'', '`', '|', '.', '˙'];

/// Chance that a rain cell is filled on an animated tick
const RAIN_DENSITY: f64 = 0.6;

/// How the rain region is filled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RainMode {
    /// Random drops, redrawn every tick
    Animated,
    /// Fixed diagonal pattern
    Static,
}

/// Width of the glyph in columns
pub fn glyph_width() -> usize {
    CLOUD[0].chars().count()
}

/// Generate one frame of the procedural animation
///
/// Static mode ignores `rng` and always yields the same frame.
pub fn procedural_frame<R: Rng + ?Sized>(mode: RainMode, rng: &mut R) -> Frame {
    let width = glyph_width();
    let mut content = String::with_capacity(GLYPH_ROWS * (width + 1) * 2);

    for line in CLOUD {
        content.push_str(line);
        content.push('\n');
    }

    // Row numbers continue from the cloud so the static pattern lines up
    for row in CLOUD.len()..GLYPH_ROWS {
        for col in 0..width {
            let cell = match mode {
                RainMode::Animated if rng.gen_bool(RAIN_DENSITY) => {
                    RAIN_CHARS[rng.gen_range(0..RAIN_CHARS.len())]
                }
                RainMode::Animated => ' ',
                RainMode::Static if (row + col) % 3 == 0 => RAIN_CHARS[0],
                RainMode::Static => ' ',
            };
            content.push(cell);
        }
        content.push('\n');
    }

    Frame::new(content, FrameColor::Blue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_glyph_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let frame = procedural_frame(RainMode::Animated, &mut rng);
        let lines: Vec<&str> = frame.lines().collect();

        assert_eq!(lines.len(), GLYPH_ROWS);
        assert_eq!(&lines[..2], &CLOUD[..]);
        assert!(lines.iter().all(|l| l.chars().count() == glyph_width()));
    }

    #[test]
    fn test_animated_uses_rain_chars() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let frame = procedural_frame(RainMode::Animated, &mut rng);
            for line in frame.lines().skip(CLOUD.len()) {
                assert!(line.chars().all(|c| c == ' ' || RAIN_CHARS.contains(&c)));
            }
        }
    }

    #[test]
    fn test_static_is_deterministic() {
        let a = procedural_frame(RainMode::Static, &mut StdRng::seed_from_u64(1));
        let b = procedural_frame(RainMode::Static, &mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);

        let rain: Vec<&str> = a.lines().skip(CLOUD.len()).collect();
        assert_eq!(rain[0], " '  '  '  ");
        assert_eq!(rain[1], "'  '  '  '");
        assert_eq!(rain[2], "  '  '  ' ");
        assert_eq!(rain[3], " '  '  '  ");
    }
}
