//! Colours for capacity bands.

use plotters::style::RGBColor;

/// Width of one capacity band (MCM).
pub const BAND_WIDTH: f64 = 0.5;

/// Band colours from the lowest (0.0 - 0.5 MCM) to the highest (2.5 MCM and up).
pub const BAND_COLORS: [RGBColor; 6] = [
    RGBColor(0xAD, 0xD8, 0xE6),
    RGBColor(0x87, 0xCE, 0xEB),
    RGBColor(0x4D, 0x94, 0xDB),
    RGBColor(0x00, 0x66, 0xCC),
    RGBColor(0x00, 0x47, 0xAB),
    RGBColor(0x00, 0x00, 0x8B),
];

/// Index of the band `threshold` falls in; a threshold on a band edge
/// belongs to the band above it.
pub fn band_index(threshold: f64) -> usize {
    if !(threshold > 0.0) {
        return 0;
    }
    ((threshold / BAND_WIDTH + 1e-9).floor() as usize).min(BAND_COLORS.len() - 1)
}

pub fn band_color(threshold: f64) -> RGBColor {
    BAND_COLORS[band_index(threshold)]
}

/// Mix 70% of `color` with 30% white, for table cells holding dark text.
pub fn lighten(color: RGBColor) -> RGBColor {
    let mix = |c: u8| (c as f64 * 0.7 + 255.0 * 0.3) as u8;
    RGBColor(mix(color.0), mix(color.1), mix(color.2))
}

/// Background of table row `row`, alternating off-white and white.
pub fn row_background(row: usize) -> RGBColor {
    if row % 2 == 0 {
        RGBColor(0xFA, 0xFA, 0xFA)
    } else {
        RGBColor(0xFF, 0xFF, 0xFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_color() {
        assert_eq!(band_color(0.1), RGBColor(0xAD, 0xD8, 0xE6));
        assert_eq!(band_color(0.4), RGBColor(0xAD, 0xD8, 0xE6));
        assert_eq!(band_color(0.5), RGBColor(0x87, 0xCE, 0xEB));
        assert_eq!(band_color(1.0), RGBColor(0x4D, 0x94, 0xDB));
        assert_eq!(band_color(2.4), RGBColor(0x00, 0x47, 0xAB));
        assert_eq!(band_color(2.5), RGBColor(0x00, 0x00, 0x8B));
        assert_eq!(band_color(3.0), RGBColor(0x00, 0x00, 0x8B));
        assert_eq!(band_index(f64::NAN), 0);
    }

    #[test]
    fn test_lighten() {
        // int(0 * 0.7 + 76.5) = 76, int(139 * 0.7 + 76.5) = 173
        assert_eq!(lighten(RGBColor(0x00, 0x00, 0x8B)), RGBColor(76, 76, 173));
        assert_eq!(lighten(RGBColor(0xAD, 0xD8, 0xE6)), RGBColor(197, 227, 237));
    }
}
