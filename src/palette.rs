//! Seeded color generation for category overlays.
//!
//! Colors are drawn the way randomcolor does it: a random hue over the whole
//! wheel with saturation and brightness kept in a range that stays readable
//! on a light basemap. The same seed always yields the same sequence, across
//! `rand` releases too, since ChaCha8's stream is fixed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SATURATION_RANGE: (f64, f64) = (0.55, 1.0);
const VALUE_RANGE: (f64, f64) = (0.5, 1.0);

pub struct ColorGenerator {
    rng: ChaCha8Rng,
}

impl ColorGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn next_rgb(&mut self) -> [u8; 3] {
        let h = self.rng.gen_range(0.0..360.0);
        let s = self.rng.gen_range(SATURATION_RANGE.0..=SATURATION_RANGE.1);
        let v = self.rng.gen_range(VALUE_RANGE.0..=VALUE_RANGE.1);
        hsv_to_rgb(h, s, v)
    }

    /// `count` hex colors (`#rrggbb`).
    pub fn generate(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| to_hex(self.next_rgb())).collect()
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let c = v * s;
    let h_prime = (h % 360.0) / 60.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some([r, g, b])
    }

    #[test]
    fn test_same_seed_same_colors() {
        let first = ColorGenerator::new(10).generate(12);
        let second = ColorGenerator::new(10).generate(12);
        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
    }

    #[test]
    fn test_different_seed_different_colors() {
        let a = ColorGenerator::new(10).generate(8);
        let b = ColorGenerator::new(11).generate(8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_colors_are_hex_and_not_washed_out() {
        for color in ColorGenerator::new(10).generate(64) {
            assert_eq!(color.len(), 7);
            let [r, g, b] = hex_to_rgb(&color).unwrap();
            let max = r.max(g).max(b);
            // value >= 0.5
            assert!(max >= 127, "{} is too dark", color);
        }
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), [0, 0, 255]);
        assert_eq!(to_hex([255, 128, 0]), "#ff8000");
        assert_eq!(hex_to_rgb("#ff8000"), Some([255, 128, 0]));
        assert_eq!(hex_to_rgb("nope"), None);
    }
}
