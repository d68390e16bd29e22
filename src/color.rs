/// Color utilities for elements and UI.
use rand::RngExt;

use crate::types::Rgb;

/// Generate a random display color. Draws are independent, so two elements
/// may end up with the same color.
pub fn random_color() -> Rgb {
    let mut rng = rand::rng();
    let value: u32 = rng.random_range(0..=0xFF_FFFF);
    Rgb {
        r: (value >> 16) as u8,
        g: (value >> 8) as u8,
        b: value as u8,
    }
}
