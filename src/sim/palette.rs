//! Cycling hazard colour
//!
//! Starts pure red and drifts toward violet and back, one step per
//! `CyclePalette` trigger.

use serde::{Deserialize, Serialize};

use crate::renderer::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    increasing: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            r: 255,
            g: 0,
            b: 0,
            increasing: true,
        }
    }
}

impl Palette {
    /// One drift step. A step that would push blue out of range only flips
    /// the direction.
    pub fn step(&mut self) {
        let (mut r, mut b) = (self.r as i32, self.b as i32);
        if self.increasing {
            b += 5;
            r -= 3;
        } else {
            b -= 5;
            r += 3;
        }
        if b <= 0 || b >= 255 {
            self.increasing = !self.increasing;
            return;
        }
        self.r = r.clamp(0, 255) as u8;
        self.b = b as u8;
    }

    pub fn color(&self) -> Color {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_moves_toward_blue() {
        let mut palette = Palette::default();
        palette.step();
        assert_eq!((palette.r, palette.b), (252, 5));
    }

    #[test]
    fn test_cycle_reverses_at_blue_limit() {
        let mut palette = Palette::default();
        // 50 steps reach b = 250, the 51st flips direction
        for _ in 0..51 {
            palette.step();
        }
        assert_eq!((palette.r, palette.b), (105, 250));
        palette.step();
        assert_eq!((palette.r, palette.b), (108, 245));
    }

    #[test]
    fn test_cycle_bounces_off_low_limit() {
        let mut palette = Palette::default();
        for _ in 0..101 {
            palette.step();
        }
        // b would hit 0 on step 101, so it only flips
        assert_eq!((palette.r, palette.b), (252, 5));
        palette.step();
        assert_eq!((palette.r, palette.b), (249, 10));
    }
}
