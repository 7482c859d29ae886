//! Color mapping of entropy values, with [`ColorRamp`] and [`ColorScale`].

use plotters::style::RGBColor;

/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hue angle in degrees, `[0, 360)`.
    pub fn hue(&self) -> f64 {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        if delta == 0.0 {
            return 0.0;
        }
        let hue = if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        if hue < 0.0 {
            hue + 360.0
        } else {
            hue
        }
    }
}

impl From<Rgb> for RGBColor {
    fn from(color: Rgb) -> Self {
        RGBColor(color.r, color.g, color.b)
    }
}

pub const BLUE: Rgb = Rgb::new(0, 0, 255);
pub const GREEN: Rgb = Rgb::new(0, 128, 0);
pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
pub const RED: Rgb = Rgb::new(255, 0, 0);

/// A piecewise-linear color gradient over `[0, 1]`.
#[derive(Clone, Debug)]
pub struct ColorRamp {
    anchors: Vec<(f64, Rgb)>,
}

impl Default for ColorRamp {
    /// The blue → green → yellow → orange → red ramp, with evenly spaced anchors.
    fn default() -> Self {
        Self {
            anchors: vec![
                (0.0, BLUE),
                (0.25, GREEN),
                (0.5, YELLOW),
                (0.75, ORANGE),
                (1.0, RED),
            ],
        }
    }
}

impl ColorRamp {
    pub fn new() -> Self {
        Self::default()
    }

    /// The color at `position`, which is clamped to `[0, 1]`.
    pub fn color_at(&self, position: f64) -> Rgb {
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
        for pair in self.anchors.windows(2) {
            let (start, low) = pair[0];
            let (end, high) = pair[1];
            if position <= end {
                let t = (position - start) / (end - start);
                return Rgb::new(
                    lerp(low.r, high.r, t),
                    lerp(low.g, high.g, t),
                    lerp(low.b, high.b, t),
                );
            }
        }
        // only reached for ramps with fewer than two anchors
        self.anchors.last().map_or(Rgb::new(0, 0, 0), |(_, c)| *c)
    }
}

fn lerp(low: u8, high: u8, t: f64) -> u8 {
    let value = low as f64 + (high as f64 - low as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}

/// Maps entropy values in `[0, max]` onto a [`ColorRamp`].
#[derive(Clone, Debug)]
pub struct ColorScale {
    ramp: ColorRamp,
    max: f64,
}

impl ColorScale {
    pub fn new(ramp: ColorRamp, max: f64) -> Self {
        Self { ramp, max }
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// The ramp position of `value`, clamped to `[0, 1]`. With a zero maximum,
    /// every value maps to `0`.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max > 0.0 {
            (value / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn color(&self, value: f64) -> Rgb {
        self.ramp.color_at(self.normalize(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_anchor_colors() {
        let ramp = ColorRamp::new();
        assert_eq!(ramp.color_at(0.0), BLUE);
        assert_eq!(ramp.color_at(0.25), GREEN);
        assert_eq!(ramp.color_at(0.5), YELLOW);
        assert_eq!(ramp.color_at(0.75), ORANGE);
        assert_eq!(ramp.color_at(1.0), RED);
    }

    #[test]
    fn test_hue_progression_is_monotonic() {
        let ramp = ColorRamp::new();
        let hues: Vec<f64> = (0..=100)
            .map(|i| ramp.color_at(i as f64 / 100.0).hue())
            .collect();
        for pair in hues.windows(2) {
            assert!(pair[1] <= pair[0], "hue increased: {:?}", pair);
        }
        assert_eq!(hues[0], 240.0);
        assert_eq!(hues[100], 0.0);
    }

    #[test]
    fn test_interpolation_and_clamping() {
        let ramp = ColorRamp::new();
        assert_eq!(ramp.color_at(0.125), Rgb::new(0, 64, 128));
        assert_eq!(ramp.color_at(-3.0), BLUE);
        assert_eq!(ramp.color_at(7.0), RED);
        assert_eq!(ramp.color_at(f64::NAN), BLUE);
    }

    #[test]
    fn test_color_scale() {
        let scale = ColorScale::new(ColorRamp::new(), 0.4);
        assert_eq!(scale.color(0.0), BLUE);
        assert_eq!(scale.color(0.2), YELLOW);
        assert_eq!(scale.color(0.4), RED);
        assert_eq!(scale.color(1.0), RED);

        let flat = ColorScale::new(ColorRamp::new(), 0.0);
        assert_eq!(flat.color(0.0), BLUE);
    }
}
