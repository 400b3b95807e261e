/// RGB colors and linear interpolation between them
use rand::Rng;
use std::ops::{Add, Mul, Sub};

/// A color with normalized floating-point channels.
///
/// Channels are not clamped; arithmetic may leave the [0, 1] range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Draw each channel independently and uniformly from [0, 1)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            red: rng.gen::<f32>(),
            green: rng.gen::<f32>(),
            blue: rng.gen::<f32>(),
        }
    }

    pub fn subtract(self, other: Color) -> Color {
        Color::new(
            self.red - other.red,
            self.green - other.green,
            self.blue - other.blue,
        )
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Color) -> Color {
        self + other
    }

    pub fn scale(self, factor: f32) -> Color {
        Color::new(self.red * factor, self.green * factor, self.blue * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.red, self.green, self.blue]
    }

    /// Quantize to 8-bit channels, clamping out-of-range values
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (quantize(self.red), quantize(self.green), quantize(self.blue))
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(
            self.red + rhs.red,
            self.green + rhs.green,
            self.blue + rhs.blue,
        )
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        self.subtract(rhs)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Color {
        self.scale(rhs)
    }
}

/// Straight-line blend from one color to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorInterpolation {
    start: Color,
    delta: Color,
}

impl ColorInterpolation {
    pub fn new(start: Color, end: Color) -> Self {
        Self {
            start,
            delta: end - start,
        }
    }

    /// Color at `percent` of the way from start to end
    pub fn interpolate(&self, percent: f32) -> Color {
        self.start + self.delta * percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_componentwise_arithmetic() {
        let a = Color::new(0.5, 0.25, 1.0);
        let b = Color::new(0.25, 0.5, 0.5);

        assert_eq!(a.subtract(b), Color::new(0.25, -0.25, 0.5));
        assert_eq!(a + b, Color::new(0.75, 0.75, 1.5));
        assert_eq!(a * 2.0, Color::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_random_channels_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let c = Color::random(&mut rng);
            for channel in c.to_array() {
                assert!((0.0..1.0).contains(&channel));
            }
        }
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let a = Color::random(&mut StdRng::seed_from_u64(42));
        let b = Color::random(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_interpolation_endpoints() {
        let start = Color::new(0.25, 0.5, 0.75);
        let end = Color::new(1.0, 0.125, 0.5);
        let lerp = ColorInterpolation::new(start, end);

        assert_eq!(lerp.interpolate(0.0), start);
        assert_eq!(lerp.interpolate(1.0), end);
        assert_eq!(lerp.interpolate(0.5), Color::new(0.625, 0.3125, 0.625));
    }

    #[test]
    fn test_rgb8_clamps() {
        assert_eq!(Color::new(-0.5, 0.5, 2.0).to_rgb8(), (0, 128, 255));
    }
}
