use std::ops::{Add, AddAssign, Mul};

/// Largest value a quantized channel can take, as declared in the
/// pixel-map header.
pub const MAX_CHANNEL_VALUE: u8 = 255;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RGBColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RGBColor {
    pub const fn new(r: f64, g: f64, b: f64) -> RGBColor {
        RGBColor { r, g, b }
    }

    pub const ZERO: RGBColor = RGBColor::new(0.0, 0.0, 0.0);
    pub const BLACK: RGBColor = RGBColor::ZERO;

    /// Clamps each channel to [0, 1] and quantizes to 8 bits, truncating.
    pub fn to_rgb8(self) -> [u8; 3] {
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }
}

fn quantize(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * MAX_CHANNEL_VALUE as f64) as u8
}

// componentwise
impl Mul for RGBColor {
    type Output = RGBColor;
    fn mul(self, other: RGBColor) -> RGBColor {
        RGBColor::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }
}

impl Mul<f64> for RGBColor {
    type Output = RGBColor;
    fn mul(self, other: f64) -> RGBColor {
        RGBColor::new(self.r * other, self.g * other, self.b * other)
    }
}

impl Mul<RGBColor> for f64 {
    type Output = RGBColor;
    fn mul(self, other: RGBColor) -> RGBColor {
        other * self
    }
}

impl Add for RGBColor {
    type Output = RGBColor;
    fn add(self, other: RGBColor) -> RGBColor {
        RGBColor::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl AddAssign for RGBColor {
    fn add_assign(&mut self, other: RGBColor) {
        *self = *self + other;
    }
}

impl From<[f64; 3]> for RGBColor {
    fn from(other: [f64; 3]) -> RGBColor {
        RGBColor::new(other[0], other[1], other[2])
    }
}
