//! Color data types. This module is private but reexported by its parent.

use core::fmt;
use core::ops::Mul;

/// A floating-point RGBA color value.
///
/// * Each component is nominally in the range 0 to 1, but this is not enforced;
///   out-of-range values are preserved rather than clipped.
/// * The alpha is not premultiplied.
/// * No color space conversion is ever applied; components are stored and exported
///   exactly as given (`component × 255` for 8-bit export).
#[derive(Clone, Copy, PartialEq)]
pub struct Rgba {
    red: f32,
    green: f32,
    blue: f32,
    alpha: f32,
}

impl Rgba {
    /// Transparent black (all components zero); identical to
    /// `Rgba::new(0.0, 0.0, 0.0, 0.0)` except for being a constant.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    /// Black; identical to `Rgba::new(0.0, 0.0, 0.0, 1.0)` except for being a constant.
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    /// White; identical to `Rgba::new(1.0, 1.0, 1.0, 1.0)` except for being a constant.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Constructs a color from components. No range checks are performed.
    #[inline]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Constructs an opaque shade of gray (components all equal).
    #[inline]
    pub const fn from_luminance(luminance: f32) -> Self {
        Self::new(luminance, luminance, luminance, 1.0)
    }

    /// Converts hue, saturation, and value to an opaque color.
    ///
    /// * `hue` is in degrees and must be in the range `0.0..360.0`; the result for other
    ///   values is unspecified, so callers must normalize it first.
    /// * `saturation` and `value` are nominally in the range `0.0..=1.0`.
    ///
    /// A `saturation` of zero produces the gray `value` regardless of `hue`.
    ///
    /// ```
    /// # extern crate sproxel_base as sproxel;
    /// use sproxel::math::Rgba;
    ///
    /// assert_eq!(Rgba::from_hsv(0.0, 1.0, 1.0), Rgba::new(1.0, 0.0, 0.0, 1.0));
    /// assert_eq!(Rgba::from_hsv(120.0, 1.0, 1.0), Rgba::new(0.0, 1.0, 0.0, 1.0));
    /// assert_eq!(Rgba::from_hsv(33.0, 0.0, 0.25), Rgba::from_luminance(0.25));
    /// ```
    #[inline]
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        if saturation == 0.0 {
            return Self::from_luminance(value);
        }

        let part = hue / 60.0;
        let sextant = libm::floorf(part);
        let fraction = part - sextant;
        let c0 = value * (1.0 - saturation);
        let c1 = value * (1.0 - saturation * fraction);
        let c2 = value * (1.0 - saturation * (1.0 - fraction));

        let (r, g, b) = match sextant as i32 {
            0 => (value, c2, c0),
            1 => (c1, value, c0),
            2 => (c0, value, c2),
            3 => (c0, c1, value),
            4 => (c2, c0, value),
            _ => (value, c0, c1),
        };
        Self::new(r, g, b, 1.0)
    }

    /// Returns the red color component.
    #[inline]
    pub const fn red(self) -> f32 {
        self.red
    }
    /// Returns the green color component.
    #[inline]
    pub const fn green(self) -> f32 {
        self.green
    }
    /// Returns the blue color component.
    #[inline]
    pub const fn blue(self) -> f32 {
        self.blue
    }
    /// Returns the alpha component.
    ///
    /// Note that the RGB components are not premultiplied by alpha.
    #[inline]
    pub const fn alpha(self) -> f32 {
        self.alpha
    }

    /// Returns whether this color is fully transparent, or has an alpha component of
    /// zero or less.
    #[inline]
    pub fn fully_transparent(self) -> bool {
        self.alpha <= 0.0
    }

    /// Converts 8-bits-per-component color to [`Rgba`] by dividing each component by 255.
    ///
    /// This is the exact inverse of [`Rgba::to_8bit_truncated()`] for every input.
    #[inline]
    pub fn from_8bit(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba.map(|c| f32::from(c) / 255.0);
        Self::new(r, g, b, a)
    }

    /// Converts this color to 8-bits-per-component color by multiplying each component
    /// by 255 and truncating toward zero.
    ///
    /// There is deliberately no rounding: `0.999 / 255` becomes 0, not 1.
    /// Components outside of the representable range saturate to 0 or 255.
    ///
    /// ```
    /// # extern crate sproxel_base as sproxel;
    /// use sproxel::math::Rgba;
    ///
    /// assert_eq!(Rgba::new(0.5, 1.0, 0.0, 0.999).to_8bit_truncated(), [127, 255, 0, 254]);
    /// assert_eq!(Rgba::new(-1.0, 2.0, 0.0, 1.0).to_8bit_truncated(), [0, 255, 0, 255]);
    /// ```
    #[inline]
    pub fn to_8bit_truncated(self) -> [u8; 4] {
        // `as u8` truncates toward zero and saturates.
        <[f32; 4]>::from(self * 255.0).map(|c| c as u8)
    }
}

impl From<[f32; 4]> for Rgba {
    #[inline]
    fn from([red, green, blue, alpha]: [f32; 4]) -> Self {
        Self::new(red, green, blue, alpha)
    }
}

impl From<Rgba> for [f32; 4] {
    #[inline]
    fn from(value: Rgba) -> Self {
        [value.red, value.green, value.blue, value.alpha]
    }
}

/// Multiplies every component of this color value, including alpha, by a scalar.
impl Mul<f32> for Rgba {
    type Output = Self;
    /// Multiplies every component of this color value, including alpha, by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(
            self.red * scalar,
            self.green * scalar,
            self.blue * scalar,
            self.alpha * scalar,
        )
    }
}

impl Default for Rgba {
    /// Returns [`Rgba::TRANSPARENT`].
    #[inline]
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Debug for Rgba {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "Rgba({:?}, {:?}, {:?}, {:?})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: Rgba, expected: Rgba) {
        let a = <[f32; 4]>::from(actual);
        let e = <[f32; 4]>::from(expected);
        assert!(
            a.iter().zip(e.iter()).all(|(a, e)| libm::fabsf(a - e) < 1e-6),
            "{actual:?} != {expected:?}"
        );
    }

    #[rstest]
    #[case::red(0.0, Rgba::new(1.0, 0.0, 0.0, 1.0))]
    #[case::yellow(60.0, Rgba::new(1.0, 1.0, 0.0, 1.0))]
    #[case::green(120.0, Rgba::new(0.0, 1.0, 0.0, 1.0))]
    #[case::cyan(180.0, Rgba::new(0.0, 1.0, 1.0, 1.0))]
    #[case::blue(240.0, Rgba::new(0.0, 0.0, 1.0, 1.0))]
    #[case::magenta(300.0, Rgba::new(1.0, 0.0, 1.0, 1.0))]
    fn hsv_primaries(#[case] hue: f32, #[case] expected: Rgba) {
        assert_close(Rgba::from_hsv(hue, 1.0, 1.0), expected);
    }

    #[test]
    fn hsv_zero_saturation_is_gray() {
        for hue in [0.0, 22.5, 90.0, 180.0, 359.9] {
            for value in [0.0, 0.25, 0.5, 1.0] {
                assert_eq!(
                    Rgba::from_hsv(hue, 0.0, value),
                    Rgba::new(value, value, value, 1.0),
                    "hue {hue} value {value}"
                );
            }
        }
    }

    #[test]
    fn hsv_between_sextants() {
        // Halfway from red to yellow.
        assert_close(
            Rgba::from_hsv(30.0, 1.0, 1.0),
            Rgba::new(1.0, 0.5, 0.0, 1.0),
        );
        // Half saturation, half value, in the last sextant.
        assert_close(
            Rgba::from_hsv(330.0, 0.5, 0.5),
            Rgba::new(0.5, 0.25, 0.375, 1.0),
        );
    }

    #[test]
    fn mul_scalar_is_componentwise() {
        assert_eq!(
            Rgba::new(0.5, 0.25, 1.0, 0.5) * 2.0,
            Rgba::new(1.0, 0.5, 2.0, 1.0)
        );
    }

    #[test]
    fn eight_bit_conversions_are_inverse() {
        for c in 0..=u8::MAX {
            let rgba = [c, u8::MAX - c, c / 2, 255];
            assert_eq!(Rgba::from_8bit(rgba).to_8bit_truncated(), rgba);
        }
    }

    #[test]
    fn truncation_not_rounding() {
        assert_eq!(
            Rgba::new(0.9999, 0.003, 0.5, 1.0).to_8bit_truncated(),
            [254, 0, 127, 255]
        );
    }

    #[test]
    fn debug() {
        assert_eq!(
            format!("{:#?}", Rgba::new(0.1, 0.2, 0.3, 0.4)),
            "Rgba(0.1, 0.2, 0.3, 0.4)"
        );
    }
}
