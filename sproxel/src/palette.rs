//! [`Palette`], the shared color table of indexed layers.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::math::Rgba;

#[cfg(doc)]
use crate::layer::VoxelGridLayer;

/// Number used to identify a color within a [`Palette`].
///
/// Every index that can be stored in a voxel is representable, but whether it refers to an
/// existing color depends on the palette's [`num_colors()`](Palette::num_colors).
pub type PaletteIndex = u8;

/// A named, ordered table of up to [`Palette::MAX_CAPACITY`] colors.
///
/// Palettes are shared between [`VoxelGridLayer`]s by wrapping them in
/// [`Arc`](alloc::sync::Arc); two layers use “the same palette” exactly when their `Arc`s are
/// [`ptr_eq`](alloc::sync::Arc::ptr_eq), regardless of whether the colors happen to be equal.
/// The [`PartialEq`] implementation compares by value.
#[derive(Clone, PartialEq)]
pub struct Palette {
    name: String,
    /// Invariant: length is at most [`Palette::MAX_CAPACITY`].
    colors: Vec<Rgba>,
}

impl Palette {
    /// The largest number of colors a palette may have; one for every [`PaletteIndex`].
    pub const MAX_CAPACITY: usize = PaletteIndex::MAX as usize + 1;

    /// The color of slots which have not been assigned a color.
    pub const UNSET_COLOR: Rgba = Rgba::TRANSPARENT;

    /// Constructs a palette with `capacity` slots, all [`Palette::UNSET_COLOR`].
    ///
    /// Returns an error if `capacity` exceeds [`Palette::MAX_CAPACITY`].
    pub fn new(name: impl Into<String>, capacity: usize) -> Result<Self, PaletteError> {
        check_capacity(capacity)?;
        Ok(Self {
            name: name.into(),
            colors: vec![Self::UNSET_COLOR; capacity],
        })
    }

    /// Constructs a palette containing exactly the given colors, in order.
    ///
    /// Returns an error if there are more than [`Palette::MAX_CAPACITY`] colors.
    pub fn from_colors(
        name: impl Into<String>,
        colors: impl IntoIterator<Item = Rgba>,
    ) -> Result<Self, PaletteError> {
        let colors: Vec<Rgba> = colors.into_iter().collect();
        check_capacity(colors.len())?;
        Ok(Self {
            name: name.into(),
            colors,
        })
    }

    /// Constructs the palette every new project starts with, named `"main"`.
    ///
    /// The first 240 entries are 15 rows of 16 hues each (hue steps of 22.5°), where each
    /// successive row is darker and less saturated. The last 16 entries are a ramp of grays
    /// from black up to, but not including, white.
    ///
    /// ```
    /// use sproxel::math::Rgba;
    /// use sproxel::palette::Palette;
    ///
    /// let main = Palette::default_main();
    /// assert_eq!(main.name(), "main");
    /// assert_eq!(main.num_colors(), 256);
    /// assert_eq!(main.color(0), Ok(Rgba::from_hsv(0.0, 1.0, 1.0)));
    /// assert_eq!(main.color(240), Ok(Rgba::BLACK));
    /// ```
    pub fn default_main() -> Self {
        let mut colors = Vec::with_capacity(Self::MAX_CAPACITY);
        for y in 0..15u8 {
            let row = f32::from(y) / 16.0;
            let saturation = 1.0 - row * 0.5;
            let value = 1.0 - row;
            colors.extend(
                (0..16u8).map(|x| Rgba::from_hsv(f32::from(x) * 22.5, saturation, value)),
            );
        }
        colors.extend((0..16u8).map(|x| Rgba::from_hsv(0.0, 0.0, f32::from(x) / 16.0)));
        debug_assert_eq!(colors.len(), Self::MAX_CAPACITY);

        Self {
            name: String::from("main"),
            colors,
        }
    }

    /// Returns the human-readable name of this palette.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the human-readable name of this palette.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the number of slots in this palette; valid indices are `0..num_colors()`.
    pub fn num_colors(&self) -> usize {
        self.colors.len()
    }

    /// Changes the number of slots.
    ///
    /// Growing fills the new slots with [`Palette::UNSET_COLOR`]; shrinking discards the
    /// colors at and above `capacity`.
    /// Returns an error, and leaves the palette unchanged, if `capacity` exceeds
    /// [`Palette::MAX_CAPACITY`].
    pub fn resize(&mut self, capacity: usize) -> Result<(), PaletteError> {
        check_capacity(capacity)?;
        self.colors.resize(capacity, Self::UNSET_COLOR);
        Ok(())
    }

    /// Returns the color at `index`.
    pub fn color(&self, index: usize) -> Result<Rgba, PaletteError> {
        self.colors
            .get(index)
            .copied()
            .ok_or(PaletteError::IndexOutOfRange {
                index,
                capacity: self.colors.len(),
            })
    }

    /// Replaces the color at `index`.
    ///
    /// Out-of-range indices are an error, never clamped.
    pub fn set_color(&mut self, index: usize, color: Rgba) -> Result<(), PaletteError> {
        let capacity = self.colors.len();
        let slot = self
            .colors
            .get_mut(index)
            .ok_or(PaletteError::IndexOutOfRange { index, capacity })?;
        *slot = color;
        Ok(())
    }

    /// Returns all colors in index order.
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Iterates over all colors in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Rgba> + '_ {
        self.colors.iter().copied()
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Omit the colors because there are usually 256 of them.
        f.debug_struct("Palette")
            .field("name", &self.name)
            .field("num_colors", &self.colors.len())
            .finish_non_exhaustive()
    }
}

fn check_capacity(capacity: usize) -> Result<(), PaletteError> {
    if capacity > Palette::MAX_CAPACITY {
        Err(PaletteError::CapacityTooLarge {
            requested: capacity,
        })
    } else {
        Ok(())
    }
}

/// Errors from accessing or resizing a [`Palette`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum PaletteError {
    /// The index is not less than the palette's capacity.
    #[error("palette index {index} is out of range for a palette of {capacity} colors")]
    #[allow(missing_docs)]
    IndexOutOfRange { index: usize, capacity: usize },

    /// The requested capacity is larger than [`Palette::MAX_CAPACITY`].
    #[error(
        "palette capacity {requested} exceeds the maximum of {}",
        Palette::MAX_CAPACITY
    )]
    #[allow(missing_docs)]
    CapacityTooLarge { requested: usize },
}
