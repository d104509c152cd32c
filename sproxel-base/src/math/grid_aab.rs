//! [`GridAab`], the extent of a voxel grid.

use core::fmt;
use core::ops::Range;

use euclid::size3;

use crate::math::{Cube, GridCoordinate, GridIter, GridPoint, GridSize, GridVector};

/// A box of whole cells: every [`Cube`] whose coordinates fall within a half-open range
/// on each axis.
///
/// The lower corner is inclusive and the upper corner exclusive, so [`GridAab::size()`]
/// counts cells. Any axis may have size zero, in which case the box contains no cells but
/// still has a position; such boxes compare unequal to each other.
///
/// Editors that describe a grid by the first and last cell it contains should use
/// [`GridAab::from_inclusive_corners()`].
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct GridAab {
    lower_bounds: GridPoint,
    /// Never less than `lower_bounds` on any axis.
    upper_bounds: GridPoint,
}

impl GridAab {
    /// The empty box at the origin, used where some box is needed but none is meaningful.
    pub const ORIGIN_EMPTY: GridAab = GridAab {
        lower_bounds: GridPoint::new(0, 0, 0),
        upper_bounds: GridPoint::new(0, 0, 0),
    };

    /// Box whose first cell is `lower_bounds` and which extends `sizes` cells along each
    /// axis.
    ///
    /// Panics on coordinate overflow; [`GridAab::checked_from_lower_size`] reports it
    /// instead.
    #[track_caller]
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn from_lower_size(lower_bounds: impl Into<GridPoint>, sizes: impl Into<GridSize>) -> Self {
        Self::checked_from_lower_size(lower_bounds.into(), sizes.into())
            .expect("GridAab::from_lower_size")
    }

    /// Box spanning `lower_bounds` (inclusive) to `upper_bounds` (exclusive).
    ///
    /// Fails if the corners are inverted on any axis.
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn checked_from_lower_upper(
        lower_bounds: impl Into<GridPoint>,
        upper_bounds: impl Into<GridPoint>,
    ) -> Result<Self, GridOverflowError> {
        let lower_bounds = lower_bounds.into();
        let upper_bounds = upper_bounds.into();
        let inverted = lower_bounds
            .to_array()
            .into_iter()
            .zip(upper_bounds.to_array())
            .any(|(low, high)| high < low);
        if inverted {
            Err(GridOverflowError(OverflowKind::Inverted {
                lower_bounds,
                upper_bounds,
            }))
        } else {
            Ok(GridAab {
                lower_bounds,
                upper_bounds,
            })
        }
    }

    /// Box spanning `lower_bounds` (inclusive) to `upper_bounds` (exclusive).
    ///
    /// Panics if the corners are inverted on any axis.
    #[track_caller]
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn from_lower_upper(
        lower_bounds: impl Into<GridPoint>,
        upper_bounds: impl Into<GridPoint>,
    ) -> GridAab {
        Self::checked_from_lower_upper(lower_bounds, upper_bounds)
            .expect("GridAab::from_lower_upper")
    }

    /// Box whose first cell is `lower_bounds` and which extends `size` cells along each
    /// axis, or an error if the far corner is not representable.
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn checked_from_lower_size(
        lower_bounds: impl Into<GridPoint>,
        size: impl Into<GridSize>,
    ) -> Result<Self, GridOverflowError> {
        let lower_bounds = lower_bounds.into();
        let size = size.into();
        let far = |low: GridCoordinate, len: u32| low.checked_add_unsigned(len);
        match (
            far(lower_bounds.x, size.width),
            far(lower_bounds.y, size.height),
            far(lower_bounds.z, size.depth),
        ) {
            (Some(x), Some(y), Some(z)) => Ok(GridAab {
                lower_bounds,
                upper_bounds: GridPoint::new(x, y, z),
            }),
            _ => Err(GridOverflowError(OverflowKind::OverflowedSize {
                lower_bounds,
                size,
            })),
        }
    }

    /// Box containing exactly the cells from `min` to `max`, both included, so that each
    /// axis has `max - min + 1` cells.
    ///
    /// ```
    /// # extern crate sproxel_base as sproxel;
    /// use sproxel::math::GridAab;
    ///
    /// assert_eq!(
    ///     GridAab::from_inclusive_corners([0, 0, 0], [1, 2, 1]).unwrap(),
    ///     GridAab::from_lower_size([0, 0, 0], [2, 3, 2]),
    /// );
    /// ```
    ///
    /// Fails if `max` precedes `min` on some axis, or if `max` is at
    /// [`GridCoordinate::MAX`] and so has no exclusive successor.
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn from_inclusive_corners(
        min: impl Into<Cube>,
        max: impl Into<Cube>,
    ) -> Result<Self, GridOverflowError> {
        let min: Cube = min.into();
        let max: Cube = max.into();
        let Some(past_max) = max.checked_add(GridVector::new(1, 1, 1)) else {
            return Err(GridOverflowError(OverflowKind::InclusiveOverflow {
                max: max.lower_bounds(),
            }));
        };
        Self::checked_from_lower_upper(min.lower_bounds(), past_max.lower_bounds())
    }

    /// Number of cells in the box, or [`None`] if that exceeds `usize`.
    #[inline]
    pub const fn volume(&self) -> Option<usize> {
        let size = self.size();
        match (size.width as usize).checked_mul(size.height as usize) {
            Some(area) => area.checked_mul(size.depth as usize),
            None => None,
        }
    }

    /// Whether the box contains no cells, which happens when any axis has size zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// The first cell's corner; inclusive.
    #[inline]
    pub fn lower_bounds(&self) -> GridPoint {
        self.lower_bounds
    }

    /// The corner just past the last cell; exclusive.
    #[inline]
    pub fn upper_bounds(&self) -> GridPoint {
        self.upper_bounds
    }

    /// Cell count along each axis.
    ///
    /// Unsigned, so a box spanning the whole coordinate range still has a valid size.
    #[inline]
    pub const fn size(&self) -> GridSize {
        // Wrapping subtraction reinterpreted as unsigned is exact for any valid box.
        size3(
            self.upper_bounds.x.wrapping_sub(self.lower_bounds.x).cast_unsigned(),
            self.upper_bounds.y.wrapping_sub(self.lower_bounds.y).cast_unsigned(),
            self.upper_bounds.z.wrapping_sub(self.lower_bounds.z).cast_unsigned(),
        )
    }

    /// X coordinates of the cells in the box.
    #[inline]
    pub fn x_range(&self) -> Range<GridCoordinate> {
        self.lower_bounds.x..self.upper_bounds.x
    }

    /// Y coordinates of the cells in the box.
    #[inline]
    pub fn y_range(&self) -> Range<GridCoordinate> {
        self.lower_bounds.y..self.upper_bounds.y
    }

    /// Z coordinates of the cells in the box.
    #[inline]
    pub fn z_range(&self) -> Range<GridCoordinate> {
        self.lower_bounds.z..self.upper_bounds.z
    }

    /// Every cell of the box, X slowest and Z fastest.
    #[inline]
    pub fn interior_iter(self) -> GridIter {
        GridIter::new(self)
    }

    /// Smallest box holding every cell of both `self` and `other`.
    ///
    /// An empty input contributes nothing, not even its position; when both are empty the
    /// result is `self`.
    ///
    /// ```
    /// # extern crate sproxel_base as sproxel;
    /// use sproxel::math::GridAab;
    ///
    /// let a = GridAab::from_lower_size([1, 2, 3], [1, 1, 1]);
    /// let b = GridAab::from_lower_size([4, 7, 11], [1, 1, 1]);
    /// assert_eq!(a.union_cubes(b), GridAab::from_lower_upper([1, 2, 3], [5, 8, 12]));
    ///
    /// let flat = GridAab::from_lower_size([0, 0, 0], [0, 1, 7]);
    /// assert_eq!(a.union_cubes(flat), a);
    /// ```
    #[inline]
    #[must_use]
    pub fn union_cubes(self, other: Self) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (_, true) => self,
            (true, false) => other,
            (false, false) => GridAab {
                lower_bounds: self.lower_bounds.min(other.lower_bounds),
                upper_bounds: self.upper_bounds.max(other.upper_bounds),
            },
        }
    }
}

impl fmt::Debug for GridAab {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut t = f.debug_tuple("GridAab");
        for range in [self.x_range(), self.y_range(), self.z_range()] {
            t.field(&AxisRange(range));
        }
        t.finish()
    }
}

/// Error when the requested corners or size do not describe a valid [`GridAab`].
#[derive(Clone, Copy, Debug, displaydoc::Display, Eq, PartialEq)]
#[displaydoc("{0}")]
pub struct GridOverflowError(OverflowKind);

#[derive(Clone, Copy, Debug, displaydoc::Display, Eq, PartialEq)]
enum OverflowKind {
    /// GridAab's lower bounds {lower_bounds:?} were greater than upper bounds {upper_bounds:?}
    Inverted {
        lower_bounds: GridPoint,
        upper_bounds: GridPoint,
    },
    /// GridAab's size {size:?} plus lower bounds {lower_bounds:?} overflows
    OverflowedSize {
        lower_bounds: GridPoint,
        size: GridSize,
    },
    /// GridAab's inclusive upper corner {max:?} cannot be made exclusive
    InclusiveOverflow { max: GridPoint },
}

impl core::error::Error for GridOverflowError {}

/// Prints a coordinate range, adding its length under `{:#?}`.
struct AxisRange(Range<GridCoordinate>);

impl fmt::Debug for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Range { start, end } = self.0;
        write!(f, "{start}..{end}")?;
        if f.alternate() {
            write!(f, " ({})", i64::from(end) - i64::from(start))?;
        }
        Ok(())
    }
}
