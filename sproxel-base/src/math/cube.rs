use core::fmt;

use crate::math::{GridCoordinate, GridPoint, GridVector};

/// One cell of a voxel grid, named by the coordinates of its most negative corner.
///
/// Keeping cells distinct from [`GridPoint`] corners avoids off-by-one confusion between
/// inclusive and exclusive bounds. A cube at [`GridCoordinate::MAX`] on some axis has no
/// far corner and so can never be inside a [`GridAab`](crate::math::GridAab).
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[allow(missing_docs, clippy::exhaustive_structs)]
pub struct Cube {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cube {
    /// The cell whose lower corner is the origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    #[allow(missing_docs)]
    #[inline]
    pub const fn new(x: GridCoordinate, y: GridCoordinate, z: GridCoordinate) -> Self {
        Self { x, y, z }
    }

    /// This cell's most negative corner.
    #[inline]
    pub fn lower_bounds(self) -> GridPoint {
        GridPoint::new(self.x, self.y, self.z)
    }

    /// Offsets the cell by `v`, or [`None`] if a coordinate would overflow.
    #[inline]
    #[must_use]
    pub fn checked_add(self, v: GridVector) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(v.x)?,
            self.y.checked_add(v.y)?,
            self.z.checked_add(v.z)?,
        ))
    }
}

impl fmt::Debug for Cube {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+?}, {:+?}, {:+?})", self.x, self.y, self.z)
    }
}

impl core::ops::Add<GridVector> for Cube {
    type Output = Self;
    #[inline]
    fn add(self, rhs: GridVector) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl core::ops::Sub for Cube {
    type Output = GridVector;
    #[inline]
    fn sub(self, rhs: Cube) -> GridVector {
        GridVector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<[GridCoordinate; 3]> for Cube {
    #[inline]
    fn from([x, y, z]: [GridCoordinate; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<GridPoint> for Cube {
    #[inline]
    fn from(point: GridPoint) -> Self {
        Self::new(point.x, point.y, point.z)
    }
}

impl From<Cube> for [GridCoordinate; 3] {
    #[inline]
    fn from(cube: Cube) -> Self {
        [cube.x, cube.y, cube.z]
    }
}

impl From<Cube> for GridPoint {
    #[inline]
    fn from(cube: Cube) -> Self {
        cube.lower_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        let cube = Cube::new(1, -2, 3);
        assert_eq!(Cube::from([1, -2, 3]), cube);
        assert_eq!(<[i32; 3]>::from(cube), [1, -2, 3]);
        assert_eq!(Cube::from(GridPoint::new(1, -2, 3)), cube);
        assert_eq!(GridPoint::from(cube), GridPoint::new(1, -2, 3));
    }

    #[test]
    fn offsets() {
        let a = Cube::new(4, 0, -3);
        let b = Cube::new(1, 2, 3);
        assert_eq!(a - b, GridVector::new(3, -2, -6));
        assert_eq!(b + (a - b), a);
        assert_eq!(Cube::new(i32::MAX, 0, 0).checked_add(GridVector::new(1, 0, 0)), None);
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", Cube::new(1, -2, 0)), "(+1, -2, +0)");
    }
}
