use core::iter::FusedIterator;

use crate::math::{Cube, GridAab};

/// Iterator over the cells of a [`GridAab`], from [`GridAab::interior_iter()`].
///
/// Z advances first, then Y, then X, matching the storage order of
/// [`Vol`](crate::math::Vol).
#[derive(Clone, Debug)]
pub struct GridIter {
    bounds: GridAab,
    /// The cell to yield next, or [`None`] once exhausted.
    next: Option<Cube>,
}

impl GridIter {
    #[inline]
    pub(in crate::math) fn new(bounds: GridAab) -> Self {
        Self {
            bounds,
            next: (!bounds.is_empty()).then_some(Cube::from(bounds.lower_bounds())),
        }
    }

    fn successor(&self, cube: Cube) -> Option<Cube> {
        let lower = self.bounds.lower_bounds();
        let upper = self.bounds.upper_bounds();
        if cube.z + 1 < upper.z {
            Some(Cube::new(cube.x, cube.y, cube.z + 1))
        } else if cube.y + 1 < upper.y {
            Some(Cube::new(cube.x, cube.y + 1, lower.z))
        } else if cube.x + 1 < upper.x {
            Some(Cube::new(cube.x + 1, lower.y, lower.z))
        } else {
            None
        }
    }
}

impl Iterator for GridIter {
    type Item = Cube;

    #[inline]
    fn next(&mut self) -> Option<Cube> {
        let current = self.next?;
        self.next = self.successor(current);
        Some(current)
    }

    #[allow(clippy::missing_inline_in_public_items, reason = "unclear benefit")]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let Some(cube) = self.next else {
            return (0, Some(0));
        };
        let size = self.bounds.size();
        let upper = self.bounds.upper_bounds();
        // Cells at or after `cube`: whole X planes beyond it, then whole rows beyond it in
        // its own plane, then the rest of its own row.
        let after = |end: i32, at: i32| (end.wrapping_sub(at).cast_unsigned() - 1) as usize;
        let rows = after(upper.x, cube.x) * size.height as usize + after(upper.y, cube.y);
        let remaining = rows * size.depth as usize + after(upper.z, cube.z) + 1;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIter {}
impl FusedIterator for GridIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn order_is_z_fastest() {
        let cubes: Vec<Cube> = GridAab::from_lower_size([0, 0, 0], [2, 1, 2])
            .interior_iter()
            .collect();
        assert_eq!(
            cubes,
            vec![
                Cube::new(0, 0, 0),
                Cube::new(0, 0, 1),
                Cube::new(1, 0, 0),
                Cube::new(1, 0, 1),
            ]
        );
    }

    #[test]
    fn empty_produces_nothing() {
        for size in [[0, 2, 2], [2, 0, 2], [2, 2, 0]] {
            let mut iter = GridAab::from_lower_size([5, 5, 5], size).interior_iter();
            assert_eq!(iter.size_hint(), (0, Some(0)), "{size:?}");
            assert_eq!(iter.next(), None, "{size:?}");
        }
    }

    #[test]
    fn size_hint_counts_down() {
        let mut iter = GridAab::from_lower_size([-1, 0, 3], [2, 3, 4]).interior_iter();
        for remaining in (1..=24).rev() {
            assert_eq!(iter.len(), remaining);
            iter.next();
        }
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn reaches_the_coordinate_limit() {
        let last: Vec<Cube> = GridAab::from_lower_upper([0, 0, i32::MAX - 2], [1, 1, i32::MAX])
            .interior_iter()
            .collect();
        assert_eq!(
            last,
            vec![Cube::new(0, 0, i32::MAX - 2), Cube::new(0, 0, i32::MAX - 1)]
        );
    }
}
