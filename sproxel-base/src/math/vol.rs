use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::math::{Cube, GridAab};

/// A box of cells stored contiguously, one element per [`Cube`] of its bounds.
///
/// `C` is the container, usually `Box<[V]>`. Elements are laid out with X as the most
/// significant axis and Z the least, which is the same order as
/// [`GridAab::interior_iter()`]; the cell at offset `(x, y, z)` from the lower corner is
/// element `((x * size_y) + y) * size_z + z`.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Vol<C> {
    bounds: GridAab,
    /// Always holds exactly `bounds.volume()` elements.
    contents: C,
}

#[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
impl<C, V> Vol<C>
where
    C: Deref<Target = [V]> + FromIterator<V>,
{
    /// Fills a new volume by calling `f` on every cube of `bounds`, in storage order.
    ///
    /// Panics if the number of cubes in `bounds` does not fit in a `usize`.
    #[track_caller]
    pub fn from_fn(bounds: GridAab, f: impl FnMut(Cube) -> V) -> Self {
        let Some(volume) = bounds.volume() else {
            panic!("{bounds:?} has too many cubes to store");
        };
        let contents: C = bounds.interior_iter().map(f).collect();
        debug_assert_eq!(contents.len(), volume);
        Self { bounds, contents }
    }

    /// Fills a new volume with copies of `value`.
    #[track_caller]
    pub fn repeat(bounds: GridAab, value: V) -> Self
    where
        V: Clone,
    {
        Self::from_fn(bounds, |_| value.clone())
    }
}

impl<C> Vol<C> {
    /// The region this volume covers.
    #[inline]
    pub fn bounds(&self) -> GridAab {
        self.bounds
    }

    /// Position of `cube` in the element storage, or [`None`] if `cube` lies outside
    /// [`Self::bounds()`].
    #[inline]
    pub fn index(&self, cube: Cube) -> Option<usize> {
        let size = self.bounds.size();
        let lower = self.bounds.lower_bounds();
        // A negative offset wraps to a huge unsigned one, so one comparison per axis
        // rejects both sides. Every in-range offset fits in `usize`.
        let x = cube.x.wrapping_sub(lower.x).cast_unsigned();
        let y = cube.y.wrapping_sub(lower.y).cast_unsigned();
        let z = cube.z.wrapping_sub(lower.z).cast_unsigned();
        if x >= size.width || y >= size.height || z >= size.depth {
            return None;
        }
        Some((x as usize * size.height as usize + y as usize) * size.depth as usize + z as usize)
    }
}

#[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
impl<C, V> Vol<C>
where
    C: Deref<Target = [V]>,
{
    /// Borrows the element at `cube`, if it is in bounds.
    #[inline]
    pub fn get(&self, cube: impl Into<Cube>) -> Option<&V> {
        let i = self.index(cube.into())?;
        self.contents.get(i)
    }

    /// Mutably borrows the element at `cube`, if it is in bounds.
    #[inline]
    pub fn get_mut(&mut self, cube: impl Into<Cube>) -> Option<&mut V>
    where
        C: DerefMut,
    {
        let i = self.index(cube.into())?;
        self.contents.get_mut(i)
    }

    /// Visits every cube together with its element, in storage order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (Cube, &'a V)> + 'a
    where
        V: 'a,
    {
        self.bounds.interior_iter().zip(self.contents.iter())
    }
}

#[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
impl<C, V> fmt::Debug for Vol<C>
where
    C: Deref<Target = [V]>,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ds = f.debug_struct("Vol");
        ds.field("bounds", &self.bounds);
        match self.contents.len() {
            n @ 33.. => ds.field("contents", &format_args!("[...{n} elements]")),
            _ => ds.field("contents", &&*self.contents),
        };
        ds.finish()
    }
}
