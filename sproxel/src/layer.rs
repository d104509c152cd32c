//! [`VoxelGridLayer`] and the [`Voxel`]s it contains.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;

use crate::math::{Cube, GridAab, Rgba, Vol};
use crate::palette::{Palette, PaletteIndex};

/// The contents of one cell of a [`VoxelGridLayer`].
///
/// The color and the palette index are stored independently. The index is meaningful only
/// if the layer is [indexed](VoxelGridLayer::is_indexed); the color is always present and is
/// what non-palette-aware consumers (such as compositing) look at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct Voxel {
    /// Color of the voxel. Fully transparent means “empty”.
    pub color: Rgba,
    /// Palette index of the voxel, or [`None`] if it has none.
    pub index: Option<PaletteIndex>,
}

impl Voxel {
    /// The contents of unset cells, and of every position outside a layer's bounds.
    pub const EMPTY: Self = Self {
        color: Rgba::TRANSPARENT,
        index: None,
    };

    /// Returns whether this voxel is drawn at all, i.e. its color is not fully transparent.
    #[inline]
    pub fn is_opaque_enough_to_draw(self) -> bool {
        !self.color.fully_transparent()
    }
}

/// How the cells of a [`VoxelGridLayer`] are to be interpreted.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ColorMode {
    /// Cells carry only direct colors.
    Direct,
    /// Cells carry palette indices into the given palette, in addition to their colors.
    Indexed(Arc<Palette>),
}

impl ColorMode {
    /// Returns the palette, if this is [`ColorMode::Indexed`].
    pub fn palette(&self) -> Option<&Arc<Palette>> {
        match self {
            ColorMode::Direct => None,
            ColorMode::Indexed(palette) => Some(palette),
        }
    }
}

impl From<Option<Arc<Palette>>> for ColorMode {
    fn from(value: Option<Arc<Palette>>) -> Self {
        match value {
            Some(palette) => ColorMode::Indexed(palette),
            None => ColorMode::Direct,
        }
    }
}

/// A box-shaped grid of [`Voxel`]s, optionally associated with a shared [`Palette`].
///
/// Every cube within [`bounds()`](Self::bounds) has storage; cubes outside it read as
/// [`Voxel::EMPTY`] and cannot be written.
#[derive(Clone, Debug)]
pub struct VoxelGridLayer {
    name: String,
    visible: bool,
    color_mode: ColorMode,
    cells: Vol<Box<[Voxel]>>,
}

impl VoxelGridLayer {
    /// Name given to layers which have not been named otherwise.
    pub const DEFAULT_NAME: &'static str = "unnamed";

    /// Constructs a direct-color layer with the given bounds, every cell [`Voxel::EMPTY`].
    ///
    /// Panics if the volume of `bounds` does not fit in a [`usize`].
    pub fn new(bounds: GridAab) -> Self {
        Self {
            name: String::from(Self::DEFAULT_NAME),
            visible: true,
            color_mode: ColorMode::Direct,
            cells: Vol::repeat(bounds, Voxel::EMPTY),
        }
    }

    /// Constructs an indexed layer with the given bounds, every cell [`Voxel::EMPTY`].
    ///
    /// Panics if the volume of `bounds` does not fit in a [`usize`].
    pub fn with_palette(bounds: GridAab, palette: Arc<Palette>) -> Self {
        let mut layer = Self::new(bounds);
        layer.color_mode = ColorMode::Indexed(palette);
        layer
    }

    /// Returns the name of this layer.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the name of this layer.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns whether this layer contributes to [`LayerGroup`](crate::group::LayerGroup)
    /// composites.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sets whether this layer contributes to [`LayerGroup`](crate::group::LayerGroup)
    /// composites.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns the region of cubes which have storage.
    pub fn bounds(&self) -> GridAab {
        self.cells.bounds()
    }

    /// Replaces the storage with storage for `bounds`.
    ///
    /// This is destructive: cells which are not within both the old and new bounds are lost,
    /// and newly included cells are [`Voxel::EMPTY`]. Cells in the intersection keep their
    /// contents.
    ///
    /// Panics if the volume of `bounds` does not fit in a [`usize`].
    pub fn resize(&mut self, bounds: GridAab) {
        if bounds == self.bounds() {
            return;
        }
        let old = &self.cells;
        self.cells = Vol::from_fn(bounds, |cube| old.get(cube).copied().unwrap_or(Voxel::EMPTY));
    }

    /// Writes one cell.
    ///
    /// The index is stored even if the layer is not indexed, where it is inert.
    pub fn set(
        &mut self,
        cube: impl Into<Cube>,
        color: Rgba,
        index: Option<PaletteIndex>,
    ) -> Result<(), SetVoxelError> {
        let cube = cube.into();
        let bounds = self.bounds();
        match self.cells.get_mut(cube) {
            Some(cell) => {
                *cell = Voxel { color, index };
                Ok(())
            }
            None => Err(SetVoxelError::OutOfBounds { cube, bounds }),
        }
    }

    /// Reads one cell, or [`Voxel::EMPTY`] if `cube` is out of bounds.
    #[inline]
    pub fn get(&self, cube: impl Into<Cube>) -> Voxel {
        self.cells.get(cube).copied().unwrap_or(Voxel::EMPTY)
    }

    /// Reads the color of one cell. Equivalent to `self.get(cube).color`.
    #[inline]
    pub fn color(&self, cube: impl Into<Cube>) -> Rgba {
        self.get(cube).color
    }

    /// Reads the palette index of one cell. Equivalent to `self.get(cube).index`.
    #[inline]
    pub fn index(&self, cube: impl Into<Cube>) -> Option<PaletteIndex> {
        self.get(cube).index
    }

    /// Returns whether the cells' palette indices are meaningful.
    pub fn is_indexed(&self) -> bool {
        matches!(self.color_mode, ColorMode::Indexed(_))
    }

    /// Returns the palette this layer is indexed against, if any.
    pub fn palette(&self) -> Option<&Arc<Palette>> {
        self.color_mode.palette()
    }

    /// Returns how this layer's cells are interpreted.
    pub fn color_mode(&self) -> &ColorMode {
        &self.color_mode
    }

    /// Associates this layer with a palette, or with none, making it direct-color.
    ///
    /// Cell contents are not changed.
    pub fn set_palette(&mut self, palette: Option<Arc<Palette>>) {
        self.color_mode = ColorMode::from(palette);
    }

    /// Iterates over every cube within the bounds and its contents.
    ///
    /// The order is X-major, Z-minor: Z varies fastest.
    pub fn iter(&self) -> impl Iterator<Item = (Cube, Voxel)> + '_ {
        self.cells.iter().map(|(cube, &voxel)| (cube, voxel))
    }
}

/// Ways that [`VoxelGridLayer::set()`] can fail.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SetVoxelError {
    /// The given cube is out of the bounds of the layer.
    #[error("{cube:?} is out of bounds {bounds:?}")]
    #[allow(missing_docs)]
    OutOfBounds { cube: Cube, bounds: GridAab },
}
