//! [`LayerGroup`]: a stack of layers, and flattening it.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::layer::{ColorMode, Voxel, VoxelGridLayer};
use crate::math::{Cube, GridAab, Rgba};
use crate::palette::{Palette, PaletteIndex};

/// An ordered stack of [`VoxelGridLayer`]s.
///
/// Index 0 is the bottom of the stack. When layers overlap, the topmost layer which has
/// something to show at a cube wins; there is no blending.
#[derive(Clone, Debug, Default)]
pub struct LayerGroup {
    layers: Vec<VoxelGridLayer>,
}

impl LayerGroup {
    /// Constructs a group with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer on top of all existing layers.
    pub fn push(&mut self, layer: VoxelGridLayer) {
        self.layers.push(layer);
    }

    /// Inserts a layer at position `index` in the stack, shifting the layers above it up.
    ///
    /// Panics if `index > self.len()`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, layer: VoxelGridLayer) {
        self.layers.insert(index, layer);
    }

    /// Removes and returns the layer at position `index`, or returns [`None`] if there is no
    /// such layer.
    pub fn remove(&mut self, index: usize) -> Option<VoxelGridLayer> {
        (index < self.layers.len()).then(|| self.layers.remove(index))
    }

    /// Returns the layers, bottom first.
    pub fn layers(&self) -> &[VoxelGridLayer] {
        &self.layers
    }

    /// Returns the layers, bottom first, for modification.
    pub fn layers_mut(&mut self) -> &mut [VoxelGridLayer] {
        &mut self.layers
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns whether there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the smallest box containing every layer's cubes.
    ///
    /// Layers with empty bounds do not contribute. If there are no nonempty layers, the
    /// result is an empty box.
    pub fn bounds(&self) -> GridAab {
        let mut nonempty = self
            .layers
            .iter()
            .map(VoxelGridLayer::bounds)
            .filter(|bounds| !bounds.is_empty());
        match nonempty.next() {
            Some(first) => nonempty.fold(first, GridAab::union_cubes),
            None => GridAab::ORIGIN_EMPTY,
        }
    }

    /// Returns the composite contents of the stack at `cube`.
    ///
    /// A layer contributes if it is visible, `cube` is within its bounds, and the stored
    /// color is not fully transparent. The topmost contributing layer's voxel is returned
    /// unchanged; if no layer contributes, the result is [`Voxel::EMPTY`].
    pub fn voxel(&self, cube: impl Into<Cube>) -> Voxel {
        let cube = cube.into();
        self.layers
            .iter()
            .rev()
            .filter(|layer| layer.is_visible())
            .map(|layer| layer.get(cube))
            .find(|voxel| voxel.is_opaque_enough_to_draw())
            .unwrap_or(Voxel::EMPTY)
    }

    /// Returns the composite color at `cube`. Equivalent to `self.voxel(cube).color`.
    pub fn get(&self, cube: impl Into<Cube>) -> Rgba {
        self.voxel(cube).color
    }

    /// Returns the composite palette index at `cube`. Equivalent to `self.voxel(cube).index`.
    pub fn get_index(&self, cube: impl Into<Cube>) -> Option<PaletteIndex> {
        self.voxel(cube).index
    }

    /// Returns the palette a flattened copy of this group can be indexed against, if any.
    ///
    /// That is the palette of the indexed layers, provided that there are no direct-color
    /// layers and that all indexed layers share one palette (by identity, not by value).
    /// Every layer counts, including invisible and empty ones.
    pub fn common_palette(&self) -> Option<&Arc<Palette>> {
        let mut has_direct = false;
        let mut has_multiple_palettes = false;
        let mut palette: Option<&Arc<Palette>> = None;
        for layer in &self.layers {
            match layer.color_mode() {
                ColorMode::Direct => has_direct = true,
                ColorMode::Indexed(p) => match palette {
                    None => palette = Some(p),
                    Some(first) if !Arc::ptr_eq(first, p) => has_multiple_palettes = true,
                    Some(_) => {}
                },
            }
        }

        if has_direct || has_multiple_palettes {
            None
        } else {
            palette
        }
    }

    /// Flattens the stack into a single new layer covering [`LayerGroup::bounds()`].
    ///
    /// Each cell of the result holds [`LayerGroup::voxel()`] of that cube. The result is
    /// indexed against [`LayerGroup::common_palette()`], or is direct-color if there is none.
    /// Palette indices are copied as stored even in the direct-color case.
    ///
    /// An empty group bakes to an empty direct-color layer.
    pub fn bake(&self) -> VoxelGridLayer {
        let bounds = self.bounds();
        let palette = self.common_palette().cloned();
        log::debug!(
            "baking {n} layers into {bounds:?}, {mode}",
            n = self.layers.len(),
            mode = match &palette {
                Some(p) => format!("indexed against palette {:?}", p.name()),
                None => "direct color".into(),
            }
        );

        let mut baked = VoxelGridLayer::new(bounds);
        baked.set_palette(palette);
        for z in bounds.z_range() {
            for y in bounds.y_range() {
                for x in bounds.x_range() {
                    let cube = Cube::new(x, y, z);
                    let Voxel { color, index } = self.voxel(cube);
                    baked
                        .set(cube, color, index)
                        .expect("cube within the bounds it was taken from");
                }
            }
        }
        baked
    }
}

impl FromIterator<VoxelGridLayer> for LayerGroup {
    fn from_iter<T: IntoIterator<Item = VoxelGridLayer>>(iter: T) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}
