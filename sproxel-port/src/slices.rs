//! The voxel image codec: conversion between [`VoxelGridLayer`]s and [`Raster`]s.
//!
//! # Layout
//!
//! A layer whose cell dimensions are X × Y × Z is stored as a raster X·Z pixels wide and
//! Y pixels tall. The Z slices are placed left to right, each an X-pixel-wide block of
//! columns. Rows are mirrored relative to voxel Y, so that the top row of the raster
//! is the top (highest Y) row of voxels.
//!
//! The dimensions are recorded in the text metadata entries [`DIM_X_KEY`], [`DIM_Y_KEY`],
//! and [`DIM_Z_KEY`] as decimal numbers, and [`FILE_VERSION_KEY`] is set to
//! [`FILE_VERSION`]. Rasters without valid dimension entries are not voxel images.
//!
//! Layers with a palette are stored as indexed rasters whose color table is the palette;
//! other layers are stored as RGBA rasters. Colors are converted to 8 bits per channel by
//! truncation, not rounding, so colors whose channels are multiples of 1/255 survive a
//! round trip exactly.

use std::sync::Arc;

use itertools::iproduct;

use sproxel::layer::VoxelGridLayer;
use sproxel::math::{Cube, GridAab, Rgba};
use sproxel::palette::Palette;

use crate::raster::Raster;

/// Metadata key whose value identifies the voxel image layout version.
pub const FILE_VERSION_KEY: &str = "SproxelFileVersion";
/// The only layout version, which this module reads and writes.
pub const FILE_VERSION: &str = "1";
/// Metadata key for the number of cells along X.
pub const DIM_X_KEY: &str = "VoxelGridDimX";
/// Metadata key for the number of cells along Y.
pub const DIM_Y_KEY: &str = "VoxelGridDimY";
/// Metadata key for the number of cells along Z.
pub const DIM_Z_KEY: &str = "VoxelGridDimZ";

/// Name given to palettes reconstructed from a raster's color table.
pub const IMPORTED_PALETTE_NAME: &str = "imported";

/// Reads the cell dimensions recorded in `raster`'s metadata.
///
/// Returns [`None`] if any of them is missing, unparsable, or zero.
pub fn dimensions(raster: &Raster) -> Option<[u32; 3]> {
    let dim = |key: &str| -> Option<u32> {
        let Some(text) = raster.text(key) else {
            log::debug!("not a voxel image: no {key} metadata");
            return None;
        };
        match text.parse::<u32>() {
            Ok(0) | Err(_) => {
                log::debug!("not a voxel image: invalid {key} value {text:?}");
                None
            }
            Ok(value) => Some(value),
        }
    };
    Some([dim(DIM_X_KEY)?, dim(DIM_Y_KEY)?, dim(DIM_Z_KEY)?])
}

/// Decodes a voxel image into a new layer whose bounds start at the origin.
///
/// If `raster` is indexed, the layer is indexed against `palette`, or, if that is [`None`],
/// against a new palette built from the raster's color table. Each cell's color is read
/// through the color table either way; the palette only gives meaning to the indices.
/// If `raster` is not indexed, or is indexed with an empty color table, `palette` is
/// ignored and the layer is direct-color.
///
/// Returns [`None`] if `raster` is not a voxel image: its dimension metadata is missing or
/// invalid, or disagrees with the raster's actual size. This lets callers try other
/// interpretations of the same file.
pub fn layer_from_raster(
    raster: &Raster,
    palette: Option<Arc<Palette>>,
) -> Option<VoxelGridLayer> {
    let [sx, sy, sz] = dimensions(raster)?;
    let (x_len, y_len, z_len) = (sx as usize, sy as usize, sz as usize);
    if x_len.checked_mul(z_len) != Some(raster.width()) || y_len != raster.height() {
        log::debug!(
            "not a voxel image: {w}×{h} raster cannot hold {sx}×{sy}×{sz} voxels",
            w = raster.width(),
            h = raster.height(),
        );
        return None;
    }
    let Ok(bounds) = GridAab::checked_from_lower_size([0, 0, 0], [sx, sy, sz]) else {
        log::debug!("not a voxel image: {sx}×{sy}×{sz} exceeds the coordinate range");
        return None;
    };

    let raster = raster.mirrored();

    // An indexed raster with an empty color table has nothing to index into, so it is
    // read as direct color.
    let palette = match raster.color_table() {
        Some(table) if !table.is_empty() => {
            palette.or_else(|| Some(Arc::new(palette_from_color_table(table))))
        }
        _ => None,
    };
    let indexed = palette.is_some();
    let mut layer = VoxelGridLayer::new(bounds);
    layer.set_palette(palette);

    for (slice, y, x) in iproduct!(bounds.z_range(), bounds.y_range(), bounds.x_range()) {
        // All coordinates are nonnegative because the bounds start at the origin.
        let px = x as usize + slice as usize * x_len;
        let py = y as usize;
        let color = Rgba::from_8bit(raster.pixel_rgba(px, py)?);
        let index = if indexed {
            raster.pixel_index(px, py)
        } else {
            None
        };
        layer.set(Cube::new(x, y, slice), color, index).ok()?;
    }

    Some(layer)
}

/// Encodes a layer as a voxel image.
///
/// Cells are read relative to the layer's lower bounds, so the position of the layer is not
/// recorded. An indexed layer becomes an indexed raster whose color table is its palette,
/// and whose pixels are the cells' indices (0 for cells without one). Any other layer
/// becomes an RGBA raster.
pub fn layer_to_raster(layer: &VoxelGridLayer) -> Raster {
    let bounds = layer.bounds();
    let size = bounds.size();
    let lower = bounds.lower_bounds();
    let (x_len, y_len) = (size.width as usize, size.height as usize);
    // Cannot overflow unless the layer is empty, in which case there are no pixels anyway.
    let width = x_len.saturating_mul(size.depth as usize);
    let area = width * y_len;

    // Cells in slice-major order, each with the position of its pixel before mirroring.
    let cells = iproduct!(bounds.z_range(), bounds.y_range(), bounds.x_range()).map(
        |(z, y, x)| {
            let cube = Cube::new(x, y, z);
            let offset = cube - Cube::from(lower);
            let pixel =
                offset.y as usize * width + offset.x as usize + offset.z as usize * x_len;
            (pixel, layer.get(cube))
        },
    );

    let raster = match layer.palette() {
        Some(palette) => {
            let mut indices = vec![0u8; area];
            for (pixel, voxel) in cells {
                indices[pixel] = voxel.index.unwrap_or(0);
            }
            let color_table = palette.iter().map(Rgba::to_8bit_truncated).collect();
            Raster::from_indexed(width, y_len, indices, color_table)
        }
        None => {
            let mut pixels = vec![[0u8; 4]; area];
            for (pixel, voxel) in cells {
                pixels[pixel] = voxel.color.to_8bit_truncated();
            }
            Raster::from_rgba(width, y_len, pixels)
        }
    };
    let raster = raster.unwrap_or_else(|error| unreachable!("{error}"));

    // Mirroring discards metadata, so the metadata must be written afterward.
    let mut raster = raster.mirrored();
    raster.set_text(FILE_VERSION_KEY, FILE_VERSION);
    raster.set_text(DIM_X_KEY, size.width.to_string());
    raster.set_text(DIM_Y_KEY, size.height.to_string());
    raster.set_text(DIM_Z_KEY, size.depth.to_string());
    raster
}

/// Builds a palette from the color table of an indexed raster.
///
/// Entries beyond [`Palette::MAX_CAPACITY`] cannot be referred to by any index and are
/// dropped.
pub fn palette_from_color_table(table: &[[u8; 4]]) -> Palette {
    if table.len() > Palette::MAX_CAPACITY {
        log::warn!(
            "color table has {len} entries; ignoring all but the first {max}",
            len = table.len(),
            max = Palette::MAX_CAPACITY
        );
    }
    Palette::from_colors(
        IMPORTED_PALETTE_NAME,
        table
            .iter()
            .take(Palette::MAX_CAPACITY)
            .map(|&entry| Rgba::from_8bit(entry)),
    )
    .unwrap_or_else(|error| unreachable!("{error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rgba_raster(width: usize, height: usize, dims: Option<[&str; 3]>) -> Raster {
        let mut raster = Raster::from_rgba(width, height, vec![[0; 4]; width * height]).unwrap();
        if let Some([x, y, z]) = dims {
            raster.set_text(DIM_X_KEY, x);
            raster.set_text(DIM_Y_KEY, y);
            raster.set_text(DIM_Z_KEY, z);
        }
        raster
    }

    /// Color whose channels survive 8-bit conversion exactly.
    fn c8(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba::from_8bit([r, g, b, a])
    }

    #[test]
    fn tiling_dimensions() {
        let layer = VoxelGridLayer::new(GridAab::from_lower_size([0, 0, 0], [2, 3, 2]));
        let raster = layer_to_raster(&layer);
        assert_eq!((raster.width(), raster.height()), (4, 3));
        assert_eq!(raster.text(FILE_VERSION_KEY), Some("1"));
        assert_eq!(raster.text(DIM_X_KEY), Some("2"));
        assert_eq!(raster.text(DIM_Y_KEY), Some("3"));
        assert_eq!(raster.text(DIM_Z_KEY), Some("2"));
    }

    #[test]
    fn pixel_placement() {
        // Cell (x=1, y=0, z=1) of a 2×3×2 layer belongs in column 1 + 1·2 = 3
        // and, being at the bottom, in the last row.
        let mut layer = VoxelGridLayer::new(GridAab::from_lower_size([5, -7, 100], [2, 3, 2]));
        layer
            .set([5 + 1, -7, 100 + 1], c8(1, 2, 3, 4), None)
            .unwrap();
        let raster = layer_to_raster(&layer);
        assert_eq!(raster.pixel_rgba(3, 2), Some([1, 2, 3, 4]));
        assert_eq!(raster.pixel_rgba(3, 0), Some([0, 0, 0, 0]));
    }

    #[rstest]
    #[case::no_metadata(None)]
    #[case::zero_z(Some(["2", "1", "0"]))]
    #[case::negative_x(Some(["-2", "1", "1"]))]
    #[case::not_a_number(Some(["2", "one", "1"]))]
    fn invalid_metadata_is_not_voxel_image(#[case] dims: Option<[&str; 3]>) {
        let raster = rgba_raster(2, 1, dims);
        assert!(layer_from_raster(&raster, None).is_none());
    }

    #[test]
    fn missing_z_is_not_voxel_image() {
        let mut raster = rgba_raster(2, 1, None);
        raster.set_text(DIM_X_KEY, "2");
        raster.set_text(DIM_Y_KEY, "1");
        assert!(layer_from_raster(&raster, None).is_none());
    }

    #[test]
    fn size_mismatch_is_not_voxel_image() {
        assert!(layer_from_raster(&rgba_raster(4, 3, Some(["2", "3", "2"])), None).is_some());
        assert!(layer_from_raster(&rgba_raster(5, 3, Some(["2", "3", "2"])), None).is_none());
        assert!(layer_from_raster(&rgba_raster(4, 2, Some(["2", "3", "2"])), None).is_none());
    }

    #[test]
    fn direct_round_trip() {
        let bounds = GridAab::from_lower_size([-1, 2, 0], [3, 2, 4]);
        let mut layer = VoxelGridLayer::new(bounds);
        for (n, cube) in bounds.interior_iter().enumerate() {
            let n = n as u8;
            layer
                .set(cube, c8(n * 10, 255 - n, n, 255 - n * 7), None)
                .unwrap();
        }

        let decoded = layer_from_raster(&layer_to_raster(&layer), None).unwrap();

        assert!(!decoded.is_indexed());
        assert_eq!(
            decoded.bounds(),
            GridAab::from_lower_size([0, 0, 0], [3, 2, 4])
        );
        for cube in bounds.interior_iter() {
            let moved = Cube::ORIGIN + (cube - origin_of(bounds));
            assert_eq!(decoded.get(moved), layer.get(cube), "{cube:?}");
        }
    }

    fn origin_of(bounds: GridAab) -> Cube {
        Cube::from(bounds.lower_bounds())
    }

    #[test]
    fn indexed_round_trip_with_supplied_palette() {
        let palette = Arc::new(Palette::default_main());
        let bounds = GridAab::from_lower_size([0, 0, 0], [2, 2, 2]);
        let mut layer = VoxelGridLayer::with_palette(bounds, Arc::clone(&palette));
        for (n, cube) in bounds.interior_iter().enumerate() {
            let index = (n * 37) as u8;
            let color = palette.color(index.into()).unwrap();
            layer.set(cube, color, Some(index)).unwrap();
        }

        let raster = layer_to_raster(&layer);
        assert_eq!(raster.color_table().map(<[_]>::len), Some(256));
        let decoded = layer_from_raster(&raster, Some(Arc::clone(&palette))).unwrap();

        assert!(Arc::ptr_eq(decoded.palette().unwrap(), &palette));
        for cube in bounds.interior_iter() {
            let original = layer.get(cube);
            let roundtripped = decoded.get(cube);
            assert_eq!(roundtripped.index, original.index, "{cube:?}");
            // Colors come back through the 8-bit color table.
            assert_eq!(
                roundtripped.color.to_8bit_truncated(),
                original.color.to_8bit_truncated()
            );
        }
    }

    #[test]
    fn indexed_without_palette_builds_one() {
        let table: Vec<[u8; 4]> = vec![[255, 0, 0, 255], [0, 0, 255, 128]];
        let mut raster = Raster::from_indexed(2, 1, vec![1, 0], table).unwrap();
        raster.set_text(DIM_X_KEY, "1");
        raster.set_text(DIM_Y_KEY, "1");
        raster.set_text(DIM_Z_KEY, "2");

        let layer = layer_from_raster(&raster, None).unwrap();
        let palette = layer.palette().unwrap();
        assert_eq!(palette.name(), IMPORTED_PALETTE_NAME);
        assert_eq!(palette.num_colors(), 2);
        assert_eq!(layer.index([0, 0, 0]), Some(1));
        assert_eq!(layer.color([0, 0, 0]), c8(0, 0, 255, 128));
        assert_eq!(layer.index([0, 0, 1]), Some(0));
    }

    #[test]
    fn empty_color_table_decodes_as_direct() {
        let mut raster = Raster::from_indexed(1, 1, vec![0], vec![]).unwrap();
        raster.set_text(DIM_X_KEY, "1");
        raster.set_text(DIM_Y_KEY, "1");
        raster.set_text(DIM_Z_KEY, "1");
        let supplied = Arc::new(Palette::default_main());

        for palette in [None, Some(supplied)] {
            let layer = layer_from_raster(&raster, palette).unwrap();
            assert!(!layer.is_indexed());
            assert!(layer.palette().is_none());
            assert_eq!(layer.index([0, 0, 0]), None);
            assert_eq!(layer.color([0, 0, 0]), Rgba::TRANSPARENT);
        }
    }

    #[test]
    fn unset_index_encodes_as_zero() {
        let palette = Arc::new(Palette::from_colors("p", [Rgba::WHITE]).unwrap());
        let layer =
            VoxelGridLayer::with_palette(GridAab::from_lower_size([0, 0, 0], [1, 1, 1]), palette);
        let raster = layer_to_raster(&layer);
        assert_eq!(raster.pixel_index(0, 0), Some(0));
        assert_eq!(raster.color_table(), Some(&[[255, 255, 255, 255]][..]));
    }

    #[test]
    fn empty_layer_encodes_to_empty_raster() {
        let layer = VoxelGridLayer::new(GridAab::from_lower_size([0, 0, 0], [3, 0, 2]));
        let raster = layer_to_raster(&layer);
        assert_eq!((raster.width(), raster.height()), (6, 0));
        assert_eq!(raster.text(DIM_Y_KEY), Some("0"));
        // Zero dimensions are rejected on the way back in.
        assert!(layer_from_raster(&raster, None).is_none());
    }

    #[test]
    fn long_color_table_is_truncated() {
        let table = vec![[7, 7, 7, 7]; 300];
        let palette = palette_from_color_table(&table);
        assert_eq!(palette.num_colors(), Palette::MAX_CAPACITY);
        assert_eq!(palette.color(255), Ok(c8(7, 7, 7, 7)));
    }
}
