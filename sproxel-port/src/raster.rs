//! [`Raster`], an in-memory 2D image with optional color table and text metadata.

use std::collections::BTreeMap;

/// Pixel storage of a [`Raster`], in row-major order starting from the top row.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Pixels {
    /// Each pixel is an 8-bit RGBA color, not premultiplied.
    Rgba(Vec<[u8; 4]>),
    /// Each pixel is an index into the color table.
    Indexed {
        /// One index per pixel.
        indices: Vec<u8>,
        /// RGBA colors, at most 256 of which are addressable.
        color_table: Vec<[u8; 4]>,
    },
}

impl Pixels {
    fn len(&self) -> usize {
        match self {
            Pixels::Rgba(pixels) => pixels.len(),
            Pixels::Indexed { indices, .. } => indices.len(),
        }
    }
}

/// A 2D image made of either RGBA pixels or color-table indices, with a set of
/// key-value text metadata entries.
///
/// This is the intermediate form between voxel layers and image files: the
/// [`slices`](crate::slices) codec converts between layers and rasters, and
/// [`png_io`](crate::png_io) between rasters and PNG bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    /// Invariant: `pixels.len() == width * height`.
    pixels: Pixels,
    text: BTreeMap<String, String>,
}

impl Raster {
    /// Constructs a raster from RGBA pixels in row-major order.
    pub fn from_rgba(
        width: usize,
        height: usize,
        pixels: Vec<[u8; 4]>,
    ) -> Result<Self, RasterSizeError> {
        Self::new(width, height, Pixels::Rgba(pixels))
    }

    /// Constructs a raster from color-table indices in row-major order.
    ///
    /// Indices are not required to be less than the length of the color table; such
    /// pixels read as transparent black.
    pub fn from_indexed(
        width: usize,
        height: usize,
        indices: Vec<u8>,
        color_table: Vec<[u8; 4]>,
    ) -> Result<Self, RasterSizeError> {
        Self::new(
            width,
            height,
            Pixels::Indexed {
                indices,
                color_table,
            },
        )
    }

    fn new(width: usize, height: usize, pixels: Pixels) -> Result<Self, RasterSizeError> {
        match width.checked_mul(height) {
            Some(area) if area == pixels.len() => Ok(Self {
                width,
                height,
                pixels,
                text: BTreeMap::new(),
            }),
            _ => Err(RasterSizeError {
                width,
                height,
                len: pixels.len(),
            }),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel storage.
    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    /// Returns whether pixels are color-table indices rather than colors.
    pub fn is_indexed(&self) -> bool {
        matches!(self.pixels, Pixels::Indexed { .. })
    }

    /// Returns the color table, if this raster is indexed.
    pub fn color_table(&self) -> Option<&[[u8; 4]]> {
        match &self.pixels {
            Pixels::Rgba(_) => None,
            Pixels::Indexed { color_table, .. } => Some(color_table),
        }
    }

    fn linear_index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Returns the color-table index of the pixel at (`x`, `y`), counting from the top left.
    ///
    /// Returns [`None`] if the raster is not indexed or the position is out of bounds.
    pub fn pixel_index(&self, x: usize, y: usize) -> Option<u8> {
        let i = self.linear_index(x, y)?;
        match &self.pixels {
            Pixels::Rgba(_) => None,
            Pixels::Indexed { indices, .. } => Some(indices[i]),
        }
    }

    /// Returns the color of the pixel at (`x`, `y`), counting from the top left.
    ///
    /// For indexed rasters, this is the color-table entry, or transparent black if the
    /// index has no entry.
    /// Returns [`None`] if the position is out of bounds.
    pub fn pixel_rgba(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let i = self.linear_index(x, y)?;
        Some(match &self.pixels {
            Pixels::Rgba(pixels) => pixels[i],
            Pixels::Indexed {
                indices,
                color_table,
            } => color_table
                .get(usize::from(indices[i]))
                .copied()
                .unwrap_or([0; 4]),
        })
    }

    /// Returns the text metadata value for `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.text.get(key).map(String::as_str)
    }

    /// Sets the text metadata value for `key`, replacing any previous value.
    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.text.insert(key.into(), value.into());
    }

    /// Iterates over all text metadata entries, sorted by key.
    pub fn text_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.text.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy of this raster flipped top to bottom.
    ///
    /// The copy has the same pixel format and color table, but **no** text metadata.
    /// Code which writes metadata must do so after any mirroring.
    #[must_use]
    pub fn mirrored(&self) -> Raster {
        fn flip_rows<T: Copy>(pixels: &[T], width: usize) -> Vec<T> {
            if width == 0 {
                return Vec::new();
            }
            pixels.chunks_exact(width).rev().flatten().copied().collect()
        }

        let pixels = match &self.pixels {
            Pixels::Rgba(pixels) => Pixels::Rgba(flip_rows(pixels, self.width)),
            Pixels::Indexed {
                indices,
                color_table,
            } => Pixels::Indexed {
                indices: flip_rows(indices, self.width),
                color_table: color_table.clone(),
            },
        };
        Raster {
            width: self.width,
            height: self.height,
            pixels,
            text: BTreeMap::new(),
        }
    }
}

/// Error when the pixel data given to a [`Raster`] constructor does not match its size.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{len} pixels cannot fill a raster of {width}×{height}")]
#[non_exhaustive]
pub struct RasterSizeError {
    /// Requested width.
    pub width: usize,
    /// Requested height.
    pub height: usize,
    /// Number of pixels provided.
    pub len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_indexed() -> Raster {
        Raster::from_indexed(
            2,
            3,
            vec![0, 1, 2, 3, 4, 9],
            vec![
                [10, 0, 0, 255],
                [20, 0, 0, 255],
                [30, 0, 0, 255],
                [40, 0, 0, 255],
                [50, 0, 0, 0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn size_mismatch() {
        assert_eq!(
            Raster::from_rgba(2, 2, vec![[0; 4]; 3]),
            Err(RasterSizeError {
                width: 2,
                height: 2,
                len: 3
            })
        );
        assert!(Raster::from_rgba(0, 5, vec![]).is_ok());
    }

    #[test]
    fn pixel_access() {
        let raster = sample_indexed();
        assert!(raster.is_indexed());
        assert_eq!(raster.pixel_index(1, 1), Some(3));
        assert_eq!(raster.pixel_rgba(1, 1), Some([40, 0, 0, 255]));
        assert_eq!(raster.pixel_index(2, 0), None);
        assert_eq!(raster.pixel_rgba(0, 3), None);
        // index beyond the color table
        assert_eq!(raster.pixel_index(1, 2), Some(9));
        assert_eq!(raster.pixel_rgba(1, 2), Some([0, 0, 0, 0]));

        let rgba = Raster::from_rgba(1, 1, vec![[1, 2, 3, 4]]).unwrap();
        assert_eq!(rgba.pixel_index(0, 0), None);
        assert_eq!(rgba.color_table(), None);
    }

    #[test]
    fn mirror_flips_rows_and_drops_text() {
        let mut raster = sample_indexed();
        raster.set_text("VoxelGridDimX", "1");
        let mirrored = raster.mirrored();

        assert_eq!(mirrored.pixel_index(0, 0), Some(4));
        assert_eq!(mirrored.pixel_index(1, 0), Some(9));
        assert_eq!(mirrored.pixel_index(0, 2), Some(0));
        assert_eq!(mirrored.color_table(), raster.color_table());
        assert_eq!(mirrored.text("VoxelGridDimX"), None);
        assert_eq!(mirrored.text_entries().count(), 0);
        assert_eq!(raster.text("VoxelGridDimX"), Some("1"));

        let mut twice = mirrored.mirrored();
        twice.set_text("VoxelGridDimX", "1");
        assert_eq!(twice, raster);
    }

    #[test]
    fn text_is_sorted_and_replaced() {
        let mut raster = Raster::from_rgba(0, 0, vec![]).unwrap();
        raster.set_text("b", "1");
        raster.set_text("a", "2");
        raster.set_text("b", "3");
        assert_eq!(
            raster.text_entries().collect::<Vec<_>>(),
            vec![("a", "2"), ("b", "3")]
        );
    }
}
