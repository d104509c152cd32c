use std::io;
use std::sync::Arc;

use sproxel::layer::VoxelGridLayer;
use sproxel::palette::Palette;

use crate::file::Fileish;
use crate::png_io::{PNG_SIGNATURE, read_png};
use crate::slices::layer_from_raster;

/// Load a [`VoxelGridLayer`] from a voxel image file.
///
/// If the image is indexed, the layer is indexed against `palette`, or against a new palette
/// built from the image's color table if `palette` is [`None`]. The layer is named after
/// [`Fileish::document_name()`].
pub fn load_layer(
    file: &dyn Fileish,
    palette: Option<Arc<Palette>>,
) -> Result<VoxelGridLayer, ImportError> {
    let fail = |detail| ImportError {
        source_path: file.display_full_path(),
        detail,
    };

    let bytes = file
        .read()
        .map_err(|error| ImportErrorKind::Read { path: None, error })
        .map_err(fail)?;
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(fail(ImportErrorKind::UnknownFormat {}));
    }
    let raster = read_png(&bytes).map_err(fail)?;
    let mut layer = layer_from_raster(&raster, palette)
        .ok_or_else(|| fail(ImportErrorKind::NotVoxelImage {}))?;
    layer.set_name(file.document_name());

    log::info!(
        "loaded {path:?}: {bounds:?}, {mode}",
        path = file.display_full_path(),
        bounds = layer.bounds(),
        mode = if layer.is_indexed() {
            "indexed"
        } else {
            "direct color"
        }
    );
    Ok(layer)
}

/// Fatal errors that may be encountered during an import operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[error("failed to import '{source_path}'")]
pub struct ImportError {
    /// The path, as produced by [`Fileish::display_full_path()`], of the file being imported.
    pub source_path: String,

    #[source]
    pub(crate) detail: ImportErrorKind,
}

impl ImportError {
    /// Returns the specific reason the import failed.
    pub fn kind(&self) -> &ImportErrorKind {
        &self.detail
    }
}

/// Specific reason why an import operation failed.
/// Always contained within an [`ImportError`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImportErrorKind {
    /// An IO error occurred while reading the data to import.
    #[non_exhaustive]
    #[error("failed to read data from {path:?}")]
    Read {
        /// The path of the file which could not be read, if it is not identical to the
        /// [`ImportError::source_path`].
        path: Option<String>,

        /// The IO error that occurred while reading.
        #[source]
        error: io::Error,
    },

    /// The data was not a valid PNG image.
    #[error("failed to decode the image")]
    Decode(
        /// Details of the decoding error.
        #[source]
        Box<dyn std::error::Error + Send + Sync>,
    ),

    /// The data is not in a recognized format.
    #[non_exhaustive]
    #[error("the data is not in a recognized format")]
    UnknownFormat {},

    /// The data is a valid image, but lacks voxel grid dimensions or has dimensions
    /// which do not match its size.
    #[non_exhaustive]
    #[error("the image is not a voxel image")]
    NotVoxelImage {},
}
