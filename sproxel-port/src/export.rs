use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use sproxel::layer::VoxelGridLayer;

use crate::png_io::write_png;
use crate::slices::layer_to_raster;

/// Write a [`VoxelGridLayer`] as a voxel image file on disk, replacing any existing file.
pub fn export_layer_to_path(
    layer: &VoxelGridLayer,
    destination: &Path,
) -> Result<(), ExportError> {
    let mut writer = io::BufWriter::new(fs::File::create(destination)?);
    export_layer_to_writer(layer, &mut writer)?;
    writer.flush()?;
    log::info!(
        "wrote {bounds:?} to {path}",
        bounds = layer.bounds(),
        path = destination.display()
    );
    Ok(())
}

/// Write a [`VoxelGridLayer`] as voxel image data to `writer`.
///
/// Fails with [`ExportError::NotRepresentable`] if the layer has no cells, or is indexed
/// against an empty palette.
pub fn export_layer_to_writer(
    layer: &VoxelGridLayer,
    writer: impl io::Write,
) -> Result<(), ExportError> {
    write_png(&layer_to_raster(layer), writer)
}

/// Fatal errors that may be encountered during an export operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExportError {
    /// IO error while writing the data to a file or stream.
    #[error("could not write export data")]
    Write(#[from] io::Error),

    /// The PNG encoder rejected the image.
    #[error("could not encode image")]
    Encode(#[from] png::EncodingError),

    /// The layer cannot be represented as a PNG voxel image.
    #[non_exhaustive]
    #[error("could not convert layer to PNG: cannot store {reason}")]
    NotRepresentable {
        /// The reason why it cannot be represented.
        reason: String,
    },
}
