//! Conversion between [`sproxel`] layers and voxel image files.
//!
//! A voxel image is an ordinary raster image which stores one [`VoxelGridLayer`] by laying
//! its Z slices side by side; see [`slices`] for the exact layout. On disk, voxel images are
//! PNG files, either 8-bit indexed (for layers with a palette) or 8-bit RGBA.
//!
//! ## Package features
//!
//! This package defines the following feature flags:
//!
//! * `"import"`: loading voxel images ([`load_layer()`]).
//! * `"export"`: saving voxel images ([`export_layer_to_path()`]).
//!
//! The in-memory codec in [`slices`] is always available.
//!
//! [`VoxelGridLayer`]: sproxel::layer::VoxelGridLayer

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

// -------------------------------------------------------------------------------------------------

#[cfg(feature = "export")]
mod export;
#[cfg(feature = "export")]
pub use export::*;

#[cfg(feature = "import")]
mod import;
#[cfg(feature = "import")]
pub use import::*;

pub mod file;
pub mod png_io;
pub mod raster;
pub mod slices;
