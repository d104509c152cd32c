//! Sproxel is a voxel sprite editor whose models are stacks of independently paletted
//! layers, saved as ordinary raster images.
//!
//! This crate defines the in-memory model:
//!
//! * [`Palette`](palette::Palette) is a named table of up to 256 colors, shared between
//!   layers by [`Arc`](alloc::sync::Arc).
//! * [`VoxelGridLayer`](layer::VoxelGridLayer) is a box of voxels, each holding a color and,
//!   if the layer is indexed, a palette index.
//! * [`LayerGroup`](group::LayerGroup) stacks layers and can
//!   [`bake()`](group::LayerGroup::bake) them into one flattened layer.
//! * [`Project`](project::Project) holds the palettes and groups of one document.
//!
//! Conversion to and from image files lives in the `sproxel-port` crate.
//!
//! ## Dependencies and global state
//!
//! `sproxel` has no global state. It writes log messages using the [`log`] crate and is
//! therefore subject to that global configuration.
//!
//! `sproxel` depends on and re-exports [`euclid`] for vector math (as `sproxel::euclid`).

#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
// Lenience for tests.
#![cfg_attr(test,
    allow(clippy::float_cmp), // deterministic tests
    allow(clippy::redundant_clone), // prefer regularity over efficiency
)]

#[allow(unused_imports)] // false positive unused macro_use
#[macro_use]
extern crate alloc;
#[cfg(test)]
#[macro_use]
extern crate std;

pub mod math {
    //! Mathematical utilities and decisions.
    pub use sproxel_base::math::*;
}

pub mod group;
pub mod layer;
pub mod palette;
pub mod project;

pub mod util {
    //! Tools that we could imagine being in the Rust standard library, but aren't.
    pub use sproxel_base::util::*;
}

/// Re-export the version of the `euclid` vector math library we're using.
pub use euclid;
