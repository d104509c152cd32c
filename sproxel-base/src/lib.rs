//! This library is an internal component of [`sproxel`],
//! which defines some core mathematical types and functions.
//! Do not depend on this library; use only [`sproxel`] instead.
//!
//! [`sproxel`]: https://crates.io/crates/sproxel/

#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![cfg_attr(
    not(test),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
#![warn(clippy::missing_inline_in_public_items)]

#[cfg(test)]
#[macro_use]
extern crate std;
#[macro_use]
extern crate alloc;

/// Do not use this module directly; its contents are re-exported from `sproxel`.
pub mod math;

/// Do not use this module directly; its contents are re-exported from `sproxel`.
pub mod util;

// reexport for convenience of our tests
#[doc(hidden)]
pub use euclid;
