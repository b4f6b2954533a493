//! # tomo-slice library
//!
//! Out-of-core extraction of orthogonal cross-sections from reconstructed
//! tomography volumes stored as thousands of numbered 2D TIFF tiles.
//!
//! Reconstruction pipelines at synchrotron micro-CT instruments write one
//! tile per layer along the stacking axis, named with a shared prefix and a
//! zero-padded numeric suffix. This crate never materializes the full 3D
//! volume: it infers the geometry (tile range, per-tile resolution,
//! reconstruction binning factor) from acquisition metadata plus a probe
//! read of a single tile header, then assembles the cuts by reading one row
//! and one column out of every tile in turn.
//!
//! The crate produces:
//!  - a depth plane (the full tile at the chosen stacking index)
//!  - a row section (one row per tile, stacked in tile order)
//!  - a column section (one column per tile, stacked in tile order)
//!
//! Cut positions default to the volume midpoint unless requested explicitly.
//! Photometric normalization, plotting and export of the returned arrays are
//! left to the caller.
//!
//! # Examples
//!
//! Resolve the geometry of a reconstructed data set and assemble the three
//! cross-sections through its center:
//!
//! ```no_run
//! # use std::path::Path;
//! # use tomo_slice::assembler::OrthogonalSliceAssembler;
//! # use tomo_slice::locator::{SliceRequest, TilePlaneLocator};
//! let tile_dir = Path::new("/data/exp_rec/sample_rec");
//! let (geometry, indices) =
//!     TilePlaneLocator::resolve(tile_dir, 2448, false, SliceRequest::default())
//!         .expect("should have resolved tile geometry");
//! let slices = OrthogonalSliceAssembler::assemble(tile_dir, &geometry, &indices)
//!     .expect("should have assembled cross-sections");
//! assert_eq!(slices.row_section.nrows(), geometry.stack_height);
//! ```

pub mod assembler;
pub mod enums;
pub mod error;
pub mod locator;
pub mod meta;
pub mod tileset;
