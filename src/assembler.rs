use std::path::Path;

use ndarray::{Array2, s};
use tracing::{debug, info, warn};

use crate::error::SliceError;
use crate::locator::{SliceIndices, VolumeGeometry};
use crate::tileset::TileSet;

/// The three orthogonal cross-sections through a reconstructed volume.
///
/// Freshly allocated per request; rows of `row_section` and `col_section`
/// follow the sorted tile order, so row `k` corresponds to stacking position
/// `z_start + k` when the numbering has no gaps.
#[derive(Debug)]
pub struct OrthoSlices {
    /// The full tile at stacking index `idz`.
    pub depth_plane: Array2<f32>,
    /// Row `idy` of every tile, stacked in tile order.
    pub row_section: Array2<f32>,
    /// Column `idx` of every tile, stacked in tile order.
    pub col_section: Array2<f32>,
}

pub struct OrthogonalSliceAssembler;

impl OrthogonalSliceAssembler {
    /// Assemble the three orthogonal cross-sections by scanning the tile
    /// directory once, never holding more than one tile in memory.
    ///
    /// The assembly is all-or-nothing: an unreadable tile or an
    /// out-of-range index aborts the whole call, no partially filled result
    /// is ever returned.
    ///
    /// # Errors
    ///
    /// [`SliceError::TileNotFound`] when no tile carries index `idz`,
    /// [`SliceError::IndexOutOfRange`] when `idx`/`idy` exceed a tile's
    /// extent, [`SliceError::CorruptTile`] when a tile cannot be decoded and
    /// [`SliceError::InconsistentTile`] when a tile disagrees with the
    /// resolved geometry.
    pub fn assemble(
        tile_dir: &Path,
        geometry: &VolumeGeometry,
        indices: &SliceIndices,
    ) -> Result<OrthoSlices, SliceError> {
        let tiles = TileSet::scan(tile_dir)?;
        Self::assemble_with(&tiles, geometry, indices)
    }

    /// Same as [`OrthogonalSliceAssembler::assemble`] over an
    /// already-scanned set.
    pub fn assemble_with(
        tiles: &TileSet,
        geometry: &VolumeGeometry,
        indices: &SliceIndices,
    ) -> Result<OrthoSlices, SliceError> {
        let depth_plane = tiles.read_index(indices.idz)?;

        let count = tiles.names().len();
        if count < geometry.stack_height {
            warn!(
                "tile numbering has gaps: {} tiles over a [{}, {}) range",
                count,
                tiles.z_start(),
                tiles.z_end()
            );
        }

        let mut row_section = Array2::<f32>::zeros((count, geometry.in_plane_width));
        let mut col_section = Array2::<f32>::zeros((count, geometry.in_plane_height));

        // One decode per z-index serves both cross-sections.
        for (k, name) in tiles.names().iter().enumerate() {
            let tile = tiles.read_tile(name)?;
            let (tile_height, tile_width) = tile.dim();

            if indices.idy >= tile_height {
                return Err(SliceError::IndexOutOfRange {
                    axis: "y",
                    index: indices.idy,
                    extent: tile_height,
                    tile: name.clone(),
                });
            }
            if indices.idx >= tile_width {
                return Err(SliceError::IndexOutOfRange {
                    axis: "x",
                    index: indices.idx,
                    extent: tile_width,
                    tile: name.clone(),
                });
            }
            if tile_width != geometry.in_plane_width {
                return Err(SliceError::InconsistentTile {
                    name: name.clone(),
                    axis: "x",
                    expected: geometry.in_plane_width,
                    actual: tile_width,
                });
            }
            if tile_height != geometry.in_plane_height {
                return Err(SliceError::InconsistentTile {
                    name: name.clone(),
                    axis: "y",
                    expected: geometry.in_plane_height,
                    actual: tile_height,
                });
            }

            row_section
                .slice_mut(s![k, ..])
                .assign(&tile.slice(s![indices.idy, ..]));
            col_section
                .slice_mut(s![k, ..])
                .assign(&tile.slice(s![.., indices.idx]));
            debug!("extracted row/column from {name}");
        }

        info!("assembled orthogonal cross-sections from {count} tiles");
        Ok(OrthoSlices {
            depth_plane,
            row_section,
            col_section,
        })
    }
}
