use std::path::Path;

use tracing::{debug, info};

use crate::error::SliceError;
use crate::tileset::TileSet;

/// Derived, read-only facts about the conceptual 3D volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeGeometry {
    /// Un-binned projection width from acquisition metadata.
    pub raw_width: usize,
    /// In-plane tile width after reconstruction binning.
    pub in_plane_width: usize,
    /// In-plane tile height after reconstruction binning.
    pub in_plane_height: usize,
    /// Nominal extent along the stacking axis, `z_end - z_start`.
    pub stack_height: usize,
    /// Reconstruction binning factor, always >= 1.
    pub binning_rec: usize,
}

/// Caller-requested cross-section positions; `None` means "use the midpoint
/// of that axis".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceRequest {
    pub idx: Option<usize>,
    pub idy: Option<usize>,
    pub idz: Option<usize>,
}

/// Resolved cross-section positions, one per axis. Computed once per
/// assembly request and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceIndices {
    pub idx: usize,
    pub idy: usize,
    pub idz: usize,
}

pub struct TilePlaneLocator;

impl TilePlaneLocator {
    /// Resolve volume geometry and cross-section indices for a tile
    /// directory.
    ///
    /// Lists and sorts the tiles, probes the first one for its pixel width,
    /// infers the reconstruction binning factor from `raw_width`, and fills
    /// unrequested indices with the midpoint of the corresponding extent.
    /// Under `double_fov` the in-plane extents double and the binning factor
    /// is forced to 1, since the stitched raw width already matches the
    /// reconstruction width.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::EmptyTileSet`] when the directory holds no
    /// tiles and [`SliceError::InvalidGeometry`] when the probe width is 0
    /// or exceeds `raw_width`.
    pub fn resolve(
        tile_dir: &Path,
        raw_width: usize,
        double_fov: bool,
        requested: SliceRequest,
    ) -> Result<(VolumeGeometry, SliceIndices), SliceError> {
        let tiles = TileSet::scan(tile_dir)?;
        Self::resolve_with(&tiles, raw_width, double_fov, requested)
    }

    /// Same as [`TilePlaneLocator::resolve`] over an already-scanned set.
    pub fn resolve_with(
        tiles: &TileSet,
        raw_width: usize,
        double_fov: bool,
        requested: SliceRequest,
    ) -> Result<(VolumeGeometry, SliceIndices), SliceError> {
        // the probe read happens even when double FOV overrides its result
        let probe_width = tiles.probe_width()?;

        let (binning_rec, in_plane) = if double_fov {
            if raw_width == 0 {
                return Err(SliceError::InvalidGeometry {
                    raw_width,
                    probe_width,
                });
            }
            info!("handling the data set as a double FOV");
            (1, raw_width * 2)
        } else {
            let binning_rec = infer_binning(raw_width, probe_width)?;
            (binning_rec, raw_width / binning_rec)
        };

        let geometry = VolumeGeometry {
            raw_width,
            in_plane_width: in_plane,
            in_plane_height: in_plane,
            stack_height: tiles.stack_height(),
            binning_rec,
        };
        let indices = SliceIndices {
            idx: requested.idx.unwrap_or(geometry.in_plane_width / 2),
            idy: requested.idy.unwrap_or(geometry.in_plane_width / 2),
            idz: requested.idz.unwrap_or(geometry.stack_height / 2),
        };

        debug!(
            "tile range [{}, {}), probe width {probe_width}, binning {binning_rec}",
            tiles.z_start(),
            tiles.z_end()
        );
        info!(
            "resolved {}x{}x{} volume, cutting at x={} y={} z={}",
            geometry.in_plane_width,
            geometry.in_plane_height,
            geometry.stack_height,
            indices.idx,
            indices.idy,
            indices.idz
        );

        Ok((geometry, indices))
    }
}

fn infer_binning(raw_width: usize, probe_width: usize) -> Result<usize, SliceError> {
    if probe_width == 0 || probe_width > raw_width {
        return Err(SliceError::InvalidGeometry {
            raw_width,
            probe_width,
        });
    }
    Ok(raw_width / probe_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_binning_from_probe_width() {
        assert_eq!(infer_binning(2048, 512).unwrap(), 4);
        assert_eq!(infer_binning(2048, 2048).unwrap(), 1);
        // non-exact division floors, it does not round
        assert_eq!(infer_binning(2048, 1000).unwrap(), 2);
    }

    #[test]
    fn zero_probe_width_is_fatal() {
        let err = infer_binning(2048, 0).unwrap_err();
        assert!(matches!(
            err,
            SliceError::InvalidGeometry {
                raw_width: 2048,
                probe_width: 0
            }
        ));
    }

    #[test]
    fn oversized_probe_width_is_fatal() {
        // tiles wider than the raw projection happen in unflagged 0-360
        // scans; the factor would floor to 0
        let err = infer_binning(2048, 4096).unwrap_err();
        assert!(matches!(err, SliceError::InvalidGeometry { .. }));
    }
}
