use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by tile scanning, geometry resolution and cross-section
/// assembly. All of these surface to the immediate caller; the orchestration
/// layer decides whether a dataset is skippable.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("no reconstruction tiles found in {dir}")]
    EmptyTileSet { dir: PathBuf },

    #[error("probe tile width {probe_width} is incompatible with raw width {raw_width}")]
    InvalidGeometry { raw_width: usize, probe_width: usize },

    #[error("no tile with index {index} in {dir}")]
    TileNotFound { index: usize, dir: PathBuf },

    #[error("{axis} index {index} out of range for tile {tile} (extent {extent})")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        extent: usize,
        tile: String,
    },

    #[error("cannot decode tile {name}: {reason}")]
    CorruptTile { name: String, reason: String },

    #[error("tile name {name} does not follow the numbering convention")]
    BadTileName { name: String },

    #[error("tile {name} spans {actual} pixels along {axis}, geometry says {expected}")]
    InconsistentTile {
        name: String,
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("metadata key {key} is missing")]
    MissingMeta { key: String },

    #[error("metadata key {key} is invalid: {reason}")]
    InvalidMeta { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
