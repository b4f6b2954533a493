use std::env;
use std::path::PathBuf;

use tomo_slice::assembler::OrthogonalSliceAssembler;
use tomo_slice::locator::{SliceRequest, TilePlaneLocator};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = env::args().skip(1);
    let tile_dir = PathBuf::from(
        args.next()
            .expect("usage: tomo-slice <tile-dir> <raw-width>"),
    );
    let raw_width = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .expect("usage: tomo-slice <tile-dir> <raw-width>");

    let (geometry, indices) =
        TilePlaneLocator::resolve(&tile_dir, raw_width, false, SliceRequest::default())
            .expect("should have resolved tile geometry");
    let slices = OrthogonalSliceAssembler::assemble(&tile_dir, &geometry, &indices)
        .expect("should have assembled cross-sections");

    info!("reconstruction binning: {}", geometry.binning_rec);
    info!(
        "depth plane {:?}, row section {:?}, column section {:?}",
        slices.depth_plane.dim(),
        slices.row_section.dim(),
        slices.col_section.dim()
    );
}
