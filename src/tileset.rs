use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tracing::{debug, warn};

use crate::enums::RecKind;
use crate::error::SliceError;

const TILE_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// An ordered run of reconstruction tiles under one directory.
///
/// Tiles are named `{prefix}_{index:05}.{tif|tiff}`; the numeric suffix of
/// the lexically first and last names defines the half-open stacking range
/// `[z_start, z_end)`. Gaps between the two are tolerated, not validated.
#[derive(Debug)]
pub struct TileSet {
    dir: PathBuf,
    names: Vec<String>,
    z_start: usize,
    z_end: usize,
}

impl TileSet {
    /// Scan a directory for reconstruction tiles.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::EmptyTileSet`] when no file carries a recognized
    /// extension, and [`SliceError::BadTileName`] when the first or last
    /// sorted name has no numeric suffix.
    pub fn scan(dir: &Path) -> Result<Self, SliceError> {
        let mut names: Vec<String> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_tile_name(name))
            .collect();

        if names.is_empty() {
            return Err(SliceError::EmptyTileSet {
                dir: dir.to_path_buf(),
            });
        }
        names.sort();

        let z_start = parse_index(&names[0])?;
        let z_end = parse_index(&names[names.len() - 1])? + 1;
        if z_end <= z_start {
            // suffixes must grow with the lexical order; unpadded numbering
            // breaks that
            return Err(SliceError::BadTileName {
                name: names[names.len() - 1].clone(),
            });
        }
        debug!(
            "found {} tiles in {}, range [{z_start}, {z_end})",
            names.len(),
            dir.display()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            names,
            z_start,
            z_end,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lexically sorted tile filenames.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// First stacking index present in the set.
    pub fn z_start(&self) -> usize {
        self.z_start
    }

    /// One past the last stacking index present in the set.
    pub fn z_end(&self) -> usize {
        self.z_end
    }

    /// Nominal stacking extent derived from the first and last suffixes.
    /// With gaps in the numbering this exceeds the actual tile count.
    pub fn stack_height(&self) -> usize {
        self.z_end - self.z_start
    }

    /// Pixel width of the first tile, read from the image header alone.
    pub fn probe_width(&self) -> Result<usize, SliceError> {
        let name = &self.names[0];
        let mut decoder = self.open_decoder(name)?;
        let (width, _) = decoder
            .dimensions()
            .map_err(|err| corrupt(name, &err))?;
        Ok(width as usize)
    }

    /// Name of the tile carrying the given stacking index, if present.
    pub fn find(&self, index: usize) -> Option<&str> {
        self.names
            .iter()
            .find(|name| parse_index(name).is_ok_and(|parsed| parsed == index))
            .map(String::as_str)
    }

    /// Decode the tile with the given stacking index in full.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::TileNotFound`] when no tile carries the index.
    pub fn read_index(&self, index: usize) -> Result<Array2<f32>, SliceError> {
        let name = self.find(index).ok_or_else(|| SliceError::TileNotFound {
            index,
            dir: self.dir.clone(),
        })?;
        self.read_tile(name)
    }

    /// Decode one tile in full as a 2D float array.
    pub fn read_tile(&self, name: &str) -> Result<Array2<f32>, SliceError> {
        let mut decoder = self.open_decoder(name)?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|err| corrupt(name, &err))?;
        let pixels = match decoder.read_image().map_err(|err| corrupt(name, &err))? {
            DecodingResult::F32(data) => data,
            DecodingResult::U16(data) => data.into_iter().map(f32::from).collect(),
            DecodingResult::U8(data) => data.into_iter().map(f32::from).collect(),
            _ => {
                return Err(SliceError::CorruptTile {
                    name: name.to_string(),
                    reason: "unsupported TIFF sample format".to_string(),
                });
            }
        };

        Array2::from_shape_vec((height as usize, width as usize), pixels).map_err(|err| {
            SliceError::CorruptTile {
                name: name.to_string(),
                reason: err.to_string(),
            }
        })
    }

    fn open_decoder(&self, name: &str) -> Result<Decoder<BufReader<File>>, SliceError> {
        let file = File::open(self.dir.join(name))?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|err| corrupt(name, &err))?;
        Ok(decoder.with_limits(Limits::unlimited()))
    }
}

/// Directory holding the reconstruction tiles for a raw dataset, following
/// the `{parent}_{rec_kind}/{basename}_rec` convention.
pub fn recon_dir(raw_file: &Path, kind: RecKind) -> PathBuf {
    let parent = raw_file.parent().unwrap_or_else(|| Path::new(""));
    let stem = raw_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut top = parent.as_os_str().to_os_string();
    top.push("_");
    top.push(kind.dir_suffix());
    PathBuf::from(top).join(format!("{stem}_rec"))
}

/// First line of the `rec_line.txt` the reconstruction pipeline drops next
/// to the tiles, recording the command that produced them. Best effort: a
/// missing or unreadable file yields `None`.
pub fn read_rec_line(tile_dir: &Path) -> Option<String> {
    let path = tile_dir.join("rec_line.txt");
    match fs::read_to_string(&path) {
        Ok(text) => text.lines().next().map(|line| line.trim_end().to_string()),
        Err(err) => {
            warn!(
                "no reconstruction command line at {}: {err}",
                path.display()
            );
            None
        }
    }
}

fn corrupt(name: &str, err: &tiff::TiffError) -> SliceError {
    SliceError::CorruptTile {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

fn is_tile_name(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        TILE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

fn parse_index(name: &str) -> Result<usize, SliceError> {
    let stem = name.split('.').next().unwrap_or(name);
    stem.rsplit('_')
        .next()
        .and_then(|suffix| suffix.parse().ok())
        .ok_or_else(|| SliceError::BadTileName {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_tile_extensions() {
        assert!(is_tile_name("recon_00042.tiff"));
        assert!(is_tile_name("r_00042.tif"));
        assert!(is_tile_name("r_00042.TIF"));
        assert!(!is_tile_name("recon_00042.png"));
        assert!(!is_tile_name("rec_line.txt"));
        assert!(!is_tile_name("noextension"));
    }

    #[test]
    fn parses_numeric_suffix() {
        assert_eq!(parse_index("recon_00123.tiff").unwrap(), 123);
        assert_eq!(parse_index("r_00000.tif").unwrap(), 0);
        // prefixes containing underscores still resolve the last segment
        assert_eq!(parse_index("sample_a_recon_00017.tiff").unwrap(), 17);
    }

    #[test]
    fn rejects_names_without_suffix() {
        let err = parse_index("recon.tiff").unwrap_err();
        assert!(matches!(err, SliceError::BadTileName { name } if name == "recon.tiff"));
    }

    #[test]
    fn builds_recon_dir_for_both_variants() {
        let raw = Path::new("/data/exp/sample.h5");
        assert_eq!(
            recon_dir(raw, RecKind::Rec),
            PathBuf::from("/data/exp_rec/sample_rec")
        );
        assert_eq!(
            recon_dir(raw, RecKind::RecGpu),
            PathBuf::from("/data/exp_recgpu/sample_rec")
        );
    }

    #[test]
    fn tile_prefix_matches_variant() {
        assert_eq!(RecKind::Rec.tile_prefix(), "recon");
        assert_eq!(RecKind::RecGpu.tile_prefix(), "r");
    }
}
