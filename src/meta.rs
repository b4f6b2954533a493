use std::collections::HashMap;

use tracing::warn;

use crate::error::SliceError;

/// A single acquisition-metadata entry: the stored value plus its unit, both
/// as written by the metadata reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaValue {
    pub value: String,
    pub unit: Option<String>,
}

/// Key -> (value, unit) table produced by the external metadata reader.
///
/// Only the output contract of that reader is consumed here: keys are flat
/// strings, values arrive untyped and are parsed on access.
#[derive(Debug, Clone, Default)]
pub struct ScanMeta {
    entries: HashMap<String, MetaValue>,
}

impl ScanMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: &str, unit: Option<&str>) {
        self.entries.insert(
            key.to_string(),
            MetaValue {
                value: value.to_string(),
                unit: unit.map(str::to_string),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    /// # Errors
    ///
    /// Returns [`SliceError::MissingMeta`] if the key is absent.
    pub fn str(&self, key: &str) -> Result<&str, SliceError> {
        self.get(key)
            .map(|entry| entry.value.as_str())
            .ok_or_else(|| SliceError::MissingMeta {
                key: key.to_string(),
            })
    }

    pub fn usize(&self, key: &str) -> Result<usize, SliceError> {
        let raw = self.str(key)?;
        raw.trim()
            .parse()
            .map_err(|_| SliceError::InvalidMeta {
                key: key.to_string(),
                reason: format!("expected an integer, got {raw:?}"),
            })
    }

    pub fn f64(&self, key: &str) -> Result<f64, SliceError> {
        let raw = self.str(key)?;
        raw.trim()
            .parse()
            .map_err(|_| SliceError::InvalidMeta {
                key: key.to_string(),
                reason: format!("expected a number, got {raw:?}"),
            })
    }
}

/// Metadata key names and the double-FOV detection rule for one beamline.
///
/// The per-beamline variants of the original acquisition software differ only
/// in which keys carry the projection shape, the detector binning and the
/// sample offset; a profile value captures those differences so a single
/// locator/assembler serves every instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamlineProfile {
    pub name: &'static str,
    pub data_size_key: &'static str,
    pub binning_key: &'static str,
    /// Horizontal sample position during flat-field acquisition; a nonzero
    /// value means the sample was off center and two half-scans were stitched.
    pub sample_x_key: Option<&'static str>,
}

impl BeamlineProfile {
    /// APS 2-BM micro-CT instrument.
    pub fn aps_2bm() -> Self {
        Self {
            name: "2-bm",
            data_size_key: "exchange_data",
            binning_key: "measurement_instrument_detector_binning_x",
            sample_x_key: Some("process_acquisition_flat_fields_sample_in_x"),
        }
    }

    /// Instruments without a recorded sample offset; double FOV only when the
    /// caller asserts it.
    pub fn generic() -> Self {
        Self {
            name: "generic",
            data_size_key: "exchange_data",
            binning_key: "measurement_instrument_detector_binning_x",
            sample_x_key: None,
        }
    }

    /// Raw projection shape `(frames, height, width)` parsed from the
    /// data-size string, e.g. `"(1500, 2048, 2448)"`.
    pub fn raw_dims(&self, meta: &ScanMeta) -> Result<(usize, usize, usize), SliceError> {
        let raw = meta.str(self.data_size_key)?;
        parse_dims(self.data_size_key, raw)
    }

    /// Un-binned projection width, the reference for binning inference.
    pub fn raw_width(&self, meta: &ScanMeta) -> Result<usize, SliceError> {
        self.raw_dims(meta).map(|(_, _, width)| width)
    }

    pub fn detector_binning(&self, meta: &ScanMeta) -> Result<usize, SliceError> {
        meta.usize(self.binning_key)
    }

    /// Whether the acquisition used a double field of view: either the caller
    /// forces it, or this profile records a sample offset and it is nonzero.
    pub fn is_double_fov(&self, meta: &ScanMeta, forced: bool) -> bool {
        if forced {
            return true;
        }
        let Some(key) = self.sample_x_key else {
            return false;
        };
        match meta.f64(key) {
            Ok(offset) if offset != 0.0 => {
                warn!(
                    "sample in x is off center ({offset}), handling the data set as a double FOV"
                );
                true
            }
            _ => false,
        }
    }
}

fn parse_dims(key: &str, raw: &str) -> Result<(usize, usize, usize), SliceError> {
    let invalid = |reason: String| SliceError::InvalidMeta {
        key: key.to_string(),
        reason,
    };

    let trimmed = raw.trim().trim_start_matches('(').trim_end_matches(')');
    let parts: Vec<usize> = trimmed
        .split(',')
        .map(|part| part.trim().parse())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid(format!("expected \"(frames, height, width)\", got {raw:?}")))?;

    match parts[..] {
        [frames, height, width] => Ok((frames, height, width)),
        _ => Err(invalid(format!(
            "expected 3 dimensions, got {}",
            parts.len()
        ))),
    }
}
