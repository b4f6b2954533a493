#[derive(Clone, Copy, Default)]
pub enum RecKind {
    #[default]
    Rec,
    RecGpu,
}

impl RecKind {
    /// Suffix appended to the dataset's parent directory name to locate the
    /// reconstruction tree, e.g. `scans/` -> `scans_rec/`.
    pub fn dir_suffix(self) -> &'static str {
        match self {
            RecKind::Rec => "rec",
            RecKind::RecGpu => "recgpu",
        }
    }

    /// Filename prefix the reconstruction pipeline uses for this variant.
    pub fn tile_prefix(self) -> &'static str {
        match self {
            RecKind::Rec => "recon",
            RecKind::RecGpu => "r",
        }
    }
}
