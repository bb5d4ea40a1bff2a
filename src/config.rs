//! CLI-derived configuration and profile-scoped file locations.

use std::path::PathBuf;

/// Where the tool keeps its files and how rendering is tuned. All paths are
/// relative to the working directory and prefixed by the AWS profile name
/// when one is given, so per-profile state never collides.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Option<String>,
    pub zoom: Option<String>,
    pub groups_path: PathBuf,
    pub subs_path: PathBuf,
    pub sync_dir: PathBuf,
}

impl Config {
    pub fn new(profile: Option<String>, zoom: Option<String>) -> Self {
        let prefix = profile
            .as_deref()
            .map(|p| format!("{p}_"))
            .unwrap_or_default();
        Self {
            groups_path: PathBuf::from(format!("{prefix}groups.txt")),
            subs_path: PathBuf::from(format!("{prefix}subs.txt")),
            sync_dir: PathBuf::from(format!("{prefix}logs")),
            profile,
            zoom,
        }
    }

    /// The `--zoom` override; an empty value counts as absent, which lets
    /// the per-batch guess take over.
    pub fn zoom_override(&self) -> Option<&str> {
        self.zoom.as_deref().filter(|zoom| !zoom.is_empty())
    }
}
