// ─── Launch Configuration ───
// User-supplied settings consumed by the argument assembler. All three
// structs serialize as JSON so an embedding launcher can persist them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Game window preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 854,
            height: 480,
            fullscreen: false,
        }
    }
}

/// JVM resource limits and tuning toggles.
///
/// Memory values are plain megabytes and pass through uninterpreted;
/// validating them is the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JavaConfig {
    pub min_memory_mb: u32,
    pub max_memory_mb: u32,
    /// Skip the optional GC tuning flag set.
    #[serde(default)]
    pub disable_gc_tuning: bool,
    /// Skip the optional startup tuning flag set.
    #[serde(default)]
    pub disable_advanced_tuning: bool,
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            min_memory_mb: 512,
            max_memory_mb: 2048,
            disable_gc_tuning: false,
            disable_advanced_tuning: false,
        }
    }
}

/// Where the game lives and which version to launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game root (the `.minecraft` equivalent); resolved against the
    /// working directory when relative.
    pub root: PathBuf,
    /// Version identifier under `<root>/versions/`.
    pub version_id: String,
    /// Keep a per-version game directory instead of the shared root.
    #[serde(default)]
    pub version_isolation: bool,
    /// Override for the launcher data directory where fetched agent and
    /// wrapper jars are cached.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl GameConfig {
    pub fn new(root: impl Into<PathBuf>, version_id: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            version_id: version_id.into(),
            version_isolation: false,
            data_dir: None,
        }
    }
}
