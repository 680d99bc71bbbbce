// ─── Version Manifest ───
// On-disk version JSON model and loader. A version may inherit from
// exactly one parent version (single hop).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LaunchError, LaunchResult};
use crate::maven;
use crate::platform::{self, OsInfo};
use crate::version::rules::Rule;

/// One resolved version descriptor (`<root>/versions/<id>/<id>.json`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionManifest {
    pub id: String,
    #[serde(default)]
    pub inherits_from: Option<String>,
    /// Release channel (`release` / `snapshot` / ...).
    #[serde(default, rename = "type")]
    pub release_type: Option<String>,
    pub main_class: String,
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    /// Structured argument templates (post-1.13 manifests).
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy flat game-argument string (pre-structured manifests).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetIndexInfo {
    pub id: String,
}

/// JVM and game argument templates: each element is either a literal
/// token or a rule-guarded fragment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<Value>,
    #[serde(default)]
    pub jvm: Vec<Value>,
}

// ─── Library Entries ───

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryEntry {
    /// Coordinate string `group:artifact:version[:classifier]`.
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default)]
    pub rules: Option<Vec<Rule>>,
    /// Legacy OS → native classifier map.
    #[serde(default)]
    pub natives: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<DownloadArtifact>,
    /// Per-platform native jar descriptors. An unqualified entry with a
    /// non-empty classifier map is native-only and never lands on the
    /// classpath.
    #[serde(default)]
    pub classifiers: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub path: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

impl LibraryEntry {
    /// Native classifier for `os` from the legacy natives map, with
    /// `${arch}` substituted.
    pub fn native_classifier(&self, os: &OsInfo) -> Option<String> {
        let natives = self.natives.as_ref()?;
        natives
            .get(os.name)?
            .as_str()
            .map(|raw| raw.replace("${arch}", platform::arch_bits()))
    }

    /// Resolved path of this entry's platform-native jar, if it has one
    /// for `os`. Legacy natives-map entries must carry a plain
    /// 3-segment coordinate; modern entries encode the classifier in
    /// the coordinate itself.
    pub fn native_jar_path(
        &self,
        libraries_root: &Path,
        os: &OsInfo,
    ) -> LaunchResult<Option<PathBuf>> {
        match self.native_classifier(os) {
            Some(classifier) => {
                maven::native_jar_path(&self.name, &classifier, libraries_root).map(Some)
            }
            None => Ok(maven::natives_classifier_path(&self.name, libraries_root)),
        }
    }
}

impl VersionManifest {
    pub fn manifest_path(root: &Path, id: &str) -> PathBuf {
        root.join("versions").join(id).join(format!("{id}.json"))
    }

    /// Load and parse a version manifest. Read or parse failure here is
    /// fatal for the whole build.
    pub fn load(root: &Path, id: &str) -> LaunchResult<Self> {
        let path = Self::manifest_path(root, id);
        let raw = std::fs::read_to_string(&path).map_err(|e| LaunchError::ManifestRead {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&raw).map_err(|e| LaunchError::ManifestParse { path, source: e })
    }

    /// Structured-arguments manifests are the "new format".
    pub fn is_new_format(&self) -> bool {
        self.arguments.is_some()
    }

    /// Asset index identifier, whichever field the manifest carries.
    pub fn asset_index_id(&self) -> &str {
        self.assets
            .as_deref()
            .or_else(|| self.asset_index.as_ref().map(|index| index.id.as_str()))
            .unwrap_or("legacy")
    }

    /// Path of the client jar this version runs from. Inherited
    /// versions reuse the parent's jar.
    pub fn client_jar_path(&self, root: &Path) -> PathBuf {
        match &self.inherits_from {
            Some(parent) => root
                .join("versions")
                .join(parent)
                .join(format!("{parent}.jar")),
            None => root
                .join("versions")
                .join(&self.id)
                .join(format!("{}.jar", self.id)),
        }
    }
}
