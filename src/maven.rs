// ─── Library Coordinates ───
// Maps a manifest coordinate string to its jar location under a
// libraries root.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LaunchError, LaunchResult};

/// A parsed library coordinate.
///
/// Supported formats:
///   `group:artifact:version`
///   `group:artifact:version:classifier`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MavenCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl MavenCoordinate {
    /// Parse a coordinate string. Any segment count other than 3 or 4
    /// fails; the classpath builder skips such entries without aborting
    /// the build.
    pub fn parse(coord: &str) -> LaunchResult<Self> {
        let parts: Vec<&str> = coord.split(':').collect();

        match parts.len() {
            3 => Ok(Self {
                group_id: parts[0].to_string(),
                artifact_id: parts[1].to_string(),
                version: parts[2].to_string(),
                classifier: None,
            }),
            4 => Ok(Self {
                group_id: parts[0].to_string(),
                artifact_id: parts[1].to_string(),
                version: parts[2].to_string(),
                classifier: Some(parts[3].to_string()),
            }),
            _ => Err(LaunchError::InvalidCoordinate(coord.to_string())),
        }
    }

    /// Group path portion (`net/sf/jopt-simple`).
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// Jar filename: `artifact-version[-classifier].jar`.
    pub fn filename(&self) -> String {
        match &self.classifier {
            Some(classifier) => {
                format!("{}-{}-{}.jar", self.artifact_id, self.version, classifier)
            }
            None => format!("{}-{}.jar", self.artifact_id, self.version),
        }
    }

    /// Path relative to the libraries root, mirroring the Maven local
    /// repository layout:
    /// `<group_path>/<artifact_id>/<version>/<filename>`.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.group_path())
            .join(&self.artifact_id)
            .join(&self.version)
            .join(self.filename())
    }
}

impl fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(classifier) => write!(
                f,
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.version, classifier
            ),
            None => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version),
        }
    }
}

/// Jar path for a coordinate carrying an explicit `natives-` classifier
/// (modern manifests). `None` when the 4th segment is missing or not a
/// natives classifier.
pub fn natives_classifier_path(coord: &str, libraries_root: &Path) -> Option<PathBuf> {
    let parsed = MavenCoordinate::parse(coord).ok()?;
    let classifier = parsed.classifier.as_deref()?;
    if !classifier.starts_with("natives-") {
        return None;
    }
    Some(libraries_root.join(parsed.local_path()))
}

/// Jar path for a legacy natives-map entry. The coordinate must be a
/// plain 3-segment coordinate; the classifier comes from the library's
/// natives map with `${arch}` already substituted.
pub fn native_jar_path(
    coord: &str,
    classifier: &str,
    libraries_root: &Path,
) -> LaunchResult<PathBuf> {
    let parsed = MavenCoordinate::parse(coord)?;
    if parsed.classifier.is_some() {
        return Err(LaunchError::NativesNameFormat(coord.to_string()));
    }

    Ok(libraries_root
        .join(parsed.group_path())
        .join(&parsed.artifact_id)
        .join(&parsed.version)
        .join(format!(
            "{}-{}-{}.jar",
            parsed.artifact_id, parsed.version, classifier
        )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_coordinate() {
        let coord = MavenCoordinate::parse("net.sf.jopt-simple:jopt-simple:5.0.4").unwrap();
        assert_eq!(coord.group_id, "net.sf.jopt-simple");
        assert_eq!(coord.artifact_id, "jopt-simple");
        assert_eq!(coord.version, "5.0.4");
        assert_eq!(coord.classifier, None);
    }

    #[test]
    fn parse_with_classifier() {
        let coord = MavenCoordinate::parse("org.lwjgl:lwjgl:3.3.3:natives-windows").unwrap();
        assert_eq!(coord.classifier, Some("natives-windows".to_string()));
    }

    #[test]
    fn parse_rejects_other_segment_counts() {
        assert!(MavenCoordinate::parse("only-one-segment").is_err());
        assert!(MavenCoordinate::parse("a:b").is_err());
        assert!(MavenCoordinate::parse("a:b:c:d:e").is_err());
    }

    #[test]
    fn local_path_construction() {
        let coord = MavenCoordinate::parse("org.lwjgl:lwjgl:3.3.3:natives-windows").unwrap();
        assert_eq!(
            coord.local_path(),
            PathBuf::from("org/lwjgl/lwjgl/3.3.3/lwjgl-3.3.3-natives-windows.jar")
        );
    }

    #[test]
    fn natives_classifier_path_requires_natives_prefix() {
        let root = Path::new("/libs");
        assert!(
            natives_classifier_path("org.lwjgl:lwjgl:3.3.3:natives-linux", root)
                .unwrap()
                .ends_with("lwjgl-3.3.3-natives-linux.jar")
        );
        assert!(natives_classifier_path("org.lwjgl:lwjgl:3.3.3:sources", root).is_none());
        assert!(natives_classifier_path("org.lwjgl:lwjgl:3.3.3", root).is_none());
    }

    #[test]
    fn native_jar_path_appends_classifier() {
        let path = native_jar_path("org.lwjgl:lwjgl:3.2.2", "natives-linux", Path::new("/libs"))
            .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/libs/org/lwjgl/lwjgl/3.2.2/lwjgl-3.2.2-natives-linux.jar")
        );
    }

    #[test]
    fn native_jar_path_rejects_qualified_coordinates() {
        let err = native_jar_path(
            "org.lwjgl:lwjgl:3.2.2:natives-linux",
            "natives-linux",
            Path::new("/libs"),
        )
        .unwrap_err();
        assert!(matches!(err, LaunchError::NativesNameFormat(_)));
    }
}
