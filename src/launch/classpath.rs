// ─── Classpath Builder ───
// Resolves manifest library declarations into the ordered, deduplicated
// classpath handed to the JVM.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::launch::defaults::SPECIAL_LOADER_PREFIX;
use crate::maven::MavenCoordinate;
use crate::paths::path_str;
use crate::platform::{classpath_separator, OsInfo};
use crate::version::manifest::LibraryEntry;
use crate::version::rules::rules_allow;

/// Ordinal, segment-wise version comparison.
///
/// Segments split on `.` and `-`; the shorter version is padded with
/// implicit `"0"` segments. Two numeric segments compare as integers.
/// A numeric segment beats a non-numeric one outright (so `2.0` is
/// newer than `2.0-beta`). Two non-numeric segments compare as
/// case-insensitive strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let a_parts: Vec<&str> = a.split(['.', '-']).collect();
    let b_parts: Vec<&str> = b.split(['.', '-']).collect();
    let max_len = a_parts.len().max(b_parts.len());

    for idx in 0..max_len {
        let pa = a_parts.get(idx).copied().unwrap_or("0");
        let pb = b_parts.get(idx).copied().unwrap_or("0");

        let ordering = match (pa.parse::<i64>().ok(), pb.parse::<i64>().ok()) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => pa.to_ascii_lowercase().cmp(&pb.to_ascii_lowercase()),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Ordinary,
    Special,
}

/// Accumulates resolved library paths for one build invocation.
///
/// The version cache and both result buckets span the whole build, so a
/// child manifest supersedes a parent's older declaration of the same
/// artifact, and special-loader entries land after every ordinary entry
/// no matter which manifest declared them. Never share an instance
/// across builds.
pub struct ClasspathBuilder<'a> {
    libraries_root: &'a Path,
    os: &'a OsInfo,
    /// `group:artifact` → (version, resolved path); discarded with the
    /// builder at the end of the build.
    cache: HashMap<String, (String, String)>,
    ordinary: Vec<String>,
    special: Vec<String>,
}

impl<'a> ClasspathBuilder<'a> {
    pub fn new(libraries_root: &'a Path, os: &'a OsInfo) -> Self {
        Self {
            libraries_root,
            os,
            cache: HashMap::new(),
            ordinary: Vec::new(),
            special: Vec::new(),
        }
    }

    /// Scan one manifest's library list. Called once for a standalone
    /// version, parent-first when the version inherits.
    pub fn add_libraries(&mut self, libraries: &[LibraryEntry]) {
        for library in libraries {
            self.add_library(library);
        }
    }

    fn add_library(&mut self, library: &LibraryEntry) {
        let platform_qualified = library.name.split(':').count() >= 4;
        let rules = library.rules.as_deref().unwrap_or(&[]);

        if let Some(downloads) = &library.downloads {
            if platform_qualified && !rules_allow(rules, self.os) {
                debug!("Skipping library (platform rule): {}", library.name);
                return;
            }
            // Unqualified entry with native classifiers: native-only,
            // owned by the separate natives-extraction path.
            if !platform_qualified
                && downloads
                    .classifiers
                    .as_ref()
                    .is_some_and(|classifiers| !classifiers.is_empty())
            {
                debug!("Skipping native-only library: {}", library.name);
                return;
            }
        } else if platform_qualified && !rules_allow(rules, self.os) {
            debug!("Skipping library (platform rule): {}", library.name);
            return;
        }

        let coordinate = match MavenCoordinate::parse(&library.name) {
            Ok(coordinate) => coordinate,
            Err(_) => {
                debug!("Skipping library (bad coordinate): {}", library.name);
                return;
            }
        };
        let path = path_str(&self.libraries_root.join(coordinate.local_path()));
        let bucket = bucket_for(&library.name);

        // Platform-qualified coordinates never merge by version, even
        // against an unqualified declaration of the same artifact.
        if platform_qualified {
            self.push(bucket, path);
            return;
        }

        let key = format!("{}:{}", coordinate.group_id, coordinate.artifact_id);
        match self.cache.get(&key) {
            None => {
                self.cache
                    .insert(key, (coordinate.version.clone(), path.clone()));
                self.push(bucket, path);
            }
            Some((cached_version, cached_path)) => {
                if compare_versions(&coordinate.version, cached_version) != Ordering::Greater {
                    debug!("Skipping library (superseded): {}", library.name);
                    return;
                }
                let stale = cached_path.clone();
                self.ordinary.retain(|entry| entry != &stale);
                self.special.retain(|entry| entry != &stale);
                self.cache
                    .insert(key, (coordinate.version.clone(), path.clone()));
                self.push(bucket, path);
            }
        }
    }

    fn push(&mut self, bucket: Bucket, path: String) {
        match bucket {
            Bucket::Ordinary => self.ordinary.push(path),
            Bucket::Special => self.special.push(path),
        }
    }

    /// Final classpath: ordinary entries, then special-loader entries,
    /// then the client jar, joined with the platform path separator.
    pub fn build(self, client_jar: &Path) -> String {
        let mut entries = self.ordinary;
        entries.extend(self.special);
        entries.push(path_str(client_jar));
        entries.join(classpath_separator())
    }
}

fn bucket_for(name: &str) -> Bucket {
    let special = name
        .get(..SPECIAL_LOADER_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(SPECIAL_LOADER_PREFIX));
    if special {
        Bucket::Special
    } else {
        Bucket::Ordinary
    }
}
