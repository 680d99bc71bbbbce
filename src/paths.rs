// ─── Filesystem Probe ───
// Path resolution helpers shared by the manifest loader and the
// argument assembler.

use std::path::{Path, PathBuf};

use crate::error::{LaunchError, LaunchResult};

/// Default launcher data directory holding fetched artifacts
/// (`jar/` for agent and wrapper jars, `temp/` for wrapper scratch).
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("CraftLaunch")
}

/// Resolve a configured path against the current working directory
/// unless it is already absolute.
pub fn resolve_root(root: &Path) -> PathBuf {
    if root.is_absolute() {
        return root.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(root))
        .unwrap_or_else(|_| root.to_path_buf())
}

pub async fn ensure_dir(dir: &Path) -> LaunchResult<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| LaunchError::Io {
            path: dir.to_path_buf(),
            source: e,
        })
}

/// Fallback search for a `*natives*` directory below a version folder,
/// used when the expected `natives/` directory is missing.
pub fn find_natives_dir(version_dir: &Path) -> Option<PathBuf> {
    let mut stack = vec![version_dir.to_path_buf()];
    while let Some(current_dir) = stack.pop() {
        let read_dir = match std::fs::read_dir(&current_dir) {
            Ok(read_dir) => read_dir,
            Err(_) => continue,
        };

        for entry in read_dir.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains("natives"))
            {
                return Some(path);
            }
            stack.push(path);
        }
    }
    None
}

/// Path to string, stripping the `\\?\` extended-length prefix on
/// Windows because the JVM rejects it in classpath entries.
pub fn path_str(path: &Path) -> String {
    let text = path.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    {
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_root_keeps_absolute_paths() {
        let absolute = std::env::temp_dir();
        assert_eq!(resolve_root(&absolute), absolute);
    }

    #[test]
    fn resolve_root_anchors_relative_paths() {
        let resolved = resolve_root(Path::new("game"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("game"));
    }

    #[test]
    fn find_natives_dir_locates_nested_directory() {
        let temp = std::env::temp_dir().join(format!("paths-test-natives-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        let nested = temp.join("deep").join("lwjgl-natives-linux");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_natives_dir(&temp).unwrap();
        assert!(found.to_string_lossy().contains("natives"));

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[test]
    fn find_natives_dir_returns_none_when_absent() {
        let temp = std::env::temp_dir().join(format!("paths-test-none-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        std::fs::create_dir_all(temp.join("plain")).unwrap();

        assert!(find_natives_dir(&temp).is_none());

        let _ = std::fs::remove_dir_all(&temp);
    }
}
