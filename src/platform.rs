// ─── Platform Probe ───
// Current OS identity used by rule evaluation, native classifier
// lookups and the OS-compatibility JVM flags.

use sysinfo::System;

/// OS descriptor resolved once per build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    /// Manifest-convention OS name (`windows` / `osx` / `linux`).
    pub name: &'static str,
    /// Kernel/OS version string as reported by the system.
    pub version: String,
    pub arch: &'static str,
}

impl OsInfo {
    pub fn current() -> Self {
        Self {
            name: os_name(),
            version: System::os_version().unwrap_or_default(),
            arch: os_arch(),
        }
    }
}

/// Manifest-convention OS name for the current platform.
pub fn os_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "osx"
    } else {
        "linux"
    }
}

/// Manifest-convention architecture name for the current platform.
pub fn os_arch() -> &'static str {
    if cfg!(target_arch = "x86") {
        "x86"
    } else if cfg!(target_arch = "x86_64") {
        "x86_64"
    } else if cfg!(target_arch = "aarch64") {
        "arm64"
    } else {
        "unknown"
    }
}

/// Pointer-width suffix substituted for `${arch}` in native classifiers.
pub fn arch_bits() -> &'static str {
    if cfg!(target_pointer_width = "64") {
        "64"
    } else {
        "32"
    }
}

/// Whether the current OS reports a major version of at least `major`.
pub fn os_version_at_least(major: u32) -> bool {
    System::os_version()
        .and_then(|version| {
            version
                .split('.')
                .next()
                .and_then(|part| part.parse::<u32>().ok())
        })
        .is_some_and(|reported| reported >= major)
}

/// The Windows 10 compatibility flags only apply from that version on.
pub fn is_windows_10_or_newer() -> bool {
    cfg!(target_os = "windows") && os_version_at_least(10)
}

/// Java classpath separator for the current platform.
pub fn classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_name_matches_target() {
        let name = os_name();
        assert!(matches!(name, "windows" | "osx" | "linux"));
    }

    #[test]
    fn separator_matches_target() {
        if cfg!(target_os = "windows") {
            assert_eq!(classpath_separator(), ";");
        } else {
            assert_eq!(classpath_separator(), ":");
        }
    }
}
