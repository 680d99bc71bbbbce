// ─── craftlaunch ───
// Argument and classpath builder for Minecraft-style game clients.
//
// Architecture:
//   error     — central error enum shared by every module
//   platform  — OS identity, version threshold, classpath separator
//   paths     — filesystem probe helpers and data directories
//   account   — closed set of authentication contexts
//   config    — window / JVM / game configuration models
//   maven     — library coordinate parsing and jar path resolution
//   version   — manifest model + loader, platform rule evaluation
//   fetch     — file-fetch collaborator (auth agents, wrapper launcher)
//   launch    — classpath deduplication + argument assembly

pub mod account;
pub mod config;
pub mod error;
pub mod fetch;
pub mod launch;
pub mod maven;
pub mod paths;
pub mod platform;
pub mod version;

pub use account::Account;
pub use config::{GameConfig, JavaConfig, WindowConfig};
pub use error::{LaunchError, LaunchResult};
pub use fetch::{FetchItem, FileFetcher, HttpFetcher};
pub use launch::ArgumentsBuilder;
pub use version::VersionManifest;
