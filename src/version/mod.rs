pub mod manifest;
pub mod rules;

pub use manifest::{LibraryEntry, VersionManifest};
pub use rules::{argument_tokens, rules_allow, Rule, RuleAction};
