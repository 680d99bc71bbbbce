// ─── Platform Rules ───
// Declarative allow/disallow rules attached to libraries and argument
// fragments in version manifests.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::platform::OsInfo;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

/// OS predicate on a rule. Every present field must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsSpec {
    #[serde(default)]
    pub name: Option<String>,
    /// Regular expression matched against the reported OS version
    /// (manifest convention, e.g. `^10\\.`). A pattern that fails to
    /// compile never matches.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsSpec>,
    /// Feature predicates (demo mode, custom resolution) are owned by
    /// the frontend; a rule carrying one never matches here.
    #[serde(default)]
    pub features: Option<Value>,
}

impl OsSpec {
    fn matches(&self, os: &OsInfo) -> bool {
        if let Some(name) = &self.name {
            if name != os.name {
                return false;
            }
        }
        if let Some(arch) = &self.arch {
            if arch != os.arch {
                return false;
            }
        }
        if let Some(pattern) = &self.version {
            match Regex::new(pattern) {
                Ok(re) => {
                    if !re.is_match(&os.version) {
                        return false;
                    }
                }
                Err(_) => return false,
            }
        }
        true
    }
}

impl Rule {
    fn applies_to(&self, os: &OsInfo) -> bool {
        if self.features.is_some() {
            return false;
        }
        self.os.as_ref().map_or(true, |spec| spec.matches(os))
    }
}

/// Net inclusion decision for an ordered rule list.
///
/// - No rules → include.
/// - Otherwise start from "exclude"; every rule whose predicate matches
///   the current platform (or which has no predicate) overwrites the
///   running decision. The last applicable rule wins — this is easy to
///   mis-read as first-match-wins, which would invert the filtering.
pub fn rules_allow(rules: &[Rule], os: &OsInfo) -> bool {
    if rules.is_empty() {
        return true;
    }

    let mut allowed = false;
    for rule in rules {
        if rule.applies_to(os) {
            allowed = rule.action == RuleAction::Allow;
        }
    }
    allowed
}

/// String tokens an argument template element contributes on the
/// current platform.
///
/// Plain strings always contribute themselves. Rule-guarded objects
/// contribute their `value` (string or string array) only when the
/// rules allow the current OS; malformed rules are non-matching.
/// Anything else contributes nothing.
pub fn argument_tokens(element: &Value, os: &OsInfo) -> Vec<String> {
    if let Some(token) = element.as_str() {
        return vec![token.to_string()];
    }

    let Some(object) = element.as_object() else {
        return Vec::new();
    };

    if let Some(raw_rules) = object.get("rules") {
        let rules: Vec<Rule> = match serde_json::from_value(raw_rules.clone()) {
            Ok(rules) => rules,
            Err(_) => return Vec::new(),
        };
        if !rules_allow(&rules, os) {
            return Vec::new();
        }
    }

    match object.get("value") {
        Some(Value::String(token)) => vec![token.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(ToString::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
