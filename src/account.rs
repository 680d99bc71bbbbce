// ─── Accounts ───
// Closed set of account kinds the argument assembler dispatches on.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const OFFLINE_ACCESS_TOKEN: &str = "offline_access_token";

/// Authentication context for one launch.
///
/// `Yggdrasil` and `UnifiedPass` each inject a Java agent into the JVM;
/// when `agent_jar` is `None` the assembler fetches the agent into the
/// launcher data directory on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Account {
    Microsoft {
        username: String,
        uuid: String,
        access_token: String,
    },
    Yggdrasil {
        username: String,
        uuid: String,
        access_token: String,
        /// Authentication server handed to the agent.
        server_url: String,
        #[serde(default)]
        agent_jar: Option<PathBuf>,
    },
    UnifiedPass {
        username: String,
        uuid: String,
        access_token: String,
        /// Server identifier handed to the agent.
        server_id: String,
        #[serde(default)]
        agent_jar: Option<PathBuf>,
    },
    Offline {
        username: String,
        uuid: String,
    },
}

impl Account {
    /// Offline account with a freshly generated identity.
    pub fn offline(username: &str) -> Self {
        Account::Offline {
            username: username.trim().to_string(),
            uuid: Uuid::new_v4().to_string(),
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Account::Microsoft { username, .. }
            | Account::Yggdrasil { username, .. }
            | Account::UnifiedPass { username, .. }
            | Account::Offline { username, .. } => username,
        }
    }

    pub fn uuid(&self) -> &str {
        match self {
            Account::Microsoft { uuid, .. }
            | Account::Yggdrasil { uuid, .. }
            | Account::UnifiedPass { uuid, .. }
            | Account::Offline { uuid, .. } => uuid,
        }
    }

    pub fn access_token(&self) -> &str {
        match self {
            Account::Microsoft { access_token, .. }
            | Account::Yggdrasil { access_token, .. }
            | Account::UnifiedPass { access_token, .. } => access_token,
            Account::Offline { .. } => OFFLINE_ACCESS_TOKEN,
        }
    }

    /// `${user_type}` value the game expects for this account kind.
    pub fn user_type(&self) -> &'static str {
        match self {
            Account::Microsoft { .. } => "msa",
            _ => "Mojang",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_account_has_generated_identity() {
        let account = Account::offline("  Alex ");
        assert_eq!(account.username(), "Alex");
        assert!(!account.uuid().is_empty());
        assert_eq!(account.access_token(), OFFLINE_ACCESS_TOKEN);
        assert_eq!(account.user_type(), "Mojang");
    }

    #[test]
    fn microsoft_account_reports_msa_user_type() {
        let account = Account::Microsoft {
            username: "Alex".into(),
            uuid: "uuid".into(),
            access_token: "token".into(),
        };
        assert_eq!(account.user_type(), "msa");
    }
}
