use serde::{Deserialize, Serialize};

/// A locally stored identity record.
///
/// Accounts are created by signup and never deleted. The `session_active`
/// flag is flipped by login and logout; nothing reconciles it across the
/// directory, so several entries may carry it at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    /// Unique across the directory, compared case-sensitively.
    pub email: String,
    pub name: String,
    /// Plaintext credential. Absent on records whose stored value was not a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub session_active: bool,
}

impl Account {
    /// Copy of this account with the session flag set to `active`.
    pub fn with_session(&self, active: bool) -> Self {
        Self {
            session_active: active,
            ..self.clone()
        }
    }

    /// Public view without the credential.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            session_active: self.session_active,
        }
    }
}

/// Account as exposed over the API, password omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub session_active: bool,
}

/// Credentials for logging in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Input for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Snapshot of the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Option<AccountSummary>,
    pub session_active: bool,
}
