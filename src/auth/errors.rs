use thiserror::Error;

/// User-correctable failures of the session operations.
///
/// Callers branch on the variant (or [`AuthError::kind`]); the display text is
/// meant for people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No account found for that email address.")]
    AccountNotFound,

    #[error("Incorrect password. Please try again.")]
    InvalidCredentials,

    #[error("An account with that email already exists.")]
    EmailTaken,
}

impl AuthError {
    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccountNotFound => "account_not_found",
            Self::InvalidCredentials => "invalid_credentials",
            Self::EmailTaken => "email_taken",
        }
    }
}
