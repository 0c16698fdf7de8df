use crate::model::{id::UserId, role::Role};

/// Claim set returned by the external verification service for a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// The authenticated caller, threaded explicitly into every core operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub subject: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Emails are stored lowercased, so comparisons ignore case.
    pub fn owns(&self, owner_email: &str) -> bool {
        self.email.eq_ignore_ascii_case(owner_email)
    }
}

pub struct AccessToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
