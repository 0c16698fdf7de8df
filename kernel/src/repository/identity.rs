use async_trait::async_trait;
use thiserror::Error;

use crate::model::identity::{AccessToken, VerifiedIdentity};

/// Outcomes the external verification service can report for a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationFailure {
    #[error("token expired")]
    Expired,
    #[error("token revoked")]
    Revoked,
    #[error("token invalid")]
    Invalid,
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

#[mockall::automock]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &AccessToken) -> Result<VerifiedIdentity, VerificationFailure>;
}
