use std::sync::Arc;

use derive_new::new;
use shared::error::{AppError, AppResult, AuthFailure};

use crate::{
    model::{
        identity::{AccessToken, VerifiedIdentity},
        user::{event::CreateUser, ResolvedUser, User},
    },
    repository::{
        identity::{TokenVerifier, VerificationFailure},
        user::UserRepository,
    },
};

const BEARER_PREFIX: &str = "Bearer ";

/// Turns a bearer credential into a verified identity and its local user record.
#[derive(new, Clone)]
pub struct IdentityResolver {
    verifier: Arc<dyn TokenVerifier>,
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    /// Extracts the token from an `Authorization` header value of the form `Bearer <token>`.
    pub fn parse_bearer(raw_header: Option<&str>) -> AppResult<AccessToken> {
        raw_header
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| AccessToken(token.to_string()))
            .ok_or(AppError::UnauthenticatedError(AuthFailure::MissingCredential))
    }

    pub async fn verify_credential(&self, raw_header: Option<&str>) -> AppResult<VerifiedIdentity> {
        let token = Self::parse_bearer(raw_header)?;
        self.verifier.verify(&token).await.map_err(|failure| match failure {
            VerificationFailure::Expired => AppError::UnauthenticatedError(AuthFailure::TokenExpired),
            VerificationFailure::Revoked => AppError::UnauthenticatedError(AuthFailure::TokenRevoked),
            VerificationFailure::Invalid => AppError::UnauthenticatedError(AuthFailure::TokenInvalid),
            VerificationFailure::Unavailable(detail) => AppError::ExternalServiceError(detail),
        })
    }

    /// Find-or-create by subject id. Idempotent per subject: the store's uniqueness
    /// constraint decides the winner when two first logins race.
    pub async fn resolve_or_create_user(&self, identity: &VerifiedIdentity) -> AppResult<ResolvedUser> {
        if let Some(user) = self.users.find_by_subject(&identity.subject).await? {
            return Ok(ResolvedUser { user, created: false });
        }

        match self.users.insert_if_absent(CreateUser::from(identity)).await? {
            Some(user) => {
                tracing::info!(user_id = %user.user_id, "Created user on first sign-in");
                Ok(ResolvedUser { user, created: true })
            }
            None => self
                .users
                .find_by_subject(&identity.subject)
                .await?
                .map(|user| ResolvedUser { user, created: false })
                .ok_or_else(|| {
                    AppError::NoRowsAffectedError("user vanished after concurrent insert".into())
                }),
        }
    }

    /// Verifies the credential and returns the caller's local user, creating it on first sight.
    pub async fn authenticate(&self, raw_header: Option<&str>) -> AppResult<User> {
        let identity = self.verify_credential(raw_header).await?;
        self.resolve_or_create_user(&identity)
            .await
            .map(|resolved| resolved.user)
    }

    pub async fn find_user(&self, identity: &VerifiedIdentity) -> AppResult<User> {
        self.users
            .find_by_subject(&identity.subject)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("User not found in database".into()))
    }

    /// Explicit registration: refuses when either the subject id or the email is taken.
    pub async fn register(&self, identity: &VerifiedIdentity) -> AppResult<User> {
        let event = CreateUser::from(identity);
        if self.users.find_by_subject(&event.subject_id).await?.is_some()
            || self.users.find_by_email(&event.email).await?.is_some()
        {
            return Err(AppError::Conflict("User already exists".into()));
        }
        self.users.create(event).await
    }
}
