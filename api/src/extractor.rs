use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use kernel::{
    model::{
        identity::{Identity, VerifiedIdentity},
        user::User,
    },
    service::identity::IdentityResolver,
};
use registry::AppRegistry;
use shared::error::AppError;

fn bearer_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

pub fn identity_resolver(registry: &AppRegistry) -> IdentityResolver {
    IdentityResolver::new(registry.token_verifier(), registry.user_repository())
}

/// Caller whose token was verified and whose local user record exists (created on first sight).
pub struct AuthorizedUser {
    pub user: User,
}

impl AuthorizedUser {
    pub fn identity(&self) -> Identity {
        self.user.identity()
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let user = identity_resolver(registry)
            .authenticate(bearer_header(parts))
            .await?;
        Ok(Self { user })
    }
}

/// Verified token claims without any user lookup; used by the auth endpoints,
/// which decide themselves whether a local user is created.
pub struct VerifiedToken(pub VerifiedIdentity);

#[async_trait]
impl FromRequestParts<AppRegistry> for VerifiedToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        identity_resolver(registry)
            .verify_credential(bearer_header(parts))
            .await
            .map(Self)
    }
}

/// `axum::Json` whose rejection answers with the usual `{message}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` whose rejection answers with the usual `{message}` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);
