use axum::{extract::State, http::StatusCode, Json};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{identity_resolver, VerifiedToken},
    model::user::{AuthResponse, UserResponse},
};

/// Find-or-create: 201 when this call created the user, 200 otherwise.
pub async fn login(
    VerifiedToken(claims): VerifiedToken,
    State(registry): State<AppRegistry>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resolved = identity_resolver(&registry)
        .resolve_or_create_user(&claims)
        .await?;
    let status = if resolved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(AuthResponse {
            message: "Login successful",
            user: UserResponse::from(resolved.user),
        }),
    ))
}

pub async fn register(
    VerifiedToken(claims): VerifiedToken,
    State(registry): State<AppRegistry>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user = identity_resolver(&registry).register(&claims).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user: UserResponse::from(user),
        }),
    ))
}

pub async fn verify(
    VerifiedToken(claims): VerifiedToken,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AuthResponse>> {
    identity_resolver(&registry)
        .find_user(&claims)
        .await
        .map(|user| {
            Json(AuthResponse {
                message: "Token verified and user found",
                user: UserResponse::from(user),
            })
        })
}
