use axum::{extract::State, Json};
use garde::Validate;
use kernel::service::profile::UserDirectory;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{AuthorizedUser, JsonBody},
    model::user::{ProfileResponse, ProfileUpdatedResponse, UpdateProfileRequest, UsersResponse},
};

fn directory(registry: &AppRegistry) -> UserDirectory {
    UserDirectory::new(registry.user_repository())
}

pub async fn get_profile(user: AuthorizedUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(user.user))
}

pub async fn update_profile(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> AppResult<Json<ProfileUpdatedResponse>> {
    req.validate(&())?;

    let UpdateProfileRequest {
        display_name,
        phone_number,
        address,
    } = req;
    let updated = directory(&registry)
        .update_profile(
            &user.identity(),
            display_name,
            phone_number,
            address.map(Into::into),
        )
        .await?;
    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully",
        user: ProfileResponse::from(updated),
    }))
}

pub async fn list_users(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    directory(&registry)
        .list_all(&user.identity())
        .await
        .map(UsersResponse::from)
        .map(Json)
}
