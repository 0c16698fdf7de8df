use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::user::{get_profile, list_users, update_profile};

pub fn build_user_routers() -> Router<AppRegistry> {
    let user_routers = Router::new()
        .route("/", get(list_users))
        .route("/profile", get(get_profile).put(update_profile));

    Router::new().nest("/users", user_routers)
}
