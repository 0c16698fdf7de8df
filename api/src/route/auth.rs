use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::auth::{login, register, verify};

pub fn build_auth_routers() -> Router<AppRegistry> {
    let auth_routers = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/verify", get(verify));

    Router::new().nest("/auth", auth_routers)
}
