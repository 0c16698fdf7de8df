use axum::Router;
use registry::AppRegistry;

use super::{
    auth::build_auth_routers, booking::build_booking_routers,
    health::build_health_check_routers, user::build_user_routers,
    vehicle::build_vehicle_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_user_routers())
        .merge(build_vehicle_routers())
        .merge(build_booking_routers());
    Router::new().nest("/api/v1", router)
}
