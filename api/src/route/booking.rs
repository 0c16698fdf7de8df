use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::booking::{
    create_booking, delete_booking, show_all_bookings, show_booking, show_bookings_by_user,
    update_booking,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", get(show_all_bookings).post(create_booking))
        .route("/user/:email", get(show_bookings_by_user))
        .route(
            "/:booking_id",
            get(show_booking)
                .put(update_booking)
                .patch(update_booking)
                .delete(delete_booking),
        );

    Router::new().nest("/bookings", booking_routers)
}
