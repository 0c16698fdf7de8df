use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::vehicle::{
    delete_vehicle, register_vehicle, show_latest_vehicles, show_my_vehicles, show_vehicle,
    show_vehicle_list, update_vehicle,
};

pub fn build_vehicle_routers() -> Router<AppRegistry> {
    let vehicle_routers = Router::new()
        .route("/", get(show_vehicle_list).post(register_vehicle))
        .route("/latest", get(show_latest_vehicles))
        .route("/mine", get(show_my_vehicles))
        .route(
            "/:vehicle_id",
            get(show_vehicle)
                .put(update_vehicle)
                .patch(update_vehicle)
                .delete(delete_vehicle),
        );

    Router::new().nest("/vehicles", vehicle_routers)
}
