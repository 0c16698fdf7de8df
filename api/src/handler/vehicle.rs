use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::{
    model::{id::VehicleId, vehicle::VehicleListOptions},
    service::catalog::VehicleCatalog,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{AuthorizedUser, JsonBody, QueryParams},
    model::{
        vehicle::{
            vehicle_responses, CreateVehicleRequest, UpdateVehicleRequest, VehicleListQuery,
            VehicleResponse,
        },
        DataResponse, MessageResponse,
    },
};

fn catalog(registry: &AppRegistry) -> VehicleCatalog {
    VehicleCatalog::new(registry.vehicle_repository())
}

pub async fn show_vehicle_list(
    QueryParams(query): QueryParams<VehicleListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let options = VehicleListOptions::try_from(query)?;
    catalog(&registry)
        .list(options)
        .await
        .map(vehicle_responses)
        .map(Json)
}

pub async fn show_latest_vehicles(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    catalog(&registry)
        .latest()
        .await
        .map(vehicle_responses)
        .map(Json)
}

pub async fn show_my_vehicles(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DataResponse<Vec<VehicleResponse>>>> {
    catalog(&registry)
        .mine(&user.identity())
        .await
        .map(vehicle_responses)
        .map(DataResponse::counted)
        .map(Json)
}

pub async fn show_vehicle(
    Path(vehicle_id): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<VehicleResponse>> {
    let vehicle_id = VehicleId::from_str(&vehicle_id)?;
    catalog(&registry)
        .get(vehicle_id)
        .await
        .map(VehicleResponse::from)
        .map(Json)
}

pub async fn register_vehicle(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<VehicleResponse>)> {
    req.validate(&())?;

    let vehicle = catalog(&registry)
        .create(&user.identity(), req.try_into()?)
        .await?;
    Ok((StatusCode::CREATED, Json(vehicle.into())))
}

pub async fn update_vehicle(
    user: AuthorizedUser,
    Path(vehicle_id): Path<String>,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<UpdateVehicleRequest>,
) -> AppResult<Json<VehicleResponse>> {
    let vehicle_id = VehicleId::from_str(&vehicle_id)?;
    req.validate(&())?;

    catalog(&registry)
        .update(vehicle_id, &user.identity(), req.try_into()?)
        .await
        .map(VehicleResponse::from)
        .map(Json)
}

pub async fn delete_vehicle(
    user: AuthorizedUser,
    Path(vehicle_id): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessageResponse>> {
    let vehicle_id = VehicleId::from_str(&vehicle_id)?;
    catalog(&registry)
        .delete(vehicle_id, &user.identity())
        .await
        .map(|_| Json(MessageResponse::new("Vehicle deleted successfully")))
}
