use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kernel::{
    model::{
        booking::event::{BookingPatch, BookingRequest},
        id::BookingId,
    },
    service::reservation::ReservationManager,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{AuthorizedUser, JsonBody},
    model::{
        booking::{booking_responses, BookingResponse, CreateBookingRequest, UpdateBookingRequest},
        DataResponse, MessageResponse,
    },
};

fn reservations(registry: &AppRegistry) -> ReservationManager {
    ReservationManager::new(registry.booking_repository(), registry.vehicle_repository())
}

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BookingResponse>>)> {
    let request = BookingRequest::from(req);
    let booking = reservations(&registry)
        .create_booking(&user.identity(), request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(
            DataResponse::new(BookingResponse::from(booking))
                .with_message("Booking created successfully"),
        ),
    ))
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DataResponse<BookingResponse>>> {
    let booking_id = BookingId::from_str(&booking_id)?;
    reservations(&registry)
        .get_booking(booking_id, &user.identity())
        .await
        .map(|b| Json(DataResponse::new(BookingResponse::from(b))))
}

pub async fn show_bookings_by_user(
    user: AuthorizedUser,
    Path(email): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DataResponse<Vec<BookingResponse>>>> {
    reservations(&registry)
        .list_by_renter(&email, &user.identity())
        .await
        .map(|b| Json(DataResponse::new(booking_responses(b))))
}

pub async fn show_all_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DataResponse<Vec<BookingResponse>>>> {
    reservations(&registry)
        .list_all(&user.identity())
        .await
        .map(|b| Json(DataResponse::new(booking_responses(b))))
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<String>,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<UpdateBookingRequest>,
) -> AppResult<Json<DataResponse<BookingResponse>>> {
    let booking_id = BookingId::from_str(&booking_id)?;
    let patch = BookingPatch::try_from(req)?;
    reservations(&registry)
        .update_booking(booking_id, &user.identity(), patch)
        .await
        .map(|b| {
            Json(
                DataResponse::new(BookingResponse::from(b))
                    .with_message("Booking updated successfully"),
            )
        })
}

pub async fn delete_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessageResponse>> {
    let booking_id = BookingId::from_str(&booking_id)?;
    reservations(&registry)
        .cancel_booking(booking_id, &user.identity())
        .await
        .map(|_| Json(MessageResponse::new("Booking deleted successfully")))
}
