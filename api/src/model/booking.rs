use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::model::{
    booking::{
        event::{BookingPatch, BookingRequest},
        Booking, BookingStatus, BookingVehicle,
    },
    id::{BookingId, VehicleId},
    vehicle::{Availability, Category},
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

/// Every field is optional here; missing ones are reported by the reservation manager.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub vehicle_id: Option<String>,
    pub user_email: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(value: CreateBookingRequest) -> Self {
        let CreateBookingRequest {
            vehicle_id,
            user_email,
            start_date,
            end_date,
            notes,
        } = value;
        Self {
            vehicle_id,
            user_email,
            start_date,
            end_date,
            notes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub vehicle_id: Option<String>,
    pub user_email: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<UpdateBookingRequest> for BookingPatch {
    type Error = AppError;

    fn try_from(value: UpdateBookingRequest) -> AppResult<Self> {
        let UpdateBookingRequest {
            vehicle_id,
            user_email,
            status,
            notes,
        } = value;
        let status = status
            .as_deref()
            .map(|s| {
                BookingStatus::from_str(s.trim())
                    .map_err(|_| AppError::InvalidInput(format!("Unknown booking status: {s}")))
            })
            .transpose()?;
        Ok(Self {
            vehicle_id,
            user_email,
            status,
            notes,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingVehicleResponse {
    pub id: VehicleId,
    pub vehicle_name: String,
    pub owner: String,
    pub category: Category,
    pub price_per_day: i64,
    pub location: String,
    pub availability: Availability,
    pub cover_image: String,
}

impl From<BookingVehicle> for BookingVehicleResponse {
    fn from(value: BookingVehicle) -> Self {
        let BookingVehicle {
            vehicle_id,
            vehicle_name,
            owner,
            category,
            price_per_day,
            location,
            availability,
            cover_image,
        } = value;
        Self {
            id: vehicle_id,
            vehicle_name,
            owner,
            category,
            price_per_day,
            location,
            availability,
            cover_image,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub vehicle_id: VehicleId,
    pub user_email: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration: i64,
    pub total_price: i64,
    pub status: BookingStatus,
    pub notes: String,
    pub vehicle: Option<BookingVehicleResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let duration = value.duration_days();
        let Booking {
            id,
            vehicle_id,
            user_email,
            start_date,
            end_date,
            total_price,
            status,
            notes,
            created_at,
            updated_at,
            vehicle,
        } = value;
        Self {
            id,
            vehicle_id,
            user_email,
            start_date,
            end_date,
            duration,
            total_price,
            status,
            notes,
            vehicle: vehicle.map(BookingVehicleResponse::from),
            created_at,
            updated_at,
        }
    }
}

pub fn booking_responses(bookings: Vec<Booking>) -> Vec<BookingResponse> {
    bookings.into_iter().map(BookingResponse::from).collect()
}
