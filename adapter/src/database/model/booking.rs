use chrono::{DateTime, Utc};
use kernel::model::{
    booking::{Booking, BookingStatus, BookingVehicle},
    id::{BookingId, VehicleId},
};
use shared::error::AppError;
use std::str::FromStr;

use super::vehicle::{parse_availability, parse_category};

/// Booking columns joined with the (possibly deleted) vehicle they reference.
pub const BOOKING_SELECT: &str = r#"
    SELECT
        b.booking_id,
        b.vehicle_id,
        b.user_email,
        b.start_date,
        b.end_date,
        b.total_price,
        b.status,
        b.notes,
        b.created_at,
        b.updated_at,
        v.vehicle_name,
        v.owner,
        v.category,
        v.price_per_day,
        v.location,
        v.availability,
        v.cover_image
    FROM bookings AS b
    LEFT JOIN vehicles AS v ON b.vehicle_id = v.vehicle_id
"#;

#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub vehicle_id: VehicleId,
    pub user_email: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: i64,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub vehicle_name: Option<String>,
    pub owner: Option<String>,
    pub category: Option<String>,
    pub price_per_day: Option<i64>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub cover_image: Option<String>,
}

/// Status and vehicle of a booking, read under a row lock inside write transactions.
#[derive(sqlx::FromRow)]
pub struct BookingStateRow {
    pub vehicle_id: VehicleId,
    pub status: String,
}

impl BookingStateRow {
    pub fn status(&self) -> Result<BookingStatus, AppError> {
        parse_status(&self.status)
    }
}

pub fn parse_status(value: &str) -> Result<BookingStatus, AppError> {
    BookingStatus::from_str(value)
        .map_err(|_| AppError::ConversionEntityError(format!("unknown booking status: {value}")))
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            vehicle_id,
            user_email,
            start_date,
            end_date,
            total_price,
            status,
            notes,
            created_at,
            updated_at,
            vehicle_name,
            owner,
            category,
            price_per_day,
            location,
            availability,
            cover_image,
        } = value;

        // every vehicle column is NOT NULL, so they are all present or all absent
        let vehicle = match (
            vehicle_name,
            owner,
            category,
            price_per_day,
            location,
            availability,
            cover_image,
        ) {
            (
                Some(vehicle_name),
                Some(owner),
                Some(category),
                Some(price_per_day),
                Some(location),
                Some(availability),
                Some(cover_image),
            ) => Some(BookingVehicle {
                vehicle_id,
                vehicle_name,
                owner,
                category: parse_category(&category)?,
                price_per_day,
                location,
                availability: parse_availability(&availability)?,
                cover_image,
            }),
            _ => None,
        };

        Ok(Booking {
            id: booking_id,
            vehicle_id,
            user_email,
            start_date,
            end_date,
            total_price,
            status: parse_status(&status)?,
            notes,
            created_at,
            updated_at,
            vehicle,
        })
    }
}
