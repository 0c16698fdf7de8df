use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use shared::error::{AppError, AppResult};

use crate::model::{
    id::{BookingId, VehicleId},
    vehicle::{Availability, Category},
};

pub mod event;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    #[default]
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// An active booking holds its vehicle.
    pub fn is_active(self) -> bool {
        self != BookingStatus::Cancelled
    }
}

/// A validated rental window; `start` is always strictly before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::InvalidInput(
                "End date must be after start date".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Reads both ends as RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whole days charged, rounding any partial day up.
    pub fn days(&self) -> i64 {
        let millis = (self.end - self.start).num_milliseconds();
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }

    pub fn total_price(&self, price_per_day: i64) -> AppResult<i64> {
        self.days()
            .checked_mul(price_per_day)
            .ok_or_else(|| AppError::InvalidInput("Total price is out of range".into()))
    }
}

// A bare date is midnight UTC.
fn parse_instant(value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid date: {value}")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub vehicle_id: VehicleId,
    pub user_email: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Frozen at creation; later price changes on the vehicle do not apply.
    pub total_price: i64,
    pub status: BookingStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `None` when the referenced vehicle has since been deleted.
    pub vehicle: Option<BookingVehicle>,
}

impl Booking {
    pub fn duration_days(&self) -> i64 {
        BookingPeriod {
            start: self.start_date,
            end: self.end_date,
        }
        .days()
    }
}

/// Snapshot of the referenced vehicle joined onto a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingVehicle {
    pub vehicle_id: VehicleId,
    pub vehicle_name: String,
    pub owner: String,
    pub category: Category,
    pub price_per_day: i64,
    pub location: String,
    pub availability: Availability,
    pub cover_image: String,
}
