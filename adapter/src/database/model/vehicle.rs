use chrono::{DateTime, Utc};
use kernel::model::{
    id::VehicleId,
    vehicle::{Availability, Category, Vehicle},
};
use shared::error::AppError;
use std::str::FromStr;

pub const VEHICLE_COLUMNS: &str = r#"
    vehicle_id, vehicle_name, owner, category, price_per_day, location,
    availability, description, cover_image, user_email, created_at, updated_at
"#;

#[derive(sqlx::FromRow)]
pub struct VehicleRow {
    pub vehicle_id: VehicleId,
    pub vehicle_name: String,
    pub owner: String,
    pub category: String,
    pub price_per_day: i64,
    pub location: String,
    pub availability: String,
    pub description: String,
    pub cover_image: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = AppError;

    fn try_from(value: VehicleRow) -> Result<Self, Self::Error> {
        let VehicleRow {
            vehicle_id,
            vehicle_name,
            owner,
            category,
            price_per_day,
            location,
            availability,
            description,
            cover_image,
            user_email,
            created_at,
            updated_at,
        } = value;
        Ok(Vehicle {
            id: vehicle_id,
            vehicle_name,
            owner,
            category: parse_category(&category)?,
            price_per_day,
            location,
            availability: parse_availability(&availability)?,
            description,
            cover_image,
            user_email,
            created_at,
            updated_at,
        })
    }
}

pub fn parse_category(value: &str) -> Result<Category, AppError> {
    Category::from_str(value)
        .map_err(|_| AppError::ConversionEntityError(format!("unknown category: {value}")))
}

pub fn parse_availability(value: &str) -> Result<Availability, AppError> {
    Availability::from_str(value)
        .map_err(|_| AppError::ConversionEntityError(format!("unknown availability: {value}")))
}

/// Escapes `LIKE` metacharacters so a location filter matches literally.
pub fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
