use std::str::FromStr;

use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::VehicleId,
    vehicle::{
        event::{CreateVehicle, UpdateVehicle},
        Availability, Category, Vehicle, VehicleListOptions,
    },
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[garde(length(min = 1, max = 255))]
    pub vehicle_name: String,
    #[garde(length(min = 1, max = 255))]
    pub owner: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(range(min = 1))]
    pub price_per_day: i64,
    #[garde(length(min = 1, max = 255))]
    pub location: String,
    #[garde(length(min = 1))]
    pub description: String,
    #[garde(url)]
    pub cover_image: String,
}

impl TryFrom<CreateVehicleRequest> for CreateVehicle {
    type Error = AppError;

    fn try_from(value: CreateVehicleRequest) -> AppResult<Self> {
        let CreateVehicleRequest {
            vehicle_name,
            owner,
            category,
            price_per_day,
            location,
            description,
            cover_image,
        } = value;
        Ok(CreateVehicle {
            vehicle_name,
            owner,
            category: parse_category(&category)?,
            price_per_day,
            location,
            description,
            cover_image,
        })
    }
}

/// Owner patch. `userEmail` and `availability` are not part of the shape, so
/// a client sending them has them dropped during deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[garde(length(min = 1, max = 255))]
    pub vehicle_name: Option<String>,
    #[garde(length(min = 1, max = 255))]
    pub owner: Option<String>,
    #[garde(length(min = 1))]
    pub category: Option<String>,
    #[garde(range(min = 1))]
    pub price_per_day: Option<i64>,
    #[garde(length(min = 1, max = 255))]
    pub location: Option<String>,
    #[garde(length(min = 1))]
    pub description: Option<String>,
    #[garde(url)]
    pub cover_image: Option<String>,
}

impl TryFrom<UpdateVehicleRequest> for UpdateVehicle {
    type Error = AppError;

    fn try_from(value: UpdateVehicleRequest) -> AppResult<Self> {
        let UpdateVehicleRequest {
            vehicle_name,
            owner,
            category,
            price_per_day,
            location,
            description,
            cover_image,
        } = value;
        Ok(UpdateVehicle {
            vehicle_name,
            owner,
            category: category.as_deref().map(parse_category).transpose()?,
            price_per_day,
            location,
            description,
            cover_image,
        })
    }
}

fn parse_category(value: &str) -> AppResult<Category> {
    Category::from_str(value.trim())
        .map_err(|_| AppError::InvalidInput(format!("Unknown category: {value}")))
}

/// Enumerated filters arrive as plain strings so that an unknown value is
/// reported like any other invalid input; an empty value means "no filter".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl TryFrom<VehicleListQuery> for VehicleListOptions {
    type Error = AppError;

    fn try_from(value: VehicleListQuery) -> AppResult<Self> {
        let VehicleListQuery {
            category,
            location,
            availability,
            min_price,
            max_price,
        } = value;
        Ok(Self {
            category: parse_filter(category, "category")?,
            location: location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            availability: parse_filter(availability, "availability")?,
            min_price,
            max_price,
            limit: None,
        })
    }
}

fn parse_filter<T: FromStr>(value: Option<String>, field: &str) -> AppResult<Option<T>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => T::from_str(v)
            .map(Some)
            .map_err(|_| AppError::InvalidInput(format!("Unknown {field}: {v}"))),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: VehicleId,
    pub vehicle_name: String,
    pub owner: String,
    pub category: Category,
    pub price_per_day: i64,
    pub location: String,
    pub availability: Availability,
    pub description: String,
    pub cover_image: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(value: Vehicle) -> Self {
        let Vehicle {
            id,
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
        Self {
            id,
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
        }
    }
}

pub fn vehicle_responses(vehicles: Vec<Vehicle>) -> Vec<VehicleResponse> {
    vehicles.into_iter().map(VehicleResponse::from).collect()
}
