use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use shared::error::{AppError, AppResult};

use crate::model::id::VehicleId;

pub mod event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
pub enum Category {
    Sedan,
    #[serde(rename = "SUV")]
    #[strum(serialize = "SUV")]
    Suv,
    Electric,
    Van,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr,
)]
pub enum Availability {
    #[default]
    Available,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
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

/// Filters for listing vehicles. Every field is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleListOptions {
    pub category: Option<Category>,
    /// Case-insensitive substring match.
    pub location: Option<String>,
    pub availability: Option<Availability>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub limit: Option<i64>,
}

impl VehicleListOptions {
    pub const LATEST_LIMIT: i64 = 6;

    pub fn latest() -> Self {
        Self {
            limit: Some(Self::LATEST_LIMIT),
            ..Default::default()
        }
    }

    /// Rejects an inverted price range before it reaches the store.
    pub fn validate(&self) -> AppResult<()> {
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) if min > max => Err(AppError::InvalidInput(
                "minPrice must not exceed maxPrice".into(),
            )),
            _ => Ok(()),
        }
    }
}
