use crate::model::{
    id::VehicleId,
    vehicle::Category,
};

/// Fields of a new listing. `user_email` is always stamped from the acting identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVehicle {
    pub vehicle_name: String,
    pub owner: String,
    pub category: Category,
    pub price_per_day: i64,
    pub location: String,
    pub description: String,
    pub cover_image: String,
}

/// Owner-editable fields. Ownership and availability are not part of the patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateVehicle {
    pub vehicle_name: Option<String>,
    pub owner: Option<String>,
    pub category: Option<Category>,
    pub price_per_day: Option<i64>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub vehicle_id: VehicleId,
    pub user_email: String,
    pub fields: CreateVehicle,
}
