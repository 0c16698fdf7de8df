use std::sync::Arc;

use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::{
    model::{
        id::VehicleId,
        identity::Identity,
        vehicle::{
            event::{CreateVehicle, NewVehicle, UpdateVehicle},
            Vehicle, VehicleListOptions,
        },
    },
    repository::vehicle::VehicleRepository,
    service::guard,
};

/// Listing reads for everyone, owner-scoped mutations.
#[derive(new, Clone)]
pub struct VehicleCatalog {
    vehicles: Arc<dyn VehicleRepository>,
}

impl VehicleCatalog {
    pub async fn list(&self, options: VehicleListOptions) -> AppResult<Vec<Vehicle>> {
        options.validate()?;
        self.vehicles.find_all(options).await
    }

    pub async fn latest(&self) -> AppResult<Vec<Vehicle>> {
        self.vehicles.find_all(VehicleListOptions::latest()).await
    }

    pub async fn mine(&self, owner: &Identity) -> AppResult<Vec<Vehicle>> {
        self.vehicles.find_by_owner(&owner.email).await
    }

    pub async fn get(&self, vehicle_id: VehicleId) -> AppResult<Vehicle> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("Vehicle not found".into()))
    }

    /// The listing owner is always the acting identity, whatever the client sent.
    pub async fn create(&self, owner: &Identity, fields: CreateVehicle) -> AppResult<Vehicle> {
        let fields = normalize_create(fields)?;
        let event = NewVehicle {
            vehicle_id: VehicleId::new(),
            user_email: owner.email.to_lowercase(),
            fields,
        };
        let vehicle = self.vehicles.create(event).await?;
        tracing::info!(vehicle_id = %vehicle.id, owner = %vehicle.user_email, "Vehicle listed");
        Ok(vehicle)
    }

    pub async fn update(
        &self,
        vehicle_id: VehicleId,
        owner: &Identity,
        patch: UpdateVehicle,
    ) -> AppResult<Vehicle> {
        self.authorize(vehicle_id, owner).await?;
        let patch = normalize_update(patch)?;
        self.vehicles.update(vehicle_id, patch).await
    }

    /// Refused with `Conflict` while an active booking still holds the vehicle.
    pub async fn delete(&self, vehicle_id: VehicleId, owner: &Identity) -> AppResult<()> {
        self.authorize(vehicle_id, owner).await?;
        self.vehicles.delete(vehicle_id).await?;
        tracing::info!(%vehicle_id, "Vehicle deleted");
        Ok(())
    }

    async fn authorize(&self, vehicle_id: VehicleId, owner: &Identity) -> AppResult<()> {
        let listing_email = self
            .vehicles
            .find_owner_email(vehicle_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("Vehicle not found".into()))?;
        guard::require_vehicle_owner(owner, &listing_email).inspect_err(|_| {
            tracing::warn!(%vehicle_id, actor = %owner.email, "Vehicle ownership check failed")
        })
    }
}

fn required(field: &str, value: String) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn positive_price(price_per_day: i64) -> AppResult<i64> {
    if price_per_day < 1 {
        return Err(AppError::InvalidInput(
            "pricePerDay must be greater than zero".into(),
        ));
    }
    Ok(price_per_day)
}

fn normalize_create(fields: CreateVehicle) -> AppResult<CreateVehicle> {
    Ok(CreateVehicle {
        vehicle_name: required("vehicleName", fields.vehicle_name)?,
        owner: required("owner", fields.owner)?,
        category: fields.category,
        price_per_day: positive_price(fields.price_per_day)?,
        location: required("location", fields.location)?,
        description: required("description", fields.description)?,
        cover_image: required("coverImage", fields.cover_image)?,
    })
}

fn normalize_update(patch: UpdateVehicle) -> AppResult<UpdateVehicle> {
    Ok(UpdateVehicle {
        vehicle_name: patch.vehicle_name.map(|v| required("vehicleName", v)).transpose()?,
        owner: patch.owner.map(|v| required("owner", v)).transpose()?,
        category: patch.category,
        price_per_day: patch.price_per_day.map(positive_price).transpose()?,
        location: patch.location.map(|v| required("location", v)).transpose()?,
        description: patch.description.map(|v| required("description", v)).transpose()?,
        cover_image: patch.cover_image.map(|v| required("coverImage", v)).transpose()?,
    })
}
