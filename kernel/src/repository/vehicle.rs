use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::VehicleId,
    vehicle::{
        event::{NewVehicle, UpdateVehicle},
        Vehicle, VehicleListOptions,
    },
};

#[mockall::automock]
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, event: NewVehicle) -> AppResult<Vehicle>;
    /// Newest first.
    async fn find_all(&self, options: VehicleListOptions) -> AppResult<Vec<Vehicle>>;
    async fn find_by_owner(&self, email: &str) -> AppResult<Vec<Vehicle>>;
    async fn find_by_id(&self, vehicle_id: VehicleId) -> AppResult<Option<Vehicle>>;
    /// Lightweight ownership probe used before any record content is read.
    async fn find_owner_email(&self, vehicle_id: VehicleId) -> AppResult<Option<String>>;
    async fn update(&self, vehicle_id: VehicleId, event: UpdateVehicle) -> AppResult<Vehicle>;
    /// Fails with `Conflict` while an active booking references the vehicle.
    async fn delete(&self, vehicle_id: VehicleId) -> AppResult<()>;
}
