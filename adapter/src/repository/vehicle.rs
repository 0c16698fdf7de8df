use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::VehicleId,
    vehicle::{
        event::{NewVehicle, UpdateVehicle},
        Availability, Vehicle, VehicleListOptions,
    },
};
use kernel::repository::vehicle::VehicleRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::vehicle::{like_pattern, VehicleRow, VEHICLE_COLUMNS},
    ConnectionPool,
};

#[derive(new)]
pub struct VehicleRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl VehicleRepository for VehicleRepositoryImpl {
    async fn create(&self, event: NewVehicle) -> AppResult<Vehicle> {
        let NewVehicle {
            vehicle_id,
            user_email,
            fields,
        } = event;

        sqlx::query_as::<_, VehicleRow>(&format!(
            r#"
                INSERT INTO vehicles
                (vehicle_id, vehicle_name, owner, category, price_per_day, location,
                availability, description, cover_image, user_email)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(vehicle_id)
        .bind(fields.vehicle_name)
        .bind(fields.owner)
        .bind(fields.category.as_ref())
        .bind(fields.price_per_day)
        .bind(fields.location)
        .bind(Availability::Available.as_ref())
        .bind(fields.description)
        .bind(fields.cover_image)
        .bind(user_email)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
        .and_then(Vehicle::try_from)
    }

    async fn find_all(&self, options: VehicleListOptions) -> AppResult<Vec<Vehicle>> {
        let VehicleListOptions {
            category,
            location,
            availability,
            min_price,
            max_price,
            limit,
        } = options;

        // each filter is skipped when its parameter is NULL; LIMIT NULL means no limit
        sqlx::query_as::<_, VehicleRow>(&format!(
            r#"
                SELECT {VEHICLE_COLUMNS}
                FROM vehicles
                WHERE ($1::TEXT IS NULL OR category = $1)
                  AND ($2::TEXT IS NULL OR location ILIKE $2)
                  AND ($3::TEXT IS NULL OR availability = $3)
                  AND ($4::BIGINT IS NULL OR price_per_day >= $4)
                  AND ($5::BIGINT IS NULL OR price_per_day <= $5)
                ORDER BY created_at DESC
                LIMIT $6
            "#
        ))
        .bind(category.map(|c| c.as_ref().to_string()))
        .bind(location.as_deref().map(like_pattern))
        .bind(availability.map(|a| a.as_ref().to_string()))
        .bind(min_price)
        .bind(max_price)
        .bind(limit)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Vehicle::try_from)
        .collect()
    }

    async fn find_by_owner(&self, email: &str) -> AppResult<Vec<Vehicle>> {
        sqlx::query_as::<_, VehicleRow>(&format!(
            r#"
                SELECT {VEHICLE_COLUMNS}
                FROM vehicles
                WHERE user_email = $1
                ORDER BY created_at DESC
            "#
        ))
        .bind(email.to_lowercase())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Vehicle::try_from)
        .collect()
    }

    async fn find_by_id(&self, vehicle_id: VehicleId) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE vehicle_id = $1"
        ))
        .bind(vehicle_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Vehicle::try_from)
        .transpose()
    }

    async fn find_owner_email(&self, vehicle_id: VehicleId) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT user_email FROM vehicles WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)
    }

    async fn update(&self, vehicle_id: VehicleId, event: UpdateVehicle) -> AppResult<Vehicle> {
        let UpdateVehicle {
            vehicle_name,
            owner,
            category,
            price_per_day,
            location,
            description,
            cover_image,
        } = event;

        // user_email and availability are never written here
        sqlx::query_as::<_, VehicleRow>(&format!(
            r#"
                UPDATE vehicles
                SET
                    vehicle_name = COALESCE($2, vehicle_name),
                    owner = COALESCE($3, owner),
                    category = COALESCE($4, category),
                    price_per_day = COALESCE($5, price_per_day),
                    location = COALESCE($6, location),
                    description = COALESCE($7, description),
                    cover_image = COALESCE($8, cover_image)
                WHERE vehicle_id = $1
                RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(vehicle_id)
        .bind(vehicle_name)
        .bind(owner)
        .bind(category.map(|c| c.as_ref().to_string()))
        .bind(price_per_day)
        .bind(location)
        .bind(description)
        .bind(cover_image)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("Vehicle not found".into()))
        .and_then(Vehicle::try_from)
    }

    async fn delete(&self, vehicle_id: VehicleId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // ① lock the vehicle row so no booking can be created against it meanwhile
        let locked = sqlx::query_scalar::<_, VehicleId>(
            "SELECT vehicle_id FROM vehicles WHERE vehicle_id = $1 FOR UPDATE",
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if locked.is_none() {
            return Err(AppError::EntityNotFound("Vehicle not found".into()));
        }

        // ② refuse while an active booking still holds it
        let has_active_booking = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM bookings
                    WHERE vehicle_id = $1 AND status <> 'cancelled'
                )
            "#,
        )
        .bind(vehicle_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if has_active_booking {
            return Err(AppError::Conflict(
                "Vehicle has active bookings and cannot be deleted".into(),
            ));
        }

        let res = sqlx::query("DELETE FROM vehicles WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No vehicle record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}
