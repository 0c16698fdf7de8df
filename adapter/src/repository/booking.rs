use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBooking},
        Booking,
    },
    id::{BookingId, VehicleId},
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

use crate::database::{
    model::booking::{BookingRow, BookingStateRow, BOOKING_SELECT},
    ConnectionPool,
};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId> {
        let mut tx = self.db.begin().await?;

        // ① flip the vehicle to Booked only if it is still Available.
        // The row lock taken here serializes concurrent requests for the same vehicle.
        if !Self::acquire_vehicle(&mut tx, event.vehicle_id).await? {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM vehicles WHERE vehicle_id = $1)",
            )
            .bind(event.vehicle_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            return Err(if exists {
                AppError::Conflict("Vehicle is not available".into())
            } else {
                AppError::EntityNotFound("Vehicle not found".into())
            });
        }

        // ② write the booking; the partial unique index backs up the flip above
        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, vehicle_id, user_email, start_date, end_date,
                total_price, status, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.booking_id)
        .bind(event.vehicle_id)
        .bind(event.user_email.to_lowercase())
        .bind(event.period.start())
        .bind(event.period.end())
        .bind(event.total_price)
        .bind(event.status.as_ref())
        .bind(&event.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, "Vehicle is not available"))?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(event.booking_id)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!("{BOOKING_SELECT} WHERE b.booking_id = $1"))
            .bind(booking_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn find_renter_email(&self, booking_id: BookingId) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT user_email FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_renter(&self, email: &str) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!(
            "{BOOKING_SELECT} WHERE b.user_email = $1 ORDER BY b.created_at DESC"
        ))
        .bind(email.to_lowercase())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
    }

    async fn find_all(&self) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!("{BOOKING_SELECT} ORDER BY b.created_at DESC"))
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let state = sqlx::query_as::<_, BookingStateRow>(
            "SELECT vehicle_id, status FROM bookings WHERE booking_id = $1 FOR UPDATE",
        )
        .bind(event.booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("Booking not found".into()))?;

        let was_active = state.status()?.is_active();
        match event.status.map(|s| s.is_active()) {
            Some(false) if was_active => {
                Self::release_vehicle(&mut tx, state.vehicle_id).await?;
            }
            Some(true) if !was_active => {
                if !Self::acquire_vehicle(&mut tx, state.vehicle_id).await? {
                    return Err(AppError::Conflict("Vehicle is not available".into()));
                }
            }
            _ => {}
        }

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET
                    status = COALESCE($2, status),
                    notes = COALESCE($3, notes)
                WHERE booking_id = $1
            "#,
        )
        .bind(event.booking_id)
        .bind(event.status.map(|s| s.as_ref().to_string()))
        .bind(event.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, "Vehicle is not available"))?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, booking_id: BookingId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let removed = sqlx::query_as::<_, BookingStateRow>(
            "DELETE FROM bookings WHERE booking_id = $1 RETURNING vehicle_id, status",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("Booking not found".into()))?;

        // a cancelled booking no longer holds its vehicle, which may belong to someone else by now
        if removed.status()?.is_active() {
            Self::release_vehicle(&mut tx, removed.vehicle_id).await?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

impl BookingRepositoryImpl {
    /// Returns false when the vehicle is missing or already booked.
    async fn acquire_vehicle(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: VehicleId,
    ) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
                UPDATE vehicles
                SET availability = 'Booked'
                WHERE vehicle_id = $1 AND availability = 'Available'
            "#,
        )
        .bind(vehicle_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected() == 1)
    }

    // Zero rows is fine: the vehicle may have been deleted.
    async fn release_vehicle(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: VehicleId,
    ) -> AppResult<()> {
        sqlx::query("UPDATE vehicles SET availability = 'Available' WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}
