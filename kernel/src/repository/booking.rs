use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{CreateBooking, UpdateBooking},
        Booking,
    },
    id::BookingId,
};

#[mockall::automock]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Writes the booking and flips its vehicle to `Booked` as one unit.
    /// Fails with `Conflict` and writes nothing if the vehicle is no longer available.
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    /// Lightweight ownership probe used before any record content is read.
    async fn find_renter_email(&self, booking_id: BookingId) -> AppResult<Option<String>>;
    /// Newest first.
    async fn find_by_renter(&self, email: &str) -> AppResult<Vec<Booking>>;
    /// Newest first.
    async fn find_all(&self) -> AppResult<Vec<Booking>>;
    /// Applies status/notes; a status crossing the active/cancelled line
    /// releases or re-acquires the vehicle in the same transaction.
    async fn update(&self, event: UpdateBooking) -> AppResult<()>;
    /// Removes the booking and restores its vehicle to `Available` when it still exists.
    async fn delete(&self, booking_id: BookingId) -> AppResult<()>;
}
