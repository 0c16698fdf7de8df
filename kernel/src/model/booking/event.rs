use crate::model::{
    booking::{BookingPeriod, BookingStatus},
    id::{BookingId, VehicleId},
};

/// Booking request as received. The reservation manager checks presence first,
/// then parses the vehicle id and the dates at the point each is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    pub vehicle_id: Option<String>,
    pub user_email: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

/// A fully validated and priced booking, ready to be written together with the vehicle flip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBooking {
    pub booking_id: BookingId,
    pub vehicle_id: VehicleId,
    pub user_email: String,
    pub period: BookingPeriod,
    pub total_price: i64,
    pub status: BookingStatus,
    pub notes: String,
}

/// Renter patch. Vehicle and renter appear only so that attempts to change them can be rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPatch {
    pub vehicle_id: Option<String>,
    pub user_email: Option<String>,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}
