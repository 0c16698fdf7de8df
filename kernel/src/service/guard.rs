//! Allow/deny predicates over an acting identity and a resource owner.
//!
//! Bookings belong to renters and listings belong to owners; neither side is
//! ever granted the other's mutations through these checks. A denial never
//! carries resource content.

use shared::error::{AppError, AppResult};

use crate::model::identity::Identity;

/// Self-only access: the caller must be the account the resource is keyed by.
pub fn require_self(actor: &Identity, email: &str) -> AppResult<()> {
    if actor.owns(email) {
        Ok(())
    } else {
        Err(AppError::ForbiddenOperation("Not authorized".into()))
    }
}

/// Read-only aggregate views are reserved for administrators.
pub fn require_admin(actor: &Identity) -> AppResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::ForbiddenOperation("Admin access required".into()))
    }
}

pub fn require_vehicle_owner(actor: &Identity, listing_email: &str) -> AppResult<()> {
    if actor.owns(listing_email) {
        Ok(())
    } else {
        Err(AppError::ForbiddenOperation(
            "Not authorized to modify this vehicle. You can only modify your own vehicles.".into(),
        ))
    }
}

pub fn require_renter(actor: &Identity, renter_email: &str) -> AppResult<()> {
    if actor.owns(renter_email) {
        Ok(())
    } else {
        Err(AppError::ForbiddenOperation(
            "Not authorized to access this booking".into(),
        ))
    }
}
