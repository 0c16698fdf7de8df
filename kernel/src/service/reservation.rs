use std::{str::FromStr, sync::Arc};

use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::{
    model::{
        booking::{
            event::{BookingPatch, BookingRequest, CreateBooking, UpdateBooking},
            Booking, BookingPeriod, BookingStatus,
        },
        id::{BookingId, VehicleId},
        identity::Identity,
        vehicle::Availability,
    },
    repository::{booking::BookingRepository, vehicle::VehicleRepository},
    service::{guard, non_blank},
};

/// Drives the booking lifecycle and the availability flag of the vehicle it holds.
///
/// A vehicle toggles `Available -> Booked -> Available` for its whole lifetime.
/// The flip and the booking write always happen in one store transaction, so a
/// booking never exists without its vehicle being marked, and vice versa.
#[derive(new, Clone)]
pub struct ReservationManager {
    bookings: Arc<dyn BookingRepository>,
    vehicles: Arc<dyn VehicleRepository>,
}

impl ReservationManager {
    /// Preconditions are checked in order, each with its own failure:
    /// presence (`Validation`), vehicle exists (`NotFound`),
    /// vehicle available (`Conflict`), start before end (`Validation`).
    pub async fn create_booking(
        &self,
        renter: &Identity,
        request: BookingRequest,
    ) -> AppResult<Booking> {
        let BookingRequest {
            vehicle_id,
            user_email,
            start_date,
            end_date,
            notes,
        } = request;

        let renter_email = user_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(renter.email.as_str())
            .to_lowercase();
        let (Some(vehicle_id), Some(start_date), Some(end_date)) = (
            non_blank(vehicle_id),
            non_blank(start_date),
            non_blank(end_date),
        ) else {
            return Err(AppError::InvalidInput("All fields are required".into()));
        };
        if renter_email.is_empty() {
            return Err(AppError::InvalidInput("All fields are required".into()));
        }
        // bookings are always made for the caller's own account
        guard::require_self(renter, &renter_email)?;

        let vehicle_id = VehicleId::from_str(vehicle_id.trim())?;
        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("Vehicle not found".into()))?;

        if vehicle.availability != Availability::Available {
            return Err(AppError::Conflict("Vehicle is not available".into()));
        }

        let period = BookingPeriod::parse(&start_date, &end_date)?;
        let total_price = period.total_price(vehicle.price_per_day)?;

        let event = CreateBooking {
            booking_id: BookingId::new(),
            vehicle_id,
            user_email: renter_email,
            period,
            total_price,
            status: BookingStatus::Confirmed,
            notes: notes.map(|n| n.trim().to_string()).unwrap_or_default(),
        };

        let booking_id = self.bookings.create(event).await?;
        tracing::info!(%booking_id, %vehicle_id, total_price, "Booking created");

        self.load(booking_id).await
    }

    /// Hard-deletes the booking and puts its vehicle back to `Available`.
    /// A second cancel of the same id is `NotFound`, never a second revert.
    pub async fn cancel_booking(&self, booking_id: BookingId, actor: &Identity) -> AppResult<()> {
        self.authorize(booking_id, actor).await?;
        self.bookings.delete(booking_id).await?;
        tracing::info!(%booking_id, "Booking cancelled");
        Ok(())
    }

    pub async fn update_booking(
        &self,
        booking_id: BookingId,
        actor: &Identity,
        patch: BookingPatch,
    ) -> AppResult<Booking> {
        self.authorize(booking_id, actor).await?;
        let current = self.load(booking_id).await?;

        let BookingPatch {
            vehicle_id,
            user_email,
            status,
            notes,
        } = patch;

        // an unreadable id can never name the current vehicle
        let changes_vehicle = vehicle_id
            .as_deref()
            .is_some_and(|v| {
                VehicleId::from_str(v.trim()).map_or(true, |parsed| parsed != current.vehicle_id)
            });
        let changes_renter = user_email
            .as_deref()
            .is_some_and(|e| !e.trim().eq_ignore_ascii_case(&current.user_email));
        if changes_vehicle || changes_renter {
            return Err(AppError::ImmutableField(
                "Cannot change user or vehicle".into(),
            ));
        }

        if status.is_none() && notes.is_none() {
            return Ok(current);
        }

        self.bookings
            .update(UpdateBooking {
                booking_id,
                status,
                notes: notes.map(|n| n.trim().to_string()),
            })
            .await?;

        self.load(booking_id).await
    }

    pub async fn get_booking(&self, booking_id: BookingId, actor: &Identity) -> AppResult<Booking> {
        self.authorize(booking_id, actor).await?;
        self.load(booking_id).await
    }

    /// Self-only; administrators get no override here.
    pub async fn list_by_renter(&self, email: &str, actor: &Identity) -> AppResult<Vec<Booking>> {
        if email.trim().is_empty() {
            return Err(AppError::InvalidInput("User email is required".into()));
        }
        guard::require_self(actor, email)?;
        self.bookings.find_by_renter(&email.to_lowercase()).await
    }

    pub async fn list_all(&self, actor: &Identity) -> AppResult<Vec<Booking>> {
        guard::require_admin(actor)?;
        self.bookings.find_all().await
    }

    // Ownership is settled from the renter column alone before any booking content is read.
    async fn authorize(&self, booking_id: BookingId, actor: &Identity) -> AppResult<()> {
        let renter_email = self
            .bookings
            .find_renter_email(booking_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("Booking not found".into()))?;
        guard::require_renter(actor, &renter_email).inspect_err(|_| {
            tracing::warn!(%booking_id, actor = %actor.email, "Booking ownership check failed")
        })
    }

    async fn load(&self, booking_id: BookingId) -> AppResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("Booking not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{
            booking::BookingVehicle,
            id::{UserId, VehicleId},
            role::Role,
            vehicle::{Category, Vehicle},
        },
        repository::{booking::MockBookingRepository, vehicle::MockVehicleRepository},
    };
    use chrono::{DateTime, TimeZone, Utc};
    use shared::error::ErrorKind;
    use std::{
        collections::HashMap,
        sync::Mutex,
    };

    const RENTER: &str = "fahim@example.com";

    fn identity(email: &str, role: Role) -> Identity {
        Identity {
            user_id: UserId::new(),
            subject: format!("sub-{email}"),
            email: email.into(),
            role,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, d, 0, 0, 0).unwrap()
    }

    fn vehicle(id: VehicleId, availability: Availability) -> Vehicle {
        Vehicle {
            id,
            vehicle_name: "Honda Civic".into(),
            owner: "John Doe".into(),
            category: Category::Sedan,
            price_per_day: 65,
            location: "Dhaka, Banani".into(),
            availability,
            description: "Efficient city sedan".into(),
            cover_image: "https://images.example/civic.jpg".into(),
            user_email: "john@example.com".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn booking_from(event: &CreateBooking, vehicle: &Vehicle) -> Booking {
        Booking {
            id: event.booking_id,
            vehicle_id: event.vehicle_id,
            user_email: event.user_email.clone(),
            start_date: event.period.start(),
            end_date: event.period.end(),
            total_price: event.total_price,
            status: event.status,
            notes: event.notes.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            vehicle: Some(BookingVehicle {
                vehicle_id: vehicle.id,
                vehicle_name: vehicle.vehicle_name.clone(),
                owner: vehicle.owner.clone(),
                category: vehicle.category,
                price_per_day: vehicle.price_per_day,
                location: vehicle.location.clone(),
                availability: Availability::Booked,
                cover_image: vehicle.cover_image.clone(),
            }),
        }
    }

    fn request(vehicle_id: VehicleId) -> BookingRequest {
        BookingRequest {
            vehicle_id: Some(vehicle_id.to_string()),
            user_email: Some(RENTER.into()),
            start_date: Some("2025-11-12".into()),
            end_date: Some("2025-11-15".into()),
            notes: Some("Booking from All Vehicles page".into()),
        }
    }

    /// Store double that keeps one vehicle and its bookings in memory,
    /// applying the same conditional flip the database does.
    struct FakeStore {
        vehicle: Mutex<Option<Vehicle>>,
        bookings: Mutex<HashMap<BookingId, Booking>>,
    }

    fn manager_over(store: Arc<FakeStore>) -> ReservationManager {
        let mut vehicles = MockVehicleRepository::new();
        let s = store.clone();
        vehicles
            .expect_find_by_id()
            .returning(move |_| Ok(s.vehicle.lock().unwrap().clone()));

        let mut bookings = MockBookingRepository::new();
        let s = store.clone();
        bookings.expect_create().returning(move |event| {
            let mut vehicle = s.vehicle.lock().unwrap();
            let v = vehicle.as_mut().unwrap();
            if v.availability != Availability::Available {
                return Err(AppError::Conflict("Vehicle is not available".into()));
            }
            v.availability = Availability::Booked;
            let booking = booking_from(&event, v);
            s.bookings.lock().unwrap().insert(event.booking_id, booking);
            Ok(event.booking_id)
        });
        let s = store.clone();
        bookings
            .expect_find_by_id()
            .returning(move |id| Ok(s.bookings.lock().unwrap().get(&id).cloned()));
        let s = store.clone();
        bookings.expect_find_renter_email().returning(move |id| {
            Ok(s.bookings
                .lock()
                .unwrap()
                .get(&id)
                .map(|b| b.user_email.clone()))
        });
        let s = store;
        bookings.expect_delete().returning(move |id| {
            if s.bookings.lock().unwrap().remove(&id).is_none() {
                return Err(AppError::EntityNotFound("Booking not found".into()));
            }
            if let Some(v) = s.vehicle.lock().unwrap().as_mut() {
                v.availability = Availability::Available;
            }
            Ok(())
        });

        ReservationManager::new(Arc::new(bookings), Arc::new(vehicles))
    }

    #[tokio::test]
    async fn booking_lifecycle_toggles_the_vehicle() {
        let vehicle_id = VehicleId::new();
        let store = Arc::new(FakeStore {
            vehicle: Mutex::new(Some(vehicle(vehicle_id, Availability::Available))),
            bookings: Mutex::new(HashMap::new()),
        });
        let manager = manager_over(store.clone());
        let renter = identity(RENTER, Role::User);

        let booking = manager
            .create_booking(&renter, request(vehicle_id))
            .await
            .unwrap();
        assert_eq!(booking.duration_days(), 3);
        assert_eq!(booking.total_price, 195);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(
            store.vehicle.lock().unwrap().as_ref().unwrap().availability,
            Availability::Booked
        );
        assert_eq!(store.bookings.lock().unwrap().len(), 1);

        // a second attempt before cancellation conflicts and writes nothing
        let err = manager
            .create_booking(&renter, request(vehicle_id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.bookings.lock().unwrap().len(), 1);

        manager.cancel_booking(booking.id, &renter).await.unwrap();
        assert_eq!(
            store.vehicle.lock().unwrap().as_ref().unwrap().availability,
            Availability::Available
        );
        assert!(store.bookings.lock().unwrap().is_empty());

        let err = manager.cancel_booking(booking.id, &renter).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn missing_fields_fail_before_any_lookup() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles.expect_find_by_id().never();
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();
        let manager = ReservationManager::new(Arc::new(bookings), Arc::new(vehicles));

        let err = manager
            .create_booking(
                &identity(RENTER, Role::User),
                BookingRequest {
                    end_date: None,
                    ..request(VehicleId::new())
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn presence_is_checked_before_the_vehicle_id_is_read() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles.expect_find_by_id().never();
        let manager =
            ReservationManager::new(Arc::new(MockBookingRepository::new()), Arc::new(vehicles));

        let err = manager
            .create_booking(
                &identity(RENTER, Role::User),
                BookingRequest {
                    vehicle_id: Some("abc".into()),
                    user_email: Some(RENTER.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[tokio::test]
    async fn malformed_vehicle_id_in_a_complete_request_is_not_found() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles.expect_find_by_id().never();
        let manager =
            ReservationManager::new(Arc::new(MockBookingRepository::new()), Arc::new(vehicles));

        let err = manager
            .create_booking(
                &identity(RENTER, Role::User),
                BookingRequest {
                    vehicle_id: Some("abc".into()),
                    ..request(VehicleId::new())
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedId(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn unreadable_dates_on_a_booked_vehicle_still_conflict() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_find_by_id()
            .returning(|id| Ok(Some(vehicle(id, Availability::Booked))));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();
        let manager = ReservationManager::new(Arc::new(bookings), Arc::new(vehicles));

        let req = BookingRequest {
            start_date: Some("next friday".into()),
            ..request(VehicleId::new())
        };
        let err = manager
            .create_booking(&identity(RENTER, Role::User), req)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn unreadable_dates_on_an_available_vehicle_are_invalid() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_find_by_id()
            .returning(|id| Ok(Some(vehicle(id, Availability::Available))));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();
        let manager = ReservationManager::new(Arc::new(bookings), Arc::new(vehicles));

        let req = BookingRequest {
            end_date: Some("15/11/2025".into()),
            ..request(VehicleId::new())
        };
        let err = manager
            .create_booking(&identity(RENTER, Role::User), req)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_vehicle_is_not_found() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles.expect_find_by_id().returning(|_| Ok(None));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();
        let manager = ReservationManager::new(Arc::new(bookings), Arc::new(vehicles));

        let err = manager
            .create_booking(&identity(RENTER, Role::User), request(VehicleId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn availability_is_checked_before_dates() {
        let vehicle_id = VehicleId::new();
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_find_by_id()
            .returning(move |id| Ok(Some(vehicle(id, Availability::Booked))));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();
        let manager = ReservationManager::new(Arc::new(bookings), Arc::new(vehicles));

        // inverted dates on a booked vehicle still report the conflict first
        let err = manager
            .create_booking(
                &identity(RENTER, Role::User),
                BookingRequest {
                    start_date: Some("2025-11-15".into()),
                    end_date: Some("2025-11-12".into()),
                    ..request(vehicle_id)
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn inverted_dates_are_a_validation_failure() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_find_by_id()
            .returning(|id| Ok(Some(vehicle(id, Availability::Available))));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();
        let manager = ReservationManager::new(Arc::new(bookings), Arc::new(vehicles));

        let err = manager
            .create_booking(
                &identity(RENTER, Role::User),
                BookingRequest {
                    start_date: Some("2025-11-15".into()),
                    end_date: Some("2025-11-15".into()),
                    ..request(VehicleId::new())
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn booking_for_someone_else_is_forbidden() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles.expect_find_by_id().never();
        let manager =
            ReservationManager::new(Arc::new(MockBookingRepository::new()), Arc::new(vehicles));

        let err = manager
            .create_booking(
                &identity("mallory@example.com", Role::User),
                request(VehicleId::new()),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn lost_race_surfaces_as_conflict() {
        let mut vehicles = MockVehicleRepository::new();
        vehicles
            .expect_find_by_id()
            .returning(|id| Ok(Some(vehicle(id, Availability::Available))));
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::Conflict("Vehicle is not available".into())));
        bookings.expect_find_by_id().never();
        let manager = ReservationManager::new(Arc::new(bookings), Arc::new(vehicles));

        let err = manager
            .create_booking(&identity(RENTER, Role::User), request(VehicleId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn only_the_renter_may_cancel() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_renter_email()
            .returning(|_| Ok(Some(RENTER.into())));
        bookings.expect_find_by_id().never();
        bookings.expect_delete().never();
        let manager =
            ReservationManager::new(Arc::new(bookings), Arc::new(MockVehicleRepository::new()));

        // the vehicle owner is not the renter either
        let err = manager
            .cancel_booking(BookingId::new(), &identity("john@example.com", Role::User))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn update_cannot_move_booking_to_another_vehicle() {
        let vehicle_id = VehicleId::new();
        let store = Arc::new(FakeStore {
            vehicle: Mutex::new(Some(vehicle(vehicle_id, Availability::Available))),
            bookings: Mutex::new(HashMap::new()),
        });
        let manager = manager_over(store);
        let renter = identity(RENTER, Role::User);
        let booking = manager
            .create_booking(&renter, request(vehicle_id))
            .await
            .unwrap();

        let err = manager
            .update_booking(
                booking.id,
                &renter,
                BookingPatch {
                    vehicle_id: Some(VehicleId::new().to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ImmutableField(_)));

        let err = manager
            .update_booking(
                booking.id,
                &renter,
                BookingPatch {
                    vehicle_id: Some("not-a-vehicle".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ImmutableField(_)));

        // the same id spelled differently is not a change
        let same = manager
            .update_booking(
                booking.id,
                &renter,
                BookingPatch {
                    vehicle_id: Some(vehicle_id.to_string().to_uppercase()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.vehicle_id, vehicle_id);

        let err = manager
            .update_booking(
                booking.id,
                &renter,
                BookingPatch {
                    user_email: Some("someone@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn update_applies_status_and_notes() {
        let booking_id = BookingId::new();
        let vehicle_id = VehicleId::new();
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_renter_email()
            .returning(|_| Ok(Some(RENTER.into())));
        bookings.expect_find_by_id().returning(move |id| {
            let v = vehicle(vehicle_id, Availability::Booked);
            let event = CreateBooking {
                booking_id: id,
                vehicle_id,
                user_email: RENTER.into(),
                period: BookingPeriod::new(day(12), day(15)).unwrap(),
                total_price: 195,
                status: BookingStatus::Confirmed,
                notes: String::new(),
            };
            Ok(Some(booking_from(&event, &v)))
        });
        bookings
            .expect_update()
            .withf(move |event| {
                event.booking_id == booking_id
                    && event.status == Some(BookingStatus::Pending)
                    && event.notes.as_deref() == Some("late pickup")
            })
            .times(1)
            .returning(|_| Ok(()));
        let manager =
            ReservationManager::new(Arc::new(bookings), Arc::new(MockVehicleRepository::new()));

        manager
            .update_booking(
                booking_id,
                &identity("FAHIM@example.com", Role::User),
                BookingPatch {
                    vehicle_id: Some(vehicle_id.to_string()),
                    status: Some(BookingStatus::Pending),
                    notes: Some(" late pickup ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn renter_listing_is_self_only_even_for_admins() {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_find_by_renter().never();
        let manager =
            ReservationManager::new(Arc::new(bookings), Arc::new(MockVehicleRepository::new()));

        let err = manager
            .list_by_renter(RENTER, &identity("root@example.com", Role::Admin))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn list_all_requires_admin() {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_find_all().times(1).returning(|| Ok(vec![]));
        let manager =
            ReservationManager::new(Arc::new(bookings), Arc::new(MockVehicleRepository::new()));

        let err = manager
            .list_all(&identity(RENTER, Role::User))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let all = manager
            .list_all(&identity("root@example.com", Role::Admin))
            .await
            .unwrap();
        assert!(all.is_empty());
    }
}
