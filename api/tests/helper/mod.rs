use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use chrono::{TimeZone, Utc};
use kernel::{
    model::{
        id::{UserId, VehicleId},
        identity::VerifiedIdentity,
        role::Role,
        user::User,
        vehicle::{Availability, Category, Vehicle},
    },
    repository::{
        booking::{BookingRepository, MockBookingRepository},
        health::{HealthCheckRepository, MockHealthCheckRepository},
        identity::{MockTokenVerifier, TokenVerifier},
        user::{MockUserRepository, UserRepository},
        vehicle::{MockVehicleRepository, VehicleRepository},
    },
};
use registry::{AppRegistry, MockAppRegistryExt};
use serde_json::Value;

pub const TOKEN: &str = "Bearer eyJhbGciOiJSUzI1NiJ9.payload.signature";

pub fn user(email: &str, role: Role) -> User {
    User {
        user_id: UserId::new(),
        subject_id: format!("sub-{email}"),
        email: email.into(),
        display_name: email.split('@').next().unwrap_or_default().into(),
        photo_url: String::new(),
        role,
        phone_number: None,
        address: None,
    }
}

pub fn claims_of(user: &User) -> VerifiedIdentity {
    VerifiedIdentity {
        subject: user.subject_id.clone(),
        email: user.email.clone(),
        name: Some(user.display_name.clone()),
        picture: None,
    }
}

pub fn vehicle(owner_email: &str, availability: Availability) -> Vehicle {
    Vehicle {
        id: VehicleId::new(),
        vehicle_name: "Honda Civic".into(),
        owner: "John Doe".into(),
        category: Category::Sedan,
        price_per_day: 65,
        location: "Dhaka, Banani".into(),
        availability,
        description: "Comfortable sedan for city trips.".into(),
        cover_image: "https://images.example/civic.jpg".into(),
        user_email: owner_email.into(),
        created_at: Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap(),
    }
}

/// Mocks behind the registry; anything left unconfigured panics when called.
#[derive(Default)]
pub struct Mocks {
    pub verifier: MockTokenVerifier,
    pub users: MockUserRepository,
    pub vehicles: MockVehicleRepository,
    pub bookings: MockBookingRepository,
    pub health: MockHealthCheckRepository,
}

impl Mocks {
    /// Accepts any token as `caller`, whose local record already exists.
    pub fn signed_in(caller: &User) -> Self {
        let mut mocks = Self::default();
        let claims = claims_of(caller);
        mocks
            .verifier
            .expect_verify()
            .returning(move |_| Ok(claims.clone()));
        let stored = caller.clone();
        mocks
            .users
            .expect_find_by_subject()
            .returning(move |_| Ok(Some(stored.clone())));
        mocks
    }

    pub fn into_app(self) -> Router {
        let verifier: Arc<dyn TokenVerifier> = Arc::new(self.verifier);
        let users: Arc<dyn UserRepository> = Arc::new(self.users);
        let vehicles: Arc<dyn VehicleRepository> = Arc::new(self.vehicles);
        let bookings: Arc<dyn BookingRepository> = Arc::new(self.bookings);
        let health: Arc<dyn HealthCheckRepository> = Arc::new(self.health);

        let mut registry = MockAppRegistryExt::new();
        registry
            .expect_token_verifier()
            .returning(move || verifier.clone());
        registry
            .expect_user_repository()
            .returning(move || users.clone());
        registry
            .expect_vehicle_repository()
            .returning(move || vehicles.clone());
        registry
            .expect_booking_repository()
            .returning(move || bookings.clone());
        registry
            .expect_health_check_repository()
            .returning(move || health.clone());

        let registry: AppRegistry = Arc::new(registry);
        api::route::v1::routes().with_state(registry)
    }
}

pub fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", TOKEN);
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(res: Response<Body>) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
