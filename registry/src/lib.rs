use std::sync::Arc;

use adapter::{
    database::ConnectionPool,
    identity::HttpTokenVerifier,
    repository::{
        booking::BookingRepositoryImpl, health::HealthCheckRepositoryImpl,
        user::UserRepositoryImpl, vehicle::VehicleRepositoryImpl,
    },
};
use kernel::repository::{
    booking::BookingRepository, health::HealthCheckRepository, identity::TokenVerifier,
    user::UserRepository, vehicle::VehicleRepository,
};
use shared::{config::AppConfig, error::AppResult};

#[derive(Clone)]
pub struct AppRegistryImpl {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    user_repository: Arc<dyn UserRepository>,
    vehicle_repository: Arc<dyn VehicleRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    token_verifier: Arc<dyn TokenVerifier>,
}

impl AppRegistryImpl {
    pub fn new(pool: ConnectionPool, app_config: &AppConfig) -> AppResult<Self> {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let vehicle_repository = Arc::new(VehicleRepositoryImpl::new(pool.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let token_verifier = Arc::new(HttpTokenVerifier::new(&app_config.identity)?);
        Ok(Self {
            health_check_repository,
            user_repository,
            vehicle_repository,
            booking_repository,
            token_verifier,
        })
    }
}

#[mockall::automock]
pub trait AppRegistryExt {
    fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository>;
    fn user_repository(&self) -> Arc<dyn UserRepository>;
    fn vehicle_repository(&self) -> Arc<dyn VehicleRepository>;
    fn booking_repository(&self) -> Arc<dyn BookingRepository>;
    fn token_verifier(&self) -> Arc<dyn TokenVerifier>;
}

impl AppRegistryExt for AppRegistryImpl {
    fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    fn vehicle_repository(&self) -> Arc<dyn VehicleRepository> {
        self.vehicle_repository.clone()
    }

    fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    fn token_verifier(&self) -> Arc<dyn TokenVerifier> {
        self.token_verifier.clone()
    }
}

pub type AppRegistry = Arc<dyn AppRegistryExt + Send + Sync + 'static>;
