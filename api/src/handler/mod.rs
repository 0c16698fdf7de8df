pub mod auth;
pub mod booking;
pub mod health;
pub mod user;
pub mod vehicle;
