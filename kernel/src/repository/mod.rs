pub mod booking;
pub mod health;
pub mod identity;
pub mod user;
pub mod vehicle;
