pub mod booking;
pub mod id;
pub mod identity;
pub mod role;
pub mod user;
pub mod vehicle;
