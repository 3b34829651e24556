pub mod auth;
pub mod farms;
pub mod posts;
pub mod reservations;
pub mod reviews;
pub mod shared;
pub mod stamps;
pub mod users;
