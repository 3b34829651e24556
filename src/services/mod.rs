pub mod auth;
pub mod booking;
pub mod stamp;


pub use auth::{AuthService, Claims};
pub use stamp::StampService;
