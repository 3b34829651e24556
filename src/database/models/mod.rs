pub mod farm;
pub mod post;
pub mod reservation;
pub mod review;
pub mod stamp;
pub mod user;

// Re-export all models for easy importing
pub use farm::*;
pub use post::*;
pub use reservation::*;
pub use review::*;
pub use stamp::*;
pub use user::*;
