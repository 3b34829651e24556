pub mod farm;
pub mod post;
pub mod reservation;
pub mod review;
pub mod stamp;
pub mod user;

// Re-export all repositories for easy importing
pub use farm::FarmRepository;
pub use post::PostRepository;
pub use reservation::ReservationRepository;
pub use review::ReviewRepository;
pub use stamp::StampRepository;
pub use user::UserRepository;
