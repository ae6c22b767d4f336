//! Domain services.

pub mod curriculum;
pub mod models;
pub mod review_service;
pub mod verification_service;

pub use review_service::ReviewService;
pub use verification_service::VerificationService;
