pub mod verification_session;

pub use verification_session::{SessionStatus, VerificationSession};
