//! External collaborators.
//!
//! Each client is defined as a trait so the domain services can be exercised
//! with in-memory fakes; the production implementations talk to the sheet
//! API over HTTP and to the SMTP relay.

pub mod delivery;
pub mod lookup;
pub mod submission;

pub use delivery::{CodeDelivery, SmtpCodeDelivery};
pub use lookup::{CertificateLookup, SheetLookupClient};
pub use submission::{FormSubmissionClient, SubmissionSink};
