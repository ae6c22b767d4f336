//! Certificate portal backend.
//!
//! HTTP service behind the training center's certificate portal: parents
//! search for a child, prove control of the registration email with a
//! one-time code, and are then handed the certificate record plus a
//! personalized welcome letter. Reviews and follow-on enrollments are
//! forwarded to the external form backend.
//!
//! External collaborators (the sheet-backed lookup/submission API and the
//! SMTP provider) sit behind the traits in [`clients`]; the verification
//! state machine in [`domain`] is the only component with real state.

pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod rest;
