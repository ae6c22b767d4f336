//! Domain model for verification sessions.
//!
//! A session is ephemeral: created when a requester selects a record,
//! discarded on close or on successful verification. One session is owned by
//! exactly one interactive flow; nothing about it is persisted.

use chrono::{DateTime, Utc};
use shared::{ChildRecord, VerificationStatus};
use uuid::Uuid;

/// Reachable states of a session.
///
/// Every failure (mismatched email, mismatched code, failed delivery) leaves
/// the session in its prior state, so there is no failure state here; a
/// failed flow is simply retried or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Waiting for the requester to prove they know the registration email.
    AwaitingEmail,
    /// Code generated and delivered; waiting for it to be echoed back.
    CodeIssued,
    /// Terminal: the certificate may be released.
    Verified,
}

impl From<SessionStatus> for VerificationStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::AwaitingEmail => VerificationStatus::AwaitingEmail,
            SessionStatus::CodeIssued => VerificationStatus::CodeIssued,
            SessionStatus::Verified => VerificationStatus::Verified,
        }
    }
}

/// One requester's attempt to unlock one child's certificate.
#[derive(Debug, Clone)]
pub struct VerificationSession {
    pub id: Uuid,
    /// The record being verified against; immutable for the session's life.
    pub target: ChildRecord,
    /// Most recent email the requester entered, kept per attempt.
    pub submitted_email: Option<String>,
    /// The issued 6-digit code, present only in `CodeIssued`.
    pub issued_code: Option<String>,
    /// Most recent code the requester entered; cleared after a mismatch.
    pub submitted_code: Option<String>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl VerificationSession {
    pub fn new(target: ChildRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            submitted_email: None,
            issued_code: None,
            submitted_code: None,
            status: SessionStatus::AwaitingEmail,
            created_at: Utc::now(),
        }
    }

    /// Email form suitable for logging: never the full address.
    pub fn sanitized_email(raw: &str) -> String {
        match raw.split_once('@') {
            Some((local, domain)) if local.chars().count() > 2 => {
                let prefix: String = local.chars().take(2).collect();
                format!("{prefix}...@{domain}")
            }
            _ => "***".to_string(),
        }
    }
}
