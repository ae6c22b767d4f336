//! Identity verification and certificate release.
//!
//! The state machine that gates access to a child's certificate:
//!
//! `AwaitingEmail` → (email matches, code delivered) → `CodeIssued` →
//! (code echoed back exactly) → `Verified`.
//!
//! Mismatches and delivery failures leave the session where it was and the
//! requester retries; there is no attempt cap and no code expiry (both are
//! known hardening gaps, preserved deliberately; see DESIGN.md). Closing a
//! session discards it from any non-terminal state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use shared::ChildRecord;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::CodeDelivery;
use crate::domain::models::{SessionStatus, VerificationSession};

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("submitted email does not match the registration email")]
    EmailMismatch,

    #[error("submitted code does not match the issued code")]
    CodeMismatch,

    #[error("verification code delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("verification session not found")]
    SessionNotFound,

    #[error("session is not in the {expected} state")]
    InvalidState { expected: &'static str },

    #[error("{0}")]
    InvalidInput(&'static str),
}

/// Owns all live verification sessions.
///
/// Each session belongs to a single interactive flow, so the store sees no
/// contention in practice; the mutex only guards the map itself. It is never
/// held across the delivery await.
pub struct VerificationService {
    sessions: Mutex<HashMap<Uuid, VerificationSession>>,
    delivery: Arc<dyn CodeDelivery>,
}

impl VerificationService {
    pub fn new(delivery: Arc<dyn CodeDelivery>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            delivery,
        }
    }

    /// Create a session for the selected record, in `AwaitingEmail`.
    pub fn start_session(&self, target: ChildRecord) -> VerificationSession {
        let session = VerificationSession::new(target);
        info!(
            "starting verification session {} for {}",
            session.id, session.target.name
        );
        self.sessions().insert(session.id, session.clone());
        session
    }

    /// Check the requester-supplied email against the record and, on a
    /// match, issue and deliver a fresh one-time code.
    ///
    /// Exactly one delivery request is made per successful match; none on a
    /// mismatch. A delivery failure retains nothing from the attempt.
    pub async fn submit_email(
        &self,
        session_id: Uuid,
        candidate_email: &str,
    ) -> Result<SessionStatus, VerificationError> {
        if candidate_email.trim().is_empty() {
            return Err(VerificationError::InvalidInput("email must not be empty"));
        }

        let (destination, child_name) = {
            let mut sessions = self.sessions();
            let session = sessions
                .get_mut(&session_id)
                .ok_or(VerificationError::SessionNotFound)?;

            if session.status != SessionStatus::AwaitingEmail {
                return Err(VerificationError::InvalidState {
                    expected: "awaiting-email",
                });
            }

            session.submitted_email = Some(candidate_email.trim().to_string());

            if normalize_email(candidate_email) != normalize_email(&session.target.contact_email) {
                warn!(
                    "session {}: email mismatch (submitted {})",
                    session_id,
                    VerificationSession::sanitized_email(candidate_email.trim())
                );
                return Err(VerificationError::EmailMismatch);
            }

            (
                session.target.contact_email.clone(),
                session.target.name.clone(),
            )
        };

        // Lock released: the code is generated and delivered without pinning
        // the store, so a close during delivery just orphans the result.
        let code = generate_code();
        self.delivery
            .deliver_code(&destination, &child_name, &code)
            .await
            .map_err(|err| {
                warn!("session {session_id}: code delivery failed: {err:#}");
                VerificationError::DeliveryFailed(err.to_string())
            })?;

        let mut sessions = self.sessions();
        match sessions.get_mut(&session_id) {
            Some(session) if session.status == SessionStatus::AwaitingEmail => {
                session.issued_code = Some(code);
                session.status = SessionStatus::CodeIssued;
                info!("session {session_id}: code issued");
                Ok(SessionStatus::CodeIssued)
            }
            Some(_) => Err(VerificationError::InvalidState {
                expected: "awaiting-email",
            }),
            None => {
                // Closed while delivery was in flight; the result is dropped.
                info!("session {session_id} closed during delivery, discarding code");
                Err(VerificationError::SessionNotFound)
            }
        }
    }

    /// Compare the echoed code against the issued one, exactly.
    ///
    /// On a match the session is terminal and discarded; the returned record
    /// authorizes the caller to render the certificate. On a mismatch the
    /// session stays in `CodeIssued` with the submitted code cleared.
    pub fn submit_code(
        &self,
        session_id: Uuid,
        candidate_code: &str,
    ) -> Result<ChildRecord, VerificationError> {
        if candidate_code.is_empty() {
            return Err(VerificationError::InvalidInput("code must not be empty"));
        }

        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(VerificationError::SessionNotFound)?;

        if session.status != SessionStatus::CodeIssued {
            return Err(VerificationError::InvalidState {
                expected: "code-issued",
            });
        }

        let Some(issued) = session.issued_code.clone() else {
            return Err(VerificationError::InvalidState {
                expected: "code-issued",
            });
        };

        session.submitted_code = Some(candidate_code.to_string());

        // Exact comparison, no normalization: the issued code is always
        // exactly six digits.
        if candidate_code != issued {
            session.submitted_code = None;
            warn!("session {session_id}: code mismatch");
            return Err(VerificationError::CodeMismatch);
        }

        session.status = SessionStatus::Verified;
        let record = session.target.clone();
        sessions.remove(&session_id);
        info!("session {session_id}: verified, releasing certificate for {}", record.name);
        Ok(record)
    }

    /// Discard a session from any non-terminal state. No record of the
    /// abandonment is kept. Idempotent: closing an unknown id is a no-op.
    pub fn close(&self, session_id: Uuid) -> bool {
        let removed = self.sessions().remove(&session_id).is_some();
        if removed {
            info!("session {session_id} closed");
        }
        removed
    }

    /// Current state of a session, if it is still live.
    pub fn snapshot(&self, session_id: Uuid) -> Option<VerificationSession> {
        self.sessions().get(&session_id).cloned()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, VerificationSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The sole credential comparison: trimmed, case-insensitive.
fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Uniform draw over the inclusive range [100000, 999999]; always six digits.
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
