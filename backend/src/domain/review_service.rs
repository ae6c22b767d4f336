//! Review and enrollment intake.
//!
//! Validates the two form payloads and forwards them to the external
//! submission sink with the `action` discriminator it expects. A sink
//! answering `success: false` or failing outright is surfaced to the caller
//! as a retryable error; nothing is queued or retried here.

use std::sync::Arc;

use shared::{EnrollmentSubmission, ReviewSubmission};
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::SubmissionSink;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Invalid(String),

    #[error("submission backend rejected the payload")]
    Rejected,

    #[error("submission backend unavailable: {0}")]
    Unavailable(String),
}

pub struct ReviewService {
    sink: Arc<dyn SubmissionSink>,
}

impl ReviewService {
    pub fn new(sink: Arc<dyn SubmissionSink>) -> Self {
        Self { sink }
    }

    pub async fn submit_review(&self, review: ReviewSubmission) -> Result<(), SubmissionError> {
        if review.name.trim().is_empty() {
            return Err(SubmissionError::Invalid("name is required".to_string()));
        }
        if !(1..=5).contains(&review.rating) {
            return Err(SubmissionError::Invalid(
                "rating must be between 1 and 5".to_string(),
            ));
        }
        if review.comments.trim().is_empty() {
            return Err(SubmissionError::Invalid("comments are required".to_string()));
        }

        info!("forwarding review from {}", review.name.trim());
        let fields = vec![
            ("action".to_string(), "review".to_string()),
            ("name".to_string(), review.name.trim().to_string()),
            ("rating".to_string(), review.rating.to_string()),
            ("comments".to_string(), review.comments.trim().to_string()),
        ];
        self.forward(&fields).await
    }

    pub async fn submit_enrollment(
        &self,
        enrollment: EnrollmentSubmission,
    ) -> Result<(), SubmissionError> {
        if enrollment.parent_name.trim().is_empty() {
            return Err(SubmissionError::Invalid("parent name is required".to_string()));
        }
        if !enrollment.parent_email.contains('@') {
            return Err(SubmissionError::Invalid(
                "a valid parent email is required".to_string(),
            ));
        }
        if enrollment.parent_phone.trim().is_empty() {
            return Err(SubmissionError::Invalid("phone number is required".to_string()));
        }
        if enrollment.child_name.trim().is_empty() {
            return Err(SubmissionError::Invalid("child name is required".to_string()));
        }
        if enrollment.child_age == 0 {
            return Err(SubmissionError::Invalid("child age is required".to_string()));
        }

        info!(
            "forwarding enrollment for {} into {}",
            enrollment.child_name.trim(),
            enrollment.track
        );
        let fields = vec![
            ("action".to_string(), "enrollment".to_string()),
            ("parentName".to_string(), enrollment.parent_name.trim().to_string()),
            ("childName".to_string(), enrollment.child_name.trim().to_string()),
            ("childAge".to_string(), enrollment.child_age.to_string()),
            ("phoneNumber".to_string(), enrollment.parent_phone.trim().to_string()),
            ("email".to_string(), enrollment.parent_email.trim().to_string()),
            ("track".to_string(), enrollment.track.to_string()),
            ("notes".to_string(), enrollment.notes.trim().to_string()),
        ];
        self.forward(&fields).await
    }

    async fn forward(&self, fields: &[(String, String)]) -> Result<(), SubmissionError> {
        match self.sink.submit(fields).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("submission sink rejected the payload");
                Err(SubmissionError::Rejected)
            }
            Err(err) => {
                warn!("submission sink unavailable: {err:#}");
                Err(SubmissionError::Unavailable(err.to_string()))
            }
        }
    }
}
