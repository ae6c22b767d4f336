//! HTTP surface.
//!
//! Thin axum handlers over the domain services; every error body carries a
//! machine-readable code the frontend shows inline (see [`crate::error`]).

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use shared::{
    CertificateReleaseResponse, CurriculumInfo, EnrollmentSubmission, ReviewSubmission,
    SearchRequest, SearchResponse, StartVerificationRequest, SubmissionAck, SubmitCodeRequest,
    SubmitEmailRequest, VerificationSessionResponse, VerificationStatus,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::clients::CertificateLookup;
use crate::domain::curriculum;
use crate::domain::models::VerificationSession;
use crate::domain::{ReviewService, VerificationService};
use crate::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<dyn CertificateLookup>,
    pub verification: Arc<VerificationService>,
    pub reviews: Arc<ReviewService>,
}

impl AppState {
    pub fn new(
        lookup: Arc<dyn CertificateLookup>,
        verification: Arc<VerificationService>,
        reviews: Arc<ReviewService>,
    ) -> Self {
        Self {
            lookup,
            verification,
            reviews,
        }
    }
}

/// All portal routes, nested under `/api` by the caller.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/search", post(search))
        .route("/verifications", post(start_verification))
        .route("/verifications/:id/email", post(submit_email))
        .route("/verifications/:id/code", post(submit_code))
        .route("/verifications/:id", delete(close_verification))
        .route("/courses/:course/curriculum", get(course_curriculum))
        .route("/reviews", post(submit_review))
        .route("/enrollments", post(submit_enrollment))
}

fn session_response(session: &VerificationSession) -> VerificationSessionResponse {
    VerificationSessionResponse {
        session_id: session.id.to_string(),
        status: session.status.into(),
        child_name: session.target.name.clone(),
    }
}

/// POST /api/search
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = request.query.trim();
    info!("POST /api/search - query: {query:?}");

    if query.is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }

    let matches = state.lookup.search(query).await.map_err(|err| {
        error!("certificate lookup failed: {err:#}");
        ApiError::LookupFailed
    })?;

    Ok(Json(SearchResponse { matches }))
}

/// POST /api/verifications
pub async fn start_verification(
    State(state): State<AppState>,
    Json(request): Json<StartVerificationRequest>,
) -> (StatusCode, Json<VerificationSessionResponse>) {
    info!("POST /api/verifications - child: {}", request.child.name);
    let session = state.verification.start_session(request.child);
    (StatusCode::CREATED, Json(session_response(&session)))
}

/// POST /api/verifications/:id/email
pub async fn submit_email(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SubmitEmailRequest>,
) -> Result<Json<VerificationSessionResponse>, ApiError> {
    info!("POST /api/verifications/{session_id}/email");

    state
        .verification
        .submit_email(session_id, &request.email)
        .await?;

    let session = state
        .verification
        .snapshot(session_id)
        .ok_or(ApiError::SessionNotFound)?;

    Ok(Json(session_response(&session)))
}

/// POST /api/verifications/:id/code
pub async fn submit_code(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SubmitCodeRequest>,
) -> Result<Json<CertificateReleaseResponse>, ApiError> {
    info!("POST /api/verifications/{session_id}/code");

    let child = state.verification.submit_code(session_id, &request.code)?;
    let curriculum_info: CurriculumInfo = curriculum::curriculum_for(child.course).into();
    let welcome_letter = curriculum::welcome_letter(&child);

    Ok(Json(CertificateReleaseResponse {
        session_id: session_id.to_string(),
        status: VerificationStatus::Verified,
        child,
        welcome_letter,
        curriculum: curriculum_info,
    }))
}

/// DELETE /api/verifications/:id
pub async fn close_verification(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> StatusCode {
    info!("DELETE /api/verifications/{session_id}");
    // Idempotent: closing an already-gone session is still a 204.
    state.verification.close(session_id);
    StatusCode::NO_CONTENT
}

/// GET /api/courses/:course/curriculum
pub async fn course_curriculum(
    Path(course): Path<String>,
) -> Result<Json<CurriculumInfo>, ApiError> {
    info!("GET /api/courses/{course}/curriculum");
    let course = course.parse().map_err(|_| ApiError::UnknownCourse)?;
    Ok(Json(curriculum::curriculum_for(course).into()))
}

/// POST /api/reviews
pub async fn submit_review(
    State(state): State<AppState>,
    Json(review): Json<ReviewSubmission>,
) -> Result<Json<SubmissionAck>, ApiError> {
    info!("POST /api/reviews");
    state.reviews.submit_review(review).await?;
    Ok(Json(SubmissionAck {
        success: true,
        message: "Thank you for your feedback!".to_string(),
    }))
}

/// POST /api/enrollments
pub async fn submit_enrollment(
    State(state): State<AppState>,
    Json(enrollment): Json<EnrollmentSubmission>,
) -> Result<Json<SubmissionAck>, ApiError> {
    info!("POST /api/enrollments");
    state.reviews.submit_enrollment(enrollment).await?;
    Ok(Json(SubmissionAck {
        success: true,
        message: "Enrollment submitted, our team will contact you within 2 hours.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use shared::{ChildRecord, Course};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct FakeLookup {
        matches: Vec<ChildRecord>,
        fail: bool,
    }

    #[async_trait]
    impl CertificateLookup for FakeLookup {
        async fn search(&self, _query: &str) -> anyhow::Result<Vec<ChildRecord>> {
            if self.fail {
                return Err(anyhow!("sheet API unreachable"));
            }
            Ok(self.matches.clone())
        }
    }

    struct FakeDelivery {
        fail: AtomicBool,
    }

    #[async_trait]
    impl crate::clients::CodeDelivery for FakeDelivery {
        async fn deliver_code(&self, _to: &str, _name: &str, _code: &str) -> anyhow::Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(anyhow!("relay down"));
            }
            Ok(())
        }
    }

    struct FakeSink {
        received: Mutex<Vec<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl crate::clients::SubmissionSink for FakeSink {
        async fn submit(&self, fields: &[(String, String)]) -> anyhow::Result<bool> {
            self.received.lock().unwrap().push(fields.to_vec());
            Ok(true)
        }
    }

    fn record() -> ChildRecord {
        ChildRecord {
            id: "child-1".to_string(),
            name: "David Okoro".to_string(),
            age: 10,
            contact_email: "parent@example.com".to_string(),
            contact_phone: "08123456789".to_string(),
            course: Course::WebDevelopment,
            completion_date: "December 2024".to_string(),
            certificate_ref: "/certs/david-okoro.pdf".to_string(),
        }
    }

    fn setup(lookup_fails: bool, delivery_fails: bool) -> AppState {
        let lookup = Arc::new(FakeLookup {
            matches: vec![record()],
            fail: lookup_fails,
        });
        let delivery = Arc::new(FakeDelivery {
            fail: AtomicBool::new(delivery_fails),
        });
        let sink = Arc::new(FakeSink {
            received: Mutex::new(Vec::new()),
        });
        AppState::new(
            lookup,
            Arc::new(VerificationService::new(delivery)),
            Arc::new(ReviewService::new(sink)),
        )
    }

    #[tokio::test]
    async fn search_returns_matches() {
        let state = setup(false, false);
        let response = search(
            State(state),
            Json(SearchRequest {
                query: "David".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.matches.len(), 1);
        assert_eq!(response.0.matches[0].name, "David Okoro");
    }

    #[tokio::test]
    async fn search_maps_upstream_failure_to_lookup_failed() {
        let state = setup(true, false);
        let err = search(
            State(state),
            Json(SearchRequest {
                query: "David".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::LookupFailed));
    }

    #[tokio::test]
    async fn search_rejects_blank_queries() {
        let state = setup(false, false);
        let err = search(
            State(state),
            Json(SearchRequest {
                query: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn full_verification_flow_releases_the_certificate() {
        let state = setup(false, false);

        let (status, start) = start_verification(
            State(state.clone()),
            Json(StartVerificationRequest { child: record() }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(start.0.status, VerificationStatus::AwaitingEmail);
        assert_eq!(start.0.child_name, "David Okoro");
        let session_id: Uuid = start.0.session_id.parse().unwrap();

        let after_email = submit_email(
            State(state.clone()),
            Path(session_id),
            Json(SubmitEmailRequest {
                email: "Parent@Example.COM ".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(after_email.0.status, VerificationStatus::CodeIssued);

        let issued = state
            .verification
            .snapshot(session_id)
            .unwrap()
            .issued_code
            .unwrap();

        let release = submit_code(
            State(state.clone()),
            Path(session_id),
            Json(SubmitCodeRequest { code: issued }),
        )
        .await
        .unwrap();
        assert_eq!(release.0.status, VerificationStatus::Verified);
        assert_eq!(release.0.child.name, "David Okoro");
        assert!(release.0.welcome_letter.contains("David Okoro"));
        assert_eq!(release.0.curriculum.course, Course::WebDevelopment);
    }

    #[tokio::test]
    async fn wrong_email_surfaces_as_email_mismatch() {
        let state = setup(false, false);
        let (_, start) = start_verification(
            State(state.clone()),
            Json(StartVerificationRequest { child: record() }),
        )
        .await;
        let session_id: Uuid = start.0.session_id.parse().unwrap();

        let err = submit_email(
            State(state),
            Path(session_id),
            Json(SubmitEmailRequest {
                email: "someone-else@example.com".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::EmailMismatch));
    }

    #[tokio::test]
    async fn delivery_outage_surfaces_as_delivery_failed() {
        let state = setup(false, true);
        let (_, start) = start_verification(
            State(state.clone()),
            Json(StartVerificationRequest { child: record() }),
        )
        .await;
        let session_id: Uuid = start.0.session_id.parse().unwrap();

        let err = submit_email(
            State(state),
            Path(session_id),
            Json(SubmitEmailRequest {
                email: "parent@example.com".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::DeliveryFailed));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let state = setup(false, false);
        let (_, start) = start_verification(
            State(state.clone()),
            Json(StartVerificationRequest { child: record() }),
        )
        .await;
        let session_id: Uuid = start.0.session_id.parse().unwrap();

        assert_eq!(
            close_verification(State(state.clone()), Path(session_id)).await,
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            close_verification(State(state.clone()), Path(session_id)).await,
            StatusCode::NO_CONTENT
        );

        // The session really is gone.
        let err = submit_email(
            State(state),
            Path(session_id),
            Json(SubmitEmailRequest {
                email: "parent@example.com".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::SessionNotFound));
    }

    #[tokio::test]
    async fn curriculum_route_parses_display_names() {
        let response = course_curriculum(Path("Python and AI".to_string()))
            .await
            .unwrap();
        assert_eq!(response.0.course, Course::PythonAndAi);

        let err = course_curriculum(Path("Underwater Basket Weaving".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnknownCourse));
    }

    #[tokio::test]
    async fn review_and_enrollment_ack_on_success() {
        let state = setup(false, false);

        let ack = submit_review(
            State(state.clone()),
            Json(ReviewSubmission {
                name: "Ada Okoro".to_string(),
                rating: 4,
                comments: "Great program.".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(ack.0.success);

        let ack = submit_enrollment(
            State(state),
            Json(EnrollmentSubmission {
                parent_name: "Ada Okoro".to_string(),
                parent_email: "ada@example.com".to_string(),
                parent_phone: "08123456789".to_string(),
                child_name: "David Okoro".to_string(),
                child_age: 10,
                track: Course::PythonAndAi,
                notes: "Prefers weekend classes".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(ack.0.success);
    }
}
