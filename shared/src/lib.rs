use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A certificate subject as returned by the lookup backend.
///
/// Wire names are camelCase because the external sheet API (and the web
/// frontend consuming this service) are JavaScript-shaped. The record is
/// immutable for the duration of a session once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRecord {
    pub id: String,
    /// Display name; the search key on the lookup side.
    pub name: String,
    pub age: u8,
    /// Registration email; the sole credential checked during verification.
    pub contact_email: String,
    /// Informational only, never used as a credential.
    pub contact_phone: String,
    pub course: Course,
    /// Display string, e.g. "December 2024".
    pub completion_date: String,
    /// Opaque reference to the certificate artifact (URL or path).
    pub certificate_ref: String,
}

/// Programs offered by the training center.
///
/// An explicit enum with a total curriculum mapping on the backend side; the
/// wire form uses the display names the sheet stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Python and AI")]
    PythonAndAi,
    #[serde(rename = "Robotics")]
    Robotics,
}

impl Course {
    pub const ALL: [Course; 3] = [
        Course::WebDevelopment,
        Course::PythonAndAi,
        Course::Robotics,
    ];

    /// Display name as stored by the sheet backend.
    pub fn display_name(&self) -> &'static str {
        match self {
            Course::WebDevelopment => "Web Development",
            Course::PythonAndAi => "Python and AI",
            Course::Robotics => "Robotics",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a course name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCourse(pub String);

impl fmt::Display for UnknownCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown course: {}", self.0)
    }
}

impl std::error::Error for UnknownCourse {}

impl FromStr for Course {
    type Err = UnknownCourse;

    /// Parses the exact display names, case-insensitively. No substring
    /// heuristics: anything else is an unknown course.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Course::ALL
            .into_iter()
            .find(|c| c.display_name().to_lowercase() == normalized)
            .ok_or_else(|| UnknownCourse(s.to_string()))
    }
}

/// Current state of a verification session as reported over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerificationStatus {
    AwaitingEmail,
    CodeIssued,
    Verified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
}

/// An empty `matches` list means no match, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub matches: Vec<ChildRecord>,
}

/// Opens a verification session for the selected record. The client already
/// holds the full record from the search results, so it is carried here
/// rather than re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartVerificationRequest {
    pub child: ChildRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCodeRequest {
    pub code: String,
}

/// Session state echoed after start / email submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSessionResponse {
    pub session_id: String,
    pub status: VerificationStatus,
    /// Display name of the child being verified, for the dialog heading.
    pub child_name: String,
}

/// Returned once the code matches: the caller is now authorized to render
/// the certificate and the personalized welcome letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateReleaseResponse {
    pub session_id: String,
    pub status: VerificationStatus,
    pub child: ChildRecord,
    pub welcome_letter: String,
    pub curriculum: CurriculumInfo,
}

/// Curriculum content for one course, plus the recommended follow-on stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumInfo {
    pub course: Course,
    pub summary: String,
    pub topics: Vec<String>,
    pub next_stage: Course,
}

/// Parent feedback about a completed program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub name: String,
    /// Star rating, 1 through 5.
    pub rating: u8,
    pub comments: String,
}

/// Follow-on enrollment for the next stage of a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSubmission {
    pub parent_name: String,
    pub parent_email: String,
    pub parent_phone: String,
    pub child_name: String,
    pub child_age: u8,
    /// Selected program for the next stage.
    pub track: Course,
    #[serde(default)]
    pub notes: String,
}

/// Acknowledgement for review/enrollment submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAck {
    pub success: bool,
    pub message: String,
}
