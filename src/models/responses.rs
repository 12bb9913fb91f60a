use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::{CandidateMatch, JobMatch, JobPosting, SeekerProfile};
use crate::services::CacheStats;

/// Active postings listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsResponse {
    pub success: bool,
    /// Postings on this page
    pub count: usize,
    /// Postings matching the filters across all pages
    pub total: usize,
    pub page: i64,
    pub pages: i64,
    pub jobs: Vec<JobPosting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub success: bool,
    pub job: JobPosting,
}

/// Response for the matching jobs endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatchesResponse {
    pub success: bool,
    pub count: usize,
    pub matches: Vec<JobMatch>,
}

/// Response for the matching candidates endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesResponse {
    pub success: bool,
    pub count: usize,
    pub candidates: Vec<CandidateMatch>,
}

/// A seeker's profile versions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesResponse {
    pub success: bool,
    #[serde(rename = "activeProfileId")]
    pub active_profile_id: Option<Uuid>,
    pub profiles: Vec<SeekerProfile>,
}

/// A single profile version after a mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: SeekerProfile,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Service statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub cache: CacheStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
