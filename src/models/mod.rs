// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateMatch, CategoryScore, EducationEntry, EducationLevel, ExperienceEntry, ExperienceRange,
    JobMatch, JobPosting, JobRequirements, JobStatus, JobType, Location, MatchColor, MatchLabel,
    MatchResult, RemotePreference, RemoteType, SalaryRange, ScoreBreakdown, ScoringWeights,
    SeekerProfile, SeekerRecord,
};
pub use requests::{
    CandidatesQuery, CreateProfileRequest, DuplicateProfileRequest, JobMatchesQuery, JobsQuery, ScoreRequest,
    UpdateProfileRequest,
};
pub use responses::{
    CandidatesResponse, ErrorResponse, HealthResponse, JobMatchesResponse, JobResponse, JobsResponse, ProfileResponse,
    ProfilesResponse, StatsResponse,
};
