// Core algorithm exports
pub mod error;
pub mod filters;
pub mod matcher;
pub mod profiles;
pub mod scoring;

pub use error::MatchError;
pub use filters::{is_education_match, is_location_match, is_salary_match, match_skills, total_experience_years};
pub use matcher::{rank_candidates, rank_jobs, MatchFinder, MatchLimits};
pub use profiles::{normalize_active_profile, select_active_profile, ProfileCollection, ProfileError, MAX_PROFILE_VERSIONS};
pub use scoring::{calculate_detailed_match_score, calculate_match_score, ScoreCalculator};
