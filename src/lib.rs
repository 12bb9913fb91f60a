//! Jobmatch - matching and ranking engine for job seekers and job postings
//!
//! Scores a seeker profile against a posting across six weighted categories,
//! ranks postings for a seeker and seekers for a posting, and memoizes
//! read-heavy results in a TTL cache.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    calculate_detailed_match_score, calculate_match_score, select_active_profile, MatchError, MatchFinder,
    MatchLimits, ScoreCalculator,
};
pub use models::{JobPosting, MatchResult, ScoringWeights, SeekerProfile};
pub use services::{InMemoryStore, MatchStore, ResultCache};
