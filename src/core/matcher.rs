use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::sync::Arc;
use crate::core::{
    error::MatchError,
    profiles::select_active_profile,
    scoring::ScoreCalculator,
};
use crate::models::{CandidateMatch, JobMatch, JobPosting, SeekerProfile, SeekerRecord};
use crate::services::MatchStore;

/// Default and maximum result sizes plus the candidate score threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchLimits {
    pub default_jobs: usize,
    pub default_candidates: usize,
    pub max: usize,
    pub min_candidate_score: u8,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            default_jobs: 20,
            default_candidates: 50,
            max: 100,
            min_candidate_score: 40,
        }
    }
}

impl MatchLimits {
    /// Validate a requested limit and cap it at the maximum
    pub fn resolve(&self, limit: usize) -> Result<usize, MatchError> {
        if limit == 0 {
            return Err(MatchError::InvalidInput("limit must be at least 1".to_string()));
        }
        Ok(limit.min(self.max))
    }
}

/// Score every posting against one profile and rank them
///
/// Sorted by score descending; equal scores keep retrieval order. No
/// threshold is applied.
///
/// # Arguments
/// * `calculator` - Weighted scorer applied to each pair
/// * `profile` - The seeker's active profile version
/// * `postings` - Postings in retrieval order
/// * `limit` - Maximum number of matches to return
/// * `now` - Reference time for open-ended experience entries
///
/// # Returns
/// At most `limit` job matches, best first
pub fn rank_jobs(
    calculator: &ScoreCalculator,
    profile: &SeekerProfile,
    postings: Vec<JobPosting>,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<JobMatch> {
    let results: Vec<_> = postings
        .par_iter()
        .map(|posting| calculator.calculate_at(profile, posting, now))
        .collect();

    let mut matches: Vec<JobMatch> = postings
        .into_iter()
        .zip(results)
        .map(|(posting, result)| JobMatch { posting, result })
        .collect();

    // Vec::sort_by is stable
    matches.sort_by(|a, b| b.result.score.cmp(&a.result.score));
    matches.truncate(limit);
    matches
}

/// Score every seeker's active profile against one posting and rank them
///
/// Seekers without a resolvable active profile are skipped. Results below
/// `min_score` are dropped before sorting, and equal scores keep retrieval
/// order.
///
/// # Arguments
/// * `calculator` - Weighted scorer applied to each pair
/// * `posting` - The posting candidates are ranked for
/// * `seekers` - Active seekers in retrieval order
/// * `limit` - Maximum number of candidates to return
/// * `min_score` - Lowest score a candidate may have
/// * `now` - Reference time for open-ended experience entries
///
/// # Returns
/// At most `limit` candidate matches, best first
pub fn rank_candidates(
    calculator: &ScoreCalculator,
    posting: &JobPosting,
    seekers: Vec<SeekerRecord>,
    limit: usize,
    min_score: u8,
    now: DateTime<Utc>,
) -> Vec<CandidateMatch> {
    let scored: Vec<Option<CandidateMatch>> = seekers
        .into_par_iter()
        .map(|seeker| -> Option<CandidateMatch> {
            let profile = select_active_profile(&seeker.profiles)?.clone();
            let result = calculator.calculate_at(&profile, posting, now);
            (result.score >= min_score).then(|| CandidateMatch {
                seeker_id: seeker.seeker_id,
                profile,
                result,
            })
        })
        .collect();

    let mut candidates: Vec<CandidateMatch> = scored.into_iter().flatten().collect();
    candidates.sort_by(|a, b| b.result.score.cmp(&a.result.score));
    candidates.truncate(limit);
    candidates
}

/// Main matching orchestrator
///
/// Pulls the candidate set from the store, then scores, filters and ranks it
/// in memory. Each request uses one reference time for every candidate.
#[derive(Clone)]
pub struct MatchFinder {
    store: Arc<dyn MatchStore>,
    calculator: ScoreCalculator,
    limits: MatchLimits,
}

impl MatchFinder {
    pub fn new(store: Arc<dyn MatchStore>, calculator: ScoreCalculator, limits: MatchLimits) -> Self {
        Self {
            store,
            calculator,
            limits,
        }
    }

    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }

    pub fn limits(&self) -> &MatchLimits {
        &self.limits
    }

    /// Rank active postings for a seeker's active profile
    ///
    /// A seeker whose record holds no profile versions is reported as
    /// `NotFound`, the same as a seeker with no record at all. Only a
    /// non-empty collection without an active version is `NoActiveProfile`.
    ///
    /// # Arguments
    /// * `seeker_id` - Id of the job seeker, surrounding whitespace ignored
    /// * `limit` - Maximum number of matches, capped at the configured maximum
    ///
    /// # Returns
    /// Job matches sorted by score descending
    pub async fn find_matching_jobs(&self, seeker_id: &str, limit: usize) -> Result<Vec<JobMatch>, MatchError> {
        let seeker_id = require_id(seeker_id, "seeker id")?;
        let limit = self.limits.resolve(limit)?;

        let profiles = self
            .store
            .seeker_profiles(seeker_id)
            .await?
            .filter(|profiles| !profiles.is_empty())
            .ok_or_else(|| MatchError::NotFound(format!("job seeker profile {}", seeker_id)))?;

        let profile = select_active_profile(&profiles)
            .ok_or_else(|| MatchError::NoActiveProfile(seeker_id.to_string()))?;

        let postings = self.store.active_postings().await?;
        let total_candidates = postings.len();
        tracing::debug!("Scoring {} active postings for seeker {}", total_candidates, seeker_id);

        let matches = rank_jobs(&self.calculator, profile, postings, limit, Utc::now());

        tracing::info!(
            "Returning {} job matches for seeker {} (from {} postings)",
            matches.len(),
            seeker_id,
            total_candidates
        );
        Ok(matches)
    }

    /// Rank active seekers for a posting, dropping those below the threshold
    ///
    /// # Arguments
    /// * `posting_id` - Id of the posting, surrounding whitespace ignored
    /// * `limit` - Maximum number of candidates, capped at the configured maximum
    ///
    /// # Returns
    /// Candidate matches scoring at least `min_candidate_score`, best first
    pub async fn find_matching_candidates(
        &self,
        posting_id: &str,
        limit: usize,
    ) -> Result<Vec<CandidateMatch>, MatchError> {
        let posting_id = require_id(posting_id, "posting id")?;
        let limit = self.limits.resolve(limit)?;

        let posting = self
            .store
            .posting(posting_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("job {}", posting_id)))?;

        let seekers = self.store.active_seekers().await?;
        let total_candidates = seekers.len();
        tracing::debug!("Scoring {} active seekers for posting {}", total_candidates, posting_id);

        let candidates = rank_candidates(
            &self.calculator,
            &posting,
            seekers,
            limit,
            self.limits.min_candidate_score,
            Utc::now(),
        );

        tracing::info!(
            "Returning {} candidates for posting {} (from {} seekers)",
            candidates.len(),
            posting_id,
            total_candidates
        );
        Ok(candidates)
    }
}

fn require_id<'a>(id: &'a str, what: &str) -> Result<&'a str, MatchError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(MatchError::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobRequirements, JobStatus, JobType, RemotePreference, RemoteType};
    use crate::services::{InMemoryStore, StoreError};
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn create_posting(id: &str, skills: &[&str], job_type: JobType) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            employer_id: None,
            title: format!("Job {}", id),
            company: "Acme".to_string(),
            description: String::new(),
            requirements: JobRequirements {
                skills: skills.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            job_type,
            salary: None,
            location: None,
            remote_type: RemoteType::Remote,
            status: JobStatus::Active,
            posted_at: None,
            expires_at: None,
            applicant_count: 0,
        }
    }

    fn create_profile(skills: &[&str]) -> SeekerProfile {
        SeekerProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            desired_job_types: vec![JobType::FullTime],
            remote_preference: RemotePreference::Any,
            is_active: true,
            ..SeekerProfile::new("profile")
        }
    }

    fn create_seeker(id: &str, skills: &[&str]) -> SeekerRecord {
        SeekerRecord {
            seeker_id: id.to_string(),
            is_active: true,
            profiles: vec![create_profile(skills)],
        }
    }

    #[test]
    fn test_rank_jobs_sorted_with_stable_ties() {
        let calc = ScoreCalculator::default();
        let profile = create_profile(&["rust", "go"]);
        let postings = vec![
            create_posting("low", &["java"], JobType::Contract),
            create_posting("tie-1", &["rust", "elixir"], JobType::FullTime),
            create_posting("top", &["rust", "go"], JobType::FullTime),
            create_posting("tie-2", &["go", "elixir"], JobType::FullTime),
        ];

        let ranked = rank_jobs(&calc, &profile, postings, 10, now());
        let ids: Vec<&str> = ranked.iter().map(|m| m.posting.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "tie-1", "tie-2", "low"]);

        for pair in ranked.windows(2) {
            assert!(pair[0].result.score >= pair[1].result.score);
        }
    }

    #[test]
    fn test_rank_jobs_respects_limit_without_threshold() {
        let calc = ScoreCalculator::default();
        let profile = create_profile(&[]);
        let postings: Vec<JobPosting> = (0..30)
            .map(|i| create_posting(&i.to_string(), &["cobol"], JobType::Internship))
            .collect();

        let ranked = rank_jobs(&calc, &profile, postings, 5, now());
        assert_eq!(ranked.len(), 5);
        assert!(ranked.iter().all(|m| m.result.score < 40));
    }

    #[test]
    fn test_rank_candidates_applies_threshold_and_skips_unresolved() {
        let calc = ScoreCalculator::default();
        let posting = create_posting("job", &["rust", "sql"], JobType::FullTime);
        let mut no_active = create_seeker("no-active", &["rust", "sql"]);
        no_active.profiles[0].is_active = false;
        let mut weak = create_seeker("weak", &["php"]);
        weak.profiles[0].desired_job_types.clear();

        let seekers = vec![
            weak,
            create_seeker("strong", &["rust", "sql"]),
            no_active,
            create_seeker("half", &["rust"]),
        ];

        let ranked = rank_candidates(&calc, &posting, seekers, 10, 40, now());
        let ids: Vec<&str> = ranked.iter().map(|c| c.seeker_id.as_str()).collect();
        assert_eq!(ids, vec!["strong", "half"]);
        assert!(ranked.iter().all(|c| c.result.score >= 40));
    }

    #[test]
    fn test_rank_candidates_keeps_order_of_equal_scores() {
        let calc = ScoreCalculator::default();
        let posting = create_posting("job", &["rust", "sql"], JobType::FullTime);

        let mut seekers: Vec<SeekerRecord> = (0..64)
            .map(|i| create_seeker(&format!("tie-{:02}", i), &["rust"]))
            .collect();
        seekers.push(create_seeker("top", &["rust", "sql"]));

        let ranked = rank_candidates(&calc, &posting, seekers, 100, 40, now());
        assert_eq!(ranked.len(), 65);
        assert_eq!(ranked[0].seeker_id, "top");

        let tie_score = ranked[1].result.score;
        assert!(ranked[1..].iter().all(|c| c.result.score == tie_score));
        let expected: Vec<String> = (0..64).map(|i| format!("tie-{:02}", i)).collect();
        let actual: Vec<String> = ranked[1..].iter().map(|c| c.seeker_id.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_limit_resolution() {
        let limits = MatchLimits::default();
        assert!(matches!(limits.resolve(0), Err(MatchError::InvalidInput(_))));
        assert_eq!(limits.resolve(7).unwrap(), 7);
        assert_eq!(limits.resolve(1_000).unwrap(), 100);
    }

    async fn seeded_finder() -> MatchFinder {
        let store = InMemoryStore::new();
        store.upsert_posting(create_posting("j1", &["rust"], JobType::FullTime)).await;
        let mut closed = create_posting("j2", &["rust"], JobType::FullTime);
        closed.status = JobStatus::Closed;
        store.upsert_posting(closed).await;
        store.add_profile("s1", create_profile(&["rust"])).await.unwrap();

        MatchFinder::new(Arc::new(store), ScoreCalculator::default(), MatchLimits::default())
    }

    #[tokio::test]
    async fn test_find_matching_jobs_uses_active_postings() {
        let finder = seeded_finder().await;
        let matches = finder.find_matching_jobs("s1", 10).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].posting.id, "j1");
    }

    #[tokio::test]
    async fn test_find_matching_jobs_errors() {
        let finder = seeded_finder().await;
        assert!(matches!(finder.find_matching_jobs("nobody", 10).await, Err(MatchError::NotFound(_))));
        assert!(matches!(finder.find_matching_jobs("s1", 0).await, Err(MatchError::InvalidInput(_))));
        assert!(matches!(finder.find_matching_jobs("  ", 5).await, Err(MatchError::InvalidInput(_))));
        assert!(matches!(finder.find_matching_candidates("missing", 5).await, Err(MatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_seeker_without_profiles_is_not_found() {
        let store = InMemoryStore::new();
        store.set_seeker_active("empty", true).await;
        let finder = MatchFinder::new(Arc::new(store), ScoreCalculator::default(), MatchLimits::default());

        let err = finder.find_matching_jobs("empty", 10).await.unwrap_err();
        assert!(matches!(err, MatchError::NotFound(_)));
    }

    /// Store handing back a collection nobody normalized
    struct UnnormalizedStore;

    #[async_trait]
    impl MatchStore for UnnormalizedStore {
        async fn seeker_profiles(&self, _seeker_id: &str) -> Result<Option<Vec<SeekerProfile>>, StoreError> {
            let mut profile = create_profile(&["rust"]);
            profile.is_active = false;
            Ok(Some(vec![profile]))
        }

        async fn posting(&self, _posting_id: &str) -> Result<Option<JobPosting>, StoreError> {
            Ok(None)
        }

        async fn active_postings(&self) -> Result<Vec<JobPosting>, StoreError> {
            Ok(vec![])
        }

        async fn active_seekers(&self) -> Result<Vec<SeekerRecord>, StoreError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_no_active_profile_is_reported() {
        let finder = MatchFinder::new(Arc::new(UnnormalizedStore), ScoreCalculator::default(), MatchLimits::default());
        let err = finder.find_matching_jobs("s1", 10).await.unwrap_err();
        assert!(matches!(err, MatchError::NoActiveProfile(_)));
    }
}
