use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::core::profiles::{ProfileCollection, ProfileError};
use crate::models::{JobPosting, JobStatus, SeekerProfile, SeekerRecord};

/// Errors raised by the persistence collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Seeker not found: {0}")]
    SeekerNotFound(String),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Seed file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seed parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No active profile for seeker: {0}")]
    NoActiveProfile(String),
}

/// Read-only view of the persistence layer used by the matching engine
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// All profile versions of a seeker, `None` if the seeker has no record
    async fn seeker_profiles(&self, seeker_id: &str) -> Result<Option<Vec<SeekerProfile>>, StoreError>;

    async fn posting(&self, posting_id: &str) -> Result<Option<JobPosting>, StoreError>;

    /// Postings with status `active`, in retrieval order
    async fn active_postings(&self) -> Result<Vec<JobPosting>, StoreError>;

    /// Seekers whose seeker-level active flag is set, in retrieval order
    async fn active_seekers(&self) -> Result<Vec<SeekerRecord>, StoreError>;
}

#[derive(Debug, Clone, Default)]
struct StoredSeeker {
    is_active: bool,
    profiles: ProfileCollection,
}

#[derive(Debug, Default)]
struct StoreState {
    postings: Vec<JobPosting>,
    seeker_order: Vec<String>,
    seekers: HashMap<String, StoredSeeker>,
}

/// Seed document format for [`InMemoryStore::load_seed`]
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub postings: Vec<JobPosting>,
    #[serde(default)]
    pub seekers: Vec<SeekerRecord>,
}

/// In-process store keeping postings and seekers in insertion order
///
/// Every profile mutation goes through [`ProfileCollection`], so the
/// single-active-profile invariant holds after each write.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a seed document
    pub fn from_seed(seed: SeedData) -> Self {
        let mut state = StoreState::default();
        state.postings = seed.postings;
        for record in seed.seekers {
            if !state.seekers.contains_key(&record.seeker_id) {
                state.seeker_order.push(record.seeker_id.clone());
            }
            state.seekers.insert(
                record.seeker_id,
                StoredSeeker {
                    is_active: record.is_active,
                    profiles: ProfileCollection::from(record.profiles),
                },
            );
        }

        Self {
            state: RwLock::new(state),
        }
    }

    /// Load a JSON seed file
    pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        Ok(Self::from_seed(seed))
    }

    /// Insert or replace a posting by id
    pub async fn upsert_posting(&self, posting: JobPosting) {
        let mut state = self.state.write().await;
        match state.postings.iter_mut().find(|p| p.id == posting.id) {
            Some(existing) => *existing = posting,
            None => state.postings.push(posting),
        }
    }

    /// Set the seeker-level active flag, creating an empty seeker if needed
    pub async fn set_seeker_active(&self, seeker_id: &str, is_active: bool) {
        let mut state = self.state.write().await;
        Self::seeker_entry(&mut state, seeker_id).is_active = is_active;
    }

    /// Profile versions of a seeker, in collection order
    pub async fn profiles(&self, seeker_id: &str) -> Result<Vec<SeekerProfile>, StoreError> {
        let state = self.state.read().await;
        state
            .seekers
            .get(seeker_id)
            .map(|s| s.profiles.as_slice().to_vec())
            .ok_or_else(|| StoreError::SeekerNotFound(seeker_id.to_string()))
    }

    /// Add a profile version, creating the seeker record on first use
    pub async fn add_profile(&self, seeker_id: &str, profile: SeekerProfile) -> Result<SeekerProfile, StoreError> {
        let mut state = self.state.write().await;
        let seeker = Self::seeker_entry(&mut state, seeker_id);
        Ok(seeker.profiles.insert(profile)?.clone())
    }

    /// The active profile version of a seeker
    pub async fn active_profile(&self, seeker_id: &str) -> Result<SeekerProfile, StoreError> {
        let state = self.state.read().await;
        let seeker = state
            .seekers
            .get(seeker_id)
            .ok_or_else(|| StoreError::SeekerNotFound(seeker_id.to_string()))?;
        seeker
            .profiles
            .active()
            .cloned()
            .ok_or_else(|| StoreError::NoActiveProfile(seeker_id.to_string()))
    }

    /// Apply an edit to one profile version
    pub async fn update_profile<F>(&self, seeker_id: &str, profile_id: Uuid, edit: F) -> Result<SeekerProfile, StoreError>
    where
        F: FnOnce(&mut SeekerProfile),
    {
        self.with_profiles(seeker_id, |profiles| Ok(profiles.update(profile_id, edit)?.clone()))
            .await
    }

    pub async fn activate_profile(&self, seeker_id: &str, profile_id: Uuid) -> Result<SeekerProfile, StoreError> {
        self.with_profiles(seeker_id, |profiles| Ok(profiles.activate(profile_id)?.clone()))
            .await
    }

    pub async fn duplicate_profile(
        &self,
        seeker_id: &str,
        profile_id: Uuid,
        name: Option<String>,
    ) -> Result<SeekerProfile, StoreError> {
        self.with_profiles(seeker_id, |profiles| Ok(profiles.duplicate(profile_id, name)?.clone()))
            .await
    }

    pub async fn remove_profile(&self, seeker_id: &str, profile_id: Uuid) -> Result<SeekerProfile, StoreError> {
        self.with_profiles(seeker_id, |profiles| Ok(profiles.remove(profile_id)?))
            .await
    }

    async fn with_profiles<T, F>(&self, seeker_id: &str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut ProfileCollection) -> Result<T, StoreError>,
    {
        let mut state = self.state.write().await;
        let seeker = state
            .seekers
            .get_mut(seeker_id)
            .ok_or_else(|| StoreError::SeekerNotFound(seeker_id.to_string()))?;
        f(&mut seeker.profiles)
    }

    fn seeker_entry<'a>(state: &'a mut StoreState, seeker_id: &str) -> &'a mut StoredSeeker {
        if !state.seekers.contains_key(seeker_id) {
            state.seeker_order.push(seeker_id.to_string());
        }
        state
            .seekers
            .entry(seeker_id.to_string())
            .or_insert_with(|| StoredSeeker {
                is_active: true,
                profiles: ProfileCollection::new(),
            })
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn seeker_profiles(&self, seeker_id: &str) -> Result<Option<Vec<SeekerProfile>>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .seekers
            .get(seeker_id)
            .map(|s| s.profiles.as_slice().to_vec()))
    }

    async fn posting(&self, posting_id: &str) -> Result<Option<JobPosting>, StoreError> {
        let state = self.state.read().await;
        Ok(state.postings.iter().find(|p| p.id == posting_id).cloned())
    }

    async fn active_postings(&self) -> Result<Vec<JobPosting>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .postings
            .iter()
            .filter(|p| p.status == JobStatus::Active)
            .cloned()
            .collect())
    }

    async fn active_seekers(&self) -> Result<Vec<SeekerRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .seeker_order
            .iter()
            .filter_map(|id| state.seekers.get(id).map(|s| (id, s)))
            .filter(|(_, s)| s.is_active)
            .map(|(id, s)| SeekerRecord {
                seeker_id: id.clone(),
                is_active: s.is_active,
                profiles: s.profiles.as_slice().to_vec(),
            })
            .collect())
    }
}
