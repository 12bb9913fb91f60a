use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use crate::models::SeekerProfile;

/// Maximum number of profile versions a seeker may keep
pub const MAX_PROFILE_VERSIONS: usize = 5;

/// Errors from mutating a profile collection
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("Maximum {0} profile versions allowed")]
    CapacityExceeded(usize),

    #[error("Profile not found: {0}")]
    NotFound(Uuid),

    #[error("Cannot delete the only profile")]
    LastProfile,
}

/// Return the active profile version, if any
///
/// Only a flagged profile is returned; the lowest-index one wins if the
/// collection was handed over without normalization.
pub fn select_active_profile(profiles: &[SeekerProfile]) -> Option<&SeekerProfile> {
    profiles.iter().find(|p| p.is_active)
}

/// Enforce the single-active-profile invariant
///
/// Keeps the lowest-index active flag and clears the rest; flags index 0
/// when nothing is active. Idempotent.
pub fn normalize_active_profile(mut profiles: Vec<SeekerProfile>) -> Vec<SeekerProfile> {
    let first_active = profiles.iter().position(|p| p.is_active);

    match first_active {
        Some(keep) => {
            for (index, profile) in profiles.iter_mut().enumerate() {
                profile.is_active = index == keep;
            }
        }
        None => {
            if let Some(first) = profiles.first_mut() {
                first.is_active = true;
            }
        }
    }

    profiles
}

/// A seeker's profile versions with the active invariant maintained on every mutation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SeekerProfile>", into = "Vec<SeekerProfile>")]
pub struct ProfileCollection {
    profiles: Vec<SeekerProfile>,
}

impl From<Vec<SeekerProfile>> for ProfileCollection {
    fn from(profiles: Vec<SeekerProfile>) -> Self {
        Self {
            profiles: normalize_active_profile(profiles),
        }
    }
}

impl From<ProfileCollection> for Vec<SeekerProfile> {
    fn from(collection: ProfileCollection) -> Self {
        collection.profiles
    }
}

impl ProfileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn as_slice(&self) -> &[SeekerProfile] {
        &self.profiles
    }

    pub fn get(&self, id: Uuid) -> Option<&SeekerProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn active(&self) -> Option<&SeekerProfile> {
        select_active_profile(&self.profiles)
    }

    /// Append a profile version
    ///
    /// The first version of an empty collection becomes active; later ones are
    /// added inactive.
    pub fn insert(&mut self, mut profile: SeekerProfile) -> Result<&SeekerProfile, ProfileError> {
        if self.profiles.len() >= MAX_PROFILE_VERSIONS {
            return Err(ProfileError::CapacityExceeded(MAX_PROFILE_VERSIONS));
        }

        profile.is_active = self.profiles.is_empty();
        let id = profile.id;
        self.profiles.push(profile);
        self.normalize();

        self.get(id).ok_or(ProfileError::NotFound(id))
    }

    /// Remove a profile version; the last remaining one cannot be removed
    pub fn remove(&mut self, id: Uuid) -> Result<SeekerProfile, ProfileError> {
        let index = self.index_of(id)?;
        if self.profiles.len() == 1 {
            return Err(ProfileError::LastProfile);
        }

        let mut removed = self.profiles.remove(index);
        self.normalize();
        removed.is_active = false;
        Ok(removed)
    }

    /// Make one version active and every other inactive
    pub fn activate(&mut self, id: Uuid) -> Result<&SeekerProfile, ProfileError> {
        let index = self.index_of(id)?;
        let now = Utc::now();
        for (i, profile) in self.profiles.iter_mut().enumerate() {
            let active = i == index;
            if profile.is_active != active {
                profile.is_active = active;
                profile.updated_at = Some(now);
            }
        }
        self.normalize();

        Ok(&self.profiles[index])
    }

    /// Edit a version in place
    ///
    /// The id and creation time survive the edit. A version the edit marks
    /// active takes over from the current one; otherwise the collection is
    /// renormalized.
    pub fn update<F>(&mut self, id: Uuid, edit: F) -> Result<&SeekerProfile, ProfileError>
    where
        F: FnOnce(&mut SeekerProfile),
    {
        let index = self.index_of(id)?;
        let profile = &mut self.profiles[index];
        let created_at = profile.created_at;

        edit(profile);
        profile.id = id;
        profile.created_at = created_at;
        profile.updated_at = Some(Utc::now());

        if profile.is_active {
            for (i, other) in self.profiles.iter_mut().enumerate() {
                other.is_active = i == index;
            }
        }
        self.normalize();

        Ok(&self.profiles[index])
    }

    /// Copy a version under a new id, inactive
    pub fn duplicate(&mut self, id: Uuid, name: Option<String>) -> Result<&SeekerProfile, ProfileError> {
        let source = self.get(id).ok_or(ProfileError::NotFound(id))?;
        if self.profiles.len() >= MAX_PROFILE_VERSIONS {
            return Err(ProfileError::CapacityExceeded(MAX_PROFILE_VERSIONS));
        }

        let now = Utc::now();
        let copy = SeekerProfile {
            id: Uuid::new_v4(),
            name: name.unwrap_or_else(|| format!("{} (Copy)", source.name)),
            is_active: false,
            created_at: Some(now),
            updated_at: Some(now),
            ..source.clone()
        };

        self.insert(copy)
    }

    fn index_of(&self, id: Uuid) -> Result<usize, ProfileError> {
        self.profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or(ProfileError::NotFound(id))
    }

    fn normalize(&mut self) {
        self.profiles = normalize_active_profile(std::mem::take(&mut self.profiles));
    }
}
