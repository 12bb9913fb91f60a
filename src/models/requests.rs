use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{
    EducationEntry, ExperienceEntry, JobPosting, JobType, RemotePreference, RemoteType, SalaryRange, SeekerProfile,
};

/// Default page size for `GET /jobs`
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Filters and pagination for `GET /jobs`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct JobsQuery {
    #[serde(alias = "job_type", rename = "jobType", default)]
    pub job_type: Option<JobType>,
    #[serde(alias = "remote_type", alias = "remote", rename = "remoteType", default)]
    pub remote_type: Option<RemoteType>,
    /// Case-insensitive substring of the posting's city or state
    #[serde(default)]
    pub location: Option<String>,
    /// Comma-separated skills; a posting requiring any of them matches
    #[serde(default)]
    pub skills: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl JobsQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn matches(&self, posting: &JobPosting) -> bool {
        self.job_type.map_or(true, |t| posting.job_type == t)
            && self.remote_type.map_or(true, |t| posting.remote_type == t)
            && self.matches_location(posting)
            && self.matches_skills(posting)
    }

    fn matches_location(&self, posting: &JobPosting) -> bool {
        let Some(needle) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) else {
            return true;
        };
        let needle = needle.to_lowercase();

        posting.location.as_ref().is_some_and(|location| {
            [&location.city, &location.state]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
    }

    fn matches_skills(&self, posting: &JobPosting) -> bool {
        let wanted: Vec<String> = self
            .skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if wanted.is_empty() {
            return true;
        }

        posting
            .requirements
            .skills
            .iter()
            .any(|skill| wanted.contains(&skill.trim().to_lowercase()))
    }
}

/// Query for `GET /jobs/matches`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobMatchesQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "seeker_id", rename = "seekerId")]
    pub seeker_id: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Query for `GET /jobs/{id}/candidates`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidatesQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Body for `POST /matches/score`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub profile: SeekerProfile,
    pub posting: JobPosting,
}

/// Body for creating a new profile version
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(alias = "desired_job_types", rename = "desiredJobTypes", default)]
    pub desired_job_types: Vec<JobType>,
    #[serde(alias = "desired_salary", rename = "desiredSalary", default)]
    pub desired_salary: Option<SalaryRange>,
    #[serde(alias = "preferred_locations", rename = "preferredLocations", default)]
    pub preferred_locations: Vec<String>,
    #[serde(alias = "remote_preference", rename = "remotePreference", default)]
    pub remote_preference: RemotePreference,
}

impl CreateProfileRequest {
    pub fn into_profile(self) -> SeekerProfile {
        let now = chrono::Utc::now();
        SeekerProfile {
            name: self.name.trim().to_string(),
            description: self.description,
            skills: self.skills,
            experience: self.experience,
            education: self.education,
            desired_job_types: self.desired_job_types,
            desired_salary: self.desired_salary,
            preferred_locations: self.preferred_locations,
            remote_preference: self.remote_preference,
            created_at: Some(now),
            updated_at: Some(now),
            ..SeekerProfile::new(String::new())
        }
    }
}

/// Body for duplicating a profile version
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DuplicateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub name: Option<String>,
}

/// Body for editing a profile version; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default)]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(alias = "desired_job_types", rename = "desiredJobTypes", default)]
    pub desired_job_types: Option<Vec<JobType>>,
    #[serde(alias = "desired_salary", rename = "desiredSalary", default)]
    pub desired_salary: Option<SalaryRange>,
    #[serde(alias = "preferred_locations", rename = "preferredLocations", default)]
    pub preferred_locations: Option<Vec<String>>,
    #[serde(alias = "remote_preference", rename = "remotePreference", default)]
    pub remote_preference: Option<RemotePreference>,
    #[serde(alias = "is_active", rename = "isActive", default)]
    pub is_active: Option<bool>,
}

impl UpdateProfileRequest {
    pub fn apply(self, profile: &mut SeekerProfile) {
        if let Some(name) = self.name {
            profile.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            profile.description = Some(description);
        }
        if let Some(skills) = self.skills {
            profile.skills = skills;
        }
        if let Some(experience) = self.experience {
            profile.experience = experience;
        }
        if let Some(education) = self.education {
            profile.education = education;
        }
        if let Some(job_types) = self.desired_job_types {
            profile.desired_job_types = job_types;
        }
        if let Some(salary) = self.desired_salary {
            profile.desired_salary = Some(salary);
        }
        if let Some(locations) = self.preferred_locations {
            profile.preferred_locations = locations;
        }
        if let Some(preference) = self.remote_preference {
            profile.remote_preference = preference;
        }
        if let Some(is_active) = self.is_active {
            profile.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{JobRequirements, Location};

    fn posting(city: &str, state: &str, skills: &[&str]) -> JobPosting {
        JobPosting {
            id: "job-1".to_string(),
            employer_id: None,
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            description: String::new(),
            requirements: JobRequirements {
                skills: skills.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            job_type: JobType::FullTime,
            salary: None,
            location: Some(Location {
                city: Some(city.to_string()),
                state: Some(state.to_string()),
                country: None,
            }),
            remote_type: RemoteType::Onsite,
            status: Default::default(),
            posted_at: None,
            expires_at: None,
            applicant_count: 0,
        }
    }

    #[test]
    fn test_jobs_query_location_and_skills() {
        let job = posting("Austin", "TX", &["Rust", "PostgreSQL"]);

        let by_city = JobsQuery { location: Some("aus".to_string()), ..Default::default() };
        let by_state = JobsQuery { location: Some("tx".to_string()), ..Default::default() };
        let elsewhere = JobsQuery { location: Some("Denver".to_string()), ..Default::default() };
        assert!(by_city.matches(&job));
        assert!(by_state.matches(&job));
        assert!(!elsewhere.matches(&job));

        let any_skill = JobsQuery { skills: Some("go, rust".to_string()), ..Default::default() };
        let no_skill = JobsQuery { skills: Some("go,java".to_string()), ..Default::default() };
        let blank = JobsQuery { skills: Some(" , ".to_string()), ..Default::default() };
        assert!(any_skill.matches(&job));
        assert!(!no_skill.matches(&job));
        assert!(blank.matches(&job));
    }

    #[test]
    fn test_jobs_query_pagination_bounds() {
        let defaults = JobsQuery::default();
        assert!(defaults.validate().is_ok());
        assert_eq!((defaults.page(), defaults.limit()), (1, DEFAULT_PAGE_SIZE));

        for (page, limit, valid) in [(1, 100, true), (0, 20, false), (1, 0, false), (1, 101, false)] {
            let query = JobsQuery { page: Some(page), limit: Some(limit), ..Default::default() };
            assert_eq!(query.validate().is_ok(), valid, "page {} limit {}", page, limit);
        }
    }

    #[test]
    fn test_update_request_changes_only_present_fields() {
        let mut profile = SeekerProfile::new("Backend");
        profile.skills = vec!["Rust".to_string()];
        profile.preferred_locations = vec!["Austin".to_string()];

        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"  Platform ","skills":["Go"],"remotePreference":"remote"}"#).unwrap();
        assert!(request.validate().is_ok());
        request.apply(&mut profile);

        assert_eq!(profile.name, "Platform");
        assert_eq!(profile.skills, vec!["Go"]);
        assert_eq!(profile.preferred_locations, vec!["Austin"]);
        assert_eq!(profile.remote_preference, RemotePreference::Remote);

        let blank = UpdateProfileRequest { name: Some(String::new()), ..Default::default() };
        assert!(blank.validate().is_err());
    }
}
