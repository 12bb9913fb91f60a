use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employment type of a posting, also used for a seeker's desired job types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }
}

/// Where a seeker is willing to work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemotePreference {
    Remote,
    Onsite,
    Hybrid,
    #[default]
    Any,
}

/// Where a posting's work happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteType {
    Remote,
    #[default]
    Onsite,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
    Draft,
}

/// Degree levels, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Phd,
}

impl EducationLevel {
    /// Parse a free-form degree string. Unknown degrees yield `None`.
    pub fn parse(degree: &str) -> Option<Self> {
        match degree.trim().to_lowercase().as_str() {
            "high_school" => Some(EducationLevel::HighSchool),
            "associate" => Some(EducationLevel::Associate),
            "bachelor" => Some(EducationLevel::Bachelor),
            "master" => Some(EducationLevel::Master),
            "phd" => Some(EducationLevel::Phd),
            _ => None,
        }
    }
}

/// Salary range; either bound may be missing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String { "USD".to_string() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(rename = "graduationYear", default)]
    pub graduation_year: Option<i32>,
}

/// One version of a job seeker's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekerProfile {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(rename = "desiredJobTypes", default)]
    pub desired_job_types: Vec<JobType>,
    #[serde(rename = "desiredSalary", default)]
    pub desired_salary: Option<SalaryRange>,
    #[serde(rename = "preferredLocations", default)]
    pub preferred_locations: Vec<String>,
    #[serde(rename = "remotePreference", default)]
    pub remote_preference: RemotePreference,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SeekerProfile {
    /// Blank, inactive profile version with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            skills: vec![],
            experience: vec![],
            education: vec![],
            desired_job_types: vec![],
            desired_salary: None,
            preferred_locations: vec![],
            remote_preference: RemotePreference::Any,
            is_active: false,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A seeker and all of their profile versions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekerRecord {
    #[serde(rename = "seekerId")]
    pub seeker_id: String,
    /// Seeker-level enablement, independent of which profile version is active
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub profiles: Vec<SeekerProfile>,
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperienceRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Option<ExperienceRange>,
    #[serde(default)]
    pub education: Option<EducationLevel>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A job posting as handed over by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    #[serde(rename = "employerId", default)]
    pub employer_id: Option<String>,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: JobRequirements,
    #[serde(rename = "jobType")]
    pub job_type: JobType,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(rename = "remoteType", default)]
    pub remote_type: RemoteType,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(rename = "postedAt", default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(rename = "expiresAt", default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "applicantCount", default)]
    pub applicant_count: u32,
}

/// Scoring weights, one per category; maxima must sum to 100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub job_type: f64,
    pub salary: f64,
    pub education: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.location + self.job_type + self.salary + self.education
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 40.0,
            experience: 25.0,
            location: 15.0,
            job_type: 10.0,
            salary: 5.0,
            education: 5.0,
        }
    }
}

/// Presentation tier derived from a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLabel {
    Excellent,
    Great,
    Good,
    Fair,
    Low,
}

impl MatchLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => MatchLabel::Excellent,
            75..=89 => MatchLabel::Great,
            60..=74 => MatchLabel::Good,
            40..=59 => MatchLabel::Fair,
            _ => MatchLabel::Low,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            MatchLabel::Excellent => "Excellent Match",
            MatchLabel::Great => "Great Match",
            MatchLabel::Good => "Good Match",
            MatchLabel::Fair => "Fair Match",
            MatchLabel::Low => "Low Match",
        }
    }
}

/// Color token keyed to the same thresholds as [`MatchLabel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchColor {
    Green,
    LightGreen,
    Orange,
    DeepOrange,
    Red,
}

impl MatchColor {
    pub fn from_score(score: u8) -> Self {
        match MatchLabel::from_score(score) {
            MatchLabel::Excellent => MatchColor::Green,
            MatchLabel::Great => MatchColor::LightGreen,
            MatchLabel::Good => MatchColor::Orange,
            MatchLabel::Fair => MatchColor::DeepOrange,
            MatchLabel::Low => MatchColor::Red,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            MatchColor::Green => "#4CAF50",
            MatchColor::LightGreen => "#8BC34A",
            MatchColor::Orange => "#FF9800",
            MatchColor::DeepOrange => "#FF5722",
            MatchColor::Red => "#F44336",
        }
    }
}

/// Score for one category of the breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

impl CategoryScore {
    pub fn new(score: f64, max: f64, details: impl Into<String>) -> Self {
        Self {
            score,
            max,
            details: details.into(),
            matched: vec![],
            missing: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: CategoryScore,
    pub experience: CategoryScore,
    pub location: CategoryScore,
    #[serde(rename = "jobType")]
    pub job_type: CategoryScore,
    pub salary: CategoryScore,
    pub education: CategoryScore,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.skills.score
            + self.experience.score
            + self.location.score
            + self.job_type.score
            + self.salary.score
            + self.education.score
    }
}

/// Detailed compatibility of one profile with one posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub label: MatchLabel,
    pub color: MatchColor,
    /// Human-readable label, e.g. "Great Match"
    #[serde(rename = "labelText")]
    pub label_text: String,
    #[serde(rename = "colorHex")]
    pub color_hex: String,
}

/// A posting ranked for a seeker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatch {
    pub posting: JobPosting,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

/// A seeker ranked for a posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMatch {
    #[serde(rename = "seekerId")]
    pub seeker_id: String,
    pub profile: SeekerProfile,
    #[serde(rename = "match")]
    pub result: MatchResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_thresholds() {
        assert_eq!(MatchLabel::from_score(100), MatchLabel::Excellent);
        assert_eq!(MatchLabel::from_score(90), MatchLabel::Excellent);
        assert_eq!(MatchLabel::from_score(89), MatchLabel::Great);
        assert_eq!(MatchLabel::from_score(75), MatchLabel::Great);
        assert_eq!(MatchLabel::from_score(60), MatchLabel::Good);
        assert_eq!(MatchLabel::from_score(40), MatchLabel::Fair);
        assert_eq!(MatchLabel::from_score(39), MatchLabel::Low);
        assert_eq!(MatchLabel::from_score(0), MatchLabel::Low);
    }

    #[test]
    fn test_color_follows_label() {
        assert_eq!(MatchColor::from_score(95).hex(), "#4CAF50");
        assert_eq!(MatchColor::from_score(80), MatchColor::LightGreen);
        assert_eq!(MatchColor::from_score(65), MatchColor::Orange);
        assert_eq!(MatchColor::from_score(45), MatchColor::DeepOrange);
        assert_eq!(MatchColor::from_score(10).hex(), "#F44336");
    }

    #[test]
    fn test_education_parse_and_order() {
        assert_eq!(EducationLevel::parse("Bachelor"), Some(EducationLevel::Bachelor));
        assert_eq!(EducationLevel::parse("bootcamp"), None);
        assert!(EducationLevel::HighSchool < EducationLevel::Associate);
        assert!(EducationLevel::Master < EducationLevel::Phd);
    }

    #[test]
    fn test_default_weights_sum_to_hundred() {
        assert_eq!(ScoringWeights::default().sum(), 100.0);
    }

    #[test]
    fn test_posting_deserializes_with_defaults() {
        let json = r#"{"id":"j1","title":"Dev","company":"Acme","jobType":"full-time"}"#;
        let posting: JobPosting = serde_json::from_str(json).unwrap();
        assert_eq!(posting.status, JobStatus::Active);
        assert_eq!(posting.remote_type, RemoteType::Onsite);
        assert!(posting.requirements.skills.is_empty());
    }
}
