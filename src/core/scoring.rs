use chrono::{DateTime, Utc};
use crate::core::error::MatchError;
use crate::core::filters::{
    is_education_match, is_location_match, is_salary_match, match_skills, total_experience_years,
};
use crate::models::{
    CategoryScore, JobPosting, MatchColor, MatchLabel, MatchResult, RemotePreference, RemoteType,
    ScoreBreakdown, ScoringWeights, SeekerProfile,
};

/// Computes weighted compatibility between one profile and one posting
///
/// Category maxima are the configured weights:
/// ```text
/// skills      matched / required * w     (no requirement: w / 2)
/// experience  tiered against [min, max]  (no minimum: w / 2)
/// location    remote or preferred place
/// job type    desired set contains posting type
/// salary      desired minimum <= posting maximum
/// education   highest degree >= required level
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
}

impl ScoreCalculator {
    /// Build a calculator, rejecting weights whose maxima do not sum to 100
    pub fn new(weights: ScoringWeights) -> Result<Self, MatchError> {
        let values = [
            weights.skills,
            weights.experience,
            weights.location,
            weights.job_type,
            weights.salary,
            weights.education,
        ];
        if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(MatchError::InvalidInput(format!(
                "scoring weights must be finite and non-negative: {:?}",
                weights
            )));
        }
        if (weights.sum() - 100.0).abs() > 1e-9 {
            return Err(MatchError::InvalidInput(format!(
                "scoring weights must sum to 100, got {}",
                weights.sum()
            )));
        }
        Ok(Self { weights })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a pair using the current time for open-ended experience
    pub fn calculate(&self, profile: &SeekerProfile, posting: &JobPosting) -> MatchResult {
        self.calculate_at(profile, posting, Utc::now())
    }

    /// Score a pair against a fixed reference time
    pub fn calculate_at(
        &self,
        profile: &SeekerProfile,
        posting: &JobPosting,
        now: DateTime<Utc>,
    ) -> MatchResult {
        let breakdown = ScoreBreakdown {
            skills: self.skills_score(profile, posting),
            experience: self.experience_score(profile, posting, now),
            location: self.location_score(profile, posting),
            job_type: self.job_type_score(profile, posting),
            salary: self.salary_score(profile, posting),
            education: self.education_score(profile, posting),
        };

        let score = breakdown.total().round().clamp(0.0, 100.0) as u8;
        let label = MatchLabel::from_score(score);
        let color = MatchColor::from_score(score);

        MatchResult {
            score,
            breakdown,
            label,
            color,
            label_text: label.display_text().to_string(),
            color_hex: color.hex().to_string(),
        }
    }

    fn skills_score(&self, profile: &SeekerProfile, posting: &JobPosting) -> CategoryScore {
        let max = self.weights.skills;
        let overlap = match_skills(&posting.requirements.skills, &profile.skills);
        let required = overlap.required_count();

        if required == 0 {
            return CategoryScore::new(max * 0.5, max, "No specific skills required");
        }

        let score = overlap.matched.len() as f64 / required as f64 * max;
        let details = format!("{} of {} required skills", overlap.matched.len(), required);

        CategoryScore {
            score,
            max,
            details,
            matched: overlap.matched,
            missing: overlap.missing,
        }
    }

    fn experience_score(
        &self,
        profile: &SeekerProfile,
        posting: &JobPosting,
        now: DateTime<Utc>,
    ) -> CategoryScore {
        let max = self.weights.experience;
        let years = total_experience_years(&profile.experience, now);

        let range = posting.requirements.experience.as_ref();
        let required_min = range.and_then(|r| r.min).filter(|m| *m > 0.0);

        let Some(min) = required_min else {
            return CategoryScore::new(max * 0.5, max, format!("{:.1} years of experience", years));
        };

        let upper = range
            .and_then(|r| r.max)
            .filter(|m| *m > 0.0)
            .unwrap_or(f64::INFINITY);

        let (factor, details) = if years >= min && years <= upper {
            let bound = if upper.is_finite() { format!("{}-{}", min, upper) } else { format!("{}+", min) };
            (1.0, format!("Perfect fit: {:.1} years (Required: {})", years, bound))
        } else if years >= min * 0.7 {
            (0.7, format!("Good fit: {:.1} years (Required: {}+)", years, min))
        } else if years >= min * 0.5 {
            (0.4, format!("Growing: {:.1} years (Required: {}+)", years, min))
        } else {
            (0.0, format!("Below requirement: {:.1} years (Required: {}+)", years, min))
        };

        CategoryScore::new(max * factor, max, details)
    }

    fn location_score(&self, profile: &SeekerProfile, posting: &JobPosting) -> CategoryScore {
        let max = self.weights.location;
        if !is_location_match(profile, posting) {
            return CategoryScore::new(0.0, max, "Location may not match preferences");
        }

        let details = if posting.remote_type == RemoteType::Remote {
            "Remote work available"
        } else if profile.remote_preference == RemotePreference::Remote {
            "Matches remote preference"
        } else if profile.remote_preference == RemotePreference::Any {
            "Open to any location"
        } else {
            "Location matches preferences"
        };
        CategoryScore::new(max, max, details)
    }

    fn job_type_score(&self, profile: &SeekerProfile, posting: &JobPosting) -> CategoryScore {
        let max = self.weights.job_type;
        if profile.desired_job_types.contains(&posting.job_type) {
            CategoryScore::new(max, max, format!("Matches desired job type: {}", posting.job_type.as_str()))
        } else {
            CategoryScore::new(0.0, max, format!("Job type: {}", posting.job_type.as_str()))
        }
    }

    fn salary_score(&self, profile: &SeekerProfile, posting: &JobPosting) -> CategoryScore {
        let max = self.weights.salary;
        if is_salary_match(profile, posting) {
            CategoryScore::new(max, max, "Salary meets expectations")
        } else if profile.desired_salary.is_none() || posting.salary.is_none() {
            CategoryScore::new(0.0, max, "Salary information not specified")
        } else {
            CategoryScore::new(0.0, max, "Salary below expectations")
        }
    }

    fn education_score(&self, profile: &SeekerProfile, posting: &JobPosting) -> CategoryScore {
        let max = self.weights.education;
        if is_education_match(profile, posting) {
            CategoryScore::new(max, max, "Education requirements met")
        } else {
            CategoryScore::new(0.0, max, "Education requirements may differ")
        }
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Detailed match score with the default weights
pub fn calculate_detailed_match_score(profile: &SeekerProfile, posting: &JobPosting) -> MatchResult {
    ScoreCalculator::default().calculate(profile, posting)
}

/// Integer match score (0-100), a projection of the detailed result
pub fn calculate_match_score(profile: &SeekerProfile, posting: &JobPosting) -> u8 {
    calculate_detailed_match_score(profile, posting).score
}
