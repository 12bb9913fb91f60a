use chrono::{DateTime, Utc};
use crate::models::{EducationEntry, EducationLevel, ExperienceEntry, JobPosting, RemotePreference, RemoteType, SeekerProfile};

/// Milliseconds in the 30-day month used for experience arithmetic
const MILLIS_PER_MONTH: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 30.0;

/// Outcome of matching required skills against possessed skills
#[derive(Debug, Clone, PartialEq)]
pub struct SkillOverlap {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl SkillOverlap {
    pub fn required_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

fn normalize_skills(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Match each required skill against the possessed skills
///
/// A required skill matches when it contains, or is contained in, some
/// possessed skill (case-insensitive). Blank entries on either side are ignored.
pub fn match_skills(required: &[String], possessed: &[String]) -> SkillOverlap {
    let possessed = normalize_skills(possessed);
    let (matched, missing) = normalize_skills(required)
        .into_iter()
        .partition(|skill| {
            possessed
                .iter()
                .any(|have| have.contains(skill.as_str()) || skill.contains(have.as_str()))
        });

    SkillOverlap { matched, missing }
}

/// Total years of experience as of `now`
///
/// Open-ended entries run until `now`; an entry with no start contributes
/// nothing. Negative spans are clamped to zero per entry.
pub fn total_experience_years(entries: &[ExperienceEntry], now: DateTime<Utc>) -> f64 {
    let total_months: f64 = entries
        .iter()
        .map(|entry| {
            let end = entry.end_date.unwrap_or(now);
            let start = entry.start_date.unwrap_or(now);
            let months = (end - start).num_milliseconds() as f64 / MILLIS_PER_MONTH;
            months.max(0.0)
        })
        .sum();

    total_months / 12.0
}

/// Location compatibility between a seeker and a posting
#[inline]
pub fn is_location_match(profile: &SeekerProfile, posting: &JobPosting) -> bool {
    if posting.remote_type == RemoteType::Remote
        || matches!(profile.remote_preference, RemotePreference::Remote | RemotePreference::Any)
    {
        return true;
    }

    let Some(location) = &posting.location else {
        return false;
    };

    let places: Vec<String> = [&location.city, &location.state]
        .into_iter()
        .flatten()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();

    profile.preferred_locations.iter().any(|preferred| {
        let preferred = preferred.trim().to_lowercase();
        !preferred.is_empty()
            && places
                .iter()
                .any(|place| preferred.contains(place.as_str()) || place.contains(preferred.as_str()))
    })
}

/// Whether the posting pays at least what the seeker asks for
///
/// Both sides must state a salary range; missing bounds default to
/// 0 (seeker minimum) and unbounded (posting maximum).
#[inline]
pub fn is_salary_match(profile: &SeekerProfile, posting: &JobPosting) -> bool {
    let (Some(desired), Some(offered)) = (&profile.desired_salary, &posting.salary) else {
        return false;
    };

    let seeker_min = desired.min.unwrap_or(0.0);
    let posting_max = offered.max.unwrap_or(f64::INFINITY);

    seeker_min <= posting_max
}

/// Highest recognised degree; `HighSchool` when none is recognised
pub fn highest_education_level(entries: &[EducationEntry]) -> EducationLevel {
    entries
        .iter()
        .filter_map(|e| EducationLevel::parse(&e.degree))
        .max()
        .unwrap_or(EducationLevel::HighSchool)
}

#[inline]
pub fn is_education_match(profile: &SeekerProfile, posting: &JobPosting) -> bool {
    match posting.requirements.education {
        None => true,
        Some(required) => highest_education_level(&profile.education) >= required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobType, Location, SalaryRange};
    use chrono::{Duration, TimeZone};

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_posting() -> JobPosting {
        JobPosting {
            id: "job-1".to_string(),
            employer_id: None,
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            description: String::new(),
            requirements: Default::default(),
            job_type: JobType::FullTime,
            salary: None,
            location: Some(Location {
                city: Some("Austin".to_string()),
                state: Some("TX".to_string()),
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
    fn test_skill_match_is_case_insensitive() {
        let overlap = match_skills(
            &skills(&["javascript", "node.js", "react"]),
            &skills(&["JavaScript", "React"]),
        );
        assert_eq!(overlap.matched, vec!["javascript", "react"]);
        assert_eq!(overlap.missing, vec!["node.js"]);
        assert_eq!(overlap.required_count(), 3);
    }

    #[test]
    fn test_skill_match_both_directions() {
        // required contained in possessed
        let a = match_skills(&skills(&["sql"]), &skills(&["PostgreSQL"]));
        // possessed contained in required
        let b = match_skills(&skills(&["PostgreSQL"]), &skills(&["sql"]));
        assert_eq!(a.matched.len(), 1);
        assert_eq!(b.matched.len(), 1);
    }

    #[test]
    fn test_blank_skills_ignored() {
        let overlap = match_skills(&skills(&["rust", " "]), &skills(&[""]));
        assert!(overlap.matched.is_empty());
        assert_eq!(overlap.missing, vec!["rust"]);
    }

    #[test]
    fn test_total_experience() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let entries = vec![
            ExperienceEntry {
                title: "Dev".to_string(),
                company: "A".to_string(),
                start_date: Some(now - Duration::days(360)),
                end_date: None,
                description: None,
                current: true,
            },
            ExperienceEntry {
                title: "Intern".to_string(),
                company: "B".to_string(),
                start_date: None,
                end_date: Some(now - Duration::days(800)),
                description: None,
                current: false,
            },
        ];
        // 360 days = 12 thirty-day months; the start-less entry is clamped to zero
        let years = total_experience_years(&entries, now);
        assert!((years - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_remote_posting_always_matches() {
        let mut profile = SeekerProfile::new("p");
        profile.remote_preference = RemotePreference::Onsite;
        profile.preferred_locations = skills(&["Seattle"]);
        let mut posting = create_test_posting();
        posting.remote_type = RemoteType::Remote;
        assert!(is_location_match(&profile, &posting));
    }

    #[test]
    fn test_location_substring_match() {
        let mut profile = SeekerProfile::new("p");
        profile.remote_preference = RemotePreference::Onsite;
        profile.preferred_locations = skills(&["Austin, TX"]);
        let posting = create_test_posting();
        assert!(is_location_match(&profile, &posting));

        profile.preferred_locations = skills(&["Denver"]);
        assert!(!is_location_match(&profile, &posting));
    }

    #[test]
    fn test_missing_city_does_not_match_everything() {
        let mut profile = SeekerProfile::new("p");
        profile.remote_preference = RemotePreference::Hybrid;
        profile.preferred_locations = skills(&["Denver"]);
        let mut posting = create_test_posting();
        posting.location = Some(Location::default());
        assert!(!is_location_match(&profile, &posting));
    }

    #[test]
    fn test_salary_match() {
        let mut profile = SeekerProfile::new("p");
        let mut posting = create_test_posting();
        assert!(!is_salary_match(&profile, &posting));

        profile.desired_salary = Some(SalaryRange { min: Some(90_000.0), max: None, currency: "USD".into() });
        posting.salary = Some(SalaryRange { min: None, max: Some(100_000.0), currency: "USD".into() });
        assert!(is_salary_match(&profile, &posting));

        posting.salary = Some(SalaryRange { min: Some(50_000.0), max: Some(80_000.0), currency: "USD".into() });
        assert!(!is_salary_match(&profile, &posting));

        posting.salary = Some(SalaryRange::default());
        assert!(is_salary_match(&profile, &posting));
    }

    #[test]
    fn test_education_match() {
        let mut profile = SeekerProfile::new("p");
        let mut posting = create_test_posting();
        assert!(is_education_match(&profile, &posting));

        posting.requirements.education = Some(EducationLevel::Bachelor);
        assert!(!is_education_match(&profile, &posting));

        profile.education = vec![
            EducationEntry { degree: "associate".into(), institution: "CC".into(), field: None, graduation_year: None },
            EducationEntry { degree: "master".into(), institution: "U".into(), field: None, graduation_year: None },
        ];
        assert_eq!(highest_education_level(&profile.education), EducationLevel::Master);
        assert!(is_education_match(&profile, &posting));
    }
}
