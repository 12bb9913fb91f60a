// Criterion benchmarks for jobmatch

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jobmatch::core::{filters::match_skills, rank_candidates, rank_jobs, ScoreCalculator};
use jobmatch::models::{
    ExperienceEntry, ExperienceRange, JobPosting, JobRequirements, JobStatus, JobType, Location, RemotePreference,
    RemoteType, SeekerProfile, SeekerRecord,
};

const SKILLS: [&str; 8] = ["rust", "go", "python", "sql", "docker", "react", "typescript", "kubernetes"];
const CITIES: [&str; 4] = ["Austin", "Denver", "Seattle", "Boston"];

fn create_posting(id: usize) -> JobPosting {
    JobPosting {
        id: format!("job-{}", id),
        employer_id: None,
        title: format!("Engineer {}", id),
        company: "Acme".to_string(),
        description: String::new(),
        requirements: JobRequirements {
            skills: (0..3).map(|k| SKILLS[(id + k) % SKILLS.len()].to_string()).collect(),
            experience: Some(ExperienceRange {
                min: Some((id % 6) as f64),
                max: None,
            }),
            education: None,
        },
        job_type: if id % 3 == 0 { JobType::Contract } else { JobType::FullTime },
        salary: None,
        location: Some(Location {
            city: Some(CITIES[id % CITIES.len()].to_string()),
            state: None,
            country: None,
        }),
        remote_type: if id % 4 == 0 { RemoteType::Remote } else { RemoteType::Onsite },
        status: JobStatus::Active,
        posted_at: None,
        expires_at: None,
        applicant_count: 0,
    }
}

fn create_profile(id: usize) -> SeekerProfile {
    SeekerProfile {
        skills: (0..4).map(|k| SKILLS[(id * 3 + k) % SKILLS.len()].to_string()).collect(),
        experience: vec![ExperienceEntry {
            title: "Engineer".to_string(),
            company: "Initech".to_string(),
            start_date: Some(Utc.with_ymd_and_hms(2015 + (id % 8) as i32, 1, 1, 0, 0, 0).unwrap()),
            end_date: None,
            description: None,
            current: true,
        }],
        desired_job_types: vec![JobType::FullTime],
        preferred_locations: vec![CITIES[id % CITIES.len()].to_string()],
        remote_preference: RemotePreference::Onsite,
        is_active: true,
        ..SeekerProfile::new(format!("Profile {}", id))
    }
}

fn bench_score_pair(c: &mut Criterion) {
    let calculator = ScoreCalculator::default();
    let profile = create_profile(1);
    let posting = create_posting(1);
    let now = Utc::now();

    c.bench_function("score_pair", |b| {
        b.iter(|| calculator.calculate_at(black_box(&profile), black_box(&posting), now));
    });
}

fn bench_skill_matching(c: &mut Criterion) {
    let required: Vec<String> = SKILLS.iter().map(|s| s.to_uppercase()).collect();
    let possessed: Vec<String> = SKILLS.iter().take(5).map(|s| s.to_string()).collect();

    c.bench_function("match_skills_8x5", |b| {
        b.iter(|| match_skills(black_box(&required), black_box(&possessed)));
    });
}

fn bench_rank_jobs(c: &mut Criterion) {
    let calculator = ScoreCalculator::default();
    let profile = create_profile(7);
    let now = Utc::now();

    let mut group = c.benchmark_group("rank_jobs");

    for posting_count in [10, 100, 500, 1000].iter() {
        let postings: Vec<JobPosting> = (0..*posting_count).map(create_posting).collect();

        group.bench_with_input(BenchmarkId::from_parameter(posting_count), posting_count, |b, _| {
            b.iter(|| rank_jobs(&calculator, black_box(&profile), black_box(postings.clone()), 20, now));
        });
    }

    group.finish();
}

fn bench_rank_candidates(c: &mut Criterion) {
    let calculator = ScoreCalculator::default();
    let posting = create_posting(3);
    let now = Utc::now();

    let mut group = c.benchmark_group("rank_candidates");

    for seeker_count in [10, 100, 1000].iter() {
        let seekers: Vec<SeekerRecord> = (0..*seeker_count)
            .map(|i| SeekerRecord {
                seeker_id: format!("seeker-{}", i),
                is_active: true,
                profiles: vec![create_profile(i)],
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(seeker_count), seeker_count, |b, _| {
            b.iter(|| rank_candidates(&calculator, black_box(&posting), black_box(seekers.clone()), 50, 40, now));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_score_pair,
    bench_skill_matching,
    bench_rank_jobs,
    bench_rank_candidates
);

criterion_main!(benches);
