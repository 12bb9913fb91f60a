use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use validator::Validate;
use crate::core::MatchError;
use crate::models::{
    CandidatesQuery, CandidatesResponse, JobMatchesQuery, JobMatchesResponse, JobResponse, JobsQuery, JobsResponse,
};
use crate::routes::{error_response, match_error_response, requested_limit, store_error_response, AppState};
use crate::services::{CacheKey, MatchStore};

/// Configure posting and matching routes
///
/// `/jobs/matches` is registered ahead of `/jobs/{id}` so it is not taken as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/jobs", web::get().to(list_jobs))
        .route("/jobs/matches", web::get().to(job_matches))
        .route("/jobs/{id}", web::get().to(get_job))
        .route("/jobs/{id}/candidates", web::get().to(job_candidates));
}

/// Response body as stored in the result cache
#[derive(Debug, Serialize, Deserialize)]
struct CachedBody {
    body: serde_json::Value,
    #[serde(rename = "cachedAt")]
    cached_at: DateTime<Utc>,
}

impl CachedBody {
    fn into_marked(self) -> serde_json::Value {
        let mut body = self.body;
        if let Some(fields) = body.as_object_mut() {
            fields.insert("cached".to_string(), serde_json::Value::Bool(true));
            fields.insert("cachedAt".to_string(), serde_json::json!(self.cached_at));
        }
        body
    }
}

/// Serve a JSON body from the cache, computing and storing it on a miss
///
/// Failed computations are returned as-is and never cached.
async fn respond_cached<F, Fut>(state: &AppState, key: &str, ttl: Duration, compute: F) -> HttpResponse
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<serde_json::Value, HttpResponse>>,
{
    let computed_at = Utc::now();
    let result = state
        .cache
        .get_or_try_insert_with(key, ttl, || async move {
            let body = compute().await?;
            Ok::<_, HttpResponse>(CachedBody {
                body,
                cached_at: computed_at,
            })
        })
        .await;

    match result {
        Ok(entry) if entry.cached_at != computed_at => HttpResponse::Ok().json(entry.into_marked()),
        Ok(entry) => HttpResponse::Ok().json(entry.body),
        Err(response) => response,
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value, HttpResponse> {
    serde_json::to_value(value).map_err(|e| error_response(500, "Serialization error", e.to_string()))
}

/// List active postings, newest first
///
/// GET /api/v1/jobs?jobType=&remoteType=&location=&skills=&page=&limit=
async fn list_jobs(state: web::Data<AppState>, query: web::Query<JobsQuery>, req: HttpRequest) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let key = CacheKey::request(req.path(), req.query_string());
    let ttl = state.cache_settings.list_ttl();
    let store = state.store.clone();
    let filters = query.into_inner();

    respond_cached(&state, &key, ttl, || async move {
        let mut matching: Vec<_> = store
            .active_postings()
            .await
            .map_err(|e| store_error_response(&e))?
            .into_iter()
            .filter(|posting| filters.matches(posting))
            .collect();
        // Undated postings sort last; equal dates keep retrieval order
        matching.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));

        let (page, limit) = (filters.page(), filters.limit());
        let total = matching.len();
        let pages = (total as i64 + limit - 1) / limit;
        let skip = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let jobs: Vec<_> = matching.into_iter().skip(skip).take(limit as usize).collect();

        tracing::debug!("Listing {} of {} active postings (page {})", jobs.len(), total, page);
        to_body(&JobsResponse {
            success: true,
            count: jobs.len(),
            total,
            page,
            pages,
            jobs,
        })
    })
    .await
}

/// Get a single posting
///
/// GET /api/v1/jobs/{id}
async fn get_job(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let posting_id = path.into_inner();
    let key = CacheKey::posting(&posting_id);
    let ttl = state.cache_settings.detail_ttl();
    let store = state.store.clone();

    respond_cached(&state, &key, ttl, || async move {
        let job = store
            .posting(&posting_id)
            .await
            .map_err(|e| store_error_response(&e))?
            .ok_or_else(|| match_error_response(&MatchError::NotFound(format!("job {}", posting_id))))?;

        to_body(&JobResponse { success: true, job })
    })
    .await
}

/// Rank active postings for a seeker's active profile
///
/// GET /api/v1/jobs/matches?seekerId={seekerId}&limit={limit}
async fn job_matches(state: web::Data<AppState>, query: web::Query<JobMatchesQuery>) -> HttpResponse {
    if let Err(errors) = query.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let limit = match requested_limit(query.limit, state.finder.limits().default_jobs) {
        Ok(limit) => limit,
        Err(e) => return match_error_response(&e),
    };

    tracing::info!("Finding jobs for seeker: {}, limit: {}", query.seeker_id, limit);

    match state.finder.find_matching_jobs(&query.seeker_id, limit).await {
        Ok(matches) => HttpResponse::Ok().json(JobMatchesResponse {
            success: true,
            count: matches.len(),
            matches,
        }),
        Err(e) => match_error_response(&e),
    }
}

/// Rank active seekers for a posting
///
/// GET /api/v1/jobs/{id}/candidates?limit={limit}
async fn job_candidates(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<CandidatesQuery>,
) -> HttpResponse {
    let posting_id = path.into_inner();
    let limit = match requested_limit(query.limit, state.finder.limits().default_candidates) {
        Ok(limit) => limit,
        Err(e) => return match_error_response(&e),
    };

    tracing::info!("Finding candidates for posting: {}, limit: {}", posting_id, limit);

    match state.finder.find_matching_candidates(&posting_id, limit).await {
        Ok(candidates) => HttpResponse::Ok().json(CandidatesResponse {
            success: true,
            count: candidates.len(),
            candidates,
        }),
        Err(e) => match_error_response(&e),
    }
}
