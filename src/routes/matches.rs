use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use crate::config::CacheSettings;
use crate::core::MatchFinder;
use crate::models::{HealthResponse, ScoreRequest, StatsResponse};
use crate::services::{InMemoryStore, ResultCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub finder: MatchFinder,
    pub cache: Arc<ResultCache>,
    pub cache_settings: CacheSettings,
}

impl AppState {
    /// Build state around one store shared by the finder and the profile routes
    pub fn new(store: Arc<InMemoryStore>, finder: MatchFinder, cache: Arc<ResultCache>, cache_settings: CacheSettings) -> Self {
        Self {
            store,
            finder,
            cache,
            cache_settings,
        }
    }
}

/// Configure health, scoring and stats routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/score", web::post().to(score_match))
        .route("/stats", web::get().to(stats));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score a single profile against a single posting
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "profile": { "name": "string", "skills": ["string"] },
///   "posting": { "id": "string", "title": "string", "company": "string", "jobType": "full-time" }
/// }
/// ```
async fn score_match(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> impl Responder {
    let ScoreRequest { profile, posting } = req.into_inner();
    let result = state.finder.calculator().calculate(&profile, &posting);

    tracing::debug!("Scored profile {} against posting {}: {}", profile.id, posting.id, result.score);

    HttpResponse::Ok().json(result)
}

/// Cache statistics
async fn stats(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(StatsResponse {
        success: true,
        cache: state.cache.stats().await,
        timestamp: chrono::Utc::now(),
    })
}
