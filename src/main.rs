use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use jobmatch::config::Settings;
use jobmatch::routes::{self, AppState};
use jobmatch::{InMemoryStore, MatchFinder, MatchLimits, MatchStore, ResultCache, ScoreCalculator, ScoringWeights};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // JOBMATCH_CONFIG points at a single settings file instead of config/
    let settings = match std::env::var_os("JOBMATCH_CONFIG") {
        Some(path) => Settings::load_from(&path),
        None => Settings::load(),
    }
    .map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);
    info!("Starting jobmatch service...");

    let store = match &settings.store.seed_path {
        Some(path) => {
            let store = InMemoryStore::load_seed(path).map_err(|e| {
                error!("Failed to load seed data from {}: {}", path.display(), e);
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
            })?;
            info!("Store seeded from {}", path.display());
            Arc::new(store)
        }
        None => {
            info!("Starting with an empty store");
            Arc::new(InMemoryStore::new())
        }
    };

    let cache = Arc::new(ResultCache::new(settings.cache.max_capacity));
    info!(
        "Result cache initialized (capacity: {} entries, list TTL: {:?}, detail TTL: {:?})",
        settings.cache.max_capacity,
        settings.cache.list_ttl(),
        settings.cache.detail_ttl()
    );

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let calculator = ScoreCalculator::new(weights).map_err(|e| {
        error!("Invalid scoring weights: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    info!("Score calculator initialized with weights: {:?}", weights);

    let limits = MatchLimits::from(&settings.matching);
    let match_store: Arc<dyn MatchStore> = store.clone();
    let finder = MatchFinder::new(match_store, calculator, limits);

    let app_state = AppState::new(store, finder, cache.clone(), settings.cache.clone());

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await?;

    cache.clear().await;
    info!("Result cache cleared, shutdown complete");
    Ok(())
}
