use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;
use crate::core::select_active_profile;
use crate::models::{
    CreateProfileRequest, DuplicateProfileRequest, ProfileResponse, ProfilesResponse, SeekerProfile, UpdateProfileRequest,
};
use crate::routes::{error_response, store_error_response, AppState};
use crate::services::StoreError;

/// Configure seeker profile version routes
///
/// `/profiles/active` is registered ahead of the `{pid}` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/seekers/{id}/profiles", web::get().to(list_profiles))
        .route("/seekers/{id}/profiles", web::post().to(create_profile))
        .route("/seekers/{id}/profiles/active", web::get().to(active_profile))
        .route("/seekers/{id}/profiles/{pid}", web::put().to(update_profile))
        .route("/seekers/{id}/profiles/{pid}/activate", web::put().to(activate_profile))
        .route("/seekers/{id}/profiles/{pid}/duplicate", web::post().to(duplicate_profile))
        .route("/seekers/{id}/profiles/{pid}", web::delete().to(delete_profile));
}

fn profile_response(result: Result<SeekerProfile, StoreError>) -> HttpResponse {
    match result {
        Ok(profile) => HttpResponse::Ok().json(ProfileResponse { success: true, profile }),
        Err(e) => store_error_response(&e),
    }
}

/// GET /api/v1/seekers/{id}/profiles
async fn list_profiles(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let seeker_id = path.into_inner();
    match state.store.profiles(&seeker_id).await {
        Ok(profiles) => HttpResponse::Ok().json(ProfilesResponse {
            success: true,
            active_profile_id: select_active_profile(&profiles).map(|p| p.id),
            profiles,
        }),
        Err(e) => store_error_response(&e),
    }
}

/// Add a profile version
///
/// POST /api/v1/seekers/{id}/profiles
///
/// The seeker's first profile becomes active; later ones are stored inactive.
async fn create_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<CreateProfileRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let seeker_id = path.into_inner();
    match state.store.add_profile(&seeker_id, req.into_inner().into_profile()).await {
        Ok(profile) => {
            tracing::info!("Created profile {} for seeker {}", profile.id, seeker_id);
            HttpResponse::Created().json(ProfileResponse { success: true, profile })
        }
        Err(e) => store_error_response(&e),
    }
}

/// GET /api/v1/seekers/{id}/profiles/active
async fn active_profile(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let seeker_id = path.into_inner();
    profile_response(state.store.active_profile(&seeker_id).await)
}

/// Edit a profile version
///
/// PUT /api/v1/seekers/{id}/profiles/{pid}
///
/// Only the fields present in the body change. Setting `isActive: true`
/// makes this the seeker's active version.
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
    req: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let (seeker_id, profile_id) = path.into_inner();
    let changes = req.into_inner();
    tracing::info!("Updating profile {} for seeker {}", profile_id, seeker_id);
    profile_response(
        state
            .store
            .update_profile(&seeker_id, profile_id, |profile| changes.apply(profile))
            .await,
    )
}

/// PUT /api/v1/seekers/{id}/profiles/{pid}/activate
async fn activate_profile(state: web::Data<AppState>, path: web::Path<(String, Uuid)>) -> HttpResponse {
    let (seeker_id, profile_id) = path.into_inner();
    tracing::info!("Activating profile {} for seeker {}", profile_id, seeker_id);
    profile_response(state.store.activate_profile(&seeker_id, profile_id).await)
}

/// Copy a profile version under a new id
///
/// POST /api/v1/seekers/{id}/profiles/{pid}/duplicate
///
/// Optional body `{ "name": "string" }`; defaults to "<name> (Copy)".
async fn duplicate_profile(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
    req: Option<web::Json<DuplicateProfileRequest>>,
) -> HttpResponse {
    let body = req.map(|json| json.into_inner()).unwrap_or_default();
    if let Err(errors) = body.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let (seeker_id, profile_id) = path.into_inner();
    let name = body.name.map(|n| n.trim().to_string());
    profile_response(state.store.duplicate_profile(&seeker_id, profile_id, name).await)
}

/// DELETE /api/v1/seekers/{id}/profiles/{pid}
async fn delete_profile(state: web::Data<AppState>, path: web::Path<(String, Uuid)>) -> HttpResponse {
    let (seeker_id, profile_id) = path.into_inner();
    tracing::info!("Deleting profile {} for seeker {}", profile_id, seeker_id);
    profile_response(state.store.remove_profile(&seeker_id, profile_id).await)
}
