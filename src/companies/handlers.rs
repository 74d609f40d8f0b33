use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{LogoResponse, UpdateProfileRequest};
use crate::{
    auth::AuthUser,
    envelope::ApiResponse,
    error::AppError,
    state::AppState,
    storage::ext_from_mime,
    store::{Company, CompanyPatch},
    validate::{IdParam, ValidJson},
};

const MAX_LOGO_BYTES: usize = 10 * 1024 * 1024;

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies))
        .route("/companies/profile", get(get_profile).put(update_profile))
        .route(
            "/companies/upload-logo",
            post(upload_logo).layer(DefaultBodyLimit::max(MAX_LOGO_BYTES)),
        )
        .route("/companies/:id", get(get_company))
}

fn profile_not_found() -> AppError {
    AppError::NotFound("Company profile not found".into())
}

#[instrument(skip(state))]
pub async fn list_companies(State(state): State<AppState>) -> ApiResponse<Vec<Company>> {
    let companies = state.db.companies.all();
    let count = companies.len();
    ApiResponse::ok(companies).with_count(count)
}

#[instrument(skip(state))]
pub async fn get_company(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<ApiResponse<Company>, AppError> {
    state
        .db
        .companies
        .find_by_id(id)
        .map(ApiResponse::ok)
        .ok_or_else(|| AppError::NotFound("Company not found".into()))
}

#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn get_profile(auth: AuthUser) -> Result<ApiResponse<Company>, AppError> {
    auth.company.map(ApiResponse::ok).ok_or_else(profile_not_found)
}

#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<UpdateProfileRequest>,
) -> Result<ApiResponse<Company>, AppError> {
    let company = auth.company_or(profile_not_found())?;
    let updated = state
        .db
        .companies
        .update_by_id(company.id, CompanyPatch::from(payload))
        .ok_or_else(profile_not_found)?;

    info!(company_id = updated.id, "company profile updated");
    Ok(ApiResponse::ok(updated).with_message("Profile updated successfully"))
}

/// Multipart upload; the file is read from the `logo` field.
#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn upload_logo(
    State(state): State<AppState>,
    auth: AuthUser,
    mut mp: Multipart,
) -> Result<ApiResponse<LogoResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        if field.name() != Some("logo") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        upload = Some((content_type, data));
        break;
    }

    let Some((content_type, data)) = upload.filter(|(_, d)| !d.is_empty()) else {
        return Err(AppError::validation("No file uploaded"));
    };
    let Some(ext) = ext_from_mime(&content_type) else {
        warn!(%content_type, "rejected logo upload");
        return Err(AppError::validation("Logo must be an image"));
    };

    let company = auth.company_or(profile_not_found())?;
    let key = format!("{}-{}.{}", company.id, Uuid::new_v4(), ext);
    state.storage.put_object(&key, data, &content_type).await?;

    let logo_url = state.storage.public_url(&key);
    let updated = state
        .db
        .companies
        .update_by_id(
            company.id,
            CompanyPatch {
                logo_url: Some(logo_url),
                ..Default::default()
            },
        )
        .ok_or_else(profile_not_found)?;

    if let Some(previous) = company.logo_url.strip_prefix("/uploads/") {
        if let Err(e) = state.storage.delete_object(previous).await {
            warn!(error = %e, key = previous, "could not remove previous logo");
        }
    }

    info!(company_id = updated.id, %key, "logo uploaded");
    Ok(ApiResponse::ok(LogoResponse {
        logo_url: updated.logo_url,
    })
    .with_message("Logo uploaded successfully"))
}
