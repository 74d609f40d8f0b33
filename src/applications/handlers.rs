use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use tracing::{info, instrument, warn};

use super::dto::{
    ApplicationListQuery, ApplicationView, SubmitApplicationRequest, UpdateStatusRequest,
};
use crate::{
    auth::{
        policy::{ensure_any_owner, ensure_owner},
        AuthUser,
    },
    envelope::ApiResponse,
    error::AppError,
    state::AppState,
    store::{
        paginate, Application, ApplicationPatch, ApplicationStatus, Company, Db, NewApplication,
        TenderStatus,
    },
    validate::{IdParam, ValidJson, ValidQuery},
};

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/applications", get(list_applications).post(submit_application))
        .route("/applications/received", get(received_applications))
        .route("/applications/my-applications", get(my_applications))
        .route(
            "/applications/:id",
            get(get_application).delete(delete_application),
        )
        .route("/applications/:id/status", put(update_application_status))
}

fn application_not_found() -> AppError {
    AppError::NotFound("Application not found".into())
}

fn tender_not_found() -> AppError {
    AppError::NotFound("Tender not found".into())
}

fn require_company(auth: &AuthUser) -> Result<&Company, AppError> {
    auth.company_or(AppError::NotFound("Company profile not found".into()))
}

fn view(db: &Db, application: Application) -> ApplicationView {
    let tender = db
        .tenders
        .find_by_id(application.tender_id)
        .as_ref()
        .map(Into::into);
    ApplicationView { application, tender }
}

fn received_by(db: &Db, company_id: u64) -> Vec<Application> {
    let tender_ids: Vec<u64> = db
        .tenders
        .find_by_company_id(company_id)
        .iter()
        .map(|t| t.id)
        .collect();
    db.applications.find_by_tender_ids(&tender_ids)
}

fn listing(
    db: &Db,
    mut apps: Vec<Application>,
    q: &ApplicationListQuery,
) -> ApiResponse<Vec<ApplicationView>> {
    apps.retain(|a| q.keep(a));
    let page = paginate(apps, q.page()).map(|a| view(db, a));
    ApiResponse::ok(page.items).with_pagination(page.info)
}

#[instrument(skip_all, fields(user_id = auth.user.id, tender_id = payload.tender_id))]
pub async fn submit_application(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<SubmitApplicationRequest>,
) -> Result<ApiResponse<Application>, AppError> {
    let company = auth.company_or(AppError::BusinessRule(
        "Company profile required to submit applications".into(),
    ))?;

    let tender = state
        .db
        .tenders
        .find_by_id(payload.tender_id)
        .ok_or_else(tender_not_found)?;

    if tender.status != TenderStatus::Open {
        warn!(status = ?tender.status, "tender not open");
        return Err(AppError::BusinessRule("Tender is not open for applications".into()));
    }

    if tender.company_id == company.id {
        warn!("applying to own tender");
        return Err(AppError::BusinessRule("Cannot apply to your own tender".into()));
    }

    // duplicate check happens inside the store, under the same lock as the insert
    let application = state.db.applications.create(NewApplication {
        tender_id: tender.id,
        company_id: company.id,
        proposal_text: payload.proposal_text.trim().to_string(),
    })?;

    info!(application_id = application.id, company_id = company.id, "application submitted");
    Ok(ApiResponse::created(application, "Application submitted successfully"))
}

/// Everything the caller can see: applications they sent plus those on their tenders.
#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(q): ValidQuery<ApplicationListQuery>,
) -> Result<ApiResponse<Vec<ApplicationView>>, AppError> {
    let company = require_company(&auth)?;
    let mut apps = state.db.applications.find_by_company_id(company.id);
    apps.extend(received_by(&state.db, company.id));
    apps.sort_by_key(|a| a.id);
    apps.dedup_by_key(|a| a.id);
    Ok(listing(&state.db, apps, &q))
}

#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn received_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(q): ValidQuery<ApplicationListQuery>,
) -> Result<ApiResponse<Vec<ApplicationView>>, AppError> {
    let company = require_company(&auth)?;
    let apps = received_by(&state.db, company.id);
    Ok(listing(&state.db, apps, &q))
}

#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn my_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(q): ValidQuery<ApplicationListQuery>,
) -> Result<ApiResponse<Vec<ApplicationView>>, AppError> {
    let company = require_company(&auth)?;
    let apps = state.db.applications.find_by_company_id(company.id);
    Ok(listing(&state.db, apps, &q))
}

#[instrument(skip_all, fields(user_id = auth.user.id, application_id = id))]
pub async fn get_application(
    State(state): State<AppState>,
    auth: AuthUser,
    IdParam(id): IdParam,
) -> Result<ApiResponse<ApplicationView>, AppError> {
    let application = state
        .db
        .applications
        .find_by_id(id)
        .ok_or_else(application_not_found)?;

    let mut allowed = vec![application.company_id];
    if let Some(tender) = state.db.tenders.find_by_id(application.tender_id) {
        allowed.push(tender.company_id);
    }
    ensure_any_owner(auth.company.as_ref(), &allowed, "view this application")?;

    Ok(ApiResponse::ok(view(&state.db, application)))
}

#[instrument(skip_all, fields(user_id = auth.user.id, application_id = id))]
pub async fn update_application_status(
    State(state): State<AppState>,
    auth: AuthUser,
    IdParam(id): IdParam,
    ValidJson(payload): ValidJson<UpdateStatusRequest>,
) -> Result<ApiResponse<Application>, AppError> {
    let application = state
        .db
        .applications
        .find_by_id(id)
        .ok_or_else(application_not_found)?;
    let tender = state
        .db
        .tenders
        .find_by_id(application.tender_id)
        .ok_or_else(tender_not_found)?;
    ensure_owner(auth.company.as_ref(), tender.company_id, "update this application")?;

    let updated = state
        .db
        .applications
        .update_by_id(
            application.id,
            ApplicationPatch {
                status: Some(payload.status),
                ..Default::default()
            },
        )
        .ok_or_else(application_not_found)?;

    info!(status = ?updated.status, "application status updated");
    Ok(ApiResponse::ok(updated).with_message("Application status updated successfully"))
}

#[instrument(skip_all, fields(user_id = auth.user.id, application_id = id))]
pub async fn delete_application(
    State(state): State<AppState>,
    auth: AuthUser,
    IdParam(id): IdParam,
) -> Result<ApiResponse<()>, AppError> {
    let removed = state.db.applications.delete_by_id_if(id, |application| {
        ensure_owner(auth.company.as_ref(), application.company_id, "delete this application")?;
        if application.status != ApplicationStatus::Pending {
            return Err(AppError::BusinessRule(
                "Cannot delete application that is not pending".into(),
            ));
        }
        Ok(())
    })?;

    if !removed {
        return Err(application_not_found());
    }
    info!("application withdrawn");
    Ok(ApiResponse::message("Application deleted successfully"))
}
