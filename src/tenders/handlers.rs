use axum::{extract::State, routing::get, Router};
use tracing::{info, instrument};

use super::dto::{CreateTenderRequest, TenderDetail, TenderSearchQuery, UpdateTenderRequest};
use crate::{
    auth::{policy::ensure_owner, AuthUser},
    envelope::ApiResponse,
    error::AppError,
    state::AppState,
    store::Tender,
    validate::{IdParam, ValidJson, ValidQuery},
};

pub fn tender_routes() -> Router<AppState> {
    Router::new()
        .route("/tenders", get(list_tenders).post(create_tender))
        .route("/tenders/my-tenders", get(my_tenders))
        .route(
            "/tenders/:id",
            get(get_tender).put(update_tender).delete(delete_tender),
        )
}

fn tender_not_found() -> AppError {
    AppError::NotFound("Tender not found".into())
}

#[instrument(skip(state))]
pub async fn list_tenders(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<TenderSearchQuery>,
) -> ApiResponse<Vec<Tender>> {
    let page = state.db.tenders.search(q.text(), &q.filters(), q.page());
    ApiResponse::ok(page.items).with_pagination(page.info)
}

#[instrument(skip(state))]
pub async fn get_tender(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<ApiResponse<TenderDetail>, AppError> {
    let tender = state.db.tenders.find_by_id(id).ok_or_else(tender_not_found)?;
    let company = state
        .db
        .companies
        .find_by_id(tender.company_id)
        .as_ref()
        .map(Into::into);
    Ok(ApiResponse::ok(TenderDetail { tender, company }))
}

#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn create_tender(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<CreateTenderRequest>,
) -> Result<ApiResponse<Tender>, AppError> {
    let company = auth.company_or(AppError::BusinessRule(
        "Company profile required to create tenders".into(),
    ))?;
    let tender = state.db.tenders.create(payload.into_new(company.id)?);

    info!(tender_id = tender.id, company_id = company.id, "tender created");
    Ok(ApiResponse::created(tender, "Tender created successfully"))
}

#[instrument(skip_all, fields(user_id = auth.user.id, tender_id = id))]
pub async fn update_tender(
    State(state): State<AppState>,
    auth: AuthUser,
    IdParam(id): IdParam,
    ValidJson(payload): ValidJson<UpdateTenderRequest>,
) -> Result<ApiResponse<Tender>, AppError> {
    let tender = state.db.tenders.find_by_id(id).ok_or_else(tender_not_found)?;
    ensure_owner(auth.company.as_ref(), tender.company_id, "update this tender")?;

    let updated = state
        .db
        .tenders
        .update_by_id(tender.id, payload.into_patch()?)
        .ok_or_else(tender_not_found)?;

    info!(status = ?updated.status, "tender updated");
    Ok(ApiResponse::ok(updated).with_message("Tender updated successfully"))
}

#[instrument(skip_all, fields(user_id = auth.user.id, tender_id = id))]
pub async fn delete_tender(
    State(state): State<AppState>,
    auth: AuthUser,
    IdParam(id): IdParam,
) -> Result<ApiResponse<()>, AppError> {
    let tender = state.db.tenders.find_by_id(id).ok_or_else(tender_not_found)?;
    ensure_owner(auth.company.as_ref(), tender.company_id, "delete this tender")?;

    if !state.db.tenders.delete_by_id(tender.id) {
        return Err(tender_not_found());
    }
    info!("tender deleted");
    Ok(ApiResponse::message("Tender deleted successfully"))
}

#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn my_tenders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<Vec<Tender>>, AppError> {
    let company = auth.company_or(AppError::NotFound("Company profile not found".into()))?;
    let tenders = state.db.tenders.find_by_company_id(company.id);
    let count = tenders.len();
    Ok(ApiResponse::ok(tenders).with_count(count))
}
