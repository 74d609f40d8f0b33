use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use super::dto::{
    BudgetRange, CompanySearchQuery, PopularQuery, PopularSearches, SearchFilters,
    SuggestionKind, Suggestions, SuggestionsQuery,
};
use crate::{
    envelope::ApiResponse,
    state::AppState,
    store::{Company, CompanyFilters, PageRequest, Tender, TenderFilters, TenderStatus},
    tenders::dto::TenderSearchQuery,
    validate::ValidQuery,
};

const SUGGESTION_LIMIT: usize = 5;
const MIN_SUGGESTION_QUERY: usize = 2;

const INDUSTRIES: [&str; 10] = [
    "Technology",
    "Construction",
    "Healthcare",
    "Finance",
    "Education",
    "Manufacturing",
    "Retail",
    "Transportation",
    "Energy",
    "Consulting",
];

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search/companies", get(search_companies))
        .route("/search/tenders", get(search_tenders))
        .route("/search/suggestions", get(suggestions))
        .route("/search/popular", get(popular))
        .route("/search/filters", get(filters))
}

#[instrument(skip(state))]
pub async fn search_companies(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<CompanySearchQuery>,
) -> ApiResponse<Vec<Company>> {
    let page = state.db.companies.search(q.text(), &q.filters(), q.page());
    ApiResponse::ok(page.items).with_pagination(page.info)
}

#[instrument(skip(state))]
pub async fn search_tenders(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<TenderSearchQuery>,
) -> ApiResponse<Vec<Tender>> {
    let page = state.db.tenders.search(q.text(), &q.filters(), q.page());
    ApiResponse::ok(page.items).with_pagination(page.info)
}

#[instrument(skip(state))]
pub async fn suggestions(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<SuggestionsQuery>,
) -> ApiResponse<Suggestions> {
    let text = q.query.as_deref().unwrap_or_default().trim();
    if text.chars().count() < MIN_SUGGESTION_QUERY {
        return ApiResponse::ok(Suggestions::default());
    }

    let first_page = PageRequest::new(Some(1), Some(SUGGESTION_LIMIT));
    let mut out = Suggestions::default();
    if matches!(q.kind(), SuggestionKind::All | SuggestionKind::Companies) {
        out.companies = state
            .db
            .companies
            .search(text, &CompanyFilters::default(), first_page)
            .items
            .into_iter()
            .map(Into::into)
            .collect();
    }
    if matches!(q.kind(), SuggestionKind::All | SuggestionKind::Tenders) {
        out.tenders = state
            .db
            .tenders
            .search(text, &TenderFilters::default(), first_page)
            .items
            .into_iter()
            .map(Into::into)
            .collect();
    }
    ApiResponse::ok(out)
}

// Search terms are not tracked yet; these are fixed.
pub async fn popular() -> ApiResponse<PopularSearches> {
    let q = |query, count| PopularQuery { query, count };
    ApiResponse::ok(PopularSearches {
        companies: vec![
            q("technology", 150),
            q("construction", 120),
            q("healthcare", 95),
            q("finance", 80),
            q("education", 65),
        ],
        tenders: vec![
            q("software development", 200),
            q("building construction", 180),
            q("consulting services", 140),
            q("equipment supply", 110),
            q("maintenance services", 90),
        ],
    })
}

pub async fn filters() -> ApiResponse<SearchFilters> {
    let range = |label, min, max| BudgetRange { label, min, max };
    ApiResponse::ok(SearchFilters {
        industries: INDUSTRIES.to_vec(),
        tender_statuses: TenderStatus::ALL.to_vec(),
        budget_ranges: vec![
            range("Under $10,000", 0.0, Some(10_000.0)),
            range("$10,000 - $50,000", 10_000.0, Some(50_000.0)),
            range("$50,000 - $100,000", 50_000.0, Some(100_000.0)),
            range("$100,000 - $500,000", 100_000.0, Some(500_000.0)),
            range("Over $500,000", 500_000.0, None),
        ],
    })
}
