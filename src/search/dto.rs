use serde::{de::IntoDeserializer, Deserialize, Serialize};
use std::str::FromStr;

use crate::{
    error::AppError,
    store::{Company, CompanyFilters, PageRequest, Tender, TenderStatus},
    validate::{empty_as_none, Problems, Validate},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearchQuery {
    pub query: Option<String>,
    pub industry: Option<String>,
    pub service: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<usize>,
}

impl Validate for CompanySearchQuery {
    fn validate(&self) -> Result<(), AppError> {
        Problems::new()
            .check(
                self.limit.map_or(true, |l| l <= 50),
                "\"limit\" must be less than or equal to 50",
            )
            .finish()
    }
}

impl CompanySearchQuery {
    pub fn text(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    pub fn filters(&self) -> CompanyFilters {
        CompanyFilters {
            industry: self.industry.clone().filter(|s| !s.is_empty()),
            service: self.service.clone().filter(|s| !s.is_empty()),
        }
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    #[default]
    All,
    Companies,
    Tenders,
}

impl FromStr for SuggestionKind {
    type Err = serde::de::value::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsQuery {
    pub query: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "empty_as_none")]
    pub kind: Option<SuggestionKind>,
}

impl SuggestionsQuery {
    pub fn kind(&self) -> SuggestionKind {
        self.kind.unwrap_or_default()
    }
}

impl Validate for SuggestionsQuery {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CompanySuggestion {
    pub id: u64,
    pub name: String,
    pub industry: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl From<Company> for CompanySuggestion {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            industry: c.industry,
            kind: "company",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TenderSuggestion {
    pub id: u64,
    pub title: String,
    pub budget: f64,
    pub status: TenderStatus,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl From<Tender> for TenderSuggestion {
    fn from(t: Tender) -> Self {
        Self {
            id: t.id,
            title: t.title,
            budget: t.budget,
            status: t.status,
            kind: "tender",
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Suggestions {
    pub companies: Vec<CompanySuggestion>,
    pub tenders: Vec<TenderSuggestion>,
}

#[derive(Debug, Serialize)]
pub struct PopularQuery {
    pub query: &'static str,
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct PopularSearches {
    pub companies: Vec<PopularQuery>,
    pub tenders: Vec<PopularQuery>,
}

#[derive(Debug, Serialize)]
pub struct BudgetRange {
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub industries: Vec<&'static str>,
    pub tender_statuses: Vec<TenderStatus>,
    pub budget_ranges: Vec<BudgetRange>,
}
