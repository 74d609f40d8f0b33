use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use crate::{
    companies::dto::CompanySummary,
    error::AppError,
    store::{NewTender, PageRequest, Tender, TenderFilters, TenderPatch, TenderStatus},
    validate::{empty_as_none, Problems, Validate},
};

const MAX_PAGE_SIZE: usize = 50;

pub(crate) fn parse_date(s: &str) -> Option<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]")).ok()
}

fn check_budget(p: &mut Problems, field: &str, value: f64) {
    p.check(
        value.is_finite() && value > 0.0,
        format!("\"{field}\" must be a positive number"),
    );
}

fn check_deadline(p: &mut Problems, value: &str) {
    p.check(
        parse_date(value).is_some(),
        "\"deadline\" must be a valid date (YYYY-MM-DD)",
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTenderRequest {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub deadline: String,
    #[serde(default)]
    pub status: Option<TenderStatus>,
}

impl Validate for CreateTenderRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut p = Problems::new();
        p.length("title", self.title.trim(), 5, 200)
            .length("description", self.description.trim(), 10, 2000);
        check_budget(&mut p, "budget", self.budget);
        check_deadline(&mut p, &self.deadline);
        p.finish()
    }
}

impl CreateTenderRequest {
    pub fn into_new(self, company_id: u64) -> Result<NewTender, AppError> {
        let deadline = parse_date(&self.deadline)
            .ok_or_else(|| AppError::validation("\"deadline\" must be a valid date (YYYY-MM-DD)"))?;
        Ok(NewTender {
            company_id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            budget: self.budget,
            deadline,
            status: self.status,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTenderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub deadline: Option<String>,
    pub status: Option<TenderStatus>,
}

impl Validate for UpdateTenderRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut p = Problems::new();
        if let Some(title) = &self.title {
            p.length("title", title.trim(), 5, 200);
        }
        if let Some(description) = &self.description {
            p.length("description", description.trim(), 10, 2000);
        }
        if let Some(budget) = self.budget {
            check_budget(&mut p, "budget", budget);
        }
        if let Some(deadline) = &self.deadline {
            check_deadline(&mut p, deadline);
        }
        p.finish()
    }
}

impl UpdateTenderRequest {
    pub fn into_patch(self) -> Result<TenderPatch, AppError> {
        let deadline = match self.deadline.as_deref() {
            Some(d) => Some(parse_date(d).ok_or_else(|| {
                AppError::validation("\"deadline\" must be a valid date (YYYY-MM-DD)")
            })?),
            None => None,
        };
        Ok(TenderPatch {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            budget: self.budget,
            deadline,
            status: self.status,
        })
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|t| !t.trim().is_empty())
}

/// Query string shared by `/tenders` and `/search/tenders`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderSearchQuery {
    pub query: Option<String>,
    /// Older clients send the text as `search`.
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<TenderStatus>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_budget: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_budget: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<usize>,
}

impl Validate for TenderSearchQuery {
    fn validate(&self) -> Result<(), AppError> {
        let mut p = Problems::new();
        if let Some(min) = self.min_budget {
            check_budget(&mut p, "minBudget", min);
        }
        if let Some(max) = self.max_budget {
            check_budget(&mut p, "maxBudget", max);
        }
        if let Some(deadline) = &self.deadline {
            check_deadline(&mut p, deadline);
        }
        if let Some(limit) = self.limit {
            p.check(
                limit <= MAX_PAGE_SIZE,
                format!("\"limit\" must be less than or equal to {MAX_PAGE_SIZE}"),
            );
        }
        p.finish()
    }
}

impl TenderSearchQuery {
    pub fn text(&self) -> &str {
        non_blank(&self.query)
            .or_else(|| non_blank(&self.search))
            .unwrap_or_default()
    }

    pub fn filters(&self) -> TenderFilters {
        TenderFilters {
            status: self.status,
            min_budget: self.min_budget,
            max_budget: self.max_budget,
            deadline: self.deadline.as_deref().and_then(parse_date),
        }
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Tender with a summary of the company that posted it.
#[derive(Debug, Serialize)]
pub struct TenderDetail {
    #[serde(flatten)]
    pub tender: Tender,
    pub company: Option<CompanySummary>,
}
