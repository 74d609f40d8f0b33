use parking_lot::RwLock;
use serde::{de::IntoDeserializer, Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

use super::page::{paginate, Page, PageRequest};
use super::table::{Record, Table};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TenderStatus {
    #[default]
    Open,
    Closed,
    Awarded,
}

impl TenderStatus {
    pub const ALL: [TenderStatus; 3] = [TenderStatus::Open, TenderStatus::Closed, TenderStatus::Awarded];
}

impl FromStr for TenderStatus {
    type Err = serde::de::value::Error;

    /// Accepts the same lowercase names as the wire format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub id: u64,
    pub company_id: u64,
    pub title: String,
    pub description: String,
    pub budget: f64,
    #[serde(with = "iso_date")]
    pub deadline: Date,
    pub status: TenderStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Record for Tender {
    fn id(&self) -> u64 {
        self.id
    }
    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewTender {
    pub company_id: u64,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub deadline: Date,
    pub status: Option<TenderStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct TenderPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub deadline: Option<Date>,
    pub status: Option<TenderStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct TenderFilters {
    pub status: Option<TenderStatus>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    /// Keep tenders due on or before this date.
    pub deadline: Option<Date>,
}

#[derive(Debug, Default)]
pub struct TenderStore {
    inner: RwLock<Table<Tender>>,
}

impl TenderStore {
    pub fn create(&self, new: NewTender) -> Tender {
        self.inner.write().insert_with(|id, now| Tender {
            id,
            company_id: new.company_id,
            title: new.title,
            description: new.description,
            budget: new.budget,
            deadline: new.deadline,
            status: new.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn find_by_id(&self, id: u64) -> Option<Tender> {
        self.inner.read().get(id).cloned()
    }

    pub fn find_by_company_id(&self, company_id: u64) -> Vec<Tender> {
        self.inner.read().filter(|t| t.company_id == company_id)
    }

    pub fn update_by_id(&self, id: u64, patch: TenderPatch) -> Option<Tender> {
        self.inner.write().update(id, |t| {
            if let Some(v) = patch.title {
                t.title = v;
            }
            if let Some(v) = patch.description {
                t.description = v;
            }
            if let Some(v) = patch.budget {
                t.budget = v;
            }
            if let Some(v) = patch.deadline {
                t.deadline = v;
            }
            if let Some(v) = patch.status {
                t.status = v;
            }
        })
    }

    pub fn delete_by_id(&self, id: u64) -> bool {
        self.inner.write().remove(id)
    }

    /// Filter, order newest first, then slice out the requested page.
    pub fn search(&self, query: &str, filters: &TenderFilters, page: PageRequest) -> Page<Tender> {
        let needle = query.trim().to_lowercase();
        let mut hits = self.inner.read().filter(|t| {
            (needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle))
                && filters.status.map_or(true, |s| t.status == s)
                && filters.min_budget.map_or(true, |min| t.budget >= min)
                && filters.max_budget.map_or(true, |max| t.budget <= max)
                && filters.deadline.map_or(true, |d| t.deadline <= d)
        });
        // stable: equal timestamps keep insertion order
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        paginate(hits, page)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn reset(&self) {
        self.inner.write().clear();
    }
}
