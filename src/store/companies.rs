use parking_lot::RwLock;
use serde::Serialize;
use time::OffsetDateTime;

use super::page::{paginate, Page, PageRequest};
use super::table::{Record, Table};
use super::StoreError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub industry: String,
    pub description: String,
    pub logo_url: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub services: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Record for Company {
    fn id(&self) -> u64 {
        self.id
    }
    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

/// Profile fields for a new company; the owner is passed separately.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub industry: String,
    pub description: String,
    pub logo_url: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub services: Vec<String>,
}

impl NewCompany {
    pub(super) fn build(self, id: u64, user_id: u64, now: OffsetDateTime) -> Company {
        Company {
            id,
            user_id,
            name: self.name,
            industry: self.industry,
            description: self.description,
            logo_url: self.logo_url,
            phone: self.phone,
            website: self.website,
            address: self.address,
            services: self.services,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub services: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyFilters {
    pub industry: Option<String>,
    pub service: Option<String>,
}

#[derive(Debug, Default)]
pub struct CompanyStore {
    pub(super) inner: RwLock<Table<Company>>,
}

impl CompanyStore {
    /// Insert a company for `user_id`; a user owns at most one company.
    pub fn create(&self, user_id: u64, new: NewCompany) -> Result<Company, StoreError> {
        let mut table = self.inner.write();
        insert_for_user(&mut table, user_id, new)
    }

    pub fn find_by_id(&self, id: u64) -> Option<Company> {
        self.inner.read().get(id).cloned()
    }

    pub fn find_by_user_id(&self, user_id: u64) -> Option<Company> {
        self.inner.read().find(|c| c.user_id == user_id).cloned()
    }

    pub fn all(&self) -> Vec<Company> {
        self.inner.read().rows().to_vec()
    }

    pub fn update_by_id(&self, id: u64, patch: CompanyPatch) -> Option<Company> {
        self.inner.write().update(id, |c| {
            let CompanyPatch {
                name,
                industry,
                description,
                logo_url,
                phone,
                website,
                address,
                services,
            } = patch;
            if let Some(v) = name {
                c.name = v;
            }
            if let Some(v) = industry {
                c.industry = v;
            }
            if let Some(v) = description {
                c.description = v;
            }
            if let Some(v) = logo_url {
                c.logo_url = v;
            }
            if let Some(v) = phone {
                c.phone = v;
            }
            if let Some(v) = website {
                c.website = v;
            }
            if let Some(v) = address {
                c.address = v;
            }
            if let Some(v) = services {
                c.services = v;
            }
        })
    }

    pub fn delete_by_id(&self, id: u64) -> bool {
        self.inner.write().remove(id)
    }

    /// Text match on name/description, then industry and service filters.
    pub fn search(&self, query: &str, filters: &CompanyFilters, page: PageRequest) -> Page<Company> {
        let needle = query.trim().to_lowercase();
        let industry = filters.industry.as_deref().map(str::to_lowercase);
        let service = filters.service.as_deref().map(str::to_lowercase);

        let hits = self.inner.read().filter(|c| {
            (needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.description.to_lowercase().contains(&needle))
                && industry
                    .as_deref()
                    .map_or(true, |i| c.industry.to_lowercase() == i)
                && service.as_deref().map_or(true, |s| {
                    c.services.iter().any(|svc| svc.to_lowercase().contains(s))
                })
        });
        paginate(hits, page)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn reset(&self) {
        self.inner.write().clear();
    }
}

pub(super) fn insert_for_user(
    table: &mut Table<Company>,
    user_id: u64,
    new: NewCompany,
) -> Result<Company, StoreError> {
    if table.find(|c| c.user_id == user_id).is_some() {
        return Err(StoreError::CompanyExists);
    }
    Ok(table.insert_with(|id, now| new.build(id, user_id, now)))
}
