use parking_lot::RwLock;
use serde::{de::IntoDeserializer, Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

use super::table::{Record, Table};
use super::StoreError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl FromStr for ApplicationStatus {
    type Err = serde::de::value::Error;

    /// Accepts the same lowercase names as the wire format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: u64,
    pub tender_id: u64,
    pub company_id: u64,
    pub proposal_text: String,
    pub status: ApplicationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Record for Application {
    fn id(&self) -> u64 {
        self.id
    }
    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub tender_id: u64,
    pub company_id: u64,
    pub proposal_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub proposal_text: Option<String>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Default)]
pub struct ApplicationStore {
    inner: RwLock<Table<Application>>,
}

impl ApplicationStore {
    /// Insert a pending application. The duplicate check and the insert share
    /// one write lock, so two identical submissions cannot both land.
    pub fn create(&self, new: NewApplication) -> Result<Application, StoreError> {
        let mut table = self.inner.write();
        if table
            .find(|a| a.tender_id == new.tender_id && a.company_id == new.company_id)
            .is_some()
        {
            return Err(StoreError::AlreadyApplied);
        }
        Ok(table.insert_with(|id, now| Application {
            id,
            tender_id: new.tender_id,
            company_id: new.company_id,
            proposal_text: new.proposal_text,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn find_by_id(&self, id: u64) -> Option<Application> {
        self.inner.read().get(id).cloned()
    }

    pub fn find_by_tender_id(&self, tender_id: u64) -> Vec<Application> {
        self.inner.read().filter(|a| a.tender_id == tender_id)
    }

    pub fn find_by_company_id(&self, company_id: u64) -> Vec<Application> {
        self.inner.read().filter(|a| a.company_id == company_id)
    }

    pub fn find_by_tender_and_company(&self, tender_id: u64, company_id: u64) -> Option<Application> {
        self.inner
            .read()
            .find(|a| a.tender_id == tender_id && a.company_id == company_id)
            .cloned()
    }

    /// Applications submitted against any of `tender_ids`.
    pub fn find_by_tender_ids(&self, tender_ids: &[u64]) -> Vec<Application> {
        self.inner.read().filter(|a| tender_ids.contains(&a.tender_id))
    }

    pub fn update_by_id(&self, id: u64, patch: ApplicationPatch) -> Option<Application> {
        self.inner.write().update(id, |a| {
            if let Some(v) = patch.proposal_text {
                a.proposal_text = v;
            }
            if let Some(v) = patch.status {
                a.status = v;
            }
        })
    }

    pub fn delete_by_id(&self, id: u64) -> bool {
        self.inner.write().remove(id)
    }

    /// Delete after `check` approves the current row, atomically.
    pub fn delete_by_id_if<E>(
        &self,
        id: u64,
        check: impl FnOnce(&Application) -> Result<(), E>,
    ) -> Result<bool, E> {
        self.inner.write().remove_if(id, check)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn reset(&self) {
        self.inner.write().clear();
    }
}
