use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    store::{Application, ApplicationStatus, PageRequest, Tender, TenderStatus},
    validate::{empty_as_none, Problems, Validate},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitApplicationRequest {
    pub tender_id: u64,
    pub proposal_text: String,
}

impl Validate for SubmitApplicationRequest {
    fn validate(&self) -> Result<(), AppError> {
        Problems::new()
            .check(self.tender_id > 0, "\"tenderId\" must be a positive number")
            .length("proposalText", self.proposal_text.trim(), 10, 5000)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

impl Validate for UpdateStatusRequest {
    fn validate(&self) -> Result<(), AppError> {
        // the value set is enforced by deserialization
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tender_id: Option<u64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<usize>,
}

impl Validate for ApplicationListQuery {
    fn validate(&self) -> Result<(), AppError> {
        Problems::new()
            .check(
                self.limit.map_or(true, |l| l <= 50),
                "\"limit\" must be less than or equal to 50",
            )
            .finish()
    }
}

impl ApplicationListQuery {
    pub fn keep(&self, a: &Application) -> bool {
        self.status.map_or(true, |s| a.status == s) && self.tender_id.map_or(true, |t| a.tender_id == t)
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TenderSummary {
    pub id: u64,
    pub title: String,
    pub status: TenderStatus,
}

impl From<&Tender> for TenderSummary {
    fn from(t: &Tender) -> Self {
        Self {
            id: t.id,
            title: t.title.clone(),
            status: t.status,
        }
    }
}

/// Application plus a summary of its tender, when the tender still exists.
#[derive(Debug, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub tender: Option<TenderSummary>,
}
