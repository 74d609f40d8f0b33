use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    store::{Company, CompanyPatch},
    validate::{is_valid_phone, is_valid_uri, Problems, Validate},
};

/// Partial profile update; absent fields stay as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub services: Option<Vec<String>>,
    pub logo_url: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut p = Problems::new();
        if let Some(name) = &self.name {
            p.length("name", name.trim(), 2, 100);
        }
        if let Some(industry) = &self.industry {
            p.check(!industry.trim().is_empty(), "\"industry\" is not allowed to be empty");
        }
        if let Some(description) = &self.description {
            p.length("description", description, 0, 1000);
        }
        if let Some(phone) = &self.phone {
            p.check(
                is_valid_phone(phone),
                "\"phone\" fails to match the required pattern",
            );
        }
        if let Some(website) = &self.website {
            p.check(
                website.is_empty() || is_valid_uri(website),
                "\"website\" must be a valid uri",
            );
        }
        if let Some(address) = &self.address {
            p.length("address", address, 0, 200);
        }
        if let Some(logo_url) = &self.logo_url {
            p.check(
                logo_url.is_empty() || is_valid_uri(logo_url),
                "\"logoUrl\" must be a valid uri",
            );
        }
        p.finish()
    }
}

impl From<UpdateProfileRequest> for CompanyPatch {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            name: r.name.map(|n| n.trim().to_string()),
            industry: r.industry.map(|i| i.trim().to_string()),
            description: r.description,
            logo_url: r.logo_url,
            phone: r.phone,
            website: r.website,
            address: r.address,
            services: r.services,
        }
    }
}

/// Company fields embedded into tender responses.
#[derive(Debug, Clone, Serialize)]
pub struct CompanySummary {
    pub id: u64,
    pub name: String,
    pub industry: String,
}

impl From<&Company> for CompanySummary {
    fn from(c: &Company) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            industry: c.industry.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoResponse {
    pub logo_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }

    #[test]
    fn website_may_be_cleared_but_not_garbage() {
        let cleared = UpdateProfileRequest {
            website: Some(String::new()),
            ..Default::default()
        };
        assert!(cleared.validate().is_ok());
        let garbage = UpdateProfileRequest {
            website: Some("not a url".into()),
            ..Default::default()
        };
        assert!(garbage.validate().is_err());
    }

    #[test]
    fn name_is_measured_and_stored_trimmed() {
        let padded = UpdateProfileRequest {
            name: Some(" A ".into()),
            ..Default::default()
        };
        assert!(padded.validate().is_err());

        let req = UpdateProfileRequest {
            name: Some("  Acme Ltd  ".into()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
        assert_eq!(CompanyPatch::from(req).name.as_deref(), Some("Acme Ltd"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<UpdateProfileRequest, _> = serde_json::from_str(r#"{"userId": 9}"#);
        assert!(res.is_err());
    }

    #[test]
    fn camel_case_fields_map_into_patch() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"logoUrl":"https://x.io/l.png","services":["Paving"]}"#).unwrap();
        let patch = CompanyPatch::from(req);
        assert_eq!(patch.logo_url.as_deref(), Some("https://x.io/l.png"));
        assert_eq!(patch.services, Some(vec!["Paving".to_string()]));
        assert!(patch.name.is_none());
    }
}
