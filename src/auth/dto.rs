use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    store::{Company, User},
    validate::{is_valid_email, Problems, Validate},
};

/// Request body for registration: the account plus its company.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub company_name: String,
    pub industry: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        Problems::new()
            .check(is_valid_email(self.email.trim()), "\"email\" must be a valid email")
            .length("username", self.username.trim(), 2, 50)
            .length("password", &self.password, 6, usize::MAX)
            .length("companyName", self.company_name.trim(), 2, 100)
            .check(!self.industry.trim().is_empty(), "\"industry\" is not allowed to be empty")
            .finish()
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        Problems::new()
            .check(is_valid_email(self.email.trim()), "\"email\" must be a valid email")
            .check(!self.password.is_empty(), "\"password\" is not allowed to be empty")
            .finish()
    }
}

/// Returned after register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

/// Identity of the caller, for `/auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub company: Option<Company>,
}
