use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::{
    error::AppError,
    state::AppState,
    store::{Company, User},
};

/// Authenticated caller: the user named by the bearer token plus their company, if any.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub company: Option<Company>,
}

impl AuthUser {
    /// The caller's company, or `err` when they have none.
    pub fn company_or(&self, err: AppError) -> Result<&Company, AppError> {
        self.company.as_ref().ok_or(err)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Authentication("Invalid Authorization header".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Authentication("Invalid or expired token".into())
        })?;

        let user = state
            .db
            .users
            .find_by_id(claims.sub)
            .ok_or_else(|| AppError::Authentication("User not found".into()))?;
        let company = state.db.companies.find_by_user_id(user.id);

        Ok(AuthUser { user, company })
    }
}
