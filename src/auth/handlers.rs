use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MeResponse, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking, UNUSED_HASH},
    },
    envelope::ApiResponse,
    error::AppError,
    state::AppState,
    store::{NewCompany, NewUser},
    validate::ValidJson,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(get_me))
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    let email = payload.email.trim().to_string();

    if state.db.users.find_by_email(&email).is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::BusinessRule("User with this email already exists".into()));
    }

    let password_hash = hash_password_blocking(payload.password).await?;

    // register_account re-checks the email under the users lock
    let (user, company) = state.db.register_account(
        NewUser {
            email,
            username: payload.username.trim().to_string(),
            password_hash,
        },
        NewCompany {
            name: payload.company_name.trim().to_string(),
            industry: payload.industry.trim().to_string(),
            ..Default::default()
        },
    )?;

    let token = JwtKeys::from_ref(&state).sign(&user)?;

    info!(user_id = user.id, company_id = company.id, email = %user.email, "user registered");
    Ok(ApiResponse::created(
        AuthResponse {
            token,
            user,
            company: Some(company),
        },
        "User registered successfully",
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    let email = payload.email.trim();

    let Some(user) = state.db.users.find_by_email(email) else {
        // unknown emails pay the same Argon2 cost as wrong passwords
        verify_password_blocking(payload.password, UNUSED_HASH.into()).await?;
        warn!(%email, "login unknown email");
        return Err(AppError::Authentication(INVALID_CREDENTIALS.into()));
    };

    if !verify_password_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Authentication(INVALID_CREDENTIALS.into()));
    }

    let token = JwtKeys::from_ref(&state).sign(&user)?;
    let company = state.db.companies.find_by_user_id(user.id);

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(ApiResponse::ok(AuthResponse {
        token,
        user,
        company,
    })
    .with_message("Login successful"))
}

/// Tokens are stateless; the client simply drops its copy.
#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn logout(auth: AuthUser) -> ApiResponse<()> {
    info!("user logged out");
    ApiResponse::message("Logged out successfully")
}

#[instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn get_me(auth: AuthUser) -> ApiResponse<MeResponse> {
    ApiResponse::ok(MeResponse {
        user: auth.user,
        company: auth.company,
    })
}
