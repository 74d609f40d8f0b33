use std::net::SocketAddr;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::warn;

use crate::{
    applications, auth, companies, error::AppError, search, state::AppState, tenders,
};

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());
    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(companies::router())
                .merge(tenders::router())
                .merge(applications::router())
                .merge(search::router()),
        )
        .route("/health", get(health))
        .nest_service("/uploads", uploads)
        .fallback(|| async { AppError::NotFound("Route not found".into()) })
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(e) => {
            warn!(%origin, error = %e, "CORS_ORIGIN is not a valid header value; allowing any origin");
            CorsLayer::permissive()
        }
    }
}

async fn health() -> Json<Value> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(json!({
        "status": "OK",
        "message": "Tender Management API is running",
        "timestamp": timestamp,
    }))
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::FromRef,
        http::{Request, StatusCode},
    };
    use time::macros::date;
    use tower::ServiceExt;

    use crate::{
        auth::jwt::JwtKeys,
        store::{NewTender, TenderStatus},
    };

    struct TestApp {
        state: AppState,
        router: Router,
    }

    struct Account {
        token: String,
        user_id: u64,
        company_id: u64,
    }

    impl TestApp {
        fn new() -> Self {
            let state = AppState::fake();
            let router = build_app(state.clone());
            Self { state, router }
        }

        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut req = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let req = match body {
                Some(body) => req
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
                None => req.body(Body::empty()).unwrap(),
            };
            let res = self.router.clone().oneshot(req).await.unwrap();
            let status = res.status();
            let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json)
        }

        async fn register(&self, email: &str, company: &str) -> Account {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/api/auth/register",
                    None,
                    Some(json!({
                        "email": email,
                        "username": "someone",
                        "password": "password123",
                        "companyName": company,
                        "industry": "Technology",
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            Account {
                token: body["data"]["token"].as_str().unwrap().to_string(),
                user_id: body["data"]["user"]["id"].as_u64().unwrap(),
                company_id: body["data"]["company"]["id"].as_u64().unwrap(),
            }
        }

        async fn create_tender(&self, owner: &Account, body: Value) -> u64 {
            let (status, body) = self
                .call(Method::POST, "/api/tenders", Some(&owner.token), Some(body))
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["data"]["id"].as_u64().unwrap()
        }

        async fn apply(&self, applicant: &Account, tender_id: u64) -> (StatusCode, Value) {
            self.call(
                Method::POST,
                "/api/applications",
                Some(&applicant.token),
                Some(json!({
                    "tenderId": tender_id,
                    "proposalText": "We can deliver this within the timeline.",
                })),
            )
            .await
        }
    }

    fn website_tender() -> Value {
        json!({
            "title": "Website Development Project",
            "description": "We need a modern, responsive website.",
            "budget": 15000,
            "deadline": "2024-12-31",
        })
    }

    fn rfc3339(v: &Value) -> OffsetDateTime {
        OffsetDateTime::parse(v.as_str().unwrap(), &Rfc3339).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_uses_error_envelope() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/api/nowhere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Route not found");
    }

    #[tokio::test]
    async fn login_token_identifies_registered_user() {
        let app = TestApp::new();
        let account = app.register("alice@example.com", "Alice Co").await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": "alice@example.com", "password": "password123"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");
        assert!(body["data"]["user"].get("passwordHash").is_none());

        let token = body["data"]["token"].as_str().unwrap();
        let claims = JwtKeys::from_ref(&app.state).verify(token).unwrap();
        assert_eq!(claims.sub, account.user_id);
        assert_eq!(claims.email, "alice@example.com");
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let app = TestApp::new();
        app.register("alice@example.com", "Alice Co").await;

        let (wrong_status, wrong_body) = app
            .call(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": "alice@example.com", "password": "not-it-at-all"})),
            )
            .await;
        let (unknown_status, unknown_body) = app
            .call(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": "nobody@example.com", "password": "password123"})),
            )
            .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(wrong_body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let app = TestApp::new();
        app.register("alice@example.com", "Alice Co").await;
        let (status, body) = app
            .call(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": "alice@example.com",
                    "username": "other",
                    "password": "password123",
                    "companyName": "Other Co",
                    "industry": "Finance",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User with this email already exists");
        assert_eq!(app.state.db.users.len(), 1);
        assert_eq!(app.state.db.companies.len(), 1);
    }

    #[tokio::test]
    async fn invalid_register_lists_problems() {
        let app = TestApp::new();
        let (status, body) = app
            .call(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": "not-an-email",
                    "username": "x",
                    "password": "123",
                    "companyName": "Co",
                    "industry": "Tech",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
        assert_eq!(app.state.db.users.len(), 0);
    }

    #[tokio::test]
    async fn protected_routes_require_a_valid_token() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = app
            .call(Method::GET, "/api/auth/me", Some("garbage"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let account = app.register("alice@example.com", "Alice Co").await;
        let (status, body) = app
            .call(Method::GET, "/api/auth/me", Some(&account.token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["company"]["id"].as_u64(), Some(account.company_id));
    }

    #[tokio::test]
    async fn tender_without_status_is_open() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        let id = app.create_tender(&owner, website_tender()).await;

        let (status, body) = app
            .call(Method::GET, &format!("/api/tenders/{id}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "open");
        assert_eq!(body["data"]["deadline"], "2024-12-31");
        assert_eq!(body["data"]["company"]["name"], "Alice Co");
    }

    #[tokio::test]
    async fn only_the_owner_may_change_a_tender() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        let other = app.register("bob@example.com", "Bob Co").await;
        let id = app.create_tender(&owner, website_tender()).await;
        let uri = format!("/api/tenders/{id}");

        let (status, _) = app
            .call(Method::PUT, &uri, Some(&other.token), Some(json!({"status": "closed"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.call(Method::DELETE, &uri, Some(&other.token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .call(Method::PUT, &uri, Some(&owner.token), Some(json!({"status": "closed"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "closed");

        let (status, _) = app.call(Method::DELETE, &uri, Some(&owner.token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.call(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_error() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/api/tenders/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation error");
    }

    #[tokio::test]
    async fn second_application_is_rejected() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        let applicant = app.register("bob@example.com", "Bob Co").await;
        let tender_id = app.create_tender(&owner, website_tender()).await;

        let (status, body) = app.apply(&applicant, tender_id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "pending");

        let (status, body) = app.apply(&applicant, tender_id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You have already applied to this tender");
        assert_eq!(app.state.db.applications.find_by_tender_id(tender_id).len(), 1);
    }

    #[tokio::test]
    async fn cannot_apply_to_own_or_closed_tender() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        let applicant = app.register("bob@example.com", "Bob Co").await;

        let own = app.create_tender(&owner, website_tender()).await;
        let (status, body) = app.apply(&owner, own).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Cannot apply to your own tender");

        let mut closed = website_tender();
        closed["status"] = json!("closed");
        let closed = app.create_tender(&owner, closed).await;
        let (status, body) = app.apply(&applicant, closed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Tender is not open for applications");

        let (status, _) = app.apply(&applicant, 999).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(app.state.db.applications.len(), 0);
    }

    #[tokio::test]
    async fn decided_application_cannot_be_withdrawn() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        let applicant = app.register("bob@example.com", "Bob Co").await;
        let tender_id = app.create_tender(&owner, website_tender()).await;
        let (_, body) = app.apply(&applicant, tender_id).await;
        let app_id = body["data"]["id"].as_u64().unwrap();

        let (status, _) = app
            .call(
                Method::PUT,
                &format!("/api/applications/{app_id}/status"),
                Some(&owner.token),
                Some(json!({"status": "rejected"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .call(
                Method::DELETE,
                &format!("/api/applications/{app_id}"),
                Some(&applicant.token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Cannot delete application that is not pending");
        assert_eq!(app.state.db.applications.len(), 1);
    }

    #[tokio::test]
    async fn pending_application_can_be_withdrawn_by_applicant_only() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        let applicant = app.register("bob@example.com", "Bob Co").await;
        let tender_id = app.create_tender(&owner, website_tender()).await;
        let (_, body) = app.apply(&applicant, tender_id).await;
        let uri = format!("/api/applications/{}", body["data"]["id"]);

        let (status, _) = app.call(Method::DELETE, &uri, Some(&owner.token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.call(Method::DELETE, &uri, Some(&applicant.token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.call(Method::DELETE, &uri, Some(&applicant.token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn listing_pages_through_tenders() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        for i in 0..23 {
            app.state.db.tenders.create(NewTender {
                company_id: owner.company_id,
                title: format!("Tender number {i}"),
                description: "Generated for paging".into(),
                budget: 1000.0 + i as f64,
                deadline: date!(2024 - 12 - 31),
                status: None,
            });
        }

        let (status, body) = app
            .call(Method::GET, "/api/tenders?page=4&limit=6", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["pagination"]["totalPages"], 4);
        assert_eq!(body["pagination"]["totalItems"], 23);
        assert_eq!(body["pagination"]["currentPage"], 4);

        let (_, body) = app
            .call(Method::GET, "/api/tenders?page=5&limit=6", None, None)
            .await;
        assert!(body["data"].as_array().unwrap().is_empty());

        let (status, _) = app.call(Method::GET, "/api/tenders?limit=51", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn budget_range_bounds_search_results() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        for (title, budget) in [
            ("Small website job", 5000.0),
            ("Medium website job", 15000.0),
            ("Large website job", 25000.0),
            ("Huge website job", 35000.0),
        ] {
            app.state.db.tenders.create(NewTender {
                company_id: owner.company_id,
                title: title.into(),
                description: "A website for the business".into(),
                budget,
                deadline: date!(2024 - 12 - 31),
                status: Some(TenderStatus::Open),
            });
        }

        let (status, body) = app
            .call(
                Method::GET,
                "/api/search/tenders?query=website&minBudget=10000&maxBudget=30000",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let budgets: Vec<f64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["budget"].as_f64().unwrap())
            .collect();
        assert_eq!(budgets.len(), 2);
        assert!(budgets.iter().all(|b| (10000.0..=30000.0).contains(b)));
    }

    #[tokio::test]
    async fn empty_query_values_use_defaults() {
        let app = TestApp::new();
        let owner = app.register("alice@example.com", "Alice Co").await;
        app.create_tender(&owner, website_tender()).await;

        let (status, body) = app
            .call(Method::GET, "/api/tenders?status=&minBudget=&page=&limit=", None, None)
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["currentPage"], 1);
        assert_eq!(body["pagination"]["itemsPerPage"], 10);

        let (status, body) = app
            .call(
                Method::GET,
                "/api/search/tenders?query=web&minBudget=&maxBudget=",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = app
            .call(Method::GET, "/api/search/companies?industry=&page=&limit=", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app
            .call(Method::GET, "/api/search/suggestions?query=web&type=", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn application_listing_shows_sent_and_received() {
        let app = TestApp::new();
        let a = app.register("a@example.com", "Company A").await;
        let b = app.register("b@example.com", "Company B").await;
        let c = app.register("c@example.com", "Company C").await;

        let t1 = app.create_tender(&a, website_tender()).await;
        let t2 = app.create_tender(&a, website_tender()).await;
        let t3 = app.create_tender(&b, website_tender()).await;
        let (_, first) = app.apply(&b, t1).await;
        app.apply(&c, t2).await;
        app.apply(&c, t3).await;

        let ids = |body: &Value| -> Vec<u64> {
            body["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|a| a["id"].as_u64().unwrap())
                .collect()
        };

        let (status, body) = app
            .call(Method::GET, "/api/applications", Some(&a.token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![1, 2]);
        assert_eq!(body["pagination"]["totalItems"], 2);

        let (_, body) = app
            .call(
                Method::GET,
                &format!("/api/applications?tenderId={t1}"),
                Some(&a.token),
                None,
            )
            .await;
        assert_eq!(ids(&body), vec![1]);
        assert_eq!(body["pagination"]["totalItems"], 1);
        assert_eq!(body["data"][0]["tender"]["id"].as_u64(), Some(t1));

        // B sent one application and received one on its own tender
        let (_, body) = app
            .call(Method::GET, "/api/applications?status=&tenderId=", Some(&b.token), None)
            .await;
        assert_eq!(ids(&body), vec![1, 3]);

        let (_, body) = app
            .call(Method::GET, "/api/applications?limit=1&page=2", Some(&c.token), None)
            .await;
        assert_eq!(ids(&body), vec![3]);
        assert_eq!(body["pagination"]["totalItems"], 2);
        assert_eq!(body["pagination"]["totalPages"], 2);

        let first_id = first["data"]["id"].as_u64().unwrap();
        app.call(
            Method::PUT,
            &format!("/api/applications/{first_id}/status"),
            Some(&a.token),
            Some(json!({"status": "accepted"})),
        )
        .await;
        let (_, body) = app
            .call(Method::GET, "/api/applications?status=accepted", Some(&a.token), None)
            .await;
        assert_eq!(ids(&body), vec![first_id]);
    }

    #[tokio::test]
    async fn suggestions_need_two_characters() {
        let app = TestApp::new();
        app.register("alice@example.com", "Alice Co").await;

        let (_, body) = app
            .call(Method::GET, "/api/search/suggestions?query=a", None, None)
            .await;
        assert!(body["data"]["companies"].as_array().unwrap().is_empty());

        let (_, body) = app
            .call(Method::GET, "/api/search/suggestions?query=alice&type=companies", None, None)
            .await;
        assert_eq!(body["data"]["companies"][0]["type"], "company");
        assert!(body["data"]["tenders"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_update_and_logo_upload() {
        let app = TestApp::new();
        let account = app.register("alice@example.com", "Alice Co").await;

        let (status, body) = app
            .call(
                Method::PUT,
                "/api/companies/profile",
                Some(&account.token),
                Some(json!({"phone": "+15551234567", "services": ["web", "mobile"]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["services"], json!(["web", "mobile"]));

        let boundary = "XBOUNDARY";
        let payload = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"logo.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--{boundary}--\r\n"
        );
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/companies/upload-logo")
            .header(header::AUTHORIZATION, format!("Bearer {}", account.token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();
        let res = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let company = app.state.db.companies.find_by_id(account.company_id).unwrap();
        let url = company.logo_url;
        assert!(url.starts_with(&format!("/uploads/{}-", account.company_id)));
        assert!(url.ends_with(".png"));
    }

    #[tokio::test]
    async fn award_flow_end_to_end() {
        let app = TestApp::new();
        let a = app.register("a@example.com", "Company A").await;
        let b = app.register("b@example.com", "Company B").await;

        let tender_id = app.create_tender(&a, website_tender()).await;
        let (status, body) = app.apply(&b, tender_id).await;
        assert_eq!(status, StatusCode::CREATED);
        let app_id = body["data"]["id"].as_u64().unwrap();

        let (_, received) = app
            .call(Method::GET, "/api/applications/received", Some(&a.token), None)
            .await;
        assert_eq!(received["data"].as_array().unwrap().len(), 1);
        assert_eq!(received["data"][0]["tender"]["id"].as_u64(), Some(tender_id));

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let (status, _) = app
            .call(
                Method::PUT,
                &format!("/api/applications/{app_id}/status"),
                Some(&b.token),
                Some(json!({"status": "accepted"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app
            .call(
                Method::PUT,
                &format!("/api/applications/{app_id}/status"),
                Some(&a.token),
                Some(json!({"status": "accepted"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .call(Method::GET, &format!("/api/applications/{app_id}"), Some(&b.token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "accepted");
        assert!(rfc3339(&body["data"]["updatedAt"]) > rfc3339(&body["data"]["createdAt"]));

        let (_, mine) = app
            .call(
                Method::GET,
                "/api/applications/my-applications?status=accepted",
                Some(&b.token),
                None,
            )
            .await;
        assert_eq!(mine["pagination"]["totalItems"], 1);

        let c = app.register("c@example.com", "Company C").await;
        let (status, _) = app
            .call(Method::GET, &format!("/api/applications/{app_id}"), Some(&c.token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
