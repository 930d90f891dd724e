//! # HTTP Routes
//!
//! ```text
//! GET    /health                           pool health
//! POST   /api/auth/login                   {email, password}  -> {token, session}
//! POST   /api/auth/register                Registration       -> {token, session}
//! POST   /api/auth/logout                  revoke bearer token
//! GET    /api/session                      session + guard decision
//! ─────────────────────────── guarded (Bearer) ───────────────────────────
//! GET    /api/profile                      user + company name
//! PATCH  /api/profile                      ProfilePatch
//! GET    /api/suppliers[?country=]         newest first
//! POST   /api/suppliers                    NewSupplier
//! PATCH  /api/suppliers/{id}               SupplierPatch
//! DELETE /api/suppliers/{id}
//! POST   /api/suppliers/uploads/logo       ?filename=, raw body -> {url}
//! POST   /api/suppliers/uploads/catalog    ?filename=, raw body -> {name, url}
//! GET    /api/products[?supplierId=]       newest first
//! POST   /api/products                     NewProduct
//! PATCH  /api/products/{id}                ProductPatch
//! DELETE /api/products/{id}
//! POST   /api/products/uploads/image       ?filename=, raw body -> {url}
//! GET    /api/dashboard                    DashboardStats
//! ─────────────────────────────────────────────────────────────────────────
//! GET    /files/{*path}                    stored upload
//! ```

mod auth;
mod profile;
mod records;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use shoptools_gateway::Gateway;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/session", get(auth::session))
        .route(
            "/api/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route(
            "/api/suppliers",
            get(records::list_suppliers).post(records::create_supplier),
        )
        .route(
            "/api/suppliers/{id}",
            patch(records::update_supplier).delete(records::delete_supplier),
        )
        .route(
            "/api/suppliers/uploads/logo",
            post(records::upload_supplier_logo),
        )
        .route(
            "/api/suppliers/uploads/catalog",
            post(records::upload_supplier_catalog),
        )
        .route(
            "/api/products",
            get(records::list_products).post(records::create_product),
        )
        .route(
            "/api/products/{id}",
            patch(records::update_product).delete(records::delete_product),
        )
        .route(
            "/api/products/uploads/image",
            post(records::upload_product_image),
        )
        .route("/api/dashboard", get(profile::dashboard))
        .route("/files/{*path}", get(serve_file))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Response {
    if state.backend.database().health_check().await {
        Json(json!({ "status": "ok" })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
            .into_response()
    }
}

async fn serve_file(State(state): State<AppState>, Path(path): Path<String>) -> ApiResult<Response> {
    let file = state
        .backend
        .client()
        .fetch_file(&path)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("File not found: {path}")))?;

    Ok(([(header::CONTENT_TYPE, file.content_type)], file.bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt; // for `oneshot`

    use shoptools_db::{Database, DbConfig};
    use shoptools_gateway::auth::TokenIssuer;
    use shoptools_gateway::config::StorageSettings;
    use shoptools_gateway::LocalBackend;

    async fn app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let backend = LocalBackend::new(
            db,
            TokenIssuer::new("router-test-secret-0123", 3600),
            StorageSettings::default(),
        );
        router(AppState::new(backend, 1024 * 1024))
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn register(app: &Router, email: &str, company: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": email,
                "password": "secret123",
                "name": "Ana",
                "phone": "+1 555 0100",
                "companyName": company,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    fn supplier_body(name: &str, country: &str) -> Value {
        json!({
            "companyName": name,
            "contactName": "Li Wei",
            "email": "sales@example.com",
            "phone": "+86 20 1234 5678",
            "country": country,
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_guard_rejects_anonymous() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/suppliers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let (status, body) = call(&app, Method::GET, "/api/session", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"], "redirect_to_login");
        assert_eq!(body["redirectTo"], "/login");
        assert_eq!(body["session"]["isAuthenticated"], false);
    }

    #[tokio::test]
    async fn test_login_flow() {
        let app = app().await;
        register(&app, "ana@example.com", "Acme").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ana@example.com", "password": "wrong-one" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "invalid_credentials");
        assert_eq!(body["message"], "Invalid password");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ana@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["user"]["email"], "ana@example.com");
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = call(&app, Method::GET, "/api/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["companyName"], "Acme");
        assert_eq!(body["user"]["role"], "master");

        let (status, _) = call(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, Method::GET, "/api/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let app = app().await;
        register(&app, "ana@example.com", "Acme").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "ana@example.com",
                "password": "secret123",
                "name": "Ana",
                "phone": "+1 555 0100",
                "companyName": "Acme Again",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Email already registered");
    }

    #[tokio::test]
    async fn test_supplier_crud_is_company_scoped() {
        let app = app().await;
        let ana = register(&app, "ana@example.com", "Acme").await;
        let bo = register(&app, "bo@example.com", "Bolt").await;

        let (status, created) = call(
            &app,
            Method::POST,
            "/api/suppliers",
            Some(&ana),
            Some(supplier_body("Shenzhen Lights", "China")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["catalogs"], json!([]));

        call(
            &app,
            Method::POST,
            "/api/suppliers",
            Some(&ana),
            Some(supplier_body("Osaka Paper", "Japan")),
        )
        .await;

        let (_, listed) = call(&app, Method::GET, "/api/suppliers", Some(&ana), None).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);
        assert_eq!(listed[0]["companyName"], "Osaka Paper");

        let (_, japan) = call(
            &app,
            Method::GET,
            "/api/suppliers?country=Japan",
            Some(&ana),
            None,
        )
        .await;
        assert_eq!(japan.as_array().unwrap().len(), 1);

        let (_, listed) = call(&app, Method::GET, "/api/suppliers", Some(&bo), None).await;
        assert_eq!(listed, json!([]));

        let uri = format!("/api/suppliers/{id}");
        let (status, _) = call(&app, Method::DELETE, &uri, Some(&bo), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, updated) = call(
            &app,
            Method::PATCH,
            &uri,
            Some(&ana),
            Some(json!({ "notes": "MOQ 500" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["notes"], "MOQ 500");

        let (status, _) = call(&app, Method::DELETE, &uri, Some(&ana), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_products_and_dashboard() {
        let app = app().await;
        let token = register(&app, "ana@example.com", "Acme").await;

        let (_, supplier) = call(
            &app,
            Method::POST,
            "/api/suppliers",
            Some(&token),
            Some(supplier_body("Shenzhen Lights", "China")),
        )
        .await;
        let supplier_id = supplier["id"].as_str().unwrap();

        let (status, product) = call(
            &app,
            Method::POST,
            "/api/products",
            Some(&token),
            Some(json!({
                "name": "Desk Lamp",
                "priceCents": 2500,
                "stock": 4,
                "supplierId": supplier_id,
                "isWinner": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{product}");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/products",
            Some(&token),
            Some(json!({
                "name": "Broken",
                "priceCents": -1,
                "stock": 1,
                "supplierId": supplier_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "validation");

        let uri = format!("/api/products?supplierId={supplier_id}");
        let (_, listed) = call(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, stats) = call(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["totalProducts"], 1);
        assert_eq!(stats["totalSuppliers"], 1);
        assert_eq!(stats["winningProduct"]["name"], "Desk Lamp");
        assert_eq!(stats["inventoryValue"], 10_000);
    }

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let app = app().await;
        let token = register(&app, "ana@example.com", "Acme").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/suppliers/uploads/catalog?filename=spring.pdf")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::from(vec![37, 80, 68, 70]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let attachment: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(attachment["name"], "spring.pdf");

        let url = attachment["url"].as_str().unwrap();
        assert!(url.starts_with("/files/supplier-catalogs/"));

        let response = app
            .clone()
            .oneshot(Request::builder().uri(url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), b"%PDF");

        let (status, _) = call(&app, Method::GET, "/files/avatars/missing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
