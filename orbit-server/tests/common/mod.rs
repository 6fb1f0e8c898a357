//! Shared harness for router-level tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use orbit_server::auth::JwtConfig;
use orbit_server::db::{memory_pool, seed};
use orbit_server::{Config, ServerState, build_app};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    // Keeps the uploads directory alive for the test
    pub work_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub bytes: Vec<u8>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let work_dir = TempDir::new().unwrap();
        let mut config = Config::with_work_dir(work_dir.path().to_string_lossy()).unwrap();
        config.jwt = JwtConfig::with_secret("integration-test-secret-".repeat(3));
        config.admin_username = Some(ADMIN_USERNAME.into());
        config.admin_password = Some(ADMIN_PASSWORD.into());
        config.chat.api_key = None;
        customize(&mut config);

        let pool = memory_pool().await.unwrap();
        seed::ensure_builtin_accounts(&pool, &config).await.unwrap();

        let state = ServerState::new(config, pool);
        Self {
            router: build_app(state.clone()),
            state,
            work_dir,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/auth/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Category "Coffee", size "Large"/LG (+1.00) and a 4.50 latte linked to it
    pub async fn seed_menu(&self, admin: &str) -> (i64, i64, i64) {
        let category = self
            .post("/api/categories", Some(admin), serde_json::json!({ "name": "Coffee" }))
            .await;
        assert_eq!(category.status, StatusCode::OK, "{}", category.body);
        let category_id = category.body["id"].as_i64().unwrap();

        let size = self
            .post(
                "/api/sizes",
                Some(admin),
                serde_json::json!({ "name": "Large", "abbreviation": "lg", "priceModifier": 1.0 }),
            )
            .await;
        assert_eq!(size.status, StatusCode::OK, "{}", size.body);
        let size_id = size.body["id"].as_i64().unwrap();

        let item = self
            .post(
                "/api/menu-items",
                Some(admin),
                serde_json::json!({
                    "name": "Latte",
                    "basePrice": 4.5,
                    "categoryId": category_id,
                    "sizeIds": [size_id]
                }),
            )
            .await;
        assert_eq!(item.status, StatusCode::OK, "{}", item.body);
        (category_id, size_id, item.body["id"].as_i64().unwrap())
    }
}

impl TestResponse {
    pub fn code(&self) -> u64 {
        self.body["code"].as_u64().unwrap_or_default()
    }
}
