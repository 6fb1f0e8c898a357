//! HTTP client for the orbit-server REST API

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::models::{
    Category, MenuItemDetail, MenuItemFilter, Order, OrderCreate, OrderTracking, Settings, Size,
};
use shared::{ErrorBody, ErrorCode};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making network requests to orbit-server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)));
        Self::handle_response(request.send().await?).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)).query(query));
        Self::handle_response(request.send().await?).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorized(self.client.post(self.url(path)).json(body));
        Self::handle_response(request.send().await?).await
    }

    /// Make a POST request without body, ignoring the response body
    pub async fn post_empty(&self, path: &str) -> ClientResult<()> {
        let request = self.authorized(self.client.post(self.url(path)));
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response.json().await.map_err(Into::into)
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return e.into(),
        };
        let (code, message) = parse_error_body(&text);
        tracing::debug!(status = status.as_u16(), ?code, %message, "Request failed");

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                code,
                message,
            },
        }
    }

    // ========== Auth API ==========

    /// Login with username and password; the token is kept for later calls
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/api/auth/login", &request).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Register a customer account and sign in as it
    pub async fn register(&mut self, request: &RegisterRequest) -> ClientResult<LoginResponse> {
        let response: LoginResponse = self.post("/api/auth/register", request).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Sign in as the built-in guest account
    pub async fn guest_login(&mut self) -> ClientResult<LoginResponse> {
        let response: LoginResponse = self.post("/api/auth/guest", &Value::Null).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Get current user information
    pub async fn me(&self) -> ClientResult<UserInfo> {
        self.get("/api/auth/me").await
    }

    /// Logout
    pub async fn logout(&mut self) -> ClientResult<()> {
        self.post_empty("/api/auth/logout").await?;
        self.token = None;
        Ok(())
    }

    // ========== Storefront API ==========

    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.get("/api/categories").await
    }

    pub async fn menu_items(&self, filter: &MenuItemFilter) -> ClientResult<Vec<MenuItemDetail>> {
        self.get_with_query("/api/menu-items", filter).await
    }

    pub async fn menu_item(&self, id: i64) -> ClientResult<MenuItemDetail> {
        self.get(&format!("/api/menu-items/{id}")).await
    }

    /// Active sizes only
    pub async fn active_sizes(&self) -> ClientResult<Vec<Size>> {
        self.get_with_query("/api/sizes", &[("active", "true")]).await
    }

    pub async fn settings(&self) -> ClientResult<Settings> {
        self.get("/api/settings").await
    }

    // ========== Orders API ==========

    /// Place an order; prices are recomputed by the server
    pub async fn place_order(&self, order: &OrderCreate) -> ClientResult<Order> {
        self.post("/api/orders", order).await
    }

    /// Track an order by its public number (e.g. `ORB-1001`)
    pub async fn track_order(&self, order_number: &str) -> ClientResult<OrderTracking> {
        self.get(&format!("/api/orders/number/{order_number}")).await
    }

    /// Orders of the signed-in user (all orders for admins)
    pub async fn orders(&self) -> ClientResult<Vec<Order>> {
        self.get("/api/orders").await
    }
}

/// Extract `(code, message)` from an error body, falling back to the raw text
fn parse_error_body(text: &str) -> (Option<ErrorCode>, String) {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => (body.error_code(), body.message),
        Err(_) => (None, text.to_string()),
    }
}
