use crate::api::{AuthApi, ClientError, ClientResult, CredentialGrant};
use crate::token_store::TokenStore;

use dt_config::ApiConfig;
use dt_core::{Identity, Permission, Role};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client as ReqwestClient, Method, StatusCode, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token scheme used by the practice backend (`Authorization: Token <token>`)
const TOKEN_SCHEME: &str = "Token";

/// HTTP client for the practice backend REST API
pub struct HttpAuthApi {
    pub base_url: String,
    login_path: String,
    users_path: String,
    tokens: Arc<dyn TokenStore>,
    client: ReqwestClient,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user_id: WireId,
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    permissions: Option<Vec<Permission>>,
}

/// The backend reports numeric ids; other deployments use strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

impl HttpAuthApi {
    /// Create a new client
    ///
    /// # Arguments
    /// * `config` - Backend origin, endpoint paths and request timeout
    /// * `tokens` - Storage read on every authenticated request
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            users_path: config.users_path.clone(),
            tokens,
            client,
        })
    }

    /// Build a request, attaching the persisted token when `authenticated`
    fn request(&self, method: Method, path: &str, authenticated: bool) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);

        if authenticated {
            match self.tokens.read_token() {
                Ok(Some(token)) => {
                    req = req.header(AUTHORIZATION, format!("{TOKEN_SCHEME} {token}"));
                }
                Ok(None) => {}
                Err(e) => warn!("Sending request without token, storage unreadable: {e}"),
            }
        }

        req
    }

    /// Execute request and handle errors
    async fn execute(&self, req: reqwest::RequestBuilder) -> ClientResult<Value> {
        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::unauthorized());
        }

        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            let error = body.get("error");
            let code = error
                .and_then(|e| e.get("code"))
                .and_then(|v| v.as_str())
                .unwrap_or("UNKNOWN")
                .to_string();
            let message = error
                .and_then(|e| e.get("message"))
                .or_else(|| body.get("detail"))
                .and_then(|v| v.as_str())
                .or_else(|| status.canonical_reason())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(ClientError::api_error(status.as_u16(), code, message));
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn exchange_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> ClientResult<CredentialGrant> {
        let body = LoginRequest {
            username: identifier,
            password: secret,
        };
        // A stale token on the login call would be rejected before the
        // credentials are even looked at.
        let req = self
            .request(Method::POST, &self.login_path, false)
            .json(&body);

        let value = self.execute(req).await.map_err(|e| match e {
            ClientError::Unauthorized { .. } => ClientError::rejected("backend returned 401"),
            ClientError::Api {
                status: 400 | 403,
                message,
                ..
            } => ClientError::rejected(message),
            other => other,
        })?;

        let response: LoginResponse = serde_json::from_value(value)?;
        debug!("Credential exchange accepted for '{}'", response.username);

        Ok(CredentialGrant {
            token: response.token,
            user_id: response.user_id.into(),
            username: response.username,
            email: response.email,
            role: response.role,
            permissions: response.permissions,
        })
    }

    async fn fetch_all_identities(&self) -> ClientResult<Vec<Identity>> {
        let req = self.request(Method::GET, &self.users_path, true);
        let value = self.execute(req).await?;

        let list = match value {
            Value::Object(mut map) => map.remove("users").unwrap_or(Value::Null),
            other => other,
        };

        Ok(serde_json::from_value(list)?)
    }
}
