//! HTTP client for the ZITADEL management/admin REST gateway

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::error::ApiError;

/// Header carrying the organization context for management calls.
pub const ORG_HEADER: &str = "x-zitadel-orgid";

/// ZITADEL API client. Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
}

impl Client {
    pub fn new(endpoint: &str, access_token: &str, insecure: bool) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(endpoint)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let http = reqwest::ClientBuilder::new()
            .danger_accept_invalid_certs(insecure)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: endpoint.trim_end_matches('/').to_string(),
                auth_header: format!("Bearer {}", access_token),
            }),
        })
    }

    /// User management endpoints.
    pub fn users(&self) -> super::users::UsersApi<'_> {
        super::users::UsersApi::new(self)
    }

    /// Instance-level SMS provider endpoints.
    pub fn sms(&self) -> super::sms::SmsApi<'_> {
        super::sms::SmsApi::new(self)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        org: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("GET {}", url);

        let mut request = self
            .inner
            .http
            .get(&url)
            .header(AUTHORIZATION, &self.inner.auth_header);
        if let Some(org) = org {
            request = request.header(ORG_HEADER, org);
        }

        self.handle_response(request.send().await?).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        org: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("POST {}", url);

        let mut request = self
            .inner
            .http
            .post(&url)
            .header(AUTHORIZATION, &self.inner.auth_header)
            .json(body);
        if let Some(org) = org {
            request = request.header(ORG_HEADER, org);
        }

        self.handle_response(request.send().await?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        org: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("PUT {}", url);

        let mut request = self
            .inner
            .http
            .put(&url)
            .header(AUTHORIZATION, &self.inner.auth_header)
            .json(body);
        if let Some(org) = org {
            request = request.header(ORG_HEADER, org);
        }

        self.handle_response(request.send().await?).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        org: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("DELETE {}", url);

        let mut request = self
            .inner
            .http
            .delete(&url)
            .header(AUTHORIZATION, &self.inner.auth_header);
        if let Some(org) = org {
            request = request.header(ORG_HEADER, org);
        }

        self.handle_response(request.send().await?).await
    }

    /// Each response is mapped exactly once; no retry.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthenticationFailed);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!("API error response: {}", text);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = if text.is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Parse(format!("{}: {}", e, body)))
    }
}
