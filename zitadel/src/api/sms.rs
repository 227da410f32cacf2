//! HTTP SMS provider endpoints (admin API)
//!
//! Instance-level configuration, so no organization context applies.

use serde::{Deserialize, Serialize};

use super::{ChangeResponse, Client};
use crate::api::ApiError;

/// Request body for POST /admin/v1/sms/http and PUT /admin/v1/sms/http/{id}
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsProviderHttpConfig {
    pub endpoint: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSmsProviderResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct GetSmsProviderResponse {
    pub config: SmsProviderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsProviderConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub http: Option<SmsHttpConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsHttpConfig {
    #[serde(default)]
    pub endpoint: String,
}

pub struct SmsApi<'a> {
    client: &'a Client,
}

impl<'a> SmsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /admin/v1/sms/http
    pub async fn add_http(
        &self,
        config: &SmsProviderHttpConfig,
    ) -> Result<AddSmsProviderResponse, ApiError> {
        self.client.post("/admin/v1/sms/http", None, config).await
    }

    /// GET /admin/v1/sms/{id}
    pub async fn get(&self, id: &str) -> Result<GetSmsProviderResponse, ApiError> {
        self.client.get(&format!("/admin/v1/sms/{}", id), None).await
    }

    /// PUT /admin/v1/sms/http/{id}
    pub async fn update_http(
        &self,
        id: &str,
        config: &SmsProviderHttpConfig,
    ) -> Result<(), ApiError> {
        self.client
            .put::<ChangeResponse, _>(&format!("/admin/v1/sms/http/{}", id), None, config)
            .await
            .map(|_| ())
    }

    /// DELETE /admin/v1/sms/{id}
    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<ChangeResponse>(&format!("/admin/v1/sms/{}", id), None)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::create_test_client;
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn add_http_posts_config_and_returns_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/v1/sms/http")
            .match_body(Matcher::Json(serde_json::json!({
                "endpoint": "https://relay.example.com/sms",
                "description": "relay"
            })))
            .with_body(r#"{"id":"235868803"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let response = client
            .sms()
            .add_http(&SmsProviderHttpConfig {
                endpoint: "https://relay.example.com/sms".to_string(),
                description: "relay".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.id, "235868803");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_parses_http_config() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/admin/v1/sms/235868803")
            .with_body(
                r#"{"config":{
                    "id":"235868803",
                    "description":"relay",
                    "state":"SMS_CONFIG_ACTIVE",
                    "http":{"endpoint":"https://relay.example.com/sms"}
                }}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let response = client.sms().get("235868803").await.unwrap();

        assert_eq!(response.config.id, "235868803");
        assert_eq!(response.config.description.as_deref(), Some("relay"));
        assert_eq!(
            response.config.http.unwrap().endpoint,
            "https://relay.example.com/sms"
        );
    }
}
