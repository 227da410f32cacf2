//! Terraform provider for the ZITADEL identity platform.
//!
//! Talks to the ZITADEL management and admin REST APIs with a bearer token.
//! Credentials come from the provider configuration or from the
//! `ZITADEL_ENDPOINT` / `ZITADEL_ACCESS_TOKEN` environment variables.

pub mod api;
pub mod data_sources;
pub mod provider_data;
pub mod resources;

pub use provider_data::ZitadelProviderData;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory, ServerCapabilities, ValidateProviderConfigRequest,
    ValidateProviderConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic};

const ENDPOINT_ENV: &str = "ZITADEL_ENDPOINT";
const ACCESS_TOKEN_ENV: &str = "ZITADEL_ACCESS_TOKEN";
const INSECURE_ENV: &str = "ZITADEL_INSECURE";

#[derive(Default)]
pub struct ZitadelProvider;

impl ZitadelProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for ZitadelProvider {
    fn type_name(&self) -> &str {
        "zitadel"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
            server_capabilities: ServerCapabilities::default(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Provider for the ZITADEL identity platform")
            .attribute(
                AttributeBuilder::new("endpoint", AttributeType::String)
                    .description("Base URL of the ZITADEL instance, e.g. https://demo.zitadel.cloud")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("access_token", AttributeType::String)
                    .description("Personal access token used as bearer token")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("insecure", AttributeType::Bool)
                    .description("Skip TLS certificate verification")
                    .optional()
                    .build(),
            )
            .build();

        ProviderSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        ValidateProviderConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let mut diagnostics = vec![];

        let endpoint = request
            .config
            .get_string(&AttributePath::new("endpoint"))
            .ok()
            .or_else(|| std::env::var(ENDPOINT_ENV).ok());
        let access_token = request
            .config
            .get_string(&AttributePath::new("access_token"))
            .ok()
            .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok());
        let insecure = request
            .config
            .get_bool(&AttributePath::new("insecure"))
            .ok()
            .or_else(|| {
                std::env::var(INSECURE_ENV)
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok())
            })
            .unwrap_or(false);

        let (endpoint, access_token) = match (endpoint, access_token) {
            (Some(endpoint), Some(access_token)) => (endpoint, access_token),
            (None, _) => {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing endpoint",
                        format!(
                            "endpoint is required (set in provider config or {} env var)",
                            ENDPOINT_ENV
                        ),
                    )
                    .with_attribute(AttributePath::new("endpoint")),
                );
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                };
            }
            (_, None) => {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing access token",
                        format!(
                            "access_token is required (set in provider config or {} env var)",
                            ACCESS_TOKEN_ENV
                        ),
                    )
                    .with_attribute(AttributePath::new("access_token")),
                );
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                };
            }
        };

        match api::Client::new(&endpoint, &access_token, insecure) {
            Ok(client) => {
                tracing::debug!(endpoint = %endpoint, "configured ZITADEL client");
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: Some(Arc::new(ZitadelProviderData {
                        client: Arc::new(client),
                    })),
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to create API client",
                    format!("{}", e),
                ));
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut resources: HashMap<String, ResourceFactory> = HashMap::new();
        resources.insert(
            "zitadel_human_user".to_string(),
            Box::new(|| Box::new(resources::HumanUserResource::new())),
        );
        resources.insert(
            "zitadel_sms_provider_http".to_string(),
            Box::new(|| Box::new(resources::SmsProviderHttpResource::new())),
        );
        resources
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut data_sources: HashMap<String, DataSourceFactory> = HashMap::new();
        data_sources.insert(
            "zitadel_human_user".to_string(),
            Box::new(|| Box::new(data_sources::HumanUserDataSource::new())),
        );
        data_sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tfplug::types::DynamicValue;

    fn configure_request(config: DynamicValue) -> ConfigureProviderRequest {
        ConfigureProviderRequest {
            terraform_version: "1.9.0".to_string(),
            config,
        }
    }

    fn clear_env() {
        std::env::remove_var(ENDPOINT_ENV);
        std::env::remove_var(ACCESS_TOKEN_ENV);
        std::env::remove_var(INSECURE_ENV);
    }

    #[tokio::test]
    #[serial]
    async fn configure_succeeds_with_explicit_config() {
        clear_env();

        let mut config = DynamicValue::empty_object();
        config
            .set_string(
                &AttributePath::new("endpoint"),
                "https://demo.zitadel.cloud".to_string(),
            )
            .unwrap();
        config
            .set_string(
                &AttributePath::new("access_token"),
                "pat-secret".to_string(),
            )
            .unwrap();

        let mut provider = ZitadelProvider::new();
        let response = provider
            .configure(Context::new(), configure_request(config))
            .await;

        assert!(response.diagnostics.is_empty());
        let data = response.provider_data.expect("provider data");
        assert!(data.downcast_ref::<ZitadelProviderData>().is_some());
    }

    #[tokio::test]
    #[serial]
    async fn configure_falls_back_to_env_vars() {
        std::env::set_var(ENDPOINT_ENV, "https://demo.zitadel.cloud");
        std::env::set_var(ACCESS_TOKEN_ENV, "pat-secret");
        std::env::set_var(INSECURE_ENV, "true");

        let mut provider = ZitadelProvider::new();
        let response = provider
            .configure(Context::new(), configure_request(DynamicValue::empty_object()))
            .await;

        assert!(response.diagnostics.is_empty());
        assert!(response.provider_data.is_some());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn configure_requires_endpoint() {
        clear_env();
        std::env::set_var(ACCESS_TOKEN_ENV, "pat-secret");

        let mut provider = ZitadelProvider::new();
        let response = provider
            .configure(Context::new(), configure_request(DynamicValue::empty_object()))
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0].detail.contains("endpoint is required"));
        assert!(response.provider_data.is_none());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn configure_requires_access_token() {
        clear_env();
        std::env::set_var(ENDPOINT_ENV, "https://demo.zitadel.cloud");

        let mut provider = ZitadelProvider::new();
        let response = provider
            .configure(Context::new(), configure_request(DynamicValue::empty_object()))
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0]
            .detail
            .contains("access_token is required"));

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn configure_rejects_invalid_endpoint() {
        clear_env();

        let mut config = DynamicValue::empty_object();
        config
            .set_string(
                &AttributePath::new("endpoint"),
                "not a url".to_string(),
            )
            .unwrap();
        config
            .set_string(
                &AttributePath::new("access_token"),
                "pat-secret".to_string(),
            )
            .unwrap();

        let mut provider = ZitadelProvider::new();
        let response = provider
            .configure(Context::new(), configure_request(config))
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Failed to create API client");
        assert!(response.provider_data.is_none());
    }

    #[tokio::test]
    async fn provider_registers_expected_types() {
        let provider = ZitadelProvider::new();

        let resources = provider.resources();
        assert!(resources.contains_key("zitadel_human_user"));
        assert!(resources.contains_key("zitadel_sms_provider_http"));

        let data_sources = provider.data_sources();
        assert!(data_sources.contains_key("zitadel_human_user"));
    }

    #[tokio::test]
    async fn schema_marks_access_token_sensitive() {
        let provider = ZitadelProvider::new();
        let response = provider.schema(Context::new(), ProviderSchemaRequest).await;

        let token = response.schema.attribute("access_token").unwrap();
        assert!(token.sensitive);
        assert!(!token.required);
        let endpoint = response.schema.attribute("endpoint").unwrap();
        assert!(!endpoint.sensitive);
    }
}
