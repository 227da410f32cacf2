//! HTTP SMS provider resource
//!
//! Instance-level resource configuring an HTTP webhook as the SMS delivery
//! channel. No organization context applies.

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

use crate::api::sms::{SmsProviderConfig, SmsProviderHttpConfig};

mod field {
    pub const ID: &str = "id";
    pub const ENDPOINT: &str = "endpoint";
    pub const DESCRIPTION: &str = "description";
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SmsProviderHttpModel {
    id: Option<String>,
    endpoint: Option<String>,
    description: Option<String>,
}

impl SmsProviderHttpModel {
    fn from_value(value: &DynamicValue) -> Self {
        Self {
            id: value.get_string(&AttributePath::new(field::ID)).ok(),
            endpoint: value.get_string(&AttributePath::new(field::ENDPOINT)).ok(),
            description: value
                .get_string(&AttributePath::new(field::DESCRIPTION))
                .ok(),
        }
    }

    fn to_config(&self) -> Result<SmsProviderHttpConfig, Diagnostic> {
        let missing = |name: &str| {
            Diagnostic::error(
                format!("Missing {}", name),
                format!("The '{}' attribute is required", name),
            )
            .with_attribute(AttributePath::new(name))
        };

        Ok(SmsProviderHttpConfig {
            endpoint: self
                .endpoint
                .clone()
                .ok_or_else(|| missing(field::ENDPOINT))?,
            description: self
                .description
                .clone()
                .ok_or_else(|| missing(field::DESCRIPTION))?,
        })
    }
}

#[derive(Default)]
pub struct SmsProviderHttpResource {
    provider_data: Option<crate::ZitadelProviderData>,
}

impl SmsProviderHttpResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&crate::api::Client, Diagnostic> {
        self.provider_data
            .as_ref()
            .map(|data| data.client.as_ref())
            .ok_or_else(|| {
                Diagnostic::error(
                    "Provider not configured",
                    "Provider data was not properly configured",
                )
            })
    }

    fn populate_state(
        state: &mut DynamicValue,
        config: &SmsProviderConfig,
    ) -> tfplug::Result<()> {
        if let Some(http) = &config.http {
            state.set_string(&AttributePath::new(field::ENDPOINT), http.endpoint.clone())?;
        }
        if let Some(description) = &config.description {
            state.set_string(
                &AttributePath::new(field::DESCRIPTION),
                description.clone(),
            )?;
        }
        Ok(())
    }
}

#[async_trait]
impl Resource for SmsProviderHttpResource {
    fn type_name(&self) -> &str {
        "zitadel_sms_provider_http"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages the instance-level HTTP SMS provider configuration")
            .attribute(
                AttributeBuilder::new(field::ID, AttributeType::String)
                    .description("Server-assigned provider identifier")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::ENDPOINT, AttributeType::String)
                    .description("HTTP endpoint SMS messages are delivered to")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::DESCRIPTION, AttributeType::String)
                    .description("Description of the provider")
                    .required()
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let model = SmsProviderHttpModel::from_value(&request.planned_state);
        let config = match model.to_config() {
            Ok(config) => config,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let id = match client.sms().add_http(&config).await {
            Ok(response) => response.id,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to create SMS provider",
                    format!("API error: {}", e),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let mut new_state = request.planned_state;
        if let Err(e) = new_state.set_string(&AttributePath::new(field::ID), id.clone()) {
            diagnostics.push(Diagnostic::error(
                "Failed to store provider id",
                format!("State error: {}", e),
            ));
            return CreateResourceResponse {
                new_state,
                private: vec![],
                diagnostics,
            };
        }

        match client.sms().get(&id).await {
            Ok(response) => {
                if let Err(e) = Self::populate_state(&mut new_state, &response.config) {
                    diagnostics.push(Diagnostic::error(
                        "Failed to write provider state",
                        format!("State error: {}", e),
                    ));
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to read back created SMS provider",
                    format!("API error: {}", e),
                ));
            }
        }

        CreateResourceResponse {
            new_state,
            private: vec![],
            diagnostics,
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let id = match request.current_state.get_string(&AttributePath::new(field::ID)) {
            Ok(id) => id,
            Err(_) => {
                return ReadResourceResponse {
                    new_state: None,
                    private: request.private,
                    diagnostics,
                };
            }
        };

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    private: request.private,
                    diagnostics,
                };
            }
        };

        match client.sms().get(&id).await {
            Ok(response) => {
                let mut new_state = request.current_state.clone();
                if let Err(e) = Self::populate_state(&mut new_state, &response.config) {
                    diagnostics.push(Diagnostic::error(
                        "Failed to write provider state",
                        format!("State error: {}", e),
                    ));
                    return ReadResourceResponse {
                        new_state: Some(request.current_state),
                        private: request.private,
                        diagnostics,
                    };
                }
                ReadResourceResponse {
                    new_state: Some(new_state),
                    private: request.private,
                    diagnostics,
                }
            }
            Err(e) if e.is_not_found() => ReadResourceResponse {
                new_state: None,
                private: request.private,
                diagnostics,
            },
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to read SMS provider",
                    format!("API error: {}", e),
                ));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    private: request.private,
                    diagnostics,
                }
            }
        }
    }

    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        let mut diagnostics = vec![];

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let prior = SmsProviderHttpModel::from_value(&request.prior_state);
        let planned = SmsProviderHttpModel::from_value(&request.planned_state);

        let id = match &prior.id {
            Some(id) => id.clone(),
            None => {
                diagnostics.push(Diagnostic::error(
                    "Missing provider id",
                    "Cannot update an SMS provider without an id in state",
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        // One call covers both fields; skip it when nothing changed.
        if planned.endpoint != prior.endpoint || planned.description != prior.description {
            let config = match planned.to_config() {
                Ok(config) => config,
                Err(diag) => {
                    diagnostics.push(diag);
                    return UpdateResourceResponse {
                        new_state: request.prior_state,
                        private: vec![],
                        diagnostics,
                    };
                }
            };
            if let Err(e) = client.sms().update_http(&id, &config).await {
                diagnostics.push(Diagnostic::error(
                    "Failed to update SMS provider",
                    format!("API error: {}", e),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        }

        UpdateResourceResponse {
            new_state: request.planned_state,
            private: vec![],
            diagnostics,
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let model = SmsProviderHttpModel::from_value(&request.prior_state);
        let id = match &model.id {
            Some(id) => id.clone(),
            None => return DeleteResourceResponse { diagnostics },
        };

        if let Err(e) = client.sms().remove(&id).await {
            diagnostics.push(Diagnostic::error(
                "Failed to delete SMS provider",
                format!("API error: {}", e),
            ));
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithImportState for SmsProviderHttpResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(&ctx, AttributePath::new(field::ID), &request, &mut response);
        response
    }
}

#[async_trait]
impl ResourceWithConfigure for SmsProviderHttpResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];

        if let Some(data) = request.provider_data {
            if let Some(provider_data) = data.downcast_ref::<crate::ZitadelProviderData>() {
                self.provider_data = Some(provider_data.clone());
            } else {
                diagnostics.push(Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract ZitadelProviderData from provider data",
                ));
            }
        } else {
            diagnostics.push(Diagnostic::error(
                "No provider data",
                "No provider data was provided to the resource",
            ));
        }

        ConfigureResourceResponse { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server, ServerGuard};
    use std::sync::Arc;

    fn test_resource(server: &ServerGuard) -> SmsProviderHttpResource {
        SmsProviderHttpResource {
            provider_data: Some(crate::ZitadelProviderData {
                client: Arc::new(create_test_client(&server.url())),
            }),
        }
    }

    fn base_state() -> DynamicValue {
        let mut state = DynamicValue::empty_object();
        state
            .set_string(
                &AttributePath::new(field::ENDPOINT),
                "https://relay.example.com/sms".to_string(),
            )
            .unwrap();
        state
            .set_string(&AttributePath::new(field::DESCRIPTION), "relay".to_string())
            .unwrap();
        state
    }

    #[tokio::test]
    async fn create_posts_config_and_reads_back() {
        let mut server = Server::new_async().await;
        let add_mock = server
            .mock("POST", "/admin/v1/sms/http")
            .match_body(Matcher::Json(serde_json::json!({
                "endpoint": "https://relay.example.com/sms",
                "description": "relay"
            })))
            .with_body(r#"{"id":"235868803"}"#)
            .create_async()
            .await;
        let get_mock = server
            .mock("GET", "/admin/v1/sms/235868803")
            .with_body(
                r#"{"config":{
                    "id":"235868803",
                    "description":"relay",
                    "http":{"endpoint":"https://relay.example.com/sms"}
                }}"#,
            )
            .create_async()
            .await;

        let resource = test_resource(&server);
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "zitadel_sms_provider_http".to_string(),
                    planned_state: base_state(),
                    config: base_state(),
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(
            response
                .new_state
                .get_string(&AttributePath::new(field::ID))
                .unwrap(),
            "235868803"
        );

        add_mock.assert_async().await;
        get_mock.assert_async().await;
    }

    #[tokio::test]
    async fn read_not_found_clears_state() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/admin/v1/sms/235868803")
            .with_status(404)
            .with_body(r#"{"code":5,"message":"not found"}"#)
            .create_async()
            .await;

        let mut current = base_state();
        current
            .set_string(&AttributePath::new(field::ID), "235868803".to_string())
            .unwrap();

        let resource = test_resource(&server);
        let response = resource
            .read(
                Context::new(),
                ReadResourceRequest {
                    type_name: "zitadel_sms_provider_http".to_string(),
                    current_state: current,
                    private: vec![],
                },
            )
            .await;

        assert!(response.new_state.is_none());
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn update_skips_call_when_unchanged() {
        let mut server = Server::new_async().await;
        let update_mock = server
            .mock("PUT", "/admin/v1/sms/http/235868803")
            .expect(0)
            .create_async()
            .await;

        let mut prior = base_state();
        prior
            .set_string(&AttributePath::new(field::ID), "235868803".to_string())
            .unwrap();

        let resource = test_resource(&server);
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "zitadel_sms_provider_http".to_string(),
                    prior_state: prior.clone(),
                    planned_state: prior.clone(),
                    config: prior,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        update_mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_sends_single_call_when_endpoint_changed() {
        let mut server = Server::new_async().await;
        let update_mock = server
            .mock("PUT", "/admin/v1/sms/http/235868803")
            .match_body(Matcher::Json(serde_json::json!({
                "endpoint": "https://new.example.com/sms",
                "description": "relay"
            })))
            .with_body(r#"{"details":{}}"#)
            .create_async()
            .await;

        let mut prior = base_state();
        prior
            .set_string(&AttributePath::new(field::ID), "235868803".to_string())
            .unwrap();
        let mut planned = prior.clone();
        planned
            .set_string(
                &AttributePath::new(field::ENDPOINT),
                "https://new.example.com/sms".to_string(),
            )
            .unwrap();

        let resource = test_resource(&server);
        let response = resource
            .update(
                Context::new(),
                UpdateResourceRequest {
                    type_name: "zitadel_sms_provider_http".to_string(),
                    prior_state: prior,
                    planned_state: planned.clone(),
                    config: planned,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        update_mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_removes_by_id() {
        let mut server = Server::new_async().await;
        let delete_mock = server
            .mock("DELETE", "/admin/v1/sms/235868803")
            .with_body(r#"{"details":{}}"#)
            .create_async()
            .await;

        let mut prior = base_state();
        prior
            .set_string(&AttributePath::new(field::ID), "235868803".to_string())
            .unwrap();

        let resource = test_resource(&server);
        let response = resource
            .delete(
                Context::new(),
                DeleteResourceRequest {
                    type_name: "zitadel_sms_provider_http".to_string(),
                    prior_state: prior,
                    planned_private: vec![],
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        delete_mock.assert_async().await;
    }

    #[tokio::test]
    async fn import_is_id_passthrough() {
        let resource = SmsProviderHttpResource::new();
        let response = resource
            .import_state(
                Context::new(),
                ImportResourceStateRequest {
                    type_name: "zitadel_sms_provider_http".to_string(),
                    id: "235868803".to_string(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        assert_eq!(
            response.imported_resources[0]
                .state
                .get_string(&AttributePath::new(field::ID))
                .unwrap(),
            "235868803"
        );
    }
}
