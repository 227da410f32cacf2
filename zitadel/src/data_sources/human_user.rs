//! Human user data source
//!
//! Looks up an existing human user by id and exposes the same attributes
//! the resource manages, minus the creation-only password fields.

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource,
    DataSourceMetadataRequest, DataSourceMetadataResponse, DataSourceSchemaRequest,
    DataSourceSchemaResponse, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse, ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

use crate::resources::human_user::{field, populate_user_state};

/// The id attribute the user supplies, as opposed to the computed `id`.
const USER_ID: &str = "user_id";

#[derive(Default)]
pub struct HumanUserDataSource {
    provider_data: Option<crate::ZitadelProviderData>,
}

impl HumanUserDataSource {
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
}

#[async_trait]
impl DataSource for HumanUserDataSource {
    fn type_name(&self) -> &str {
        "zitadel_human_user"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Looks up a human user within a ZITADEL organization")
            .attribute(
                AttributeBuilder::new(USER_ID, AttributeType::String)
                    .description("Identifier of the user to look up")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::ID, AttributeType::String)
                    .description("Server-assigned user identifier")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::ORG_ID, AttributeType::String)
                    .description("Organization the user belongs to")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::USER_STATE, AttributeType::String)
                    .description("Current state of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::USER_NAME, AttributeType::String)
                    .description("Username used for login")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    field::LOGIN_NAMES,
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .description("All login names of the user")
                .computed()
                .build(),
            )
            .attribute(
                AttributeBuilder::new(field::PREFERRED_LOGIN_NAME, AttributeType::String)
                    .description("Preferred login name of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::FIRST_NAME, AttributeType::String)
                    .description("First name of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::LAST_NAME, AttributeType::String)
                    .description("Last name of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::NICK_NAME, AttributeType::String)
                    .description("Nickname of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::DISPLAY_NAME, AttributeType::String)
                    .description("Display name of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::PREFERRED_LANGUAGE, AttributeType::String)
                    .description("Preferred language as a BCP 47 tag")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::GENDER, AttributeType::String)
                    .description("Gender of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::EMAIL, AttributeType::String)
                    .description("Email address of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::IS_EMAIL_VERIFIED, AttributeType::Bool)
                    .description("Whether the email address is verified")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::PHONE, AttributeType::String)
                    .description("Phone number of the user")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::IS_PHONE_VERIFIED, AttributeType::Bool)
                    .description("Whether the phone number is verified")
                    .computed()
                    .build(),
            )
            .build();

        DataSourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        _request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse {
            diagnostics: vec![],
        }
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let mut diagnostics = vec![];

        let client = match self.client() {
            Ok(client) => client,
            Err(diag) => {
                return ReadDataSourceResponse {
                    state: request.config,
                    diagnostics: vec![diag],
                }
            }
        };

        let user_id = match request.config.get_string(&AttributePath::new(USER_ID)) {
            Ok(id) => id,
            Err(_) => {
                return ReadDataSourceResponse {
                    state: request.config,
                    diagnostics: vec![Diagnostic::error(
                        "Missing user_id",
                        "The 'user_id' attribute is required",
                    )
                    .with_attribute(AttributePath::new(USER_ID))],
                }
            }
        };
        let org_id = request
            .config
            .get_string(&AttributePath::new(field::ORG_ID))
            .ok();

        let response = match client.users().get_by_id(org_id.as_deref(), &user_id).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                return ReadDataSourceResponse {
                    state: request.config,
                    diagnostics: vec![Diagnostic::error(
                        "User not found",
                        format!("No user with id '{}' exists", user_id),
                    )],
                }
            }
            Err(e) => {
                return ReadDataSourceResponse {
                    state: request.config,
                    diagnostics: vec![Diagnostic::error(
                        "Failed to read user",
                        format!("API error: {}", e),
                    )],
                }
            }
        };

        let mut state = request.config.clone();
        let populated = state
            .set_string(&AttributePath::new(field::ID), response.user.id.clone())
            .and_then(|_| populate_user_state(&mut state, &response.user));
        if let Err(e) = populated {
            diagnostics.push(Diagnostic::error(
                "Failed to write user state",
                format!("State error: {}", e),
            ));
            return ReadDataSourceResponse {
                state: request.config,
                diagnostics,
            };
        }

        ReadDataSourceResponse { state, diagnostics }
    }
}

#[async_trait]
impl DataSourceWithConfigure for HumanUserDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
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
                "No provider data was provided to the data source",
            ));
        }

        ConfigureDataSourceResponse { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Server, ServerGuard};
    use std::sync::Arc;

    fn test_data_source(server: &ServerGuard) -> HumanUserDataSource {
        HumanUserDataSource {
            provider_data: Some(crate::ZitadelProviderData {
                client: Arc::new(create_test_client(&server.url())),
            }),
        }
    }

    fn config_with_user_id() -> DynamicValue {
        let mut config = DynamicValue::empty_object();
        config
            .set_string(&AttributePath::new(USER_ID), "48328948984".to_string())
            .unwrap();
        config
    }

    #[tokio::test]
    async fn read_populates_all_computed_fields() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/management/v1/users/48328948984")
            .with_body(
                r#"{"user":{
                    "id":"48328948984",
                    "details":{"resourceOwner":"1234500001"},
                    "state":"USER_STATE_ACTIVE",
                    "userName":"minnie-mouse",
                    "loginNames":["minnie-mouse@demo.zitadel.cloud","minnie-mouse@alt.zitadel.cloud"],
                    "preferredLoginName":"minnie-mouse@demo.zitadel.cloud",
                    "human":{
                        "profile":{
                            "firstName":"Minnie",
                            "lastName":"Mouse",
                            "displayName":"Minnie Mouse",
                            "preferredLanguage":"en",
                            "gender":"GENDER_FEMALE"
                        },
                        "email":{"email":"minnie@zitadel.com","isEmailVerified":true},
                        "phone":{"phone":"+41791234567","isPhoneVerified":false}
                    }
                }}"#,
            )
            .create_async()
            .await;

        let data_source = test_data_source(&server);
        let response = data_source
            .read(
                Context::new(),
                ReadDataSourceRequest {
                    type_name: "zitadel_human_user".to_string(),
                    config: config_with_user_id(),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        let state = response.state;
        assert_eq!(
            state.get_string(&AttributePath::new(field::ID)).unwrap(),
            "48328948984"
        );
        assert_eq!(
            state
                .get_string(&AttributePath::new(field::ORG_ID))
                .unwrap(),
            "1234500001"
        );
        assert_eq!(
            state
                .get_string(&AttributePath::new(field::USER_NAME))
                .unwrap(),
            "minnie-mouse"
        );
        assert_eq!(
            state
                .get_string_list(&AttributePath::new(field::LOGIN_NAMES))
                .unwrap(),
            vec![
                "minnie-mouse@demo.zitadel.cloud",
                "minnie-mouse@alt.zitadel.cloud"
            ]
        );
        assert_eq!(
            state
                .get_string(&AttributePath::new(field::DISPLAY_NAME))
                .unwrap(),
            "Minnie Mouse"
        );
        assert_eq!(
            state.get_string(&AttributePath::new(field::GENDER)).unwrap(),
            "GENDER_FEMALE"
        );
        assert!(state
            .get_bool(&AttributePath::new(field::IS_EMAIL_VERIFIED))
            .unwrap());
        assert_eq!(
            state.get_string(&AttributePath::new(field::PHONE)).unwrap(),
            "+41791234567"
        );
    }

    #[tokio::test]
    async fn read_sends_org_header_when_org_id_set() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/management/v1/users/48328948984")
            .match_header("x-zitadel-orgid", "1234500001")
            .with_body(
                r#"{"user":{"id":"48328948984","userName":"minnie-mouse","human":{}}}"#,
            )
            .create_async()
            .await;

        let mut config = config_with_user_id();
        config
            .set_string(&AttributePath::new(field::ORG_ID), "1234500001".to_string())
            .unwrap();

        let data_source = test_data_source(&server);
        let response = data_source
            .read(
                Context::new(),
                ReadDataSourceRequest {
                    type_name: "zitadel_human_user".to_string(),
                    config,
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn read_missing_user_reports_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/management/v1/users/48328948984")
            .with_status(404)
            .with_body(r#"{"message":"User not found"}"#)
            .create_async()
            .await;

        let data_source = test_data_source(&server);
        let response = data_source
            .read(
                Context::new(),
                ReadDataSourceRequest {
                    type_name: "zitadel_human_user".to_string(),
                    config: config_with_user_id(),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0].summary.contains("not found"));
    }

    #[tokio::test]
    async fn read_without_user_id_reports_missing_attribute() {
        let server = Server::new_async().await;
        let data_source = test_data_source(&server);

        let response = data_source
            .read(
                Context::new(),
                ReadDataSourceRequest {
                    type_name: "zitadel_human_user".to_string(),
                    config: DynamicValue::empty_object(),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Missing user_id");
    }

    #[tokio::test]
    async fn read_without_provider_data_reports_unconfigured() {
        let data_source = HumanUserDataSource::new();
        let response = data_source
            .read(
                Context::new(),
                ReadDataSourceRequest {
                    type_name: "zitadel_human_user".to_string(),
                    config: config_with_user_id(),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Provider not configured");
    }

    #[tokio::test]
    async fn schema_marks_user_id_required_and_rest_computed() {
        let data_source = HumanUserDataSource::new();
        let response = data_source
            .schema(Context::new(), DataSourceSchemaRequest)
            .await;

        let user_id = response.schema.attribute(USER_ID).unwrap();
        assert!(user_id.required);
        let email = response.schema.attribute(field::EMAIL).unwrap();
        assert!(email.computed);
        assert!(!email.required);
    }
}
