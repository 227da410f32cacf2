//! Human user resource
//!
//! Manages a human user in a ZITADEL organization. Create imports the user
//! in one call and reads back server-computed fields; update sends only the
//! field groups that changed; read reconciles remote state and treats
//! not-found as deletion.

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::plan_modifier::{PlanModifier, PlanModifyRequest, StaticDefaultWhenEmpty, UseStateForUnknown};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource, ModifyPlanRequest,
    ModifyPlanResponse, ReadResourceRequest, ReadResourceResponse, Resource,
    ResourceMetadataRequest, ResourceMetadataResponse, ResourceSchemaRequest,
    ResourceSchemaResponse, ResourceWithConfigure, ResourceWithImportState,
    ResourceWithModifyPlan, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};
use tfplug::validator::{OneOfValidator, StringLengthValidator, Validator};

use crate::api::users::{HashedPassword, HumanEmail, HumanPhone, HumanProfile, ImportHumanUserRequest, User};

/// Attribute names, used for schema and path construction only.
pub(crate) mod field {
    pub const ID: &str = "id";
    pub const ORG_ID: &str = "org_id";
    pub const USER_STATE: &str = "state";
    pub const USER_NAME: &str = "user_name";
    pub const LOGIN_NAMES: &str = "login_names";
    pub const PREFERRED_LOGIN_NAME: &str = "preferred_login_name";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const NICK_NAME: &str = "nick_name";
    pub const DISPLAY_NAME: &str = "display_name";
    pub const PREFERRED_LANGUAGE: &str = "preferred_language";
    pub const GENDER: &str = "gender";
    pub const EMAIL: &str = "email";
    pub const IS_EMAIL_VERIFIED: &str = "is_email_verified";
    pub const PHONE: &str = "phone";
    pub const IS_PHONE_VERIFIED: &str = "is_phone_verified";
    pub const INITIAL_PASSWORD: &str = "initial_password";
    pub const INITIAL_HASHED_PASSWORD: &str = "initial_hashed_password";
    pub const INITIAL_SKIP_PASSWORD_CHANGE: &str = "initial_skip_password_change";
}

pub const GENDERS: [&str; 4] = [
    "GENDER_UNSPECIFIED",
    "GENDER_FEMALE",
    "GENDER_MALE",
    "GENDER_DIVERSE",
];

pub const DEFAULT_GENDER: &str = "GENDER_UNSPECIFIED";
pub const DEFAULT_PREFERRED_LANGUAGE: &str = "und";

/// Attributes the remote API only accepts at creation time. Once an id
/// exists, the prior value overrides whatever the plan proposes.
const IMMUTABLE_AFTER_CREATE: [&str; 3] = [
    field::INITIAL_PASSWORD,
    field::INITIAL_HASHED_PASSWORD,
    field::INITIAL_SKIP_PASSWORD_CHANGE,
];

/// Computed attributes that keep their state value while planning.
const COMPUTED_FIELDS: [&str; 4] = [
    field::ID,
    field::USER_STATE,
    field::LOGIN_NAMES,
    field::PREFERRED_LOGIN_NAME,
];

/// Typed extraction of the resource's `DynamicValue`, done once at the
/// handler boundary.
#[derive(Debug, Clone, Default, PartialEq)]
struct HumanUserModel {
    id: Option<String>,
    org_id: Option<String>,
    user_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    nick_name: Option<String>,
    display_name: Option<String>,
    preferred_language: Option<String>,
    gender: Option<String>,
    email: Option<String>,
    is_email_verified: Option<bool>,
    phone: Option<String>,
    is_phone_verified: Option<bool>,
    initial_password: Option<String>,
    initial_hashed_password: Option<String>,
    initial_skip_password_change: Option<bool>,
}

impl HumanUserModel {
    fn from_value(value: &DynamicValue) -> Self {
        let s = |name: &str| value.get_string(&AttributePath::new(name)).ok();
        let b = |name: &str| value.get_bool(&AttributePath::new(name)).ok();

        Self {
            id: s(field::ID),
            org_id: s(field::ORG_ID),
            user_name: s(field::USER_NAME),
            first_name: s(field::FIRST_NAME),
            last_name: s(field::LAST_NAME),
            nick_name: s(field::NICK_NAME),
            display_name: s(field::DISPLAY_NAME),
            preferred_language: s(field::PREFERRED_LANGUAGE),
            gender: s(field::GENDER),
            email: s(field::EMAIL),
            is_email_verified: b(field::IS_EMAIL_VERIFIED),
            phone: s(field::PHONE),
            is_phone_verified: b(field::IS_PHONE_VERIFIED),
            initial_password: s(field::INITIAL_PASSWORD),
            initial_hashed_password: s(field::INITIAL_HASHED_PASSWORD),
            initial_skip_password_change: b(field::INITIAL_SKIP_PASSWORD_CHANGE),
        }
    }

    fn org(&self) -> Option<&str> {
        self.org_id.as_deref()
    }

    fn profile_fields(&self) -> (&Option<String>, &Option<String>, &Option<String>, &Option<String>, &Option<String>, &Option<String>) {
        (
            &self.first_name,
            &self.last_name,
            &self.nick_name,
            &self.display_name,
            &self.preferred_language,
            &self.gender,
        )
    }
}

#[derive(Default)]
pub struct HumanUserResource {
    provider_data: Option<crate::ZitadelProviderData>,
}

impl HumanUserResource {
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

    fn build_import_request(model: &HumanUserModel) -> Result<ImportHumanUserRequest, Diagnostic> {
        let missing = |name: &str| {
            Diagnostic::error(
                format!("Missing {}", name),
                format!("The '{}' attribute is required", name),
            )
            .with_attribute(AttributePath::new(name))
        };

        let user_name = model
            .user_name
            .clone()
            .ok_or_else(|| missing(field::USER_NAME))?;
        let first_name = model
            .first_name
            .clone()
            .ok_or_else(|| missing(field::FIRST_NAME))?;
        let last_name = model
            .last_name
            .clone()
            .ok_or_else(|| missing(field::LAST_NAME))?;
        let email = model.email.clone().ok_or_else(|| missing(field::EMAIL))?;

        // A supplied hashed password wins over the plaintext one.
        let (password, hashed_password) = match &model.initial_hashed_password {
            Some(hash) => (None, Some(HashedPassword { value: hash.clone() })),
            None => (model.initial_password.clone(), None),
        };

        Ok(ImportHumanUserRequest {
            user_name,
            profile: HumanProfile {
                first_name,
                last_name,
                nick_name: model.nick_name.clone(),
                display_name: model.display_name.clone(),
                preferred_language: model.preferred_language.clone(),
                gender: model.gender.clone(),
            },
            email: HumanEmail {
                email,
                is_email_verified: model.is_email_verified.unwrap_or(false),
            },
            phone: model.phone.as_ref().map(|phone| HumanPhone {
                phone: phone.clone(),
                is_phone_verified: model.is_phone_verified.unwrap_or(false),
            }),
            password,
            hashed_password,
            password_change_required: !model.initial_skip_password_change.unwrap_or(false),
        })
    }

}

/// Write the remote user into `state`. Any setter failure aborts the
/// remaining writes. Shared with the human user data source.
pub(crate) fn populate_user_state(state: &mut DynamicValue, user: &User) -> tfplug::Result<()> {
    if let Some(owner) = user
        .details
        .as_ref()
        .and_then(|d| d.resource_owner.clone())
    {
        state.set_string(&AttributePath::new(field::ORG_ID), owner)?;
    }
    if let Some(user_state) = &user.state {
        state.set_string(&AttributePath::new(field::USER_STATE), user_state.clone())?;
    }
    if let Some(user_name) = &user.user_name {
        state.set_string(&AttributePath::new(field::USER_NAME), user_name.clone())?;
    }
    state.set_string_list(
        &AttributePath::new(field::LOGIN_NAMES),
        user.login_names.clone(),
    )?;
    if let Some(preferred) = &user.preferred_login_name {
        state.set_string(
            &AttributePath::new(field::PREFERRED_LOGIN_NAME),
            preferred.clone(),
        )?;
    }

    if let Some(human) = &user.human {
        if let Some(profile) = &human.profile {
            state.set_string(
                &AttributePath::new(field::FIRST_NAME),
                profile.first_name.clone(),
            )?;
            state.set_string(
                &AttributePath::new(field::LAST_NAME),
                profile.last_name.clone(),
            )?;
            if let Some(nick) = &profile.nick_name {
                state.set_string(&AttributePath::new(field::NICK_NAME), nick.clone())?;
            }
            if let Some(display) = &profile.display_name {
                state.set_string(&AttributePath::new(field::DISPLAY_NAME), display.clone())?;
            }
            if let Some(lang) = &profile.preferred_language {
                state.set_string(
                    &AttributePath::new(field::PREFERRED_LANGUAGE),
                    lang.clone(),
                )?;
            }
            // The server reports GENDER_UNSPECIFIED as an empty string on
            // some gateway versions; only store non-empty values.
            if let Some(gender) = &profile.gender {
                if !gender.is_empty() {
                    state.set_string(&AttributePath::new(field::GENDER), gender.clone())?;
                }
            }
        }
        if let Some(email) = &human.email {
            state.set_string(&AttributePath::new(field::EMAIL), email.email.clone())?;
            state.set_bool(
                &AttributePath::new(field::IS_EMAIL_VERIFIED),
                email.is_email_verified,
            )?;
        }
        if let Some(phone) = &human.phone {
            if !phone.phone.is_empty() {
                state.set_string(&AttributePath::new(field::PHONE), phone.phone.clone())?;
                state.set_bool(
                    &AttributePath::new(field::IS_PHONE_VERIFIED),
                    phone.is_phone_verified,
                )?;
            }
        }
    }

    Ok(())
}

/// Resource state carries the creation-only skip flag, which has no
/// server-side representation and always reads back false.
fn populate_resource_state(state: &mut DynamicValue, user: &User) -> tfplug::Result<()> {
    populate_user_state(state, user)?;
    state.set_bool(&AttributePath::new(field::INITIAL_SKIP_PASSWORD_CHANGE), false)
}

#[async_trait]
impl Resource for HumanUserResource {
    fn type_name(&self) -> &str {
        "zitadel_human_user"
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
            .description("Manages a human user within a ZITADEL organization")
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
                    .required()
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
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::LAST_NAME, AttributeType::String)
                    .description("Last name of the user")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::NICK_NAME, AttributeType::String)
                    .description("Nickname of the user")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::DISPLAY_NAME, AttributeType::String)
                    .description("Display name, defaults to first and last name")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::PREFERRED_LANGUAGE, AttributeType::String)
                    .description("Preferred language as a BCP 47 tag, defaults to 'und'")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::GENDER, AttributeType::String)
                    .description("Gender of the user")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::EMAIL, AttributeType::String)
                    .description("Email address of the user")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::IS_EMAIL_VERIFIED, AttributeType::Bool)
                    .description("Whether the email address is verified")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::PHONE, AttributeType::String)
                    .description("Phone number of the user")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::IS_PHONE_VERIFIED, AttributeType::Bool)
                    .description("Whether the phone number is verified")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::INITIAL_PASSWORD, AttributeType::String)
                    .description("Initial password, only used at creation")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::INITIAL_HASHED_PASSWORD, AttributeType::String)
                    .description("Initial hashed password, takes precedence over initial_password")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(field::INITIAL_SKIP_PASSWORD_CHANGE, AttributeType::Bool)
                    .description("Skip the forced password change on first login")
                    .optional()
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
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = vec![];

        OneOfValidator::new(GENDERS).validate(
            &request.config.get_raw(&AttributePath::new(field::GENDER)),
            field::GENDER,
            &mut diagnostics,
        );

        StringLengthValidator {
            min: Some(1),
            max: Some(200),
        }
        .validate(
            &request.config.get_raw(&AttributePath::new(field::USER_NAME)),
            field::USER_NAME,
            &mut diagnostics,
        );

        ValidateResourceConfigResponse { diagnostics }
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

        let model = HumanUserModel::from_value(&request.planned_state);
        let import_request = match Self::build_import_request(&model) {
            Ok(import_request) => import_request,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let user_id = match client.users().import_human(model.org(), &import_request).await {
            Ok(response) => response.user_id,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to create user",
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
        if let Err(e) = new_state.set_string(&AttributePath::new(field::ID), user_id.clone()) {
            diagnostics.push(Diagnostic::error(
                "Failed to store user id",
                format!("State error: {}", e),
            ));
            return CreateResourceResponse {
                new_state,
                private: vec![],
                diagnostics,
            };
        }

        // Read back so server-computed fields land in state.
        match client.users().get_by_id(model.org(), &user_id).await {
            Ok(response) => {
                if let Err(e) = populate_resource_state(&mut new_state, &response.user) {
                    diagnostics.push(Diagnostic::error(
                        "Failed to write user state",
                        format!("State error: {}", e),
                    ));
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to read back created user",
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

        let user_id = match request.current_state.get_string(&AttributePath::new(field::ID)) {
            Ok(id) => id,
            Err(_) => {
                // No id in state, nothing to refresh.
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

        let model = HumanUserModel::from_value(&request.current_state);

        match client.users().get_by_id(model.org(), &user_id).await {
            Ok(response) => {
                let mut new_state = request.current_state.clone();
                if let Err(e) = populate_resource_state(&mut new_state, &response.user) {
                    diagnostics.push(Diagnostic::error(
                        "Failed to write user state",
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
                    "Failed to read user",
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

        let prior = HumanUserModel::from_value(&request.prior_state);
        let planned = HumanUserModel::from_value(&request.planned_state);

        let user_id = match &prior.id {
            Some(id) => id.clone(),
            None => {
                diagnostics.push(Diagnostic::error(
                    "Missing user id",
                    "Cannot update a user without an id in state",
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };
        let org = planned.org().or(prior.org());

        // Username group.
        if planned.user_name != prior.user_name {
            if let Some(user_name) = &planned.user_name {
                if let Err(e) = client.users().update_user_name(org, &user_id, user_name).await {
                    diagnostics.push(Diagnostic::error(
                        "Failed to update username",
                        format!("API error: {}", e),
                    ));
                    return UpdateResourceResponse {
                        new_state: request.prior_state,
                        private: vec![],
                        diagnostics,
                    };
                }
            }
        }

        // Profile group.
        if planned.profile_fields() != prior.profile_fields() {
            let profile = HumanProfile {
                first_name: planned.first_name.clone().unwrap_or_default(),
                last_name: planned.last_name.clone().unwrap_or_default(),
                nick_name: planned.nick_name.clone(),
                display_name: planned.display_name.clone(),
                preferred_language: planned.preferred_language.clone(),
                gender: planned.gender.clone(),
            };
            if let Err(e) = client.users().update_profile(org, &user_id, &profile).await {
                diagnostics.push(Diagnostic::error(
                    "Failed to update profile",
                    format!("API error: {}", e),
                ));
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        }

        // Email group.
        if planned.email != prior.email || planned.is_email_verified != prior.is_email_verified {
            if let Some(email) = &planned.email {
                if let Err(e) = client
                    .users()
                    .update_email(org, &user_id, email, planned.is_email_verified.unwrap_or(false))
                    .await
                {
                    diagnostics.push(Diagnostic::error(
                        "Failed to update email",
                        format!("API error: {}", e),
                    ));
                    return UpdateResourceResponse {
                        new_state: request.prior_state,
                        private: vec![],
                        diagnostics,
                    };
                }
            }
        }

        // Phone group. Clearing the phone from configuration removes it
        // remotely.
        if planned.phone != prior.phone || planned.is_phone_verified != prior.is_phone_verified {
            let result = match &planned.phone {
                Some(phone) => {
                    client
                        .users()
                        .update_phone(org, &user_id, phone, planned.is_phone_verified.unwrap_or(false))
                        .await
                }
                None if prior.phone.is_some() => client.users().remove_phone(org, &user_id).await,
                None => Ok(()),
            };
            if let Err(e) = result {
                diagnostics.push(Diagnostic::error(
                    "Failed to update phone",
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

        let model = HumanUserModel::from_value(&request.prior_state);
        let user_id = match &model.id {
            Some(id) => id.clone(),
            None => return DeleteResourceResponse { diagnostics },
        };

        if let Err(e) = client.users().remove(model.org(), &user_id).await {
            diagnostics.push(Diagnostic::error(
                "Failed to delete user",
                format!("API error: {}", e),
            ));
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithModifyPlan for HumanUserResource {
    async fn modify_plan(&self, _ctx: Context, request: ModifyPlanRequest) -> ModifyPlanResponse {
        let mut diagnostics = vec![];
        let mut planned_state = request.proposed_new_state.clone();

        // Destroy plan, nothing to customize.
        if planned_state.is_null() {
            return ModifyPlanResponse {
                planned_state,
                requires_replace: vec![],
                planned_private: request.prior_private,
                diagnostics,
            };
        }

        let planned = HumanUserModel::from_value(&planned_state);

        // Empty display name defaults to "<first> <last>".
        let display_empty = planned
            .display_name
            .as_deref()
            .map(|d| d.is_empty())
            .unwrap_or(true);
        if display_empty {
            if let (Some(first), Some(last)) = (&planned.first_name, &planned.last_name) {
                if let Err(e) = planned_state.set_string(
                    &AttributePath::new(field::DISPLAY_NAME),
                    format!("{} {}", first, last),
                ) {
                    diagnostics.push(Diagnostic::error(
                        "Failed to default display name",
                        format!("State error: {}", e),
                    ));
                }
            }
        }

        for (name, default) in [
            (field::GENDER, DEFAULT_GENDER),
            (field::PREFERRED_LANGUAGE, DEFAULT_PREFERRED_LANGUAGE),
        ] {
            let path = AttributePath::new(name);
            let response = StaticDefaultWhenEmpty::new(default).modify_plan(PlanModifyRequest {
                state: request.prior_state.get_raw(&path),
                plan: planned_state.get_raw(&path),
                config: request.config.get_raw(&path),
                attribute_path: name.to_string(),
            });
            if let Err(e) = planned_state.set_raw(&path, response.plan_value) {
                diagnostics.push(Diagnostic::error(
                    format!("Failed to default {}", name),
                    format!("State error: {}", e),
                ));
            }
        }

        // Once the user exists, creation-only attributes keep their prior
        // value regardless of what the configuration proposes.
        let exists = request
            .prior_state
            .get_string(&AttributePath::new(field::ID))
            .map(|id| !id.is_empty())
            .unwrap_or(false);
        if exists {
            for name in IMMUTABLE_AFTER_CREATE {
                let path = AttributePath::new(name);
                if let Err(e) = planned_state.set_raw(&path, request.prior_state.get_raw(&path)) {
                    diagnostics.push(Diagnostic::error(
                        format!("Failed to preserve {}", name),
                        format!("State error: {}", e),
                    ));
                }
            }
        }

        for name in COMPUTED_FIELDS {
            let path = AttributePath::new(name);
            let response = UseStateForUnknown.modify_plan(PlanModifyRequest {
                state: request.prior_state.get_raw(&path),
                plan: planned_state.get_raw(&path),
                config: request.config.get_raw(&path),
                attribute_path: name.to_string(),
            });
            if let Err(e) = planned_state.set_raw(&path, response.plan_value) {
                diagnostics.push(Diagnostic::error(
                    format!("Failed to plan {}", name),
                    format!("State error: {}", e),
                ));
            }
        }

        ModifyPlanResponse {
            planned_state,
            requires_replace: vec![],
            planned_private: request.prior_private,
            diagnostics,
        }
    }
}

#[async_trait]
impl ResourceWithImportState for HumanUserResource {
    /// Accepts `<id>`, `<id>:<org_id>` or `<id>:<org_id>:<initial_password>`.
    async fn import_state(
        &self,
        _ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut diagnostics = vec![];
        let mut parts = request.id.splitn(3, ':');

        let id = parts.next().unwrap_or_default();
        if id.is_empty() {
            diagnostics.push(Diagnostic::error(
                "Invalid import ID",
                "Expected '<id>', '<id>:<org_id>' or '<id>:<org_id>:<initial_password>'",
            ));
            return ImportResourceStateResponse {
                imported_resources: vec![],
                diagnostics,
            };
        }

        let mut state = DynamicValue::empty_object();
        let mut write = |name: &str, value: &str| {
            if let Err(e) = state.set_string(&AttributePath::new(name), value.to_string()) {
                diagnostics.push(Diagnostic::error(
                    "Failed to seed imported state",
                    format!("State error: {}", e),
                ));
            }
        };

        write(field::ID, id);
        if let Some(org_id) = parts.next().filter(|p| !p.is_empty()) {
            write(field::ORG_ID, org_id);
        }
        if let Some(password) = parts.next().filter(|p| !p.is_empty()) {
            write(field::INITIAL_PASSWORD, password);
        }

        ImportResourceStateResponse {
            imported_resources: vec![ImportedResource {
                type_name: request.type_name,
                state,
                private: vec![],
            }],
            diagnostics,
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for HumanUserResource {
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
