//! User management endpoints (management API)
//!
//! Wire shapes follow the REST gateway of the management service: camelCase
//! field names, sub-objects for profile/email/phone, string identifiers.

use serde::{Deserialize, Serialize};

use super::{ChangeResponse, Client, ObjectDetails};
use crate::api::ApiError;

/// Profile sub-object, shared between the import request, the profile
/// update request and the read response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanEmail {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_email_verified: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanPhone {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_phone_verified: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedPassword {
    pub value: String,
}

/// Request body for POST /management/v1/users/human/_import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportHumanUserRequest {
    pub user_name: String,
    pub profile: HumanProfile,
    pub email: HumanEmail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<HumanPhone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashed_password: Option<HashedPassword>,
    pub password_change_required: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportHumanUserResponse {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GetUserResponse {
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub details: Option<ObjectDetails>,
    /// Symbolic state name, e.g. "USER_STATE_ACTIVE".
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub login_names: Vec<String>,
    #[serde(default)]
    pub preferred_login_name: Option<String>,
    #[serde(default)]
    pub human: Option<HumanUser>,
}

#[derive(Debug, Deserialize)]
pub struct HumanUser {
    #[serde(default)]
    pub profile: Option<HumanProfile>,
    #[serde(default)]
    pub email: Option<HumanEmail>,
    #[serde(default)]
    pub phone: Option<HumanPhone>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserNameRequest<'a> {
    user_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateHumanEmailRequest<'a> {
    email: &'a str,
    is_email_verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateHumanPhoneRequest<'a> {
    phone: &'a str,
    is_phone_verified: bool,
}

/// User operations. Every call takes the organization context explicitly.
pub struct UsersApi<'a> {
    client: &'a Client,
}

impl<'a> UsersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// POST /management/v1/users/human/_import
    pub async fn import_human(
        &self,
        org: Option<&str>,
        request: &ImportHumanUserRequest,
    ) -> Result<ImportHumanUserResponse, ApiError> {
        self.client
            .post("/management/v1/users/human/_import", org, request)
            .await
    }

    /// GET /management/v1/users/{id}
    pub async fn get_by_id(
        &self,
        org: Option<&str>,
        user_id: &str,
    ) -> Result<GetUserResponse, ApiError> {
        self.client
            .get(&format!("/management/v1/users/{}", user_id), org)
            .await
    }

    /// PUT /management/v1/users/{id}/username
    pub async fn update_user_name(
        &self,
        org: Option<&str>,
        user_id: &str,
        user_name: &str,
    ) -> Result<(), ApiError> {
        self.client
            .put::<ChangeResponse, _>(
                &format!("/management/v1/users/{}/username", user_id),
                org,
                &UpdateUserNameRequest { user_name },
            )
            .await
            .map(|_| ())
    }

    /// PUT /management/v1/users/human/{id}/profile
    pub async fn update_profile(
        &self,
        org: Option<&str>,
        user_id: &str,
        profile: &HumanProfile,
    ) -> Result<(), ApiError> {
        self.client
            .put::<ChangeResponse, _>(
                &format!("/management/v1/users/human/{}/profile", user_id),
                org,
                profile,
            )
            .await
            .map(|_| ())
    }

    /// PUT /management/v1/users/human/{id}/email
    pub async fn update_email(
        &self,
        org: Option<&str>,
        user_id: &str,
        email: &str,
        is_email_verified: bool,
    ) -> Result<(), ApiError> {
        self.client
            .put::<ChangeResponse, _>(
                &format!("/management/v1/users/human/{}/email", user_id),
                org,
                &UpdateHumanEmailRequest {
                    email,
                    is_email_verified,
                },
            )
            .await
            .map(|_| ())
    }

    /// PUT /management/v1/users/human/{id}/phone
    pub async fn update_phone(
        &self,
        org: Option<&str>,
        user_id: &str,
        phone: &str,
        is_phone_verified: bool,
    ) -> Result<(), ApiError> {
        self.client
            .put::<ChangeResponse, _>(
                &format!("/management/v1/users/human/{}/phone", user_id),
                org,
                &UpdateHumanPhoneRequest {
                    phone,
                    is_phone_verified,
                },
            )
            .await
            .map(|_| ())
    }

    /// DELETE /management/v1/users/human/{id}/phone
    pub async fn remove_phone(&self, org: Option<&str>, user_id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<ChangeResponse>(
                &format!("/management/v1/users/human/{}/phone", user_id),
                org,
            )
            .await
            .map(|_| ())
    }

    /// DELETE /management/v1/users/{id}
    pub async fn remove(&self, org: Option<&str>, user_id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<ChangeResponse>(&format!("/management/v1/users/{}", user_id), org)
            .await
            .map(|_| ())
    }
}
