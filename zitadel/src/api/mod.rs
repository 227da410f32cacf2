//! Typed client for ZITADEL's management and admin REST APIs

pub mod client;
pub mod error;
pub mod sms;
pub mod users;

#[cfg(test)]
pub mod test_helpers;

pub use client::Client;
pub use error::ApiError;

use serde::Deserialize;

/// Change metadata returned by most write endpoints. Carried for parsing
/// completeness; handlers do not act on it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDetails {
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub change_date: Option<String>,
    #[serde(default)]
    pub resource_owner: Option<String>,
}

/// Generic envelope for write endpoints whose payload is only change
/// metadata.
#[derive(Debug, Default, Deserialize)]
pub struct ChangeResponse {
    #[serde(default)]
    pub details: Option<ObjectDetails>,
}
