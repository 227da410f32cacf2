//! Resource implementations

pub mod human_user;
pub mod sms_provider_http;

pub use human_user::HumanUserResource;
pub use sms_provider_http::SmsProviderHttpResource;
