//! Shared data handed from the provider to resources and data sources

use crate::api::Client;
use std::sync::Arc;

/// Produced once by provider `configure` and injected into every resource
/// and data source via downcast.
#[derive(Clone)]
pub struct ZitadelProviderData {
    pub client: Arc<Client>,
}
