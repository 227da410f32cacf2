//! Test helpers for the ZITADEL API client

use std::sync::Once;

static INIT: Once = Once::new();

pub fn create_test_client(url: &str) -> super::Client {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });

    super::Client::new(url, "test-access-token", false).unwrap()
}
