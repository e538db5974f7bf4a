use std::sync::Arc;

use tracing::Level;

use ims_core::{AppConfig, DemoAuthenticator, RestClient, targets};
use ims_ui::{Flags, LogStore, UiResult, init_logging, run};

fn main() -> UiResult {
    let config_path = AppConfig::resolve_path();
    let (config, config_error) = match AppConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    let log_store = LogStore::new(config.log_capacity);
    let reload_handle = init_logging(log_store.clone(), config.log_level);

    tracing::info!(
        target: targets::UI,
        config = %config_path.display(),
        base_url = %config.base_url,
        "Inventory client starting"
    );
    if let Some(err) = config_error {
        tracing::warn!(
            target: targets::CONFIG,
            error = %err.technical_detail(),
            "Falling back to default settings"
        );
    }
    tracing::event!(target: targets::UI, Level::DEBUG, "Logging infrastructure online");

    let client = match RestClient::new(&config.client_config()) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(target: targets::HTTP, error = %err, "HTTP client could not be built");
            std::process::exit(1);
        }
    };
    let authenticator = Arc::new(DemoAuthenticator::new(config.demo_users.clone()));

    run(Flags {
        log_store,
        reload_handle,
        config,
        config_path,
        client,
        authenticator,
    })
}
