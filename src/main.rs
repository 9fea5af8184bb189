use std::sync::Arc;

use tracing::info;

use msgdrop::captcha::{CaptchaVerifier, RecaptchaVerifier, StaticVerifier};
use msgdrop::{Config, JsonStore, MemoryStore, MsgdropError, SharedStore, WebServer};

#[tokio::main]
async fn main() -> msgdrop::Result<()> {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    msgdrop::logging::init(&config.logging);

    info!("msgdrop - single-slot message drop service");

    let store: SharedStore = match config.store.backend.as_str() {
        "memory" => Arc::new(MemoryStore::new()),
        "json" => Arc::new(JsonStore::open(&config.store.path)?),
        other => {
            return Err(MsgdropError::Config(format!(
                "unknown store backend '{other}'"
            )))
        }
    };
    info!(backend = %config.store.backend, "store opened");

    let verifier: Arc<dyn CaptchaVerifier> = if config.captcha.enabled {
        Arc::new(RecaptchaVerifier::new(
            &config.captcha.verify_url,
            &config.captcha.secret_key,
        ))
    } else {
        // Remote verification disabled: any non-empty token passes the gate
        Arc::new(StaticVerifier(true))
    };

    WebServer::new(&config, store, verifier)?.run().await
}
