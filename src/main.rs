//! Paymob gateway service entry point.

use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use paymob_gateway::adapters::http::{payment_router, PaymentAppState};
use paymob_gateway::adapters::paymob::{PaymobClient, PaymobClientConfig, PaymobUrls};
use paymob_gateway::adapters::{
    HookRegistry, PostgresCredentialStore, PostgresIntegrationRequestRepository,
};
use paymob_gateway::application::{
    PaymentUrlSettings, SuccessNotifier, UpdateCredentialsCommand, UpdateCredentialsHandler,
};
use paymob_gateway::config::AppConfig;
use paymob_gateway::ports::CredentialStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;

    init_tracing(&config);

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("connecting to PostgreSQL")?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
    }

    let credential_store: Arc<dyn CredentialStore> =
        Arc::new(PostgresCredentialStore::new(pool.clone()));
    let repository = Arc::new(PostgresIntegrationRequestRepository::new(pool));

    if let Some(seed) = config.paymob.credential_seed() {
        let result = UpdateCredentialsHandler::new(credential_store.clone())
            .handle(UpdateCredentialsCommand { update: seed })
            .await
            .context("seeding Paymob credentials")?;
        info!(message = %result.message, "Paymob credentials seeded from environment");
    }

    let urls = PaymobUrls::new(&config.paymob.api_base_url);
    let gateway = Arc::new(
        PaymobClient::new(
            PaymobClientConfig::new(urls.clone()).with_timeout(config.paymob.request_timeout()),
        )
        .context("building Paymob client")?,
    );

    let hook = Arc::new(HookRegistry::new());
    let state = PaymentAppState::new(
        repository,
        credential_store,
        gateway,
        hook.clone(),
        config.paymob.token_policy(),
        PaymentUrlSettings {
            iframe_base_url: urls.iframe_base_url(),
            key_expiration_secs: config.paymob.payment_key_expiration_secs,
            default_currency: config.paymob.default_currency.clone(),
        },
    )
    .with_notifier(SuccessNotifier::new(hook).with_timeout(config.paymob.hook_timeout()));

    let app = payment_router(
        Arc::new(config.admin.api_key.clone()),
        config.server.request_timeout(),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, api_base_url = %urls.base_url(), "Paymob gateway listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
