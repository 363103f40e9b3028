use std::time::Duration;

use color_eyre::eyre::Result;
use gatehouse_adapters::{InMemoryUserStore, PostmarkNotifier, Settings};
use gatehouse_axum::AppState;
use gatehouse_service::GatehouseService;
use reqwest::Client as HttpClient;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    init_tracing()?;

    let settings = Settings::load()?;
    let address = settings.app.address.clone();
    let allowed_origins = settings.app.allowed_origins.clone();

    let http_client = HttpClient::builder()
        .timeout(Duration::from_millis(settings.email.timeout_millis))
        .build()?;

    let notifier = PostmarkNotifier::new(
        settings.email.base_url.clone(),
        settings.email.sender.clone(),
        settings.email.auth_token.clone(),
        http_client,
    );

    let user_store = InMemoryUserStore::new();

    let state = AppState::new(user_store, notifier, settings);
    let service = GatehouseService::new(state);

    let allowed_origins = (!allowed_origins.is_empty()).then_some(allowed_origins);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    service.run(listener, allowed_origins).await?;

    Ok(())
}

fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
