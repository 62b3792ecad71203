//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use conformidade_backend::{
    config::{AppConfig, AppState},
    routes::build_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conformidade_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // Conecta, migra e semeia o admin; se falhar, a aplicação não sobe.
    let app_state = AppState::new(config).await?;

    let app = build_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
