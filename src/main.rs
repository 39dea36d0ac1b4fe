use forensic_console::{
    app, apply_forensic_schema, ensure_database_exists, ensure_users_table, AppState, Registry, Settings, UserStore,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("forensic_console=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    if settings.uses_default_secret() {
        tracing::warn!("SESSION_SECRET is not set; sessions are signed with the development default");
    }
    let registry = Registry::forensic()?;

    if settings.bootstrap_schema {
        ensure_database_exists(&settings.database).await?;
    }
    let pool = PgPoolOptions::new()
        .max_connections(settings.database.pool_size)
        .connect_with(settings.database.connect_options()?)
        .await?;

    ensure_users_table(&pool).await?;
    if settings.bootstrap_schema {
        apply_forensic_schema(&pool, &registry).await?;
    }
    UserStore::bootstrap_admin(&pool, &settings.admin_username, &settings.admin_password).await?;

    let state = AppState::new(pool, registry, &settings.session_secret);
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("Forensic console listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
