use jobly_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();
    jobly_api::server::init_tracing(&config);

    jobly_api::server::run(config).await
}
