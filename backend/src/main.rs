use backend::{
    build_rocket,
    config::{Config, StoreKind},
    routes::AppState,
    store::RedisStore,
};
use shared::{MemoryStore, VoterStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn open_store(config: &Config) -> shared::Result<Box<dyn VoterStore + Send>> {
    match config.store {
        StoreKind::Memory => {
            warn!("Using the in-memory voter store, data is lost on exit");
            Ok(Box::new(MemoryStore::new()))
        }
        StoreKind::Redis => Ok(Box::new(RedisStore::connect(&config.redis_url)?)),
    }
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 Starting voter API");

    let config = Config::load()?;
    let store = open_store(&config)?;

    let figment = rocket::Config::figment()
        .merge(("address", config.host.clone()))
        .merge(("port", config.port));

    info!("📋 Listening on {}:{}", config.host, config.port);

    build_rocket(AppState::new(store))
        .configure(figment)
        .launch()
        .await?;

    Ok(())
}
