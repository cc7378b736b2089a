use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklist::client::{HttpTaskApi, MemoryTaskApi, TaskApi};
use tasklist::config::ApiConfig;
use tasklist::shell::Shell;
use tasklist::state::AppState;

fn use_memory_backend() -> bool {
    std::env::args().any(|a| a == "--memory")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tasklist=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (api, base_url) = if use_memory_backend() {
        info!("using in-memory task backend");
        let api: Arc<dyn TaskApi> = Arc::new(MemoryTaskApi::new());
        (api, "memory".to_string())
    } else {
        let config = ApiConfig::new_from_env()?;
        let base_url = config.base_url.clone();
        let api: Arc<dyn TaskApi> = Arc::new(HttpTaskApi::new(config)?);
        (api, base_url)
    };
    info!("task api: {}", base_url);

    let mut shell = Shell::start(AppState::new(api)).await;
    shell.run(&base_url).await?;

    Ok(())
}
