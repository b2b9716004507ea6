use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nutri_ai_backend::api;
use nutri_ai_backend::config::GeminiConfig;
use nutri_ai_backend::providers::gemini::GeminiProvider;
use nutri_ai_backend::providers::traits::CompletionProvider;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value = "8000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let config = GeminiConfig::from_env()?;
    let provider: Arc<dyn CompletionProvider> = Arc::new(GeminiProvider::new(config)?);
    info!(model = %provider.model_name(), "Gemini provider configured");

    let app = api::create_api(provider);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "API server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
