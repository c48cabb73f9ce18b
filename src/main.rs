use segment_tts_server::chunking;
use segment_tts_server::cli::{self, Command};
use segment_tts_server::config::AppConfig;
use segment_tts_server::error::{self, TtsError};
use segment_tts_server::logging::{self, LogConfig};
use segment_tts_server::provider::DashScopeClient;
use segment_tts_server::server::{create_router, AppState};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> error::Result<()> {
    // Load .env file if it exists (silently ignore if it doesn't)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("Run with --help for usage");
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => cli::print_help(),
        Command::Version => cli::print_version(),
        Command::Segment(text) => print_segments(&text)?,
        Command::Serve { port } => run_server(port).await?,
    }

    Ok(())
}

/// Print the segments for `text` as pretty JSON on stdout
fn print_segments(text: &str) -> error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("segment_tts_server=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let segments = chunking::segments(text, &config.thresholds);

    println!("{}", serde_json::to_string_pretty(&segments)?);
    Ok(())
}

async fn run_server(port_override: Option<u16>) -> error::Result<()> {
    let log_config = LogConfig::from_env();
    logging::init_logging(&log_config)
        .map_err(|e| TtsError::Internal(format!("failed to initialize logging: {}", e)))?;
    logging::log_platform_info();

    let mut config = AppConfig::from_env()?;
    if let Some(port) = port_override {
        config.port = port;
    }

    let client = DashScopeClient::new(config.dashscope.clone())?;
    if !client.has_api_key() {
        tracing::warn!("DASHSCOPE_API_KEY is not set; synthesis requests will fail");
    }

    let provider = client.config();
    tracing::info!(
        api_url = %provider.api_url,
        model = %provider.model,
        language_type = %provider.language_type,
        provider_timeout_secs = provider.timeout.as_secs(),
        default_voice = %config.default_voice,
        hard_max = config.thresholds.hard_max(),
        safe_length = config.thresholds.safe_length(),
        max_text_length = config.max_text_length,
        request_timeout_secs = config.request_timeout.as_secs(),
        "Configuration loaded"
    );

    let state = AppState::new(Arc::new(client), &config)
        .with_slow_request_threshold(log_config.slow_request_threshold());
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Endpoints: POST /tts, POST /tts/segments, GET /health");

    axum::serve(listener, app).await?;
    Ok(())
}
