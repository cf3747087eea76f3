use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use transport_agent::cache::{CacheConfig, CachedRouteProvider};
use transport_agent::domain::Location;
use transport_agent::pipeline::{DEFAULT_MAX_WORKERS, PipelineConfig, Thresholds};
use transport_agent::routes::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, MockRouteProvider, RouteProvider, RoutesClient,
    RoutesConfig,
};
use transport_agent::run::process_file;
use transport_agent::web::{AppState, create_router};

#[derive(Parser)]
#[command(name = "transport-agent")]
#[command(about = "Annotate itinerary legs with transport options, cost and carbon")]
struct Cli {
    /// Routes API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Routes API endpoint
    #[arg(long, env = "ROUTES_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Maximum concurrent mode fetches per leg
    #[arg(long, default_value_t = DEFAULT_MAX_WORKERS, global = true)]
    max_workers: usize,

    /// Per-request timeout
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// Minimum spacing between routing requests
    #[arg(long, default_value_t = 500, global = true)]
    min_interval_ms: u64,

    /// JSON file overriding the walking and cycling thresholds
    #[arg(long, global = true)]
    thresholds: Option<PathBuf>,

    /// Serve recorded responses from this directory instead of calling the API
    #[arg(long, global = true)]
    mock_dir: Option<PathBuf>,

    /// Disable the in-memory route cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan transport for an itinerary file
    Run {
        /// Itinerary document
        input: PathBuf,

        /// Where to write the enriched document
        #[arg(default_value = "transport_output.json")]
        output: PathBuf,

        /// Accommodation as `lat,lon`, overriding the document's own
        #[arg(long)]
        accommodation: Option<Location>,
    },

    /// Serve the planner over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("transport_agent=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("transport_agent=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "transport-agent failed");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<(), Box<dyn Error>> {
    let thresholds = match &cli.thresholds {
        Some(path) => Thresholds::from_file(path)?,
        None => Thresholds::default(),
    };
    let config = PipelineConfig::default()
        .with_max_workers(cli.max_workers)
        .with_thresholds(thresholds);

    if let Some(dir) = &cli.mock_dir {
        let provider = MockRouteProvider::new(dir)?;
        info!(
            dir = %dir.display(),
            modes = ?provider.available_modes(),
            "using recorded responses"
        );
        return dispatch(provider, config, cli.command).await;
    }

    let routes_config = RoutesConfig::new(cli.api_key.unwrap_or_default())
        .with_base_url(cli.base_url)
        .with_timeout(cli.timeout_secs)
        .with_min_request_interval(Duration::from_millis(cli.min_interval_ms));
    let client = RoutesClient::new(routes_config)?;
    if !client.has_credential() {
        warn!("GOOGLE_MAPS_API_KEY not set, every route request will fail");
    }

    if cli.no_cache {
        dispatch(client, config, cli.command).await
    } else {
        let cached = CachedRouteProvider::new(client, &CacheConfig::default());
        dispatch(cached, config, cli.command).await
    }
}

async fn dispatch<P: RouteProvider + 'static>(
    provider: P,
    config: PipelineConfig,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Run {
            input,
            output,
            accommodation,
        } => match process_file(&provider, &config, &input, &output, accommodation).await {
            Ok(summary) => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                Ok(())
            }
            Err(e) => {
                println!("{}", e.to_json());
                Err(e.into())
            }
        },
        Command::Serve { addr } => {
            let app = create_router(AppState::new(provider, config));
            let listener = tokio::net::TcpListener::bind(addr).await?;

            info!(%addr, "transport planner listening");
            info!("  GET  /health     - Health check");
            info!("  POST /transport  - Plan transport for an itinerary");

            axum::serve(listener, app).await?;
            Ok(())
        }
    }
}
