use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::HeaderValue,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use sales_dashboard::{
    AppState, DEFAULT_SEED_URL, PaginationConfig, RouterConfig, SeedSource, build_router,
    graceful_shutdown,
};

/// The web server for the sales dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env)]
    db_path: String,

    /// The IP address to listen on.
    #[arg(long, env, default_value = "127.0.0.1")]
    address: IpAddr,

    /// The port to serve the app from.
    #[arg(short, long, env, default_value_t = 3000)]
    port: u16,

    /// The single origin allowed to call the JSON API from a browser, e.g.
    /// `http://localhost:5173`. No CORS headers are sent if this is not set.
    #[arg(long, env)]
    cors_origin: Option<String>,

    /// Where `/initialize` downloads the seed dataset from.
    #[arg(long, env, default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// How long to wait for the seed dataset before giving up.
    #[arg(long, env, default_value_t = 30)]
    seed_timeout_secs: u64,

    /// The directory of static files served under `/static`.
    #[arg(long, env, default_value = "public")]
    public_dir: PathBuf,

    /// The file that debug logs are appended to.
    #[arg(long, env, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let addr = SocketAddr::new(args.address, args.port);

    let seed_source = SeedSource::new(&args.seed_url, Duration::from_secs(args.seed_timeout_secs))
        .expect("Could not create the HTTP client for the seed dataset");

    let conn = Connection::open(&args.db_path).expect("Could not open the database");
    let state = AppState::new(conn, seed_source, PaginationConfig::default())
        .expect("Could not initialize the database");

    let allowed_origin = args.cors_origin.as_deref().map(|origin| {
        HeaderValue::from_str(origin).expect("The CORS origin must be a valid header value")
    });
    let router_config = RouterConfig {
        allowed_origin,
        public_dir: args.public_dir,
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state, &router_config));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

fn setup_logging(log_path: &Path) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Handlers and the logging middleware already report failures.
        .on_failure(());

    router.layer(tracing_layer)
}
