use std::{env, fs::OpenOptions, net::SocketAddr, path::PathBuf, process::exit, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::{Parser, ValueEnum};
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use csmju_finance::{
    AppState, BackendConfig, SupabaseConfig, build_router, graceful_shutdown, logging_middleware,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// A local SQLite database file.
    Sqlite,
    /// A hosted Supabase project.
    Supabase,
}

/// The web server for CSMJU Finance.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Where users and transactions are stored.
    #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
    backend: Backend,

    /// File path to the application SQLite database.
    #[arg(long, env = "CSMJU_DB_PATH", default_value = "csmju_finance.db")]
    db_path: PathBuf,

    /// The URL of the Supabase project.
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    /// The public anon key of the Supabase project.
    #[arg(long, env = "SUPABASE_ANON_KEY")]
    supabase_anon_key: Option<String>,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

impl Args {
    fn backend_config(&self) -> Result<BackendConfig, &'static str> {
        match self.backend {
            Backend::Sqlite => Ok(BackendConfig::Sqlite {
                db_path: self.db_path.clone(),
            }),
            Backend::Supabase => {
                let (Some(url), Some(anon_key)) = (&self.supabase_url, &self.supabase_anon_key)
                else {
                    return Err("--supabase-url and --supabase-anon-key are required for the supabase backend");
                };

                Ok(BackendConfig::Supabase(SupabaseConfig {
                    url: url.clone(),
                    anon_key: anon_key.clone(),
                }))
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine, the variables may be set in the environment.
    let _ = dotenvy::dotenv();
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let backend_config = match args.backend_config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            exit(1);
        }
    };

    let app_state = AppState::new(&backend_config, &secret).expect("Could not set up the backend");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(app_state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
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
        // Errors are logged where they happen.
        .on_failure(());

    router.layer(tracing_layer)
}
