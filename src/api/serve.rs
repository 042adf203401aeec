use crate::api::handlers;
use crate::config::Config;
use crate::store::PropertiesStore;
use axum::Router;
use axum::routing::get;
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::LatencyUnit;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<PropertiesStore>,
    pub exit_after_save: bool,
    /// notified to stop the server gracefully
    pub shutdown: Arc<Notify>,
}

impl AppState {
    pub fn new(store: PropertiesStore, config: &Config) -> Self {
        Self {
            store: Arc::new(store),
            exit_after_save: config.exit_after_save,
            shutdown: Arc::new(Notify::new()),
        }
    }
}

/// GET /api/server - server directory and properties file info
/// GET /api/properties - load the properties (or the defaults if there is no file)
/// PUT /api/properties - replace the properties file
/// GET /api/properties/defaults - the default properties
pub fn router(state: AppState, config: &Config) -> Router {
    let properties = Router::new()
        .route(
            "/",
            get(handlers::load_properties).put(handlers::save_properties),
        )
        .route("/defaults", get(handlers::default_properties));

    let api = Router::new()
        .route("/server", get(handlers::server_info))
        .nest("/properties", properties)
        .with_state(state);

    let router = Router::new().nest("/api", api);

    let router = match &config.web_dir {
        Some(web_dir) => {
            info!("serving the editor from {}", web_dir.display());
            router.fallback_service(ServeDir::new(web_dir))
        }
        None => router
            .route("/", get(handlers::index))
            .route("/script.js", get(handlers::script))
            .route("/style.css", get(handlers::style)),
    };

    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::default().level(Level::INFO))
            .on_response(DefaultOnResponse::default().latency_unit(LatencyUnit::Micros)),
    )
}

pub async fn run(state: AppState, config: Config) -> color_eyre::Result<()> {
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("listening on http://{}", listener.local_addr()?);
    serve(listener, state, &config).await
}

/// Serves the editor on `listener` until ctrl-c, or until a save when `exit_after_save` is set.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    config: &Config,
) -> color_eyre::Result<()> {
    let shutdown = state.shutdown.clone();

    axum::serve(listener, router(state, config))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: Arc<Notify>) {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received ctrl-c, shutting down"),
            Err(err) => {
                error!("failed to listen for ctrl-c: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {}
        () = shutdown.notified() => info!("properties saved, shutting down"),
    }
}
