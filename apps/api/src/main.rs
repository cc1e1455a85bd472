use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::services::lifecycle::LifecycleService;
use appointment_cell::services::notify::TracingNotifier;
use shared_config::AppConfig;
use shared_store::SchedulingStore;
use shared_utils::SystemClock;

use router::AppState;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sana Practice API server");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());

    // Create shared state
    let state = AppState {
        store: Arc::new(SchedulingStore::new()),
        clock: Arc::new(SystemClock),
        notifier: Arc::new(TracingNotifier),
        config: config.clone(),
    };

    spawn_expiry_sweep(&state);

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .await
        .unwrap();
}

/// Periodically expires scheduled appointments that were never confirmed
/// within the policy window.
fn spawn_expiry_sweep(state: &AppState) {
    let service = LifecycleService::new(
        state.store.clone(),
        state.clock.clone(),
        state.notifier.clone(),
        state.config.policy.clone(),
    );
    let interval = Duration::from_secs(state.config.policy.sweep_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = service.expire_overdue().await {
                warn!("Expiry sweep failed: {}", e);
            }
        }
    });
}
