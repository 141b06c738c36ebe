// Devnet Registry - Main Entry Point
// Multiplexed RPC over HTTP with a self-describing method registry

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use devnet_registry::app_state::{AppState, SharedState};
use devnet_registry::handlers::router;
use devnet_registry::registry::Method;

const DEFAULT_PORT: u16 = 9090;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    // Single shared store for the life of the process, wiped only by purge
    let state: SharedState = Arc::new(Mutex::new(AppState::from_env()));

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    println!("🚀 devnet registry listening on http://0.0.0.0:{}", port);
    println!("📋 Registered methods:");
    for method in Method::ALL {
        println!(
            "   {:<24} - {}",
            method.name(),
            method.descriptor().description
        );
    }
    println!("   POST /rpc       - invoke methods, one per top-level key");
    println!("   GET  /describe  - method and type metadata\n");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind registry port");

    // Shutdown handler
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
        println!("\n🛑 Shutdown signal received, goodbye!");
        std::process::exit(0);
    });

    axum::serve(listener, app)
        .await
        .expect("Registry server error");
}
