use campus_fleet_api::{config::app_config, seeder, server, storage::FleetStore};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = app_config();

    let store = Arc::new(FleetStore::in_memory());

    if cfg.is_development {
        seeder::seed_demo_fleet(&store)
            .await
            .expect("failed to seed the demo fleet");
    }

    listen_to_shutdown_signals();

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), cfg.http_port);
    println!("[WEB] soon listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|_| panic!("[WEB] failed to get address {}", addr));

    let server = server::controller::new(store).into_make_service();

    axum::serve(listener, server)
        .await
        .unwrap_or_else(|_| panic!("[WEB] failed to serve app on address {}", addr));
}

/// Listen to shutdown signals `SIGINT` and `SIGTERM`, on a signal shuts the application down
#[allow(clippy::never_loop)]
fn listen_to_shutdown_signals() {
    let mut signals = Signals::new([SIGINT, SIGTERM]).expect("failed to setup signals hook");

    tokio::spawn(async move {
        for sig in signals.forever() {
            println!("[APP] received signal: {}, shutting down", sig);

            std::process::exit(sig)
        }
    });
}
