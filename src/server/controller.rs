use super::open_api;
use crate::{
    config::app_config,
    modules::{
        dispatch::{self, service::DispatchService},
        rfid, telemetry, tracking, trip, user, vehicle,
    },
    storage::FleetStore,
};
use axum::{body::Body, routing::get, Router};
use http::{header, HeaderValue, Method, Request, StatusCode};
use rand_chacha::ChaCha8Rng;
use rand_core::{OsRng, RngCore, SeedableRng};
use socketioxide::SocketIo;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

/// The main application state, this is cloned for every HTTP / WS
/// request and thus its fields should contain types that are cheap
/// to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FleetStore>,
    pub dispatch: DispatchService,
    pub io: SocketIo,
}

/// Creates the main axum router/controller to be served over https
pub fn new(store: Arc<FleetStore>) -> Router {
    let rng = ChaCha8Rng::seed_from_u64(OsRng.next_u64());

    let (socket_io_layer, io) = SocketIo::builder()
        .with_state(store.clone())
        .build_layer();

    io.ns("/tracking", tracking::routes::on_connect);

    let state = AppState {
        dispatch: DispatchService::new(store.clone(), rng),
        store,
        io,
    };

    // URL.to_string for some reason adds a trailing slash
    // we need to remove it to avoid cors errors
    let mut frontend_origin = app_config().frontend_url.to_string();
    if frontend_origin.ends_with('/') {
        frontend_origin.pop();
    }

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(
            frontend_origin
                .parse::<HeaderValue>()
                .expect("failed to parse CORS allowed origins"),
        )
        .allow_credentials(true)
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE]);

    let tracing_layer = TraceLayer::new_for_http()
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!("request: {} {}", request.method(), request.uri().path())
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let global_middlewares = ServiceBuilder::new()
        .layer(tracing_layer)
        .layer(cors)
        .layer(socket_io_layer);

    Router::new()
        .merge(open_api::create_openapi_router())
        .route("/healthcheck", get(healthcheck))
        .nest("/vehicle", vehicle::routes::create_router())
        .nest("/trip", trip::routes::create_router())
        .nest("/telemetry", telemetry::routes::create_router())
        .nest("/booking", dispatch::routes::create_router())
        .nest("/tracking", tracking::routes::create_router())
        .nest("/user", user::routes::create_router())
        .nest("/rfid-device", rfid::routes::create_router())
        .layer(global_middlewares)
        .with_state(state)
}

#[utoipa::path(
    get,
    tag = "meta",
    path = "/healthcheck",
    responses((status = OK)),
)]
pub async fn healthcheck() -> StatusCode {
    StatusCode::OK
}
