use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::FromRef,
    http::Request,
    response::{Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::Key;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{debug, error, info, Span};

use crate::db::DB;

mod error;
mod extract;
mod flash;
mod playlists;
mod songs;
mod views;

pub use error::AppError;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DB>,
    key: Key,
}

impl AppState {
    /// `secret` signs the flash cookie and must be at least 32 bytes long.
    pub fn new(db: Arc<DB>, secret: &[u8]) -> Self {
        Self {
            db,
            key: Key::derive_from(secret),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/playlists") }))
        .route("/playlists", get(playlists::list))
        .route(
            "/playlists/add",
            get(playlists::add_form).post(playlists::add),
        )
        .route("/playlists/:id", get(playlists::detail))
        .route(
            "/playlists/:id/add-song",
            get(playlists::add_song_form).post(playlists::add_song),
        )
        .route("/songs", get(songs::list))
        .route("/songs/add", get(songs::add_form).post(songs::add))
        .route("/songs/:id", get(songs::detail))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .on_request(|req: &Request<Body>, _span: &Span| {
                    debug!("{} {}", req.method(), req.uri());
                })
                .on_response(|response: &Response, latency: Duration, _span: &Span| {
                    debug!("{} in {latency:?}", response.status());
                })
                .on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        error!("{error:?}");
                    },
                ),
        )
}

pub async fn serve(state: AppState, addr: impl AsRef<str>) -> std::io::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr.as_ref()).await?;
    info!("Running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("unable to listen for shutdown signal: {err}");
        // no signal source: run until killed
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
