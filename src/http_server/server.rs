//! # HTTP Server
//!
//! axum front end for the scheduler. Every request falls through to a
//! single handler that runs the ordered route table on the blocking pool,
//! one worker per request, so store locks are never held across an await.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::config::ServerConfig;
use super::errors::{ServerError, ServerResult};
use crate::router::{self, Router as RouteTable};
use crate::scheduler::App;

#[derive(Clone)]
struct DispatchState {
    app: Arc<App>,
    routes: Arc<RouteTable<App>>,
}

/// HTTP Server for the viewing scheduler
pub struct HttpServer {
    config: ServerConfig,
    state: DispatchState,
}

impl HttpServer {
    /// Create a server whose app is built from `config`
    pub fn with_config(config: ServerConfig) -> ServerResult<Self> {
        let app = App::new(config.slot_policy.build(config.min_notice()));
        Self::with_app(config, app)
    }

    /// Create a server around an already constructed app
    pub fn with_app(config: ServerConfig, app: App) -> ServerResult<Self> {
        let state = DispatchState {
            app: Arc::new(app),
            routes: Arc::new(App::routes()?),
        };
        Ok(Self { config, state })
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    pub fn app(&self) -> Arc<App> {
        Arc::clone(&self.state.app)
    }

    /// Get the axum router (for testing)
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn start(self) -> ServerResult<()> {
        let addr = self.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        info!(
            %addr,
            slot_policy = ?self.config.slot_policy,
            routes = self.state.routes.routes().len(),
            "viewing scheduler listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("server shutdown complete");
        Ok(())
    }
}

async fn dispatch(
    State(state): State<DispatchState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let request = router::Request::new(method, uri, body);
    let worker =
        tokio::task::spawn_blocking(move || state.routes.dispatch(&state.app, &request));

    match worker.await {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!(error = %e, "dispatch worker failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl IntoResponse for router::Response {
    fn into_response(self) -> Response {
        let body = if self.body.is_empty() {
            Body::empty()
        } else {
            Body::from(self.body)
        };
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
