//! HTTP server.
//!
//! Binds a TCP listener, serves HTTP/1.1 connections with hyper and hands
//! every request to the [`App`]. Body collection and chain execution each get
//! the configured request timeout. On shutdown the accept loop stops, open
//! connections are asked to finish their current request, and the server waits
//! up to the shutdown timeout for them to close.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use http::{Request, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use stockroom_core::{ApiError, ErrorCategory, ErrorDetail, ErrorEnvelope, RequestId};
use stockroom_middleware::{Response, ResponseExt};
use tokio::net::{TcpListener, TcpStream};

use crate::app::{set_request_id_header, App};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The Stockroom HTTP server.
///
/// # Example
///
/// ```rust,ignore
/// use stockroom_server::{App, Server, ServerConfig};
///
/// let app = App::builder().build()?;
/// let server = Server::new(ServerConfig::default(), app);
/// server.run().await?;
/// ```
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    app: Arc<App>,
}

impl Server {
    /// Creates a server for `app`.
    #[must_use]
    pub fn new(config: ServerConfig, app: App) -> Self {
        Self {
            config,
            app: Arc::new(app),
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Runs until SIGINT or SIGTERM.
    pub async fn run(self) -> ServerResult<()> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and runs until `shutdown` triggers.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!("Invalid address '{}': {}", self.config.http_addr(), e))
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("Failed to bind to {addr}: {e}")))?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown` triggers.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> ServerResult<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, routes = self.app.router().len(), "server listening");

        let tracker = ConnectionTracker::new();
        let request_timeout = self.config.request_timeout();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let app = Arc::clone(&self.app);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(app, request_timeout, stream, shutdown).await {
                                    tracing::debug!(remote_addr = %remote_addr, error = %e, "connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        drop(listener);

        let shutdown_timeout = self.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            active = tracker.active_connections(),
            "waiting for connections to close"
        );

        tokio::select! {
            () = tracker.wait_for_shutdown() => {
                tracing::info!("all connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    active = tracker.active_connections(),
                    "shutdown timeout reached with connections still open"
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn handle_connection(
    app: Arc<App>,
    request_timeout: Duration,
    stream: TcpStream,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);

    let service = service_fn(move |req: Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { handle_request(&app, request_timeout, req).await }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

async fn handle_request(
    app: &App,
    request_timeout: Duration,
    req: Request<Incoming>,
) -> Result<Response, Infallible> {
    let request_id = RequestId::new();
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();

    let body = match tokio::time::timeout(request_timeout, body.collect()).await {
        Ok(Ok(collected)) => collected.to_bytes(),
        Ok(Err(e)) => {
            let error = ApiError::validation(format!("Failed to read request body: {e}"));
            let mut response = app.error_renderer().render(request_id, &error);
            set_request_id_header(&mut response, request_id);
            return Ok(response);
        }
        Err(_) => {
            tracing::warn!(request_id = %request_id, method = %parts.method, path, "request body collection timed out");
            return Ok(timeout_response(
                request_id,
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "Request body collection timed out",
            ));
        }
    };

    let dispatch = app.dispatch_with_id(request_id, parts.method.clone(), &path, body);
    match tokio::time::timeout(request_timeout, dispatch).await {
        Ok(response) => Ok(response),
        Err(_) => {
            tracing::warn!(request_id = %request_id, method = %parts.method, path, "request timed out");
            Ok(timeout_response(
                request_id,
                StatusCode::GATEWAY_TIMEOUT,
                "GATEWAY_TIMEOUT",
                "Request timed out",
            ))
        }
    }
}

fn timeout_response(request_id: RequestId, status: StatusCode, code: &str, message: &str) -> Response {
    let envelope = ErrorEnvelope {
        error: ErrorDetail {
            code: code.to_string(),
            message: message.to_string(),
            category: ErrorCategory::Internal,
        },
        request_id: Some(request_id.to_string()),
    };
    let mut response = Response::json_error(status, &envelope);
    set_request_id_header(&mut response, request_id);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::REQUEST_ID_HEADER;

    #[tokio::test]
    async fn test_timeout_response_carries_request_id() {
        let request_id = RequestId::new();
        let response = timeout_response(
            request_id,
            StatusCode::GATEWAY_TIMEOUT,
            "GATEWAY_TIMEOUT",
            "Request timed out",
        );

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], request_id.to_string().as_str());

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let envelope: ErrorEnvelope = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope.request_id, Some(request_id.to_string()));
        assert_eq!(envelope.error.code, "GATEWAY_TIMEOUT");
    }
}

