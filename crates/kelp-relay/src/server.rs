//! Phone relay server: axum HTTP in, UDP out.
//!
//! - `GET /`, `/phone_controller.html`: orientation controller page
//! - `GET /buttons`, `/phone_buttons_controller.html`: buttons-only page
//! - `GET /api/ip`: address the phone should talk to
//! - `POST /gyro`: relay one sample to the game
//! - `OPTIONS *`: CORS preflight
//!
//! Every response carries `Access-Control-Allow-Origin: *`.

use std::future::Future;
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, info, warn};

use kelp_core::{KelpError, KelpResult};
use kelp_transport::UdpTransport;
use kelp_wire::PhoneSample;

use crate::config::RelayConfig;

/// Address baked into the pages, replaced with the detected one
pub const PLACEHOLDER_IP: &str = "192.168.1.100";

pub const GYRO_PAGE: &str = "phone_controller.html";
pub const BUTTONS_PAGE: &str = "phone_buttons_controller.html";

const NOT_FOUND_HTML: &str = "<html><body><h1>404 Not Found</h1></body></html>";

/// Relay counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub pages_served: u64,
    pub samples_relayed: u64,
    pub relay_failures: u64,
}

/// Shared state for the handlers
pub struct RelayState {
    transport: UdpTransport,
    destination: SocketAddr,
    local_ip: IpAddr,
    http_port: u16,
    static_dir: PathBuf,
    stats: Mutex<RelayStats>,
}

impl RelayState {
    pub fn local_ip(&self) -> IpAddr {
        self.local_ip
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn stats(&self) -> RelayStats {
        *self.stats.lock()
    }

    async fn relay(&self, sample: &PhoneSample) -> KelpResult<()> {
        let payload = sample.encode()?;
        self.transport
            .send_bytes_to(&payload, self.destination)
            .await
    }
}

/// Replace the placeholder address in a controller page
pub fn fill_local_ip(html: &str, ip: IpAddr) -> String {
    html.replace(
        &format!("value=\"{}\"", PLACEHOLDER_IP),
        &format!("value=\"{}\"", ip),
    )
}

/// Build the router over existing state
pub fn router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/", with_cors(get(gyro_page)))
        .route("/phone_controller.html", with_cors(get(gyro_page)))
        .route("/buttons", with_cors(get(buttons_page)))
        .route("/phone_buttons_controller.html", with_cors(get(buttons_page)))
        .route("/api/ip", with_cors(get(api_ip)))
        .route("/gyro", with_cors(post(relay_gyro)))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .with_state(state)
}

fn with_cors(route: MethodRouter<Arc<RelayState>>) -> MethodRouter<Arc<RelayState>> {
    route.options(preflight).fallback(not_found)
}

/// Bound relay, ready to serve
pub struct RelayServer {
    listener: TcpListener,
    state: Arc<RelayState>,
}

impl RelayServer {
    /// Bind the HTTP listener and the outgoing UDP socket
    ///
    /// `/api/ip` reports the port actually bound, so binding port 0 works.
    pub async fn bind(bind: SocketAddr, config: &RelayConfig, local_ip: IpAddr) -> KelpResult<Self> {
        let listener = TcpListener::bind(bind)
            .await
            .map_err(|e| KelpError::TransportError(format!("failed to bind {}: {}", bind, e)))?;
        let http_port = listener
            .local_addr()
            .map_err(|e| KelpError::TransportError(e.to_string()))?
            .port();

        let transport = UdpTransport::bind_for(config.destination).await?;

        let state = Arc::new(RelayState {
            transport,
            destination: config.destination,
            local_ip,
            http_port,
            static_dir: config.static_dir.clone(),
            stats: Mutex::new(RelayStats::default()),
        });

        Ok(RelayServer { listener, state })
    }

    pub fn local_addr(&self) -> KelpResult<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| KelpError::TransportError(e.to_string()))
    }

    pub fn state(&self) -> Arc<RelayState> {
        Arc::clone(&self.state)
    }

    /// Serve until `shutdown` resolves
    pub async fn serve_until<F>(self, shutdown: F) -> KelpResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        let app = router(self.state);

        info!("Relay listening on http://{}", addr);

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| KelpError::TransportError(format!("relay server error: {}", e)))
    }

    pub async fn serve(self) -> KelpResult<()> {
        self.serve_until(std::future::pending()).await
    }
}

async fn serve_page(state: &RelayState, name: &str) -> Response {
    let path = state.static_dir.join(name);

    match tokio::fs::read_to_string(&path).await {
        Ok(html) => {
            state.stats.lock().pages_served += 1;
            debug!("Served {}", name);
            Html(fill_local_ip(&html, state.local_ip)).into_response()
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Page {} not found in {}", name, state.static_dir.display());
            (
                StatusCode::NOT_FOUND,
                Html(format!("<h1>404 - {} not found</h1>", name)),
            )
                .into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response(),
    }
}

/// GET / and /phone_controller.html
async fn gyro_page(State(state): State<Arc<RelayState>>) -> Response {
    serve_page(&state, GYRO_PAGE).await
}

/// GET /buttons and /phone_buttons_controller.html
async fn buttons_page(State(state): State<Arc<RelayState>>) -> Response {
    serve_page(&state, BUTTONS_PAGE).await
}

/// GET /api/ip
async fn api_ip(State(state): State<Arc<RelayState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ip": state.local_ip.to_string(),
        "port": state.http_port,
        "gyroPort": state.destination.port(),
    }))
}

/// POST /gyro
async fn relay_gyro(State(state): State<Arc<RelayState>>, body: Bytes) -> Response {
    let result = match PhoneSample::from_json(&body) {
        Ok(sample) => state.relay(&sample).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            state.stats.lock().samples_relayed += 1;
            (StatusCode::OK, "OK").into_response()
        }
        Err(e) => {
            state.stats.lock().relay_failures += 1;
            warn!("Relay failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response()
        }
    }
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

async fn not_found(method: axum::http::Method) -> Response {
    if method == axum::http::Method::OPTIONS {
        return preflight().await.into_response();
    }
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}
