//! HTTP surface for the swap form.
//!
//! `POST /api/swap` runs one swap to completion and always answers 200 with a
//! `SwapResponse`; the form reads `success` from the body. Malformed JSON is
//! rejected by axum before any swap starts.
//!
//! The endpoint spends the operator's ETH, so browsers may only call it from
//! the page's own origin unless one extra origin is configured.

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::ethereum_client::ChainClient;
use crate::orchestrator::SwapOrchestrator;
use crate::reporter::SwapResponse;
use crate::types::SwapRequest;

pub struct AppState<C> {
    pub orchestrator: Arc<SwapOrchestrator<C>>,
    pub explorer_tx_url: String,
}

// derive(Clone) would require `C: Clone`
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            explorer_tx_url: self.explorer_tx_url.clone(),
        }
    }
}

pub fn router<C: ChainClient + 'static>(
    state: AppState<C>,
    allowed_origin: Option<HeaderValue>,
) -> Router {
    // with no origin configured the layer answers preflights without any
    // allow-origin header, so cross-site callers are refused by the browser
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if let Some(origin) = allowed_origin {
        cors = cors.allow_origin(origin);
    }

    Router::new()
        .route("/api/health", get(health))
        .route("/api/swap", post(execute_swap::<C>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn execute_swap<C: ChainClient + 'static>(
    State(state): State<AppState<C>>,
    Json(request): Json<SwapRequest>,
) -> Json<SwapResponse> {
    info!(
        "swap requested: {} ETH -> {} at {} gwei",
        request.eth_amount, request.token_address, request.gas_gwei
    );
    let span = tracing::info_span!("swap", token = %request.token_address.trim());
    let outcome = state
        .orchestrator
        .execute_swap(&request)
        .instrument(span)
        .await;
    Json(SwapResponse::from_outcome(&outcome, &state.explorer_tx_url))
}
