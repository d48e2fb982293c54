//! Status API for harness runs.
//!
//! Two endpoints: `/healthz` for liveness probes and `/metrics/gate` for
//! the gate's counter snapshot.

use crate::authority::TableAuthority;
use airlock_gate::{ActionGate, GateMetricsSnapshot};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiState {
    pub gate: Arc<ActionGate<TableAuthority>>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics/gate", get(gate_metrics))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthzResponse {
    ok: bool,
}

async fn healthz() -> Json<HealthzResponse> {
    Json(HealthzResponse { ok: true })
}

async fn gate_metrics(State(state): State<ApiState>) -> Json<GateMetricsSnapshot> {
    Json(state.gate.metrics_snapshot())
}
