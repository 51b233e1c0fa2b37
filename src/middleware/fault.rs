use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use rand::Rng;
use serde_json::json;

use crate::config::LatencyRange;
use crate::services::notification_service::{NotificationLevel, Notifier};

pub const GENERIC_FAILURE: &str = "Internal server error";
pub const REORDER_FAILURE: &str = "Failed to reorder jobs. Please try again.";

/// Decides whether a request fails before reaching its handler.
pub trait FaultInjector: Send + Sync {
    fn should_fail(&self, method: &Method, path: &str) -> bool;
}

/// Fails mutating requests with probability `rate`. Reads never fail.
#[derive(Debug, Clone, Copy)]
pub struct RandomFaults {
    rate: f64,
}

impl RandomFaults {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
        }
    }
}

impl FaultInjector for RandomFaults {
    fn should_fail(&self, method: &Method, _path: &str) -> bool {
        *method != Method::GET && rand::thread_rng().gen_bool(self.rate)
    }
}

#[derive(Clone)]
pub struct FaultState {
    injector: Arc<dyn FaultInjector>,
    latency: Option<LatencyRange>,
    notifier: Arc<dyn Notifier>,
}

impl FaultState {
    pub fn new(
        injector: Arc<dyn FaultInjector>,
        latency: Option<LatencyRange>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            injector,
            latency,
            notifier,
        }
    }
}

pub async fn fault_middleware(
    State(state): State<FaultState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(latency) = state.latency {
        tokio::time::sleep(latency.sample()).await;
    }

    let path = req.uri().path();
    if state.injector.should_fail(req.method(), path) {
        let message = if path.ends_with("/reorder") {
            REORDER_FAILURE
        } else {
            GENERIC_FAILURE
        };
        tracing::warn!(method = %req.method(), path, "injected fault");
        state.notifier.notify(NotificationLevel::Error, message);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_never_failed() {
        let always = RandomFaults::new(1.0);
        assert!(!always.should_fail(&Method::GET, "/api/jobs"));
        assert!(always.should_fail(&Method::PATCH, "/api/jobs/job-1/reorder"));

        let never = RandomFaults::new(0.0);
        assert!(!never.should_fail(&Method::POST, "/api/assessments"));
    }
}
