//! Request counters and their Prometheus text rendering.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

const METRIC_SUBSYSTEM: &str = "sima";
const METRIC_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-lifetime counters, shared through [`AppState`].
#[derive(Debug, Default)]
pub struct RequestMetrics {
    pub requests_total: AtomicU64,
    pub client_errors_total: AtomicU64,
    pub server_errors_total: AtomicU64,
    pub transitions_total: AtomicU64,
    pub certificates_total: AtomicU64,
}

impl RequestMetrics {
    pub fn observe(&self, status: u16) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        match status {
            400..=499 => {
                self.client_errors_total.fetch_add(1, Ordering::Relaxed);
            }
            500..=599 => {
                self.server_errors_total.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    pub fn transition(&self) {
        self.transitions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn certificate(&self) {
        self.certificates_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Prometheus text exposition.
    #[must_use]
    pub fn render(&self) -> String {
        [
            ("sima_http_requests_total", &self.requests_total),
            ("sima_http_client_errors_total", &self.client_errors_total),
            ("sima_http_server_errors_total", &self.server_errors_total),
            ("sima_workflow_transitions_total", &self.transitions_total),
            ("sima_certificates_served_total", &self.certificates_total),
        ]
        .into_iter()
        .map(|(name, counter)| {
            format!(
                "# TYPE {name} counter\n{name}{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\"}} {}\n",
                counter.load(Ordering::Relaxed)
            )
        })
        .collect()
    }
}

/// Count every response by status class. `/metrics` itself is not counted.
pub async fn track(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let counted = req.uri().path() != "/metrics";
    let resp = next.run(req).await;
    if counted {
        state.metrics.observe(resp.status().as_u16());
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn statuses_are_bucketed_by_class() {
        let m = RequestMetrics::default();
        for status in [200, 201, 304, 404, 409, 503] {
            m.observe(status);
        }
        assert_eq!(m.requests_total.load(Ordering::Relaxed), 6);
        assert_eq!(m.client_errors_total.load(Ordering::Relaxed), 2);
        assert_eq!(m.server_errors_total.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn render_emits_one_sample_per_counter() {
        let m = RequestMetrics::default();
        m.transition();
        m.transition();
        let text = m.render();
        assert!(text.contains("# TYPE sima_workflow_transitions_total counter\n"));
        assert!(text.contains(&format!(
            "sima_workflow_transitions_total{{subsystem=\"sima\",version=\"{METRIC_VERSION}\"}} 2\n"
        )));
        assert_eq!(text.lines().filter(|l| !l.starts_with('#')).count(), 5);
    }
}
