//! HTTP Surface
//!
//! Three page routes plus a health probe. The model store is injected at
//! router construction and shared read-only across requests.

use crate::features::FlowFeatures;
use crate::predict::label_flow;
use crate::store::ModelStore;
use crate::FlowscopeError;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const INDEX_PAGE: &str = include_str!("../pages/index.html");
const FORM_PAGE: &str = include_str!("../pages/form.html");
const RESULT_PAGE: &str = include_str!("../pages/result.html");

/// Build the router over a loaded model store.
pub fn build_router(store: Arc<ModelStore>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/form", get(form_page))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Form fields posted by the input page, coerced to numbers by the
/// extractor; a missing or non-numeric field rejects the request before
/// the handler runs.
#[derive(Debug, Deserialize)]
pub struct PredictForm {
    /// Flow duration (seconds)
    pub dur: f64,
    /// Total packet count
    pub tot_pkts: f64,
    /// Total byte count
    pub tot_bytes: f64,
    /// Bytes sent by the source
    pub src_bytes: f64,
}

impl From<PredictForm> for FlowFeatures {
    fn from(form: PredictForm) -> Self {
        Self {
            dur: form.dur,
            tot_pkts: form.tot_pkts,
            tot_bytes: form.tot_bytes,
            src_bytes: form.src_bytes,
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn form_page() -> Html<&'static str> {
    Html(FORM_PAGE)
}

async fn predict(
    State(store): State<Arc<ModelStore>>,
    Form(input): Form<PredictForm>,
) -> Result<Html<String>, FlowscopeError> {
    let flow = FlowFeatures::from(input);
    let labels = label_flow(&store, &flow)?;
    tracing::debug!(
        "labeled flow {:?}: kmeans {}, dbscan {}, isolation {}",
        flow,
        labels.partition,
        labels.density,
        labels.anomaly
    );
    Ok(Html(render(
        RESULT_PAGE,
        &[
            ("kmeans", labels.partition.to_string()),
            ("dbscan", labels.density.to_string()),
            ("isolation", labels.anomaly.to_string()),
        ],
    )))
}

/// Fill `{{name}}` placeholders in a page.
///
/// The view layer's whole contract with the core is this mapping of named
/// labels; the markup itself is presentation.
fn render(page: &str, values: &[(&str, String)]) -> String {
    let mut out = page.to_string();
    for (name, value) in values {
        out = out.replace(&format!("{{{{{}}}}}", name), value);
    }
    out
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    timestamp: String,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

impl IntoResponse for FlowscopeError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_named_labels() {
        let page = "<b>{{kmeans}}</b> / {{dbscan}}";
        let out = render(page, &[("kmeans", "2".into()), ("dbscan", "-1".into())]);
        assert_eq!(out, "<b>2</b> / -1");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let out = render("{{other}}", &[("kmeans", "2".into())]);
        assert_eq!(out, "{{other}}");
    }

    #[test]
    fn test_result_page_carries_all_placeholders() {
        for name in ["{{kmeans}}", "{{dbscan}}", "{{isolation}}"] {
            assert!(RESULT_PAGE.contains(name), "result page missing {}", name);
        }
    }
}
