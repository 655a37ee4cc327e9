use crate::infra::{deserialize_optional_instant, AppState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDateTime};
use pwd_reports::error::AppError;
use pwd_reports::intake::RawDataset;
use pwd_reports::reports::{build_report_from_tokens, RangeToken, ReportKind, ReportResult};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportRequest {
    #[serde(default)]
    pub(crate) range: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub(crate) now: Option<NaiveDateTime>,
    #[serde(default)]
    pub(crate) dataset: RawDataset,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogEntry {
    pub(crate) kind: ReportKind,
    pub(crate) title: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RangeEntry {
    pub(crate) range: RangeToken,
    pub(crate) label: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportCatalog {
    pub(crate) reports: Vec<CatalogEntry>,
    pub(crate) ranges: Vec<RangeEntry>,
}

pub(crate) fn report_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/reports", get(report_catalog))
        .route("/api/v1/reports/:kind", post(report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn report_catalog() -> Json<ReportCatalog> {
    Json(ReportCatalog {
        reports: ReportKind::ordered()
            .into_iter()
            .map(|kind| CatalogEntry {
                kind,
                title: kind.label(),
            })
            .collect(),
        ranges: RangeToken::ordered()
            .into_iter()
            .map(|range| RangeEntry {
                range,
                label: range.label(),
            })
            .collect(),
    })
}

pub(crate) async fn report_endpoint(
    Extension(state): Extension<AppState>,
    Path(kind): Path<String>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<ReportResult>, AppError> {
    let ReportRequest {
        range,
        now,
        dataset,
    } = payload;

    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let inputs = dataset.into_inputs(&state.reporting.registry);
    let report = build_report_from_tokens(
        &kind,
        range.as_deref().unwrap_or("all"),
        &inputs,
        now,
        &state.reporting.options(),
    )?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use pwd_reports::config::ReportingConfig;
    use pwd_reports::reports::{BarangayRegistry, ReportBody};
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            reporting: Arc::new(ReportingConfig {
                registry: BarangayRegistry::new(["Poblacion", "Mabini", "Quiling"]),
                ..ReportingConfig::default()
            }),
        }
    }

    fn app(ready: bool) -> Router {
        report_routes().layer(Extension(state(ready)))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    fn sample_dataset() -> serde_json::Value {
        json!({
            "members": [
                { "id": "m1", "barangay": "Poblacion", "birthDate": "1990-05-01",
                  "createdAt": "2025-06-10 09:00:00", "cardId": "PWD-1" },
                { "pwd_id": "m2", "barangay": "Mabini", "birth_date": "2010-01-15",
                  "created_at": "2025-06-12" },
                { "userID": "m3", "barangay": "Poblacion", "createdAt": "2024-01-05" }
            ],
            "complaints": [
                { "id": "c1", "type": "Accessibility", "location": "Mabini",
                  "status": "resolved", "createdAt": "2025-06-01",
                  "resolvedAt": "2025-06-03" }
            ]
        })
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cards_report_over_posted_dataset() {
        let response = app(true)
            .oneshot(post_json(
                "/api/v1/reports/cards",
                json!({ "range": "month", "now": "2025-06-15 12:00:00", "dataset": sample_dataset() }),
            ))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["kind"], "cards");
        assert_eq!(body["range"], "month");
        let summary = &body["body"]["cards"]["summary"];
        assert_eq!(summary["total_members"], 2);
        assert_eq!(summary["cards_issued"], 1);
        assert_eq!(summary["issuance_rate"], 50.0);
    }

    #[tokio::test]
    async fn unknown_range_is_a_bad_request() {
        let response = app(true)
            .oneshot(post_json(
                "/api/v1/reports/registration",
                json!({ "range": "fortnight", "dataset": {} }),
            ))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("fortnight"), "{message}");
    }

    #[tokio::test]
    async fn unknown_kind_is_a_bad_request() {
        let response = app(true)
            .oneshot(post_json("/api/v1/reports/payroll", json!({})))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn performance_handler_uses_configured_registry() {
        let dataset: RawDataset =
            serde_json::from_value(sample_dataset()).expect("dataset decodes");
        let request = ReportRequest {
            range: Some("all".to_string()),
            now: None,
            dataset,
        };

        let Json(report) = report_endpoint(
            Extension(state(true)),
            Path("performance".to_string()),
            Json(request),
        )
        .await
        .expect("report builds");

        let ReportBody::Performance(performance) = report.body else {
            panic!("expected a performance report");
        };
        let names: Vec<&str> = performance
            .ranking
            .iter()
            .map(|entry| entry.barangay.as_str())
            .collect();
        assert_eq!(names, ["Poblacion", "Mabini", "Quiling"]);
        assert_eq!(performance.summary.top_barangay.as_deref(), Some("Poblacion"));
        assert_eq!(performance.summary.inactive_barangays, 1);
    }

    #[tokio::test]
    async fn catalog_lists_every_kind_and_range() {
        let Json(catalog) = report_catalog().await;
        assert_eq!(catalog.reports.len(), 6);
        assert_eq!(catalog.ranges.len(), 5);
    }
}
