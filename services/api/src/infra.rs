use chrono::NaiveDateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use pwd_reports::config::ReportingConfig;
use pwd_reports::intake::parse_datetime;
use pwd_reports::reports::{RangeToken, ReportKind};
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) reporting: Arc<ReportingConfig>,
}

pub(crate) fn parse_instant(raw: &str) -> Result<NaiveDateTime, String> {
    parse_datetime(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or RFC 3339")
    })
}

pub(crate) fn parse_kind(raw: &str) -> Result<ReportKind, String> {
    raw.parse::<ReportKind>().map_err(|err| err.to_string())
}

pub(crate) fn parse_range(raw: &str) -> Result<RangeToken, String> {
    raw.parse::<RangeToken>().map_err(|err| err.to_string())
}

pub(crate) fn deserialize_optional_instant<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_instant(&value).map_err(serde::de::Error::custom))
        .transpose()
}
