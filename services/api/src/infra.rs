use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_with_padding() {
        let date = parse_date(" 2025-03-31 ").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 31).expect("date"));
    }

    #[test]
    fn rejects_sheet_style_dates() {
        let err = parse_date("31/03/2025").expect_err("day-first dates are rejected");
        assert!(err.contains("YYYY-MM-DD"));
    }
}
