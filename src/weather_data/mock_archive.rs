//! A local stand-in for the archive endpoint. Answers every request with synthetic,
//! deterministic hourly data for the requested date window.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Datelike, NaiveDate};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default)]
pub(crate) struct MockArchiveOptions {
    pub utc_offset_seconds: i32,
    /// Years answered with a 400 and an error reason.
    pub fail_year: Option<i32>,
    /// Years answered with an empty hourly series.
    pub empty_year: Option<i32>,
    /// Hour indices (within each response) whose speed is null.
    pub null_hours: Vec<i64>,
    /// Added to the resolved latitude once per year after 2000.
    pub drift_per_year: f64,
}

#[derive(Clone)]
struct MockState {
    options: Arc<MockArchiveOptions>,
    requests: Arc<AtomicUsize>,
}

pub(crate) struct MockArchive {
    pub url: String,
    requests: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockArchive {
    pub async fn start(options: MockArchiveOptions) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(AtomicUsize::new(0));

        let app = Router::new()
            .route("/v1/archive", get(archive))
            .with_state(MockState {
                options: Arc::new(options),
                requests: requests.clone(),
            });
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            url: format!("http://{}/v1/archive", addr),
            requests,
            handle,
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockArchive {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub(crate) fn synthetic_speed(hour_index: i64) -> f64 {
    (hour_index % 25) as f64 * 0.9
}

pub(crate) fn synthetic_direction(hour_index: i64) -> f64 {
    (hour_index * 37 % 360) as f64
}

async fn archive(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.requests.fetch_add(1, Ordering::SeqCst);
    respond(&params, &state.options)
}

fn parse_date(params: &HashMap<String, String>, key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(params.get(key)?, "%Y-%m-%d").ok()
}

fn error_body(reason: String) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": true, "reason": reason})),
    )
}

fn respond(
    params: &HashMap<String, String>,
    options: &MockArchiveOptions,
) -> (StatusCode, Json<Value>) {
    let (Some(start), Some(end)) = (
        parse_date(params, "start_date"),
        parse_date(params, "end_date"),
    ) else {
        return error_body("Missing start_date or end_date".to_string());
    };
    if options.fail_year == Some(start.year()) {
        return error_body(format!("No data available for {}", start.year()));
    }

    let coordinate = |key: &str| -> f64 {
        params
            .get(key)
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    // Snap to a 0.1 degree grid like the reanalysis cells
    let drift = options.drift_per_year * f64::from((start.year() - 2000).max(0));
    let latitude = (coordinate("latitude") * 10.0).round() / 10.0 + drift;
    let longitude = (coordinate("longitude") * 10.0).round() / 10.0;

    let hours = if options.empty_year == Some(start.year()) {
        0
    } else {
        ((end - start).num_days() + 1) * 24
    };
    let local_midnight = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
    let first = local_midnight - i64::from(options.utc_offset_seconds);

    let time: Vec<i64> = (0..hours).map(|i| first + i * 3600).collect();
    let speed: Vec<Option<f64>> = (0..hours)
        .map(|i| (!options.null_hours.contains(&i)).then(|| synthetic_speed(i)))
        .collect();
    let direction: Vec<f64> = (0..hours).map(synthetic_direction).collect();

    let body = json!({
        "latitude": latitude,
        "longitude": longitude,
        "generationtime_ms": 0.25,
        "utc_offset_seconds": options.utc_offset_seconds,
        "timezone": "Europe/Zagreb",
        "timezone_abbreviation": "CEST",
        "elevation": 12.0,
        "hourly_units": {
            "time": "unixtime",
            "wind_speed_10m": "kn",
            "wind_direction_10m": "°"
        },
        "hourly": {
            "time": time,
            "wind_speed_10m": speed,
            "wind_direction_10m": direction
        }
    });
    (StatusCode::OK, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_decodes_query_and_rejects_missing_dates() -> Result<(), Box<dyn std::error::Error>>
    {
        let mock = MockArchive::start(MockArchiveOptions::default()).await?;
        let client = reqwest::Client::new();

        let ok: Value = client
            .get(&mock.url)
            .query(&[
                ("latitude", "42.81"),
                ("longitude", "17.52"),
                ("start_date", "2020-02-01"),
                ("end_date", "2020-02-02"),
                ("hourly", "wind_speed_10m,wind_direction_10m"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        assert_eq!(ok["hourly"]["time"].as_array().map(Vec::len), Some(48));
        assert_eq!(ok["latitude"].as_f64(), Some(42.8));

        let missing = client.get(&mock.url).send().await?;
        assert_eq!(missing.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = missing.json().await?;
        assert_eq!(body["error"], json!(true));

        assert_eq!(mock.request_count(), 2);
        Ok(())
    }
}
