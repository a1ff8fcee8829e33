//! Mock cycle calculation server for integration testing.
//!
//! Implements the calculate endpoint with the same parameter names, error
//! messages and response schema as the real service, backed by a naive
//! calendar forecast. The response DTOs here are deliberately independent
//! from the client crate's types so that schema drift between the two shows
//! up as integration test failures.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_CYCLE_LENGTH: i64 = 28;
const DEFAULT_PERIOD_LENGTH: i64 = 5;
const DEFAULT_CYCLES: i64 = 3;

const DISCLAIMER: &str = "Predictions are estimates based on average cycle \
                          patterns and should not be used for medical decisions.";

pub fn app() -> Router {
    Router::new().route("/v1/menstrualcycle", get(calculate))
}

pub async fn run(listener: tokio::net::TcpListener) {
    axum::serve(listener, app()).await.unwrap();
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub status: String,
    pub error: Option<String>,
    pub data: CycleData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CycleData {
    pub last_period_date: String,
    pub cycle_length: i64,
    pub period_length: i64,
    pub cycles_calculated: i64,
    pub cycles: Vec<CycleForecast>,
    pub current_status: CurrentStatus,
    pub averages: Averages,
    pub disclaimer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CycleForecast {
    pub cycle_number: i64,
    pub period: Window,
    pub ovulation: OvulationDay,
    pub fertile_window: Window,
    pub pms_phase: Span,
    pub cycle_phases: CyclePhases,
    pub status: String,
    pub days_until: Option<i64>,
    pub days_ago: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Window {
    pub start_date: String,
    pub end_date: String,
    pub duration_days: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Span {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OvulationDay {
    pub date: String,
    pub day_of_cycle: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CyclePhases {
    pub menstrual: PhaseSpan,
    pub follicular: PhaseSpan,
    pub ovulation: OvulationPhase,
    pub luteal: PhaseSpan,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhaseSpan {
    pub start: String,
    pub end: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OvulationPhase {
    pub date: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentStatus {
    pub phase: String,
    pub description: String,
    pub next_period: Option<String>,
    pub days_until_next_period: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Averages {
    pub cycle_length: i64,
    pub period_duration: i64,
    pub days_between_periods: i64,
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn error_response(status: StatusCode, message: &str) -> ErrorResponse {
    (
        status,
        Json(ErrorBody {
            status: "error".to_string(),
            error: message.to_string(),
        }),
    )
}

fn bad_request(message: &str) -> ErrorResponse {
    error_response(StatusCode::BAD_REQUEST, message)
}

fn int_param(
    params: &HashMap<String, String>,
    name: &str,
    default: i64,
    min: i64,
    max: i64,
) -> Result<i64, ErrorResponse> {
    let Some(raw) = params.get(name) else {
        return Ok(default);
    };
    let value: i64 = raw
        .parse()
        .map_err(|_| bad_request(&format!("Parameter [{name}] must be a valid integer")))?;
    if value < min {
        return Err(bad_request(&format!(
            "Parameter [{name}] must be at least {min}"
        )));
    }
    if value > max {
        return Err(bad_request(&format!(
            "Parameter [{name}] must be at most {max}"
        )));
    }
    Ok(value)
}

async fn calculate(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope>, ErrorResponse> {
    let authorized = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| !key.is_empty());
    if !authorized {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Missing or invalid API key",
        ));
    }

    let Some(last_period_raw) = params.get("last_period") else {
        return Err(bad_request("Required parameter [last_period] is missing"));
    };
    let last_period = NaiveDate::parse_from_str(last_period_raw, "%Y-%m-%d")
        .map_err(|_| bad_request("Parameter [last_period] must be a valid date"))?;

    let cycle_length = int_param(&params, "cycle_length", DEFAULT_CYCLE_LENGTH, 21, 35)?;
    let period_length = int_param(&params, "period_length", DEFAULT_PERIOD_LENGTH, 2, 10)?;
    let cycles = int_param(&params, "cycles", DEFAULT_CYCLES, 1, 12)?;

    let today = Utc::now().date_naive();
    let data = forecast(last_period, cycle_length, period_length, cycles, today);
    Ok(Json(Envelope {
        status: "ok".to_string(),
        error: None,
        data,
    }))
}

fn fmt(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Compute the forecast payload. `today` is injected so tests stay
/// deterministic.
pub fn forecast(
    last_period: NaiveDate,
    cycle_length: i64,
    period_length: i64,
    cycles: i64,
    today: NaiveDate,
) -> CycleData {
    let forecasts = (1..=cycles)
        .map(|n| forecast_cycle(last_period, cycle_length, period_length, n, today))
        .collect();

    CycleData {
        last_period_date: fmt(last_period),
        cycle_length,
        period_length,
        cycles_calculated: cycles,
        cycles: forecasts,
        current_status: current_status(last_period, cycle_length, period_length, today),
        averages: Averages {
            cycle_length,
            period_duration: period_length,
            days_between_periods: cycle_length - period_length,
        },
        disclaimer: DISCLAIMER.to_string(),
    }
}

fn forecast_cycle(
    last_period: NaiveDate,
    cycle_length: i64,
    period_length: i64,
    number: i64,
    today: NaiveDate,
) -> CycleForecast {
    let start = last_period + Duration::days(number * cycle_length);
    let cycle_end = start + Duration::days(cycle_length - 1);
    let period_end = start + Duration::days(period_length - 1);
    // Ovulation falls 14 days before the next period starts.
    let ovulation = start + Duration::days(cycle_length - 14);
    let fertile_start = ovulation - Duration::days(5);
    let pms_start = start + Duration::days(cycle_length - 7);

    let (status, days_until, days_ago) = if today < start {
        ("upcoming", Some((start - today).num_days()), None)
    } else if today > cycle_end {
        ("completed", None, Some((today - cycle_end).num_days()))
    } else {
        ("active", None, None)
    };

    CycleForecast {
        cycle_number: number,
        period: Window {
            start_date: fmt(start),
            end_date: fmt(period_end),
            duration_days: period_length,
        },
        ovulation: OvulationDay {
            date: fmt(ovulation),
            day_of_cycle: cycle_length - 13,
        },
        fertile_window: Window {
            start_date: fmt(fertile_start),
            end_date: fmt(ovulation),
            duration_days: 6,
        },
        pms_phase: Span {
            start_date: fmt(pms_start),
            end_date: fmt(cycle_end),
        },
        cycle_phases: CyclePhases {
            menstrual: PhaseSpan {
                start: fmt(start),
                end: fmt(period_end),
                description: "Menstruation occurs".to_string(),
            },
            follicular: PhaseSpan {
                start: fmt(period_end + Duration::days(1)),
                end: fmt(ovulation - Duration::days(1)),
                description: "Follicles mature in the ovary".to_string(),
            },
            ovulation: OvulationPhase {
                date: fmt(ovulation),
                description: "Egg is released".to_string(),
            },
            luteal: PhaseSpan {
                start: fmt(ovulation + Duration::days(1)),
                end: fmt(cycle_end),
                description: "Uterine lining thickens".to_string(),
            },
        },
        status: status.to_string(),
        days_until,
        days_ago,
    }
}

fn current_status(
    last_period: NaiveDate,
    cycle_length: i64,
    period_length: i64,
    today: NaiveDate,
) -> CurrentStatus {
    let elapsed = (today - last_period).num_days();
    let cycle_index = elapsed.div_euclid(cycle_length);
    let day_in_cycle = elapsed.rem_euclid(cycle_length);

    let (phase, description) = if day_in_cycle < period_length {
        ("menstrual", "Menstruation occurs")
    } else if day_in_cycle < cycle_length - 14 {
        ("follicular", "Follicles mature in the ovary")
    } else if day_in_cycle == cycle_length - 14 {
        ("ovulation", "Egg is released")
    } else {
        ("luteal", "Uterine lining thickens")
    };

    let next_period = last_period + Duration::days((cycle_index + 1) * cycle_length);
    CurrentStatus {
        phase: phase.to_string(),
        description: description.to_string(),
        next_period: Some(fmt(next_period)),
        days_until_next_period: Some((next_period - today).num_days()),
    }
}
