//! Request and response types for the cycle calculation API.
//!
//! # Design
//! `CycleRequest` pairs a plain data struct with a static rule table and a
//! field-descriptor list in declaration order. Validation and query
//! projection both go through the descriptor list, so the two can never
//! disagree about which parameters exist or what they are called on the
//! wire. Response types mirror the server's JSON envelope exactly; they are
//! plain serde DTOs with no behavior.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::{project, Field};
use crate::validate::{validate, Format, Rule, ValidationError, ValueKind};

/// Input parameters for the calculate operation.
///
/// `Default` gives the zero value for every field; zero-valued optional
/// fields are treated as absent and the server applies its own defaults.
#[derive(Debug, Clone, Default)]
pub struct CycleRequest {
    /// First day of the most recent period, `YYYY-MM-DD`. Required.
    pub last_period: String,
    /// Average cycle length in days, 21 to 35. Optional.
    pub cycle_length: i64,
    /// Average period duration in days, 2 to 10. Optional.
    pub period_length: i64,
    /// Number of future cycles to forecast, 1 to 12. Optional.
    pub cycles: i64,
}

const RULES: &[Rule] = &[
    Rule::new("last_period", ValueKind::String)
        .required()
        .format(Format::Date),
    Rule::new("cycle_length", ValueKind::Integer).range(21.0, 35.0),
    Rule::new("period_length", ValueKind::Integer).range(2.0, 10.0),
    Rule::new("cycles", ValueKind::Integer).range(1.0, 12.0),
];

impl CycleRequest {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::str("last_period", &self.last_period),
            Field::int("cycle_length", self.cycle_length),
            Field::int("period_length", self.period_length),
            Field::int("cycles", self.cycles),
        ]
    }

    /// Check every set field against the rule table, collecting all
    /// violations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(&self.fields(), RULES)
    }

    /// Project set fields onto wire query parameters.
    pub fn to_query_params(&self) -> BTreeMap<String, String> {
        project(&self.fields())
    }
}

/// Top-level success envelope returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleResponse {
    pub status: String,
    pub error: Option<String>,
    pub data: CycleData,
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    pub status: String,
    pub error: String,
}

/// Forecast payload: echoed inputs, per-cycle predictions, current status
/// and aggregate statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

/// One predicted cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleForecast {
    pub cycle_number: i64,
    pub period: PeriodWindow,
    pub ovulation: OvulationDay,
    pub fertile_window: FertileWindow,
    pub pms_phase: PmsWindow,
    pub cycle_phases: CyclePhases,
    pub status: String,
    pub days_until: Option<i64>,
    pub days_ago: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodWindow {
    pub start_date: String,
    pub end_date: String,
    pub duration_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OvulationDay {
    pub date: String,
    pub day_of_cycle: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertileWindow {
    pub start_date: String,
    pub end_date: String,
    pub duration_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PmsWindow {
    pub start_date: String,
    pub end_date: String,
}

/// Named phases within a single cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CyclePhases {
    pub menstrual: PhaseSpan,
    pub follicular: PhaseSpan,
    pub ovulation: OvulationPhase,
    pub luteal: PhaseSpan,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseSpan {
    pub start: String,
    pub end: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OvulationPhase {
    pub date: String,
    pub description: String,
}

/// Where in the cycle today falls, relative to the supplied history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentStatus {
    pub phase: String,
    pub description: String,
    pub next_period: Option<String>,
    pub days_until_next_period: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Averages {
    pub cycle_length: i64,
    pub period_duration: i64,
    pub days_between_periods: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CycleRequest {
        CycleRequest {
            last_period: "2024-01-01".to_string(),
            cycle_length: 28,
            period_length: 5,
            cycles: 3,
        }
    }

    #[test]
    fn full_request_validates_and_projects_all_fields() {
        let req = full_request();
        assert!(req.validate().is_ok());
        let params = req.to_query_params();
        assert_eq!(params.len(), 4);
        assert_eq!(params["last_period"], "2024-01-01");
        assert_eq!(params["cycle_length"], "28");
        assert_eq!(params["period_length"], "5");
        assert_eq!(params["cycles"], "3");
    }

    #[test]
    fn defaults_project_only_required_field() {
        let req = CycleRequest {
            last_period: "2024-01-01".to_string(),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
        let params = req.to_query_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params["last_period"], "2024-01-01");
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        let mut req = full_request();
        req.cycle_length = 21;
        assert!(req.validate().is_ok());
        req.cycle_length = 35;
        assert!(req.validate().is_ok());

        req.cycle_length = 20;
        let err = req.validate().unwrap_err();
        assert_eq!(
            err.violations(),
            ["Parameter [cycle_length] must be at least 21"]
        );

        req.cycle_length = 36;
        let err = req.validate().unwrap_err();
        assert_eq!(
            err.violations(),
            ["Parameter [cycle_length] must be at most 35"]
        );
    }

    #[test]
    fn missing_last_period_is_reported() {
        let req = CycleRequest::default();
        let err = req.validate().unwrap_err();
        assert_eq!(
            err.violations(),
            ["Required parameter [last_period] is missing"]
        );
    }

    #[test]
    fn malformed_date_is_reported() {
        let req = CycleRequest {
            last_period: "2024/01/01".to_string(),
            ..Default::default()
        };
        let err = req.validate().unwrap_err();
        assert_eq!(
            err.violations(),
            ["Parameter [last_period] must be a valid date"]
        );
    }

    #[test]
    fn response_envelope_deserializes() {
        let body = r#"{
            "status": "ok",
            "error": null,
            "data": {
                "last_period_date": "2024-01-01",
                "cycle_length": 28,
                "period_length": 5,
                "cycles_calculated": 0,
                "cycles": [],
                "current_status": {
                    "phase": "follicular",
                    "description": "Follicular phase",
                    "next_period": "2024-01-29",
                    "days_until_next_period": 19
                },
                "averages": {
                    "cycle_length": 28,
                    "period_duration": 5,
                    "days_between_periods": 23
                },
                "disclaimer": "Estimates only."
            }
        }"#;
        let resp: CycleResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.error, None);
        assert_eq!(resp.data.cycle_length, 28);
        assert!(resp.data.cycles.is_empty());
        assert_eq!(resp.data.current_status.days_until_next_period, Some(19));
    }
}
