//! Fix planning: attaches a fixed dynamic-EQ template to every detected issue.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const PLAN_VERSION: &str = "2.0";
const MAX_DEPTH: f64 = 0.6;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("issue {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("issue {index} has no severity")]
    MissingSeverity { index: usize },

    #[error("issue {index} has a non-numeric severity")]
    InvalidSeverity { index: usize },

    #[error("expected a JSON array of issues or an object with an \"issues\" array")]
    InvalidDocument,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Fix {
    pub action: &'static str,
    pub freq: u32,
    pub q: f64,
    pub depth: f64,
    pub mode: &'static str,
}

impl Fix {
    pub fn for_severity(severity: f64) -> Self {
        Self {
            action: "dynamic_eq",
            freq: 2800,
            q: 1.0,
            depth: severity.min(MAX_DEPTH),
            mode: "mid",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlanMeta {
    pub version: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlannedIssue {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub fix: Fix,
}

#[derive(Clone, Debug, Serialize)]
pub struct Plan {
    pub meta: PlanMeta,
    pub issues: Vec<PlannedIssue>,
}

pub fn build_plan(issues: &[Value]) -> Result<Plan, PlanError> {
    let planned = issues
        .iter()
        .enumerate()
        .map(|(index, issue)| {
            let object = issue.as_object().ok_or(PlanError::NotAnObject { index })?;
            let severity = object
                .get("severity")
                .ok_or(PlanError::MissingSeverity { index })?
                .as_f64()
                .ok_or(PlanError::InvalidSeverity { index })?;
            // Input field order is kept; the attached fix replaces any existing one.
            let fields: Map<String, Value> = object
                .iter()
                .filter(|(key, _)| key.as_str() != "fix")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Ok(PlannedIssue {
                fields,
                fix: Fix::for_severity(severity),
            })
        })
        .collect::<Result<Vec<_>, PlanError>>()?;

    log::info!("Planned fixes for {} issue(s)", planned.len());

    Ok(Plan {
        meta: PlanMeta { version: PLAN_VERSION },
        issues: planned,
    })
}

/// Accepts either a bare array of issues or `{"issues": [...]}`.
pub fn issues_from_document(doc: Value) -> Result<Vec<Value>, PlanError> {
    match doc {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("issues") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(PlanError::InvalidDocument),
        },
        _ => Err(PlanError::InvalidDocument),
    }
}
