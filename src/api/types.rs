//! API request and response types

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::errors::SmartApplyError;
use crate::models::Resource;
use crate::rag::REQUIRED_REPORT_KEYS;

/// Match request body
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub jd_text: String,
}

/// Match response contract
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub success: bool,
    pub message: String,
    pub score: f64,
    pub advice: String,
    pub missing_skills: Vec<String>,
    pub resume_suggestions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub fit_analysis: Value,
}

impl MatchResponse {
    /// Validate and shape an orchestrator report into the response contract
    ///
    /// Every required key must be present; optional fields default to empty
    /// collections. A partially populated report is a hard error, never a
    /// partial response.
    pub fn from_report(report: &Value) -> crate::Result<Self> {
        for key in REQUIRED_REPORT_KEYS {
            if report.get(key).is_none() {
                return Err(SmartApplyError::MissingField(key.to_string()));
            }
        }

        let score = report["score"]
            .as_f64()
            .or_else(|| report["score"].as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| {
                SmartApplyError::OutputParse("score is not a number".to_string())
            })?;

        let resources: Vec<Resource> = report
            .get("resources")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        Ok(Self {
            success: true,
            message: "Match successful".to_string(),
            score,
            advice: value_to_string(&report["advice"]),
            missing_skills: string_list(&report["missing_skills"]),
            resume_suggestions: string_list(&report["resume_suggestions"]),
            resources,
            fit_analysis: report
                .get("fit_analysis")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
        })
    }
}

/// Uniform failure body - one generic shape for every hard error
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Static liveness response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(value_to_string)
                .collect()
        })
        .unwrap_or_default()
}
