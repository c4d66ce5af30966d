use crate::types::ResultId;
use crate::validation::rules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// One graded subject inside a semester result. Order is significant and is
/// preserved exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGrade {
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub subject: String,
    pub grade: String,
    #[validate(range(min = 0.0))]
    pub credit: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub grade_point: f64,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SemesterResult {
    #[schema(value_type = String)]
    pub id: ResultId,
    pub name: String,
    pub rrn: String,
    pub sgpa: f64,
    pub subjects: Vec<SubjectGrade>,
    pub created_at: DateTime<Utc>,
}

impl SemesterResult {
    pub fn new(payload: CreateResult) -> Self {
        Self {
            id: ResultId::new(),
            name: payload.name.trim().to_string(),
            rrn: payload.rrn.trim().to_string(),
            sgpa: payload.sgpa,
            subjects: payload.subjects,
            created_at: Utc::now(),
        }
    }
}

/// Row shape of the `results` table and of `GET /results` items.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    #[schema(value_type = String)]
    pub id: ResultId,
    pub name: String,
    pub rrn: String,
    pub sgpa: f64,
}

/// Body of `GET /result-individual`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndividualResult {
    pub name: String,
    pub rrn: String,
    pub sgpa: f64,
    pub subjects: Vec<SubjectGrade>,
}

impl From<SemesterResult> for IndividualResult {
    fn from(value: SemesterResult) -> Self {
        Self {
            name: value.name,
            rrn: value.rrn,
            sgpa: value.sgpa,
            subjects: value.subjects,
        }
    }
}

/// Request body for `POST /add-result`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateResult {
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub rrn: String,
    #[validate(range(min = 0.0, max = 10.0))]
    pub sgpa: f64,
    #[serde(default)]
    #[validate(nested)]
    pub subjects: Vec<SubjectGrade>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ResultRrnQuery {
    pub rrn: Option<String>,
}
