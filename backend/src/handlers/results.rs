use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::result::{CreateResult, IndividualResult, ResultRrnQuery, ResultSummary, SemesterResult},
    repositories::ResultRepository,
    state::AppState,
};

pub async fn add_result(
    State(state): State<AppState>,
    payload: Result<Json<CreateResult>, JsonRejection>,
) -> Result<(StatusCode, Json<SemesterResult>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let result = ResultRepository::new()
        .create(&state.pool, &SemesterResult::new(payload))
        .await
        .map_err(|e| e.context("Failed to add result"))?;
    tracing::info!(result_id = %result.id, rrn = %result.rrn, "Result added");
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn list_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResultSummary>>, AppError> {
    let results = ResultRepository::new()
        .list_summaries(&state.pool)
        .await
        .map_err(|e| e.context("Failed to fetch results"))?;
    Ok(Json(results))
}

pub async fn individual_result(
    State(state): State<AppState>,
    query: Result<Query<ResultRrnQuery>, QueryRejection>,
) -> Result<Json<IndividualResult>, AppError> {
    let Query(query) = query?;
    let rrn = query
        .rrn
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("RRN parameter is required.".into()))?;

    let result = ResultRepository::new()
        .find_by_rrn(&state.pool, &rrn)
        .await
        .map_err(|e| e.context("Failed to fetch result"))?
        .ok_or_else(|| AppError::NotFound("Result not found for the provided RRN.".into()))?;
    Ok(Json(result.into()))
}
