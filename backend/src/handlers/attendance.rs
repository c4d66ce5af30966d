use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::attendance::{
        AttendanceDateQuery, AttendanceEntry, AttendanceRecord, AttendanceRecordWithStudent,
    },
    state::AppState,
    utils::time::today_attendance_date,
};

pub async fn submit_attendance(
    State(state): State<AppState>,
    payload: Result<Json<Vec<AttendanceEntry>>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<AttendanceRecord>>), AppError> {
    let Json(entries) = payload?;
    tracing::debug!(count = entries.len(), "Attendance batch received");

    let report = state.attendance.submit(&state.pool, entries).await?;
    tracing::info!(
        stored = report.records.len(),
        notified = report.sent(),
        skipped = report.skipped(),
        failed = report.failed(),
        "Attendance submission completed"
    );
    Ok((StatusCode::CREATED, Json(report.records)))
}

pub async fn attendance_today(
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let today = today_attendance_date(&state.config.time_zone);
    let records = state
        .attendance
        .records_for_date(&state.pool, &today)
        .await
        .map_err(|e| e.context("Failed to fetch today's attendance records"))?;
    Ok(Json(records))
}

pub async fn available_dates(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let dates = state
        .attendance
        .available_dates(&state.pool)
        .await
        .map_err(|e| e.context("Failed to fetch available dates"))?;
    Ok(Json(dates))
}

pub async fn attendance_records(
    State(state): State<AppState>,
    query: Result<Query<AttendanceDateQuery>, QueryRejection>,
) -> Result<Json<Vec<AttendanceRecordWithStudent>>, AppError> {
    let Query(query) = query?;
    let date = query
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Date parameter is required.".into()))?;

    let records = state
        .attendance
        .records_for_date_with_students(&state.pool, &date)
        .await
        .map_err(|e| e.context("Failed to fetch attendance records for the selected date"))?;
    Ok(Json(records))
}
