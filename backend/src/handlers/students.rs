use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::student::{CreateStudent, DeleteStudentResponse, Student, UpdateStudent},
    repositories::{Repository, StudentRepository},
    state::AppState,
    types::StudentId,
};

pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = StudentRepository::new()
        .find_all(&state.pool)
        .await
        .map_err(|e| e.context("Failed to fetch students"))?;
    Ok(Json(students))
}

pub async fn add_student(
    State(state): State<AppState>,
    payload: Result<Json<CreateStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let student = StudentRepository::new()
        .create(&state.pool, &payload.into_student())
        .await
        .map_err(|e| e.context("Failed to add student"))?;
    tracing::info!(student_id = %student.id, rrn = %student.rrn, "Student added");
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    id: Result<Path<StudentId>, PathRejection>,
    payload: Result<Json<UpdateStudent>, JsonRejection>,
) -> Result<Json<Student>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let updated = StudentRepository::new()
        .update_partial(&state.pool, id, &payload)
        .await
        .map_err(|e| e.context("Failed to update student"))?;
    Ok(Json(updated))
}

pub async fn delete_student(
    State(state): State<AppState>,
    id: Result<Path<StudentId>, PathRejection>,
) -> Result<Json<DeleteStudentResponse>, AppError> {
    let Path(id) = id?;
    let deleted_student = StudentRepository::new()
        .delete(&state.pool, id)
        .await
        .map_err(|e| e.context("Failed to delete student"))?;
    tracing::info!(student_id = %deleted_student.id, "Student deleted");
    Ok(Json(DeleteStudentResponse {
        message: "Student successfully deleted".to_string(),
        deleted_student,
    }))
}
