#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    models::{
        attendance::{
            AttendanceDateQuery, AttendanceEntry, AttendanceRecord, AttendanceRecordWithStudent,
            AttendanceStatus, StudentSummary,
        },
        result::{
            CreateResult, IndividualResult, ResultRrnQuery, ResultSummary, SemesterResult,
            SubjectGrade,
        },
        student::{CreateStudent, DeleteStudentResponse, Student, UpdateStudent},
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        description = "Students, daily attendance with guardian notifications, and semester results."
    ),
    paths(
        list_students_doc,
        add_student_doc,
        update_student_doc,
        delete_student_doc,
        submit_attendance_doc,
        attendance_today_doc,
        available_dates_doc,
        attendance_records_doc,
        add_result_doc,
        list_results_doc,
        individual_result_doc
    ),
    components(
        schemas(
            ErrorResponse,
            // students
            Student,
            CreateStudent,
            UpdateStudent,
            DeleteStudentResponse,
            // attendance
            AttendanceStatus,
            AttendanceEntry,
            AttendanceRecord,
            AttendanceRecordWithStudent,
            StudentSummary,
            // results
            SubjectGrade,
            CreateResult,
            SemesterResult,
            ResultSummary,
            IndividualResult
        )
    ),
    tags(
        (name = "Students", description = "Student records"),
        (name = "Attendance", description = "Attendance submission and lookup"),
        (name = "Results", description = "Semester results")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/students",
    responses((status = 200, body = [Student])),
    tag = "Students"
)]
fn list_students_doc() {}

#[utoipa::path(
    post,
    path = "/add-student",
    request_body = CreateStudent,
    responses(
        (status = 201, body = Student),
        (status = 400, description = "Invalid student", body = ErrorResponse)
    ),
    tag = "Students"
)]
fn add_student_doc() {}

#[utoipa::path(
    put,
    path = "/update-student/{id}",
    params(("id" = String, Path, description = "Student id")),
    request_body = UpdateStudent,
    responses(
        (status = 200, body = Student),
        (status = 400, description = "Malformed id or invalid fields", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
fn update_student_doc() {}

#[utoipa::path(
    delete,
    path = "/delete-student/{id}",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, body = DeleteStudentResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
fn delete_student_doc() {}

#[utoipa::path(
    post,
    path = "/submit-attendance",
    request_body = [AttendanceEntry],
    responses(
        (status = 201, description = "Stored records; guardians of absent students are emailed", body = [AttendanceRecord]),
        (status = 400, description = "Invalid entry; nothing stored", body = ErrorResponse),
        (status = 500, description = "Failed to submit attendance records", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn submit_attendance_doc() {}

#[utoipa::path(
    get,
    path = "/attendance-today",
    responses((status = 200, body = [AttendanceRecord])),
    tag = "Attendance"
)]
fn attendance_today_doc() {}

#[utoipa::path(
    get,
    path = "/available-dates",
    responses((status = 200, description = "Distinct dates, ascending", body = [String])),
    tag = "Attendance"
)]
fn available_dates_doc() {}

#[utoipa::path(
    get,
    path = "/attendance-records",
    params(AttendanceDateQuery),
    responses(
        (status = 200, body = [AttendanceRecordWithStudent]),
        (status = 400, description = "Date parameter is required.", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn attendance_records_doc() {}

#[utoipa::path(
    post,
    path = "/add-result",
    request_body = CreateResult,
    responses(
        (status = 201, body = SemesterResult),
        (status = 400, body = ErrorResponse)
    ),
    tag = "Results"
)]
fn add_result_doc() {}

#[utoipa::path(
    get,
    path = "/results",
    responses((status = 200, body = [ResultSummary])),
    tag = "Results"
)]
fn list_results_doc() {}

#[utoipa::path(
    get,
    path = "/result-individual",
    params(ResultRrnQuery),
    responses(
        (status = 200, body = IndividualResult),
        (status = 400, description = "RRN parameter is required.", body = ErrorResponse),
        (status = 404, description = "Result not found for the provided RRN.", body = ErrorResponse)
    ),
    tag = "Results"
)]
fn individual_result_doc() {}
