use super::dto::{CreateDriverDto, CreateStudentDto};
use crate::{
    modules::common::{extractors::ValidatedJson, responses::SimpleError},
    server::controller::AppState,
    storage::models::{Driver, Student, VehicleKind},
};
use axum::{extract::State, routing::post, Json, Router};
use http::StatusCode;
use std::str::FromStr;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/driver", post(create_driver))
        .route("/student", post(create_student))
}

/// Registers a new driver
#[utoipa::path(
    post,
    tag = "user",
    path = "/user/driver",
    request_body(content = CreateDriverDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            body = Driver,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto error message",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_driver(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDriverDto>,
) -> Result<Json<Driver>, (StatusCode, SimpleError)> {
    let kind = VehicleKind::from_str(&dto.kind)
        .map_err(|_| (StatusCode::BAD_REQUEST, SimpleError::from("invalid kind")))?;

    Ok(Json(state.store.create_driver(&dto.name, kind).await))
}

/// Registers a new student
#[utoipa::path(
    post,
    tag = "user",
    path = "/user/student",
    request_body(content = CreateStudentDto, content_type = "application/json"),
    responses(
        (
            status = OK,
            body = Student,
            content_type = "application/json",
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto error message / REGISTRATION_ID_IN_USE",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<Json<Student>, (StatusCode, SimpleError)> {
    let student = state
        .store
        .create_student(&dto.name, &dto.registration_id, &dto.phone)
        .await?;

    Ok(Json(student))
}
