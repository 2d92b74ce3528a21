use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// A struct for simple API error responses, contains a timestamp from the
/// moment of its creation, a human readable message and a optional stable
/// error code.
///
/// the code is what clients should branch on, precondition failures of the
/// dispatch and fleet state machines each map to their own code so a driver
/// app can tell "already accepted by another driver" apart from a validation
/// slip without parsing prose
#[derive(Debug, Serialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimpleError {
    error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,

    timestamp: DateTime<Utc>,
}

impl SimpleError {
    /// Creates a simple error with a generic 'internal server error' message,
    /// ideally this should be used whenever something that should almost never
    /// fail on the request lifecycle does fail.
    pub fn internal() -> SimpleError {
        SimpleError::from("internal server error")
    }

    /// Creates a simple error carrying a machine readable error code from
    /// `error_codes`
    pub fn with_code(msg: &str, code: &'static str) -> SimpleError {
        SimpleError {
            error: String::from(msg),
            code: Some(code),
            timestamp: Utc::now(),
        }
    }
}

impl From<String> for SimpleError {
    fn from(v: String) -> Self {
        SimpleError {
            error: v,
            code: None,
            timestamp: Utc::now(),
        }
    }
}

impl From<&str> for SimpleError {
    fn from(v: &str) -> Self {
        SimpleError::from(String::from(v))
    }
}

impl From<ValidationErrors> for SimpleError {
    fn from(v: ValidationErrors) -> Self {
        SimpleError::from(v.to_string())
    }
}

impl From<anyhow::Error> for SimpleError {
    /// since anyhow errors might contain internal error messages or a stack
    /// description, always convert to a generic internal error
    fn from(_: anyhow::Error) -> Self {
        SimpleError::internal()
    }
}

impl IntoResponse for SimpleError {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

pub fn internal_error_res() -> (StatusCode, SimpleError) {
    (StatusCode::INTERNAL_SERVER_ERROR, SimpleError::internal())
}
