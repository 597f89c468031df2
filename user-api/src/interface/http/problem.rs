use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::{BusinessError, DomainError};

pub type ApiResult<T> = Result<T, ApiProblem>;

/// RFC 7807 problem response. Business errors keep their message and machine
/// code; internal errors are logged and reduced to a fixed detail so nothing
/// about the failure leaks to the caller.
#[derive(Debug)]
pub struct ApiProblem {
    status: StatusCode,
    title: &'static str,
    detail: String,
    kind: &'static str,
    code: Option<&'static str>,
    correlation_id: String,
}

impl ApiProblem {
    pub fn from_domain(error: DomainError) -> Self {
        match error {
            DomainError::Business(err) => {
                let (status, title, kind) = match err {
                    BusinessError::UserNotFound => (
                        StatusCode::NOT_FOUND,
                        "Not found",
                        "https://user-api.dev/problems/not-found",
                    ),
                    BusinessError::EmptyName | BusinessError::EmptyEmail => (
                        StatusCode::BAD_REQUEST,
                        "Validation failed",
                        "https://user-api.dev/problems/validation",
                    ),
                    BusinessError::UserAlreadyExists => (
                        StatusCode::BAD_REQUEST,
                        "Already exists",
                        "https://user-api.dev/problems/already-exists",
                    ),
                };
                Self::new(status, title, kind, err.to_string()).with_code(err.code())
            }
            DomainError::Internal { .. } => {
                tracing::error!(error = ?error, "request failed");
                Self::internal()
            }
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "https://user-api.dev/problems/internal",
            "internal server error",
        )
    }

    fn new(
        status: StatusCode,
        title: &'static str,
        kind: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            title,
            detail: detail.into(),
            kind,
            code: None,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }

    fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

#[derive(Debug, Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    status: u16,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    correlation_id: String,
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        let payload = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            code: self.code,
            correlation_id: self.correlation_id,
        };

        let mut response = (self.status, Json(payload)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}
