//! Application errors and their HTML rendering.
//!
//! Resolver failures never reach this layer; only template rendering and
//! metrics encoding faults surface as HTTP errors.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::middleware::RequestId;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("Metrics encoding error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// An [`AppError`] tagged with the id of the request that produced it.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: Option<RequestId>,
}

impl From<AppError> for AppErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

/// Attach a request id to the error side of a result.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: Some(request_id.clone()),
        })
    }
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let request_id = self
            .request_id
            .map(|id| id.0.to_string())
            .unwrap_or_else(|| "-".to_string());

        tracing::error!(error = ?self.error, request_id = %request_id, "Request failed");

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {status}</title>
</head>
<body>
    <div class="container">
        <h1>Error {status}</h1>
        <p>Internal server error</p>
        <p class="request-id">Request ID: {request_id}</p>
        <a href="/">Return to status page</a>
    </div>
</body>
</html>"#,
            status = status.as_u16(),
            request_id = request_id,
        );

        (status, Html(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        AppErrorResponse::from(self).into_response()
    }
}
