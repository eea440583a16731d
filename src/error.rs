use crate::maud_conveniences::Toast;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::Render;
use serde::Deserialize;
use serde_json::Value;
use snafu::Snafu;

pub type AlumnosResult<T> = Result<T, AlumnosError>;

pub const HEALTH_CHECK_MESSAGE: &str = "No se pudo comprobar el estado del servidor";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AlumnosError {
    #[snafu(display("{message}"))]
    Unreachable {
        url: String,
        message: String,
        source: reqwest::Error,
    },
    #[snafu(display("{message}"))]
    Api { status: StatusCode, message: String },
    #[snafu(display("Unexpected response body from {url}"))]
    DecodeResponse { url: String, source: reqwest::Error },
    #[snafu(display("Unable to build request"))]
    BuildRequest { source: reqwest::Error },
    #[snafu(display("{}", HEALTH_CHECK_MESSAGE))]
    HealthCheck,
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Invalid API base URL {:?}", url))]
    InvalidBaseUrl { url: String },
    #[snafu(display("Unable to parse date {:?}", original))]
    ParseDate {
        source: jiff::Error,
        original: String,
    },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: i32 },
}

impl AlumnosError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND)
            || matches!(self, Self::MissingStudent { .. })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
    message: Option<Value>,
}

///pulls a human message out of an error body: `detail`, then `message`, then a generic status line
pub fn error_message_from_body(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|ErrorBody { detail, message }| {
            [detail, message].into_iter().flatten().find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
        })
        .unwrap_or_else(|| format!("HTTP error, status {}", status.as_u16()))
}

impl IntoResponse for AlumnosError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //backend misbehaved
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let status_code = match &self {
            Self::Unreachable { .. } => BG,
            Self::Api { status, .. } => *status,
            Self::DecodeResponse { .. } => BG,
            Self::BuildRequest { .. } => ISE,
            Self::HealthCheck => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadEnvVar { .. } | Self::InvalidBaseUrl { .. } => ISE,
            Self::ParseDate { .. } => BI,
            Self::MissingStudent { .. } => NF,
        };

        error!(?self, "Error!");
        (
            status_code,
            [("HX-Retarget", "#toasts"), ("HX-Reswap", "beforeend")],
            Toast::error(self.to_string()).render(),
        )
            .into_response()
    }
}
