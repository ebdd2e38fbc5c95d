//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or GraphQL error payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;
use super::ports::WeatherSourceError;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The resource already exists.
    Conflict,
    /// The caller exceeded a rate limit.
    TooManyRequests,
    /// The weather provider failed to produce a usable answer.
    BadGateway,
    /// The weather provider rejected the request with its own status.
    UpstreamRejected,
    /// A dependency such as the database is unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    /// Default HTTP-style status for the code.
    pub fn default_status(self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::TooManyRequests => 429,
            Self::BadGateway | Self::UpstreamRejected => 502,
            Self::ServiceUnavailable => 503,
            Self::InternalError => 500,
        }
    }
}

/// Domain error payload.
///
/// `status` is only set when the failure carries an explicit HTTP-style status
/// from the weather provider; otherwise the code's default status applies.
///
/// # Examples
/// ```
/// use weather_gateway::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.status(), 404);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip)]
    status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error.
    ///
    /// Captures the current trace identifier if one is in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP-style status: the explicit one when present, else the code default.
    pub fn status(&self) -> u16 {
        self.status.unwrap_or_else(|| self.code.default_status())
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Override the HTTP-style status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use weather_gateway::domain::{Error, ErrorCode};
    /// use serde_json::json;
    ///
    /// let err = Error::new(ErrorCode::InvalidRequest, "bad")
    ///     .with_details(json!({ "field": "city" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TooManyRequests, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadGateway, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<WeatherSourceError> for Error {
    /// Surface the provider failure with its mapped status and public message.
    fn from(value: WeatherSourceError) -> Self {
        let message = value.public_message();
        match value {
            WeatherSourceError::NotFound { .. } => Self::not_found(message),
            WeatherSourceError::UpstreamUnavailable { .. } => Self::bad_gateway(message),
            WeatherSourceError::TransportFailure { .. } => Self::internal(message),
            WeatherSourceError::UpstreamRejected { status, .. } => {
                let code = match status {
                    400 => ErrorCode::InvalidRequest,
                    401 => ErrorCode::Unauthorized,
                    403 => ErrorCode::Forbidden,
                    429 => ErrorCode::TooManyRequests,
                    _ => ErrorCode::UpstreamRejected,
                };
                Self::new(code, message).with_status(status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(WeatherSourceError::not_found("Nowhereville"), ErrorCode::NotFound, 404, "City 'Nowhereville' not found")]
    #[case(
        WeatherSourceError::upstream_unavailable("upstream said: db down"),
        ErrorCode::BadGateway,
        502,
        "Weather service temporarily unavailable"
    )]
    #[case(
        WeatherSourceError::upstream_rejected(401_u16, "Invalid API key"),
        ErrorCode::Unauthorized,
        401,
        "Invalid API key"
    )]
    #[case(
        WeatherSourceError::upstream_rejected(418_u16, "teapot"),
        ErrorCode::UpstreamRejected,
        418,
        "teapot"
    )]
    #[case(
        WeatherSourceError::transport_failure("dns lookup failed"),
        ErrorCode::InternalError,
        500,
        "Unexpected error occurred"
    )]
    fn weather_errors_keep_status_and_message(
        #[case] source: WeatherSourceError,
        #[case] code: ErrorCode,
        #[case] status: u16,
        #[case] message: &str,
    ) {
        let err = Error::from(source);
        assert_eq!(err.code(), code);
        assert_eq!(err.status(), status);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    fn serialises_camel_case_without_status() {
        let err = Error::invalid_request("bad")
            .with_trace_id("abc")
            .with_details(json!({"field": "city"}))
            .with_status(422);
        let value = serde_json::to_value(&err).expect("serialise");
        assert_eq!(
            value,
            json!({
                "code": "invalid_request",
                "message": "bad",
                "traceId": "abc",
                "details": {"field": "city"}
            })
        );
    }

    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id = TraceId::from_uuid(uuid::Uuid::nil());
        let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
        assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000000"));
    }
}
