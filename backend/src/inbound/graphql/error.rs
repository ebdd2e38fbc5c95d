//! GraphQL error payloads for domain errors.
//!
//! Resolvers surface every domain failure through [`into_graphql_error`], so
//! REST and GraphQL report the same status for the same failure.

use async_graphql::ErrorExtensions;
use serde::Serialize;

use crate::domain::Error;

/// GraphQL extension code for an HTTP-style status.
///
/// # Examples
/// ```
/// use weather_gateway::inbound::graphql::graphql_error_code;
///
/// assert_eq!(graphql_error_code(502), "BAD_GATEWAY");
/// assert_eq!(graphql_error_code(500), "INTERNAL_SERVER_ERROR");
/// ```
pub fn graphql_error_code(status: u16) -> &'static str {
    match status {
        401 => "UNAUTHORIZED",
        403 => "FORBIDDEN",
        404 => "NOT_FOUND",
        409 => "DATA_EXISTS_ALREADY",
        429 => "TOO_MANY_REQUESTS",
        502 => "BAD_GATEWAY",
        _ => "INTERNAL_SERVER_ERROR",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlErrorExtensions {
    pub code: &'static str,
    pub http_status: u16,
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQlErrorPayload {
    pub message: String,
    pub extensions: GraphQlErrorExtensions,
}

impl From<&Error> for GraphQlErrorPayload {
    fn from(error: &Error) -> Self {
        let status = error.status();
        Self {
            message: error.message().to_owned(),
            extensions: GraphQlErrorExtensions {
                code: graphql_error_code(status),
                http_status: status,
            },
        }
    }
}

/// Resolver error carrying the payload's message and extensions, plus the
/// request's `traceId` when one was captured.
pub fn into_graphql_error(error: &Error) -> async_graphql::Error {
    let GraphQlErrorPayload {
        message,
        extensions: GraphQlErrorExtensions { code, http_status },
    } = GraphQlErrorPayload::from(error);
    let trace_id = error.trace_id().map(str::to_owned);
    async_graphql::Error::new(message).extend_with(|_, ext| {
        ext.set("code", code);
        ext.set("httpStatus", i32::from(http_status));
        if let Some(trace_id) = trace_id {
            ext.set("traceId", trace_id);
        }
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::WeatherSourceError;

    #[rstest]
    #[case(404, "NOT_FOUND")]
    #[case(502, "BAD_GATEWAY")]
    #[case(401, "UNAUTHORIZED")]
    #[case(403, "FORBIDDEN")]
    #[case(429, "TOO_MANY_REQUESTS")]
    #[case(409, "DATA_EXISTS_ALREADY")]
    #[case(500, "INTERNAL_SERVER_ERROR")]
    #[case(418, "INTERNAL_SERVER_ERROR")]
    #[case(503, "INTERNAL_SERVER_ERROR")]
    fn maps_status_to_code(#[case] status: u16, #[case] expected: &str) {
        assert_eq!(graphql_error_code(status), expected);
    }

    #[rstest]
    fn payload_carries_message_and_extensions() {
        let error = Error::from(WeatherSourceError::not_found("Atlantis"));

        let payload = serde_json::to_value(GraphQlErrorPayload::from(&error)).expect("encode");

        assert_eq!(
            payload,
            json!({
                "message": "City 'Atlantis' not found",
                "extensions": {"code": "NOT_FOUND", "httpStatus": 404}
            })
        );
    }

    #[rstest]
    fn rejected_status_passes_through() {
        let error = Error::from(WeatherSourceError::upstream_rejected(429_u16, "slow down"));

        let payload = GraphQlErrorPayload::from(&error);

        assert_eq!(payload.extensions.http_status, 429);
        assert_eq!(payload.extensions.code, "TOO_MANY_REQUESTS");
        assert_eq!(payload.message, "slow down");
    }

    #[rstest]
    fn resolver_error_carries_extensions() {
        let error = Error::conflict("Location already exists in favorites").with_trace_id("abc");

        let gql = into_graphql_error(&error);

        assert_eq!(gql.message, "Location already exists in favorites");
        let extensions = serde_json::to_value(gql.extensions.expect("extensions")).expect("encode");
        assert_eq!(
            extensions,
            json!({"code": "DATA_EXISTS_ALREADY", "httpStatus": 409, "traceId": "abc"})
        );
    }
}
