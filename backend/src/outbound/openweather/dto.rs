//! Wire-level shapes used by the OpenWeather adapter.

use serde::Deserialize;

/// Error envelope returned by OpenWeather on non-success statuses,
/// e.g. `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl ErrorEnvelopeDto {
    /// Extract a non-blank `message` from a raw body, if the body carries one.
    pub(super) fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .and_then(|envelope| envelope.message)
            .filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(br#"{"cod":"401","message":"Invalid API key"}"#.as_slice(), Some("Invalid API key"))]
    #[case(br#"{"cod":401,"message":"  "}"#.as_slice(), None)]
    #[case(br#"{"cod":"400"}"#.as_slice(), None)]
    #[case(b"<html>bad gateway</html>".as_slice(), None)]
    fn extracts_message_when_present(#[case] body: &[u8], #[case] expected: Option<&str>) {
        assert_eq!(ErrorEnvelopeDto::message_from(body).as_deref(), expected);
    }
}
