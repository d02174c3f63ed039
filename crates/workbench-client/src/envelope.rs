//! The `{"data": ...}` envelope used by workspace and record endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Request and response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Decode an enveloped response body.
///
/// ```
/// use workbench_client::decode_envelope;
///
/// let ids: Vec<u32> = decode_envelope(br#"{"data":[1,2]}"#).expect("decodes");
/// assert_eq!(ids, vec![1, 2]);
/// ```
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|err| ClientError::Decode {
            message: err.to_string(),
        })
}

/// Decode a bare (non-enveloped) response body.
pub(crate) fn decode_bare<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|err| ClientError::Decode {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(br#"[1,2]"#.as_slice())]
    #[case(br#"{"items":[1,2]}"#.as_slice())]
    #[case(br#"{"data":"nope"}"#.as_slice())]
    fn bodies_without_a_matching_envelope_are_rejected(#[case] body: &[u8]) {
        let result = decode_envelope::<Vec<u32>>(body);
        assert!(matches!(result, Err(ClientError::Decode { .. })));
    }
}
