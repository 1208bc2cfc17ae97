use std::sync::Arc;

use serde::de::DeserializeOwned;

/// Error produced by a decoder for a payload it cannot interpret.
pub type DecodeError = Box<dyn std::error::Error + Send + Sync>;

/// Caller-supplied function turning a raw store payload into the
/// application's configuration type.
///
/// A decoder is invoked on the initial value read at startup and on every
/// payload published to the channel afterwards. It is a plain function
/// value; there is no listener type to implement.
pub type Decoder<T> = Arc<dyn Fn(&str) -> Result<T, DecodeError> + Send + Sync>;

/// Build a decoder from any closure with the right shape.
pub fn from_fn<T, F>(f: F) -> Decoder<T>
where
    F: Fn(&str) -> Result<T, DecodeError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Decoder that deserializes payloads as JSON into `T`.
pub fn json<T: DeserializeOwned>() -> Decoder<T> {
    Arc::new(|raw| Ok(serde_json::from_str(raw)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_decoder_parses_valid_payload() {
        let decoder = json::<Vec<u32>>();

        let decoded = decoder("[1,2,3]").ok();

        assert_eq!(decoded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn json_decoder_rejects_malformed_payload() {
        let decoder = json::<Vec<u32>>();

        assert!(decoder("not json").is_err());
    }
}
