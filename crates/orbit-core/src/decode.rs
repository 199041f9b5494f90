//! Lock artifact decoding: contents envelope → base64 → trust manifest.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use orbit_schema::TrustManifest;
use serde::Deserialize;
use thiserror::Error;

/// Standard alphabet, padding optional.
const CONTENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a lock artifact could not be turned into a [`TrustManifest`].
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The response is not a contents envelope with a `content` string.
    #[error("Invalid lock artifact envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// `content` is not valid base64.
    #[error("Invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not a complete trust manifest.
    #[error("Invalid trust manifest: {0}")]
    Manifest(#[source] serde_json::Error),
}

/// The part of a contents API file response we need.
#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    content: String,
}

/// Decode a raw lock artifact response body.
///
/// The host wraps base64 output at 60 columns, so ASCII whitespace inside
/// `content` is dropped before decoding.
///
/// # Errors
///
/// Fails if any of the three layers is malformed, or if the manifest lacks
/// any of `manifest`, `signature` or `downloadUrl`.
pub fn decode_lock_artifact(raw: &str) -> Result<TrustManifest, DecodeError> {
    let envelope: ContentEnvelope = serde_json::from_str(raw).map_err(DecodeError::Envelope)?;

    let compact: String = envelope
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = CONTENT_ENGINE.decode(compact)?;

    serde_json::from_slice(&bytes).map_err(DecodeError::Manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;

    fn envelope(content: &str) -> String {
        json!({ "name": "orbit.lock.json", "encoding": "base64", "content": content }).to_string()
    }

    #[test]
    fn test_decode_valid_artifact() {
        let inner = json!({
            "manifest": { "name": "Calculator", "entry": "index.html" },
            "signature": "orbit-signed",
            "downloadUrl": "https://example.com/calc.zip",
        });
        let raw = envelope(&STANDARD.encode(inner.to_string()));

        let manifest = decode_lock_artifact(&raw).unwrap();
        assert_eq!(manifest.signature, "orbit-signed");
        assert_eq!(manifest.download_url, "https://example.com/calc.zip");
        assert_eq!(manifest.manifest["name"], "Calculator");
    }

    #[test]
    fn test_decode_tolerates_wrapped_content() {
        let inner = json!({
            "manifest": { "description": "a fairly long description so the base64 wraps" },
            "signature": "orbit-signed",
            "downloadUrl": "https://example.com/pkg.zip",
        });
        let encoded = STANDARD.encode(inner.to_string());
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");

        let manifest = decode_lock_artifact(&envelope(&wrapped)).unwrap();
        assert_eq!(manifest.download_url, "https://example.com/pkg.zip");
    }

    #[test]
    fn test_decode_rejects_bad_envelope() {
        assert!(matches!(
            decode_lock_artifact("not json"),
            Err(DecodeError::Envelope(_))
        ));
        assert!(matches!(
            decode_lock_artifact(r#"{"encoding": "base64"}"#),
            Err(DecodeError::Envelope(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode_lock_artifact(&envelope("!!not base64!!")),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_inner_json() {
        let raw = envelope(&STANDARD.encode("{ this is not json"));
        assert!(matches!(
            decode_lock_artifact(&raw),
            Err(DecodeError::Manifest(_))
        ));
    }

    #[test]
    fn test_decode_rejects_partial_manifest() {
        let inner = json!({ "signature": "orbit-signed" });
        let raw = envelope(&STANDARD.encode(inner.to_string()));
        assert!(matches!(
            decode_lock_artifact(&raw),
            Err(DecodeError::Manifest(_))
        ));
    }
}
