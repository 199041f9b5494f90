//! Trust gate.
//!
//! Approval is a plain equality check of the signature marker against
//! [`TRUST_MARKER`](orbit_schema::TRUST_MARKER). No cryptographic
//! verification happens here.
//!
//! [`ApprovedPackage::approve`](orbit_schema::ApprovedPackage::approve) runs
//! the same check, so an untrusted manifest can never become a package.

use orbit_schema::TrustManifest;

/// Whether `manifest` carries the recognized trust marker.
pub fn is_trusted(manifest: &TrustManifest) -> bool {
    manifest.is_trusted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn manifest(signature: &str, download_url: &str, descriptor: Value) -> TrustManifest {
        TrustManifest {
            manifest: descriptor,
            signature: signature.to_string(),
            download_url: download_url.to_string(),
        }
    }

    #[test]
    fn test_only_the_marker_is_trusted() {
        assert!(is_trusted(&manifest("orbit-signed", "https://x", json!({}))));

        for signature in ["self-signed", "", "Orbit-Signed", "orbit-signed ", " orbit-signed"] {
            assert!(
                !is_trusted(&manifest(signature, "https://x", json!({}))),
                "{signature:?} should not be trusted"
            );
        }
    }

    #[test]
    fn test_other_fields_do_not_matter() {
        let cases = [
            manifest("orbit-signed", "", Value::Null),
            manifest("orbit-signed", "not a url", json!([1, 2, 3])),
            manifest("orbit-signed", "https://x", json!({ "signature": "self-signed" })),
        ];
        assert!(cases.iter().all(is_trusted));

        let untrusted = manifest("self-signed", "https://x", json!({ "signature": "orbit-signed" }));
        assert!(!is_trusted(&untrusted));
    }
}
