//! Workflow webhook signature verification.
//!
//! Implements verification of workflow callback signatures using
//! HMAC-SHA256. Includes timestamp validation to prevent replay attacks.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{CorrelationToken, Timestamp};

use super::WebhookError;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// HMAC-SHA256 signature bytes.
    pub signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses a signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<hex signature>`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::parse("invalid header format"))?;

            match key {
                "t" => {
                    timestamp = Some(
                        value
                            .parse()
                            .map_err(|_| WebhookError::parse("invalid timestamp"))?,
                    );
                }
                "v1" => {
                    signature = Some(
                        hex::decode(value)
                            .map_err(|_| WebhookError::parse("invalid signature hex"))?,
                    );
                }
                _ => {
                    // Ignore unknown fields for forward compatibility
                }
            }
        }

        let timestamp = timestamp.ok_or_else(|| WebhookError::parse("missing timestamp"))?;
        let signature = signature.ok_or_else(|| WebhookError::parse("missing signature"))?;

        Ok(SignatureHeader {
            timestamp,
            signature,
        })
    }
}

/// The authenticated callback body delivered by the workflow engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowCallback {
    /// Correlation token echoed back from the trigger request.
    pub token: CorrelationToken,
    /// The workflow's analytical result payload.
    pub result: JsonValue,
}

/// Verifier for workflow callback signatures.
pub struct WorkflowWebhookVerifier {
    /// The shared signing secret configured on the workflow engine.
    secret: Secret<String>,
}

impl WorkflowWebhookVerifier {
    /// Creates a new verifier with the given signing secret.
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    /// Verifies the callback signature and parses the body.
    ///
    /// # Verification Steps
    ///
    /// 1. Parse the signature header
    /// 2. Validate timestamp is within acceptable range
    /// 3. Compute expected signature using HMAC-SHA256
    /// 4. Compare signatures using constant-time comparison
    /// 5. Parse the JSON payload into a `WorkflowCallback`
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - signature verification failed
    /// - `TimestampOutOfRange` - event is older than 5 minutes
    /// - `InvalidTimestamp` - event timestamp is in the future
    /// - `ParseError` - failed to parse header or JSON payload
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WorkflowCallback, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp)?;

        let expected_signature = self.compute_signature(header.timestamp, payload);
        if !constant_time_compare(&expected_signature, &header.signature) {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| WebhookError::parse(e.to_string()))
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let now = Timestamp::now().unix_seconds();
        let age = now - timestamp;

        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::TimestampOutOfRange { age_secs: age });
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }
        Ok(())
    }

    /// Computes the expected HMAC-SHA256 signature over `{timestamp}.{payload}`.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn verifier() -> WorkflowWebhookVerifier {
        WorkflowWebhookVerifier::new(Secret::new("whsec_test".to_string()))
    }

    fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    fn callback_body(token: CorrelationToken) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "token": token.to_string(),
            "result": { "objectives": [] }
        }))
        .unwrap()
    }

    #[test]
    fn header_parses_timestamp_and_signature() {
        let header = SignatureHeader::parse("t=1700000000,v1=deadbeef").unwrap();
        assert_eq!(header.timestamp, 1_700_000_000);
        assert_eq!(header.signature, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn header_ignores_unknown_fields() {
        let header = SignatureHeader::parse("t=1,v1=00,v0=ff,extra=x").unwrap();
        assert_eq!(header.timestamp, 1);
    }

    #[test]
    fn header_rejects_missing_parts() {
        assert!(SignatureHeader::parse("v1=00").is_err());
        assert!(SignatureHeader::parse("t=1").is_err());
        assert!(SignatureHeader::parse("garbage").is_err());
        assert!(SignatureHeader::parse("t=1,v1=zz").is_err());
    }

    #[test]
    fn valid_signature_within_window_is_accepted() {
        let token = CorrelationToken::new();
        let body = callback_body(token);
        let timestamp = Timestamp::now().unix_seconds();
        let header = format!("t={},v1={}", timestamp, sign("whsec_test", timestamp, &body));

        let callback = verifier().verify_and_parse(&body, &header).unwrap();
        assert_eq!(callback.token, token);
        assert_eq!(callback.result["objectives"], json!([]));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let body = callback_body(CorrelationToken::new());
        let timestamp = Timestamp::now().unix_seconds();
        let header = format!("t={},v1={}", timestamp, sign("whsec_other", timestamp, &body));

        assert_eq!(
            verifier().verify_and_parse(&body, &header),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let body = callback_body(CorrelationToken::new());
        let timestamp = Timestamp::now().unix_seconds();
        let header = format!("t={},v1={}", timestamp, sign("whsec_test", timestamp, &body));

        let mut tampered = body.clone();
        tampered[0] ^= 0x01;
        assert_eq!(
            verifier().verify_and_parse(&tampered, &header),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let body = callback_body(CorrelationToken::new());
        let timestamp = Timestamp::now().unix_seconds() - MAX_EVENT_AGE_SECS - 10;
        let header = format!("t={},v1={}", timestamp, sign("whsec_test", timestamp, &body));

        assert!(matches!(
            verifier().verify_and_parse(&body, &header),
            Err(WebhookError::TimestampOutOfRange { .. })
        ));
    }

    #[test]
    fn future_timestamp_beyond_skew_is_rejected() {
        let body = callback_body(CorrelationToken::new());
        let timestamp = Timestamp::now().unix_seconds() + MAX_CLOCK_SKEW_SECS + 10;
        let header = format!("t={},v1={}", timestamp, sign("whsec_test", timestamp, &body));

        assert_eq!(
            verifier().verify_and_parse(&body, &header),
            Err(WebhookError::InvalidTimestamp)
        );
    }

    #[test]
    fn valid_signature_over_malformed_body_is_a_parse_error() {
        let body = b"not json".to_vec();
        let timestamp = Timestamp::now().unix_seconds();
        let header = format!("t={},v1={}", timestamp, sign("whsec_test", timestamp, &body));

        assert!(matches!(
            verifier().verify_and_parse(&body, &header),
            Err(WebhookError::ParseError(_))
        ));
    }
}
