//! Paymob callback HMAC verification.
//!
//! Paymob signs a callback by concatenating the values of a fixed, ordered
//! list of transaction fields and computing HMAC-SHA512 over the result with
//! the merchant's HMAC secret. The hex digest travels in the `hmac` query
//! parameter.
//!
//! Verification is a pure function of the secret and the payload. Missing
//! fields contribute an empty string, so a malformed payload degrades to an
//! invalid signature instead of an error.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::callback::CallbackPayload;

type HmacSha512 = Hmac<Sha512>;

/// Signed fields, in the exact order Paymob concatenates them.
pub const SIGNED_FIELDS: [&str; 20] = [
    "amount_cents",
    "created_at",
    "currency",
    "error_occured",
    "has_parent_transaction",
    "id",
    "integration_id",
    "is_3d_secure",
    "is_auth",
    "is_capture",
    "is_refunded",
    "is_standalone_payment",
    "is_voided",
    "order.id",
    "owner",
    "pending",
    "source_data.pan",
    "source_data.sub_type",
    "source_data.type",
    "success",
];

/// Verifier for Paymob callback signatures.
#[derive(Clone)]
pub struct HmacValidator {
    secret: SecretString,
}

impl HmacValidator {
    /// Creates a new validator with the merchant's HMAC secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Concatenation of the signed field values.
    pub fn signing_string(payload: &CallbackPayload) -> String {
        SIGNED_FIELDS
            .iter()
            .map(|field| payload.field_text(field).unwrap_or_default())
            .collect()
    }

    /// Computes the lowercase hex signature of a payload.
    pub fn sign(&self, payload: &CallbackPayload) -> String {
        let mut mac = HmacSha512::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(Self::signing_string(payload).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks a claimed signature against the payload.
    pub fn is_valid(&self, payload: &CallbackPayload, claimed: &str) -> bool {
        let expected = self.sign(payload);
        constant_time_compare(expected.as_bytes(), claimed.trim().as_bytes())
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
