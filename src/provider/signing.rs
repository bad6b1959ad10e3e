//! Request signing for the upload API.
//!
//! Parameters are sorted by key, joined as `k=v&k=v`, the API secret is
//! appended and the result is SHA-1 hex encoded.

use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

pub fn sign(params: &BTreeMap<&str, String>, secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
