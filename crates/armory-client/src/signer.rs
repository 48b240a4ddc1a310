//! Request signing for authenticated calls.
//!
//! The string to sign is the HTTP verb, a timestamp and the request path,
//! each followed by a newline:
//!
//! ```text
//! GET\n
//! Sun, 06 Nov 1994 08:49:37 GMT\n
//! /wow/item/19019\n
//! ```
//!
//! The signature is the standard base64 encoding of HMAC-SHA1 over that
//! string, keyed by the secret key. Timestamps always use the IMF-fixdate
//! form in UTC so the same instant signs to the same bytes on every host.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

type HmacSha1 = Hmac<Sha1>;

/// `strftime` pattern for the signed timestamp (IMF-fixdate, UTC)
pub const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Authorization scheme tag
pub const AUTH_SCHEME: &str = "BNET";

/// Source of the signing timestamp.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Signature for a single authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub verb: String,
    pub path: String,
    pub timestamp: String,
    pub signature: String,
}

impl SignedRequest {
    /// Authorization header value for `public_key`.
    ///
    /// The value starts with a single space: `" BNET <public>:<signature>"`.
    pub fn authorization(&self, public_key: &str) -> String {
        authorization_header(public_key, &self.signature)
    }
}

/// Computes request signatures using an injectable clock.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    clock: Arc<dyn Clock>,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSigner {
    /// Signer using the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Signer whose timestamp never changes
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::with_clock(Arc::new(FixedClock(at)))
    }

    /// Sign `verb` and `path` with the secret key held by `config`.
    pub fn sign(&self, config: &ClientConfig, verb: &str, path: &str) -> Result<SignedRequest> {
        let timestamp = format_timestamp(self.clock.now());
        let signature = signature(config.secret_key(), verb, &timestamp, path)?;

        tracing::trace!(verb, path, timestamp = %timestamp, "signed request");

        Ok(SignedRequest {
            verb: verb.to_string(),
            path: path.to_string(),
            timestamp,
            signature,
        })
    }
}

/// Render a timestamp the way it appears in the signed message
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Build the newline-joined message that gets signed.
pub fn canonical_message(verb: &str, timestamp: &str, path: &str) -> String {
    [verb, timestamp, path, ""].join("\n")
}

/// Base64 HMAC-SHA1 of the canonical message keyed by `secret`.
pub fn signature(secret: &str, verb: &str, timestamp: &str, path: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).map_err(ApiError::signing)?;
    mac.update(canonical_message(verb, timestamp, path).as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Authorization header value: `" BNET <public_key>:<signature>"`.
pub fn authorization_header(public_key: &str, signature: &str) -> String {
    format!(" {AUTH_SCHEME} {public_key}:{signature}")
}
