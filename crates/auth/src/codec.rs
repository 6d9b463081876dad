//! Credential decoding.
//!
//! A credential is `header.claims.signature`, each segment base64url. Only the
//! claims segment is read; the signature was checked by the issuer and is not
//! re-verified here. Decoding is purely structural and never panics.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

use crate::Claims;

/// Number of `.`-separated segments in a well-formed credential.
pub const SEGMENT_COUNT: usize = 3;

/// base64url, accepting payloads with or without `=` padding.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no credential present")]
    Missing,

    #[error("credential is empty")]
    Empty,

    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("claims segment is empty")]
    EmptyPayload,

    #[error("claims segment is not valid base64url: {0}")]
    Base64(String),

    #[error("claims payload is not valid JSON: {0}")]
    Json(String),

    #[error("claims payload is not a JSON object")]
    NotAnObject,
}

/// Decode the claims carried by `credential`.
pub fn decode(credential: &str) -> Result<Claims, DecodeError> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(DecodeError::Empty);
    }

    let segments: Vec<&str> = credential.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(DecodeError::SegmentCount(segments.len()));
    }

    let payload = segments[1];
    if payload.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let bytes = SEGMENT_ENGINE
        .decode(payload)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }

    serde_json::from_value(value).map_err(|e| DecodeError::Json(e.to_string()))
}

/// Like [`decode`], treating an absent credential as [`DecodeError::Missing`].
pub fn decode_optional(credential: Option<&str>) -> Result<Claims, DecodeError> {
    match credential {
        Some(c) => decode(c),
        None => Err(DecodeError::Missing),
    }
}
