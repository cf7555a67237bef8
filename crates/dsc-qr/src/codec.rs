//! # Transport codec
//!
//! Turns a credential document into the compact text carried by a QR code
//! and back.
//!
//! ## Wire format
//!
//! ```text
//! VC:<url-safe base64, padded>( gzip?( compact UTF-8 JSON ) )
//! ```
//!
//! Compression is self-describing: [`decode()`] inspects the decoded bytes
//! for the gzip magic `1f 8b` and decompresses only then, so payloads made
//! with or without compression decode without a flag from the caller.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::capacity::{self, SizeReport};
use crate::error::{EncodeError, MalformedPayloadError, PayloadFault};

/// Marker every transport payload starts with.
pub const TRANSPORT_MARKER: &str = "VC:";

/// First two bytes of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// An encoded credential: `VC:` followed by base64.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransportPayload(String);

impl TransportPayload {
    /// The payload text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Byte length of the payload text.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TransportPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TransportPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode a document as a transport payload.
///
/// # Errors
///
/// Fails only if `document` cannot be serialized as JSON; any
/// `serde_json::Value` or credential document encodes.
pub fn encode<T>(document: &T, compress: bool) -> Result<TransportPayload, EncodeError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec(document)?;
    let json_bytes = json.len();
    let bytes = if compress { gzip(&json)? } else { json };
    tracing::debug!(
        json_bytes,
        encoded_bytes = bytes.len(),
        compress,
        "encoded credential for QR transport"
    );
    Ok(TransportPayload(format!(
        "{TRANSPORT_MARKER}{}",
        URL_SAFE.encode(bytes)
    )))
}

/// Decode a transport payload into `T`.
///
/// # Errors
///
/// Returns [`MalformedPayloadError`] if the marker is missing, the base64 is
/// invalid, a gzip stream is corrupt, or the JSON does not parse into `T`.
pub fn decode<T: DeserializeOwned>(payload: &str) -> Result<T, MalformedPayloadError> {
    let encoded = payload
        .strip_prefix(TRANSPORT_MARKER)
        .ok_or(PayloadFault::MissingMarker)?;
    let raw = URL_SAFE.decode(encoded).map_err(PayloadFault::from)?;
    let json = if raw.starts_with(&GZIP_MAGIC) {
        gunzip(&raw).map_err(PayloadFault::Decompress)?
    } else {
        raw
    };
    Ok(serde_json::from_slice(&json).map_err(PayloadFault::from)?)
}

/// Gzip `bytes` at the highest compression level.
pub(crate) fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}

fn gunzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

/// Codec with a fixed compression setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportCodec {
    compress: bool,
}

impl Default for TransportCodec {
    fn default() -> Self {
        Self { compress: true }
    }
}

impl TransportCodec {
    pub fn new(compress: bool) -> Self {
        Self { compress }
    }

    pub fn compresses(&self) -> bool {
        self.compress
    }

    /// [`encode()`] with this codec's compression setting.
    pub fn encode<T: Serialize + ?Sized>(&self, document: &T) -> Result<TransportPayload, EncodeError> {
        encode(document, self.compress)
    }

    /// [`decode()`]; compression is detected from the payload.
    pub fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T, MalformedPayloadError> {
        decode(payload)
    }

    /// [`capacity::estimate_capacity()`] with this codec's compression setting.
    pub fn estimate_capacity<T: Serialize + ?Sized>(
        &self,
        document: &T,
    ) -> Result<SizeReport, EncodeError> {
        capacity::estimate_capacity(document, self.compress)
    }
}
