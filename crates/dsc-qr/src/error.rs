//! # QR transport errors
//!
//! Decoding surfaces a single [`MalformedPayloadError`] whatever stage
//! failed; the stage and its underlying cause are kept in [`PayloadFault`].

use thiserror::Error;

/// The decode stage that rejected a payload.
#[derive(Error, Debug)]
pub enum PayloadFault {
    /// The payload does not begin with the `VC:` marker.
    #[error("payload must start with 'VC:'")]
    MissingMarker,

    /// The text after the marker is not URL-safe base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The bytes carry a gzip header but do not decompress.
    #[error("gzip decompression failed: {0}")]
    Decompress(#[source] std::io::Error),

    /// The (decompressed) bytes are not a UTF-8 JSON document.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A transport payload could not be decoded.
#[derive(Error, Debug)]
#[error("malformed QR payload: {fault}")]
pub struct MalformedPayloadError {
    #[source]
    pub fault: PayloadFault,
}

impl From<PayloadFault> for MalformedPayloadError {
    fn from(fault: PayloadFault) -> Self {
        Self { fault }
    }
}

/// A document could not be encoded.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The document is not representable as JSON.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The gzip stream could not be written.
    #[error("gzip compression failed: {0}")]
    Compress(#[from] std::io::Error),
}

/// A QR image could not be produced.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The text does not fit any QR version at the requested level.
    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    /// The image side length overflows.
    #[error("QR image too large: {modules} modules at box size {box_size}")]
    TooLarge {
        /// Modules per side including the border.
        modules: usize,
        /// Pixels per module.
        box_size: u32,
    },

    /// Raster encoding failed.
    #[cfg(feature = "png")]
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// Writing the rendered file failed.
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
