//! # Capacity estimation
//!
//! Reports how large a document's transport payload is and which QR version
//! should hold it.
//!
//! The version table gives the maximum payload bytes per version 1..=20 and
//! is applied at every error-correction level; see [`recommended_version()`].

use serde::{Serialize, Serializer};

use crate::codec::{self, gzip};
use crate::error::EncodeError;

/// Maximum payload bytes for QR versions 1 through 20, ascending.
pub const QR_VERSION_CAPACITIES: [usize; 20] = [
    80, 154, 224, 279, 335, 395, 468, 535, 619, 667, 758, 854, 938, 1046, 1153, 1249, 1352, 1460,
    1588, 1704,
];

/// The smallest QR version whose capacity covers a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecommendedVersion {
    /// A version from 1 to 20.
    Version(u8),
    /// Longer than the version 20 capacity.
    Oversized,
}

impl std::fmt::Display for RecommendedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendedVersion::Version(v) => write!(f, "Version {v}"),
            RecommendedVersion::Oversized => f.write_str("Version 20+ (may not scan reliably)"),
        }
    }
}

impl Serialize for RecommendedVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Map a payload length to the first version whose capacity is at least
/// `payload_len`.
pub fn recommended_version(payload_len: usize) -> RecommendedVersion {
    QR_VERSION_CAPACITIES
        .iter()
        .zip(1u8..)
        .find(|(capacity, _)| payload_len <= **capacity)
        .map_or(RecommendedVersion::Oversized, |(_, version)| {
            RecommendedVersion::Version(version)
        })
}

/// Size facts about one document's transport encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeReport {
    /// Compact JSON length.
    pub original_json_bytes: usize,
    /// Gzip length of the compact JSON, whether or not the payload uses it.
    pub compressed_bytes: usize,
    /// Length of the final `VC:` payload.
    pub payload_bytes: usize,
    /// `compressed_bytes / original_json_bytes` as a percentage.
    pub compression_ratio_percent: f64,
    pub recommended_version: RecommendedVersion,
}

impl SizeReport {
    /// The compression ratio with two decimals, e.g. `"42.17%"`.
    pub fn compression_ratio(&self) -> String {
        format!("{:.2}%", self.compression_ratio_percent)
    }
}

/// Measure the transport encoding of `document`.
///
/// # Errors
///
/// Fails only if `document` cannot be serialized as JSON.
pub fn estimate_capacity<T>(document: &T, compress: bool) -> Result<SizeReport, EncodeError>
where
    T: serde::Serialize + ?Sized,
{
    let json = serde_json::to_vec(document)?;
    let compressed = gzip(&json)?;
    let payload = codec::encode(document, compress)?;

    let compression_ratio_percent = if json.is_empty() {
        0.0
    } else {
        compressed.len() as f64 / json.len() as f64 * 100.0
    };
    Ok(SizeReport {
        original_json_bytes: json.len(),
        compressed_bytes: compressed.len(),
        payload_bytes: payload.len(),
        compression_ratio_percent,
        recommended_version: recommended_version(payload.len()),
    })
}
