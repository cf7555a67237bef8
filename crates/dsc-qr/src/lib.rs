//! # dsc-qr — QR Transport for Dynamic Scoliosis Credentials
//!
//! - **Codec** ([`encode()`], [`decode()`], [`TransportCodec`]): compact
//!   JSON, optional gzip, URL-safe base64, `VC:` marker. Decoding detects
//!   compression from the payload itself.
//! - **Capacity** ([`estimate_capacity()`]): payload sizes, compression
//!   ratio and the recommended QR version.
//! - **Rendering** ([`QrRenderer`]): PNG and SVG backends over the same
//!   module matrix.
//!
//! The codec works on any `Serialize`/`DeserializeOwned` type, so it has no
//! dependency on the credential model in `dsc-vc`.
//!
//! ## Crate Policy
//!
//! - Every decode failure is a [`MalformedPayloadError`].
//! - Library code logs through `tracing` only; subscribers are installed by
//!   binaries.

pub mod capacity;
pub mod codec;
pub mod error;
pub mod render;

pub use capacity::{estimate_capacity, recommended_version, RecommendedVersion, SizeReport};
pub use codec::{decode, encode, TransportCodec, TransportPayload, TRANSPORT_MARKER};
pub use error::{EncodeError, MalformedPayloadError, PayloadFault, RenderError};
#[cfg(feature = "png")]
pub use render::PngRenderer;
pub use render::{
    default_renderer, render_to_file, ErrorCorrection, QrConfig, QrRenderer, RenderOptions,
    SvgRenderer,
};
