//! # QR rendering
//!
//! Rendering is a capability: a [`QrRenderer`] turns payload text plus
//! [`RenderOptions`] into image bytes. Two backends exist:
//!
//! - [`PngRenderer`], a grayscale raster image (cargo feature `png`, on by
//!   default);
//! - [`SvgRenderer`], a vector image with no extra dependencies.
//!
//! Both compute the module matrix with the `qrcode` crate and differ only in
//! output format. [`default_renderer()`] picks PNG when it is compiled in.

use std::path::Path;
use std::str::FromStr;

use qrcode::types::{Color, EcLevel};
use qrcode::QrCode;
use serde::{Deserialize, Serialize};

use dsc_core::ValidationError;

use crate::error::RenderError;

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    #[default]
    Q,
    /// ~30% recovery.
    H,
}

impl ErrorCorrection {
    pub const ALL: [ErrorCorrection; 4] = [
        ErrorCorrection::L,
        ErrorCorrection::M,
        ErrorCorrection::Q,
        ErrorCorrection::H,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCorrection::L => "L",
            ErrorCorrection::M => "M",
            ErrorCorrection::Q => "Q",
            ErrorCorrection::H => "H",
        }
    }
}

impl std::fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ec| ec.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "error_correction",
                value: s.to_string(),
                expected: "L, M, Q, H".to_string(),
            })
    }
}

impl From<ErrorCorrection> for EcLevel {
    fn from(ec: ErrorCorrection) -> Self {
        match ec {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

/// Validated rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    error_correction: ErrorCorrection,
    box_size: u32,
    border: u32,
}

impl RenderOptions {
    /// Build options; `box_size` and `border` must each be at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BelowMinimum`] naming the offending option.
    pub fn new(
        error_correction: ErrorCorrection,
        box_size: u32,
        border: u32,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [("box_size", box_size), ("border", border)] {
            if value < 1 {
                return Err(ValidationError::BelowMinimum {
                    field,
                    min: 1,
                    value: u64::from(value),
                });
            }
        }
        Ok(Self {
            error_correction,
            box_size,
            border,
        })
    }

    pub fn error_correction(&self) -> ErrorCorrection {
        self.error_correction
    }

    /// Pixels per module.
    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    /// Quiet-zone width in modules.
    pub fn border(&self) -> u32 {
        self.border
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::Q,
            box_size: 10,
            border: 4,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_box_size() -> u32 {
    10
}

fn default_border() -> u32 {
    4
}

/// QR section of a configuration file.
///
/// Deserialization rejects a `box_size` or `border` below one, so a loaded
/// config always yields [`RenderOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQrConfig")]
pub struct QrConfig {
    /// Gzip the JSON before base64.
    pub use_compression: bool,
    pub error_correction: ErrorCorrection,
    pub box_size: u32,
    pub border: u32,
}

#[derive(Deserialize)]
struct RawQrConfig {
    #[serde(default = "default_true")]
    use_compression: bool,
    #[serde(default)]
    error_correction: ErrorCorrection,
    #[serde(default = "default_box_size")]
    box_size: u32,
    #[serde(default = "default_border")]
    border: u32,
}

impl TryFrom<RawQrConfig> for QrConfig {
    type Error = ValidationError;

    fn try_from(raw: RawQrConfig) -> Result<Self, Self::Error> {
        let config = QrConfig {
            use_compression: raw.use_compression,
            error_correction: raw.error_correction,
            box_size: raw.box_size,
            border: raw.border,
        };
        config.render_options()?;
        Ok(config)
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            use_compression: true,
            error_correction: ErrorCorrection::Q,
            box_size: default_box_size(),
            border: default_border(),
        }
    }
}

impl QrConfig {
    /// Validate the image options.
    pub fn render_options(&self) -> Result<RenderOptions, ValidationError> {
        RenderOptions::new(self.error_correction, self.box_size, self.border)
    }
}

/// Turns payload text into an encoded image.
pub trait QrRenderer: Send + Sync {
    /// File extension of the produced image, without the dot.
    fn extension(&self) -> &'static str;

    /// Render `text` as a QR code image.
    fn render(&self, text: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError>;
}

/// Dark/light modules of a QR symbol, row-major, without quiet zone.
struct ModuleGrid {
    width: usize,
    dark: Vec<bool>,
}

impl ModuleGrid {
    fn encode(text: &str, ec: ErrorCorrection) -> Result<Self, RenderError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), ec.into())?;
        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        tracing::debug!(width, error_correction = %ec, "computed QR module grid");
        Ok(Self { width, dark })
    }

    fn is_dark(&self, x: usize, y: usize) -> bool {
        self.dark[y * self.width + x]
    }

    /// Image side in pixels, quiet zone included.
    fn side_pixels(&self, options: &RenderOptions) -> Result<u32, RenderError> {
        let modules = self.width + 2 * options.border as usize;
        u32::try_from(modules)
            .ok()
            .and_then(|m| m.checked_mul(options.box_size))
            .ok_or(RenderError::TooLarge {
                modules,
                box_size: options.box_size,
            })
    }

    /// Dark module origins in pixel coordinates.
    fn dark_origins(&self, options: &RenderOptions) -> impl Iterator<Item = (u32, u32)> + '_ {
        let offset = options.border as usize;
        let scale = options.box_size as usize;
        (0..self.width).flat_map(move |y| {
            (0..self.width)
                .filter(move |&x| self.is_dark(x, y))
                .map(move |x| (((x + offset) * scale) as u32, ((y + offset) * scale) as u32))
        })
    }
}

/// Grayscale PNG output.
#[cfg(feature = "png")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PngRenderer;

#[cfg(feature = "png")]
impl QrRenderer for PngRenderer {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn render(&self, text: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        use image::{GrayImage, ImageFormat, Luma};

        let grid = ModuleGrid::encode(text, options.error_correction)?;
        let side = grid.side_pixels(options)?;
        let mut img = GrayImage::from_pixel(side, side, Luma([255u8]));
        for (px, py) in grid.dark_origins(options) {
            for dy in 0..options.box_size {
                for dx in 0..options.box_size {
                    img.put_pixel(px + dx, py + dy, Luma([0u8]));
                }
            }
        }
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

/// SVG output: white background, one path of black squares.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl QrRenderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, text: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        use std::fmt::Write as _;

        let grid = ModuleGrid::encode(text, options.error_correction)?;
        let side = grid.side_pixels(options)?;
        let b = options.box_size;
        let mut path = String::new();
        for (px, py) in grid.dark_origins(options) {
            // Writing into a String cannot fail.
            let _ = write!(path, "M{px},{py}h{b}v{b}h-{b}z");
        }
        let svg = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
             width=\"{side}\" height=\"{side}\" viewBox=\"0 0 {side} {side}\" \
             shape-rendering=\"crispEdges\">\n\
             <rect width=\"{side}\" height=\"{side}\" fill=\"#ffffff\"/>\n\
             <path fill=\"#000000\" d=\"{path}\"/>\n\
             </svg>\n"
        );
        Ok(svg.into_bytes())
    }
}

/// The best renderer compiled into this build.
pub fn default_renderer() -> Box<dyn QrRenderer> {
    #[cfg(feature = "png")]
    {
        Box::new(PngRenderer)
    }
    #[cfg(not(feature = "png"))]
    {
        Box::new(SvgRenderer)
    }
}

/// Render `text` and write the image to `path`, creating parent directories.
pub fn render_to_file(
    renderer: &dyn QrRenderer,
    text: &str,
    options: &RenderOptions,
    path: &Path,
) -> Result<(), RenderError> {
    let bytes = renderer.render(text, options)?;
    let io_err = |source| RenderError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, &bytes).map_err(io_err)?;
    tracing::info!(
        path = %path.display(),
        format = renderer.extension(),
        bytes = bytes.len(),
        "wrote QR image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Alphanumeric mode, fits version 1 at every level.
    const TEXT: &str = "VC:TEST";

    #[test]
    fn error_correction_parsing() {
        assert_eq!("q".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::Q);
        assert_eq!("H".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::H);
        let err = "Z".parse::<ErrorCorrection>().unwrap_err();
        assert!(err.to_string().contains("L, M, Q, H"));
        assert_eq!(ErrorCorrection::default(), ErrorCorrection::Q);
    }

    #[test]
    fn error_correction_serde() {
        let v: ErrorCorrection = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(v, ErrorCorrection::M);
        assert!(serde_json::from_str::<ErrorCorrection>("\"X\"").is_err());
    }

    #[test]
    fn options_reject_zero() {
        let err = RenderOptions::new(ErrorCorrection::Q, 0, 4).unwrap_err();
        assert_eq!(err.to_string(), "box_size must be at least 1, got 0");
        let err = RenderOptions::new(ErrorCorrection::Q, 10, 0).unwrap_err();
        assert_eq!(err.to_string(), "border must be at least 1, got 0");
        assert!(RenderOptions::new(ErrorCorrection::L, 1, 1).is_ok());
    }

    #[test]
    fn qr_config_defaults() {
        let cfg: QrConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, QrConfig::default());
        assert!(cfg.use_compression);
        assert_eq!(cfg.render_options().unwrap(), RenderOptions::default());
    }

    #[test]
    fn qr_config_rejects_zero_sizes_on_load() {
        let err = serde_json::from_str::<QrConfig>(r#"{"box_size": 0}"#).unwrap_err();
        assert!(err.to_string().contains("box_size must be at least 1"), "{err}");
        let err = serde_json::from_str::<QrConfig>(r#"{"border": 0}"#).unwrap_err();
        assert!(err.to_string().contains("border must be at least 1"), "{err}");

        let cfg: QrConfig = serde_json::from_str(r#"{"box_size": 1, "border": 1}"#).unwrap();
        assert_eq!(cfg.box_size, 1);
    }

    #[test]
    fn svg_dimensions_follow_options() {
        let options = RenderOptions::new(ErrorCorrection::Q, 3, 2).unwrap();
        let svg = String::from_utf8(SvgRenderer.render(TEXT, &options).unwrap()).unwrap();
        // Version 1 is 21 modules wide; plus 2 * 2 border modules, times 3 px.
        assert!(svg.contains("width=\"75\" height=\"75\""), "{svg}");
        assert!(svg.contains("<path fill=\"#000000\" d=\"M"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn svg_first_finder_module_is_dark() {
        let options = RenderOptions::new(ErrorCorrection::M, 1, 1).unwrap();
        let svg = String::from_utf8(SvgRenderer.render(TEXT, &options).unwrap()).unwrap();
        assert!(svg.contains("d=\"M1,1h1v1h-1z"));
    }

    #[test]
    fn oversized_text_is_a_qr_error() {
        let text = "x".repeat(8000);
        let err = SvgRenderer
            .render(&text, &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::Qr(_)));
    }

    #[test]
    fn render_to_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credential_qr.svg");
        render_to_file(&SvgRenderer, TEXT, &RenderOptions::default(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml"));
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_has_signature_and_size() {
        let options = RenderOptions::new(ErrorCorrection::Q, 4, 1).unwrap();
        let bytes = PngRenderer.render(TEXT, &options).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let img = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(img.width(), (21 + 2) * 4);
        assert_eq!(img.height(), img.width());
        // Quiet zone is white, top-left finder corner is black.
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(4, 4).0, [0]);
    }

    #[test]
    fn default_renderer_extension() {
        let expected = if cfg!(feature = "png") { "png" } else { "svg" };
        assert_eq!(default_renderer().extension(), expected);
    }
}
