//! QR encoding of envelope text.

use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::QrCode;
use tracing::debug;

use crate::config::QrConfig;
use crate::error::{RenderError, RenderResult};

/// Encode `payload` as a QR symbol at the configured error-correction level.
pub fn encode_qr(payload: &str, cfg: &QrConfig) -> RenderResult<QrCode> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), cfg.level.ec_level())
        .map_err(|e| match e {
            QrError::DataTooLong => RenderError::Capacity {
                bytes: payload.len(),
                level: cfg.level.as_str(),
            },
            other => RenderError::Qr(other.to_string()),
        })?;

    debug!(
        bytes = payload.len(),
        modules = code.width(),
        level = cfg.level.as_str(),
        "qr encoded"
    );
    Ok(code)
}

/// Render `payload` as a standalone SVG QR image.
pub fn render_qr_svg(payload: &str, cfg: &QrConfig) -> RenderResult<String> {
    let code = encode_qr(payload, cfg)?;
    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(cfg.size_px, cfg.size_px)
        .quiet_zone(cfg.quiet_zone)
        .build())
}
