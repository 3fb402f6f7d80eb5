//! QR code rendering

use qrcode::render::svg;
use qrcode::QrCode;

use crate::domain::{DomainError, DomainResult};

/// Render `data` as a standalone SVG document.
pub fn render_svg(data: &str) -> DomainResult<String> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| DomainError::Internal(format!("Failed to encode QR code: {}", e)))?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .quiet_zone(true)
        .build())
}
