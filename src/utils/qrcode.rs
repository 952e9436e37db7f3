use image::imageops::{self, FilterType};
use image::RgbaImage;
use qrcode::{EcLevel, QrCode};

use crate::core::error::{AppError, AppResult};
use crate::core::models::Color;

/// Renders `payload` as a QR raster of exactly `size`x`size` pixels.
///
/// Error correction is pinned to the strongest level: logo overlays occlude
/// the central modules and only level H tolerates that loss. Modules are
/// rasterized 1:1 and then nearest-neighbor scaled so edges stay crisp at
/// every preset size.
pub fn render_raster(payload: &str, size: u32, fg: Color, bg: Color) -> AppResult<RgbaImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
        .map_err(|e| AppError::Encode(e.to_string()))?;

    let width = code.width() as u32;
    let colors = code.to_colors();
    let mut modules = RgbaImage::new(width, width);
    for (i, module) in colors.iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        let pixel = match module {
            qrcode::Color::Dark => fg.rgba(),
            qrcode::Color::Light => bg.rgba(),
        };
        modules.put_pixel(x, y, pixel);
    }

    Ok(imageops::resize(&modules, size, size, FilterType::Nearest))
}
