use std::io::Cursor;
use std::sync::Arc;

use image::{ImageOutputFormat, RgbaImage};

use crate::core::error::{AppError, AppResult};
use crate::core::models::LogoImage;

/// Uploads above this are rejected before any decode work.
pub const MAX_LOGO_BYTES: u64 = 2 * 1024 * 1024;

/// Decodes an uploaded logo file into a shareable raster handle.
pub fn decode_logo(bytes: &[u8]) -> AppResult<LogoImage> {
    if bytes.len() as u64 > MAX_LOGO_BYTES {
        return Err(AppError::OversizedUpload {
            actual: bytes.len() as u64,
            max: MAX_LOGO_BYTES,
        });
    }
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AppError::Image(e.to_string()))?;
    Ok(Arc::new(decoded.to_rgba8()))
}

pub fn encode_png(raster: &RgbaImage) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| AppError::Image(e.to_string()))?;
    Ok(bytes)
}
