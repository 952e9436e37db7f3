//! Draws a padded, rounded-corner logo centered over a rendered QR raster.
//!
//! The compositor only paints on top of existing pixels: a background-colored
//! quiet-zone patch first, then the logo clipped to a slightly smaller
//! rounded rect. QR modules are never re-rendered here.

use image::imageops::{self, FilterType};
use image::{Pixel, RgbaImage};

use crate::core::models::{Color, LogoImage};

/// Corner radius of the background quiet-zone patch, in pixels.
const PATCH_RADIUS: f32 = 8.0;
/// Corner radius of the clipped logo itself, in pixels.
const LOGO_RADIUS: f32 = 6.0;
/// Quiet-zone padding around the logo, as a share of the raster edge.
const PAD_RATIO: f32 = 0.02;

/// Placement of a logo overlay on a `size`x`size` raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoGeometry {
    /// Logo edge length.
    pub edge: f32,
    /// Top-left offset of the logo (same on both axes; the logo is centered).
    pub pos: f32,
    /// Quiet-zone padding around the logo.
    pub pad: f32,
}

impl LogoGeometry {
    pub fn compute(size: u32, logo_size_pct: u8) -> Self {
        let size = size as f32;
        let edge = size * logo_size_pct as f32 / 100.0;
        Self {
            edge,
            pos: (size - edge) / 2.0,
            pad: size * PAD_RATIO,
        }
    }
}

/// True when the center of pixel `(px, py)` lies inside the rounded rect.
fn inside_rounded_rect(px: u32, py: u32, x: f32, y: f32, side: f32, radius: f32) -> bool {
    let sx = px as f32 + 0.5;
    let sy = py as f32 + 0.5;
    if sx < x || sx > x + side || sy < y || sy > y + side {
        return false;
    }
    let dx = (x + radius - sx).max(0.0).max(sx - (x + side - radius));
    let dy = (y + radius - sy).max(0.0).max(sy - (y + side - radius));
    dx * dx + dy * dy <= radius * radius
}

fn fill_rounded_rect(raster: &mut RgbaImage, x: f32, y: f32, side: f32, radius: f32, color: Color) {
    let (width, height) = raster.dimensions();
    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + side).ceil() as u32).min(width);
    let y1 = ((y + side).ceil() as u32).min(height);
    let pixel = color.rgba();
    for py in y0..y1 {
        for px in x0..x1 {
            if inside_rounded_rect(px, py, x, y, side, radius) {
                raster.put_pixel(px, py, pixel);
            }
        }
    }
}

/// Composites `logo` over `raster` per the current logo-size setting.
pub fn composite_logo(raster: &mut RgbaImage, size: u32, logo: &LogoImage, logo_size_pct: u8, bg: Color) {
    let geo = LogoGeometry::compute(size, logo_size_pct);
    if geo.edge < 1.0 {
        return;
    }

    // Quiet-zone patch keeps the modules behind the logo edge from being
    // misread as partial modules.
    fill_rounded_rect(
        raster,
        geo.pos - geo.pad,
        geo.pos - geo.pad,
        geo.edge + 2.0 * geo.pad,
        PATCH_RADIUS,
        bg,
    );

    let edge_px = geo.edge.round().max(1.0) as u32;
    let scaled = imageops::resize(logo.as_ref(), edge_px, edge_px, FilterType::Triangle);

    let (width, height) = raster.dimensions();
    let x0 = geo.pos.floor().max(0.0) as u32;
    let y0 = geo.pos.floor().max(0.0) as u32;
    let x1 = ((geo.pos + geo.edge).ceil() as u32).min(width);
    let y1 = ((geo.pos + geo.edge).ceil() as u32).min(height);
    for py in y0..y1 {
        for px in x0..x1 {
            if !inside_rounded_rect(px, py, geo.pos, geo.pos, geo.edge, LOGO_RADIUS) {
                continue;
            }
            let lx = ((px as f32 + 0.5 - geo.pos) as u32).min(edge_px - 1);
            let ly = ((py as f32 + 0.5 - geo.pos) as u32).min(edge_px - 1);
            let src = *scaled.get_pixel(lx, ly);
            raster.get_pixel_mut(px, py).blend(&src);
        }
    }
}
