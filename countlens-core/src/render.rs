//! Overlay rasterization: region outline, translucent fill, and the live
//! count badge, drawn into an RGBA canvas sized to the current display.
//!
//! Drawing is idempotent — the canvas is fully cleared before every
//! frame, so stale strokes never survive a redraw.

use anyhow::{Context, Result};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::geometry::PixelRect;

/// Overlay colors and stroke/text sizing.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub stroke: Rgba<u8>,
    pub fill: Rgba<u8>,
    pub badge_background: Rgba<u8>,
    pub badge_text: Rgba<u8>,
    pub stroke_width: u32,
    /// Integer scale applied to the 8×8 glyph grid.
    pub text_scale: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke: Rgba([0, 200, 83, 255]),
            fill: Rgba([0, 200, 83, 48]),
            badge_background: Rgba([20, 20, 20, 255]),
            badge_text: Rgba([255, 255, 255, 255]),
            stroke_width: 2,
            text_scale: 2,
        }
    }
}

#[derive(Debug)]
pub struct OverlayRenderer {
    canvas: RgbaImage,
    style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
            style,
        }
    }

    /// Resize the canvas to the current display dimensions. A no-op when
    /// the size is unchanged; contents are cleared on the next render
    /// either way.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas = RgbaImage::new(width, height);
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Draw one overlay frame: clear, translucent fill, outline, and the
    /// `Count: <n>` badge above the region's top-left corner. Skips
    /// silently while the canvas has no area (geometry not ready).
    pub fn render(&mut self, region: PixelRect, count: usize) {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        if w == 0 || h == 0 {
            return;
        }

        // Full clear so this frame never composes with the previous one.
        self.canvas.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));

        let x = region.x.round() as i32;
        let y = region.y.round() as i32;
        let rw = region.width.round().max(1.0) as u32;
        let rh = region.height.round().max(1.0) as u32;

        fill_rect_blend(&mut self.canvas, x, y, rw, rh, self.style.fill);

        let stroke = self.style.stroke;
        for t in 0..self.style.stroke_width as i32 {
            let inner_w = rw.saturating_sub(2 * t as u32);
            let inner_h = rh.saturating_sub(2 * t as u32);
            if inner_w == 0 || inner_h == 0 {
                break;
            }
            draw_hollow_rect_mut(
                &mut self.canvas,
                Rect::at(x + t, y + t).of_size(inner_w, inner_h),
                stroke,
            );
        }

        self.draw_badge(x, y, count);
    }

    fn draw_badge(&mut self, region_x: i32, region_y: i32, count: usize) {
        let text = format!("Count: {count}");
        let scale = self.style.text_scale.max(1);
        let glyph = 8 * scale as i32;
        let pad = (2 * scale) as i32;

        let badge_w = text.chars().count() as i32 * glyph + 2 * pad;
        let badge_h = glyph + 2 * pad;
        let badge_x = region_x.max(0);
        // Sits in the strip the drag clamp reserves above the region.
        let badge_y = (region_y - badge_h).max(0);

        fill_rect_blend(
            &mut self.canvas,
            badge_x,
            badge_y,
            badge_w as u32,
            badge_h as u32,
            self.style.badge_background,
        );
        draw_bitmap_text(
            &mut self.canvas,
            badge_x + pad,
            badge_y + pad,
            &text,
            self.style.badge_text,
            scale,
        );
    }

    /// PNG-encode the canvas for transport to the webview.
    pub fn to_png_base64(&self) -> Result<String> {
        let mut bytes = Vec::new();
        self.canvas
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .context("failed to encode overlay canvas as PNG")?;
        Ok(format!(
            "data:image/png;base64,{}",
            BASE64_STANDARD.encode(&bytes)
        ))
    }
}

fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let alpha = src.0[3] as u32;
    if alpha == 255 {
        return src;
    }
    let inv = 255 - alpha;
    let mix = |s: u8, d: u8| ((s as u32 * alpha + d as u32 * inv) / 255) as u8;
    Rgba([
        mix(src.0[0], dst.0[0]),
        mix(src.0[1], dst.0[1]),
        mix(src.0[2], dst.0[2]),
        dst.0[3].max(src.0[3]),
    ])
}

fn fill_rect_blend(img: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>) {
    let (img_w, img_h) = (img.width() as i32, img.height() as i32);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w as i32).min(img_w);
    let y1 = (y + h as i32).min(img_h);
    for py in y0..y1 {
        for px in x0..x1 {
            let dst = *img.get_pixel(px as u32, py as u32);
            img.put_pixel(px as u32, py as u32, blend_pixel(dst, color));
        }
    }
}

fn draw_bitmap_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>, scale: u32) {
    let scale = scale.max(1) as i32;
    let mut cursor_x = x;
    for ch in text.chars() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            cursor_x += 8 * scale;
            continue;
        };
        for (row_idx, row) in glyph.iter().enumerate() {
            let row_bits = *row;
            for col_idx in 0..8 {
                if (row_bits >> col_idx) & 1 == 0 {
                    continue;
                }
                let px = cursor_x + col_idx * scale;
                let py = y + row_idx as i32 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        let (tx, ty) = (px + sx, py + sy);
                        if tx >= 0
                            && ty >= 0
                            && (tx as u32) < img.width()
                            && (ty as u32) < img.height()
                        {
                            let dst = *img.get_pixel(tx as u32, ty as u32);
                            img.put_pixel(tx as u32, ty as u32, blend_pixel(dst, color));
                        }
                    }
                }
            }
        }
        cursor_x += 8 * scale;
    }
}
