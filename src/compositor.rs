//! Photo preview: a repeating texture fill masked into labelled regions of a
//! reference photo.

use crate::image_loader::PixelSource;
use crate::mask::Mask;
use crate::renderer::blend_over;
use crate::settings::RegionRule;
use crate::viewport::{Point, ViewState};
use image::RgbaImage;
use rayon::prelude::*;

/// Where a "contain"-fitted image lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Canvas pixels per source pixel.
    pub scale: f32,
}

impl FitRect {
    /// Largest aspect-preserving fit of `content` inside `canvas`, centered.
    pub fn contain(content: (u32, u32), canvas: (u32, u32)) -> Self {
        let (cw, ch) = (content.0 as f32, content.1 as f32);
        let (w, h) = (canvas.0 as f32, canvas.1 as f32);
        let scale = (w / cw).min(h / ch);
        let width = cw * scale;
        let height = ch * scale;
        Self {
            x: (w - width) / 2.0,
            y: (h - height) / 2.0,
            width,
            height,
            scale,
        }
    }

    pub fn to_source(&self, canvas_x: f32, canvas_y: f32) -> Point {
        Point::new((canvas_x - self.x) / self.scale, (canvas_y - self.y) / self.scale)
    }
}

pub struct RegionCompositor<'a> {
    photo: &'a PixelSource,
    mask: &'a Mask,
    regions: &'a [RegionRule],
}

impl<'a> RegionCompositor<'a> {
    pub fn new(photo: &'a PixelSource, mask: &'a Mask, regions: &'a [RegionRule]) -> Self {
        Self { photo, mask, regions }
    }

    pub fn fit(&self, canvas: (u32, u32)) -> FitRect {
        FitRect::contain(self.photo.dimensions(), canvas)
    }

    /// Draws the photo and, when a tile is given, the masked fills onto
    /// `canvas`. Pixels outside the fitted photo are left untouched.
    pub fn render(&self, canvas: &mut RgbaImage, tile: Option<&PixelSource>, view: &ViewState) {
        let (canvas_w, canvas_h) = canvas.dimensions();
        if canvas_w == 0 || canvas_h == 0 {
            return;
        }
        let fit = self.fit((canvas_w, canvas_h));
        let (photo_w, photo_h) = self.photo.dimensions();
        let (mask_w, mask_h) = self.mask.dimensions();

        // Photo-native pixels -> tile pixels. The pan is given in canvas pixels
        // and has to shrink or grow with the fit.
        let pattern = tile.and_then(|tile| {
            let anchor = Point::new(tile.width() as f32 / 2.0, tile.height() as f32 / 2.0);
            let center = Point::new(photo_w as f32 / 2.0, photo_h as f32 / 2.0);
            view.scaled_pan_mapping(center, anchor, fit.scale)
                .inverse()
                .map(|inv| (tile, inv))
        });
        let shifts: Vec<(f32, f32)> = match tile {
            Some(tile) => self
                .regions
                .iter()
                .map(|r| (r.texture_offset[0] * tile.width() as f32, r.texture_offset[1] * tile.height() as f32))
                .collect(),
            None => Vec::new(),
        };
        let region_count = self.mask.region_count().min(self.regions.len());

        let x_range = (fit.x.max(0.0).floor() as u32, ((fit.x + fit.width).ceil() as u32).min(canvas_w));
        let y_range = (fit.y.max(0.0).floor() as u32, ((fit.y + fit.height).ceil() as u32).min(canvas_h));
        let row_bytes = canvas_w as usize * 4;

        canvas.par_chunks_mut(row_bytes).enumerate().for_each(|(y, row)| {
            let y = y as u32;
            if y < y_range.0 || y >= y_range.1 {
                return;
            }
            for x in x_range.0..x_range.1 {
                let q = fit.to_source(x as f32 + 0.5, y as f32 + 0.5);
                if q.x < 0.0 || q.y < 0.0 || q.x >= photo_w as f32 || q.y >= photo_h as f32 {
                    continue;
                }
                let dst = &mut row[x as usize * 4..x as usize * 4 + 4];

                let px = (q.x as u32).min(photo_w - 1);
                let py = (q.y as u32).min(photo_h - 1);
                blend_over(dst, self.photo.sample(px, py), 1.0);

                let Some((tile, inv)) = pattern else {
                    continue;
                };
                let mx = ((q.x * mask_w as f32 / photo_w as f32) as u32).min(mask_w - 1);
                let my = ((q.y * mask_h as f32 / photo_h as f32) as u32).min(mask_h - 1);

                // Fixed order keeps overlap at region borders reproducible.
                for region in 0..region_count {
                    if !self.mask.is_opaque(region, mx, my) {
                        continue;
                    }
                    let u = inv.apply(q);
                    let (dx, dy) = shifts[region];
                    let texel = tile.sample_wrapped((u.x + dx).floor() as i64, (u.y + dy).floor() as i64);
                    blend_over(dst, texel, 1.0);
                }
            }
        });
    }
}
