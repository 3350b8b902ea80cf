//! Full-frame CPU rendering. Every call starts from a cleared surface and
//! paints the whole scene, so the output is a pure function of its inputs.

use crate::compositor::RegionCompositor;
use crate::image_loader::{PixelSource, SeamAxis, SeamOverlay, SeamSegment};
use crate::mask::Mask;
use crate::settings::Settings;
use crate::viewport::{Affine, Point, ViewState};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use rayon::prelude::*;

pub const CLEAR: [u8; 4] = [0, 0, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    TileView,
    PhotoPreview,
}

/// Everything a frame depends on.
pub struct Scene<'a> {
    pub mode: RenderMode,
    pub texture: Option<&'a PixelSource>,
    pub tiles: u32,
    pub view: ViewState,
    /// `Some` only when the seam overlay is switched on.
    pub seams: Option<&'a SeamOverlay>,
    /// `None` while the photo or mask is missing.
    pub preview: Option<(&'a PixelSource, &'a Mask)>,
    pub settings: &'a Settings,
}

/// Straight-alpha "over" in sRGB space. Approximate, not colorimetric.
pub fn blend_over(dst: &mut [u8], src: [u8; 4], opacity: f32) {
    let sa = src[3] as f32 / 255.0 * opacity.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

pub fn render(scene: &Scene, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba(CLEAR));
    if width == 0 || height == 0 {
        return canvas;
    }

    match scene.mode {
        RenderMode::TileView => {
            if let Some(texture) = scene.texture {
                draw_tiles(&mut canvas, texture, scene.tiles, &scene.view);
                if let Some(seams) = scene.seams {
                    draw_seams(&mut canvas, seams, scene.tiles, &scene.view, scene.settings);
                }
            }
        }
        RenderMode::PhotoPreview => match scene.preview {
            Some((photo, mask)) => {
                RegionCompositor::new(photo, mask, &scene.settings.preview.regions).render(
                    &mut canvas,
                    scene.texture,
                    &scene.view,
                );
            }
            None => draw_placeholder(&mut canvas, scene.settings.placeholder_color),
        },
    }

    canvas
}

/// Grid space (texture pixels, `tiles` repetitions per axis) to canvas pixels.
fn grid_transform(canvas: &RgbaImage, tile_size: (u32, u32), tiles: u32, view: &ViewState) -> Affine {
    let (w, h) = canvas.dimensions();
    let grid = ((tile_size.0 * tiles) as f32, (tile_size.1 * tiles) as f32);
    view.content_to_canvas((w as f32, h as f32), grid)
}

fn draw_tiles(canvas: &mut RgbaImage, texture: &PixelSource, tiles: u32, view: &ViewState) {
    let Some(inv) = grid_transform(canvas, texture.dimensions(), tiles, view).inverse() else {
        return;
    };
    let (tex_w, tex_h) = texture.dimensions();
    let grid_w = (tex_w * tiles) as f32;
    let grid_h = (tex_h * tiles) as f32;
    let width = canvas.width();
    let row_bytes = width as usize * 4;

    canvas.par_chunks_mut(row_bytes).enumerate().for_each(|(y, row)| {
        for x in 0..width as usize {
            let p = inv.apply(Point::new(x as f32 + 0.5, y as f32 + 0.5));
            if p.x < 0.0 || p.y < 0.0 || p.x >= grid_w || p.y >= grid_h {
                continue;
            }
            let texel = texture.sample((p.x as u32) % tex_w, (p.y as u32) % tex_h);
            blend_over(&mut row[x * 4..x * 4 + 4], texel, 1.0);
        }
    });
}

fn draw_seams(canvas: &mut RgbaImage, seams: &SeamOverlay, tiles: u32, view: &ViewState, settings: &Settings) {
    let forward = grid_transform(canvas, seams.dimensions(), tiles, view);
    let Some(inv) = forward.inverse() else {
        return;
    };

    let min_half = settings.seams.min_screen_width / (2.0 * view.scale);
    let half = (settings.seams.stroke_width / 2.0).max(min_half);
    for segment in seams.segments(tiles) {
        fill_segment(canvas, &segment, half, &forward, &inv);
    }
}

/// Rasterizes one seam segment as a thin rectangle in grid space. Rectangles of
/// neighbouring rows share no pixels, so each is blended once.
fn fill_segment(canvas: &mut RgbaImage, segment: &SeamSegment, half: f32, forward: &Affine, inv: &Affine) {
    let (x0, x1, y0, y1) = match segment.axis {
        SeamAxis::Vertical => (segment.position - half, segment.position + half, segment.start, segment.end),
        SeamAxis::Horizontal => (segment.start, segment.end, segment.position - half, segment.position + half),
    };

    let corners = [
        forward.apply(Point::new(x0, y0)),
        forward.apply(Point::new(x1, y0)),
        forward.apply(Point::new(x0, y1)),
        forward.apply(Point::new(x1, y1)),
    ];
    let (w, h) = canvas.dimensions();
    let min_x = corners.iter().map(|c| c.x).fold(f32::INFINITY, f32::min).floor().max(0.0);
    let max_x = corners.iter().map(|c| c.x).fold(f32::NEG_INFINITY, f32::max).ceil().min(w as f32);
    let min_y = corners.iter().map(|c| c.y).fold(f32::INFINITY, f32::min).floor().max(0.0);
    let max_y = corners.iter().map(|c| c.y).fold(f32::NEG_INFINITY, f32::max).ceil().min(h as f32);
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    let src = [segment.rgb[0], segment.rgb[1], segment.rgb[2], 255];
    for py in min_y as u32..max_y as u32 {
        for px in min_x as u32..max_x as u32 {
            let p = inv.apply(Point::new(px as f32 + 0.5, py as f32 + 0.5));
            if p.x >= x0 && p.x < x1 && p.y >= y0 && p.y < y1 {
                let pixel = canvas.get_pixel_mut(px, py);
                blend_over(&mut pixel.0, src, segment.alpha);
            }
        }
    }
}

/// Static stand-in for the photo preview while its assets are missing.
fn draw_placeholder(canvas: &mut RgbaImage, color: [u8; 3]) {
    let (w, h) = canvas.dimensions();
    let base = Rgba([color[0], color[1], color[2], 255]);
    draw_filled_rect_mut(canvas, Rect::at(0, 0).of_size(w, h), base);

    let card_w = (w / 3).max(1);
    let card_h = (h / 6).max(1);
    let card = Rect::at(((w - card_w) / 2) as i32, ((h - card_h) / 2) as i32).of_size(card_w, card_h);
    let lighter = Rgba([
        color[0].saturating_add(16),
        color[1].saturating_add(16),
        color[2].saturating_add(16),
        255,
    ]);
    draw_filled_rect_mut(canvas, card, lighter);
    draw_hollow_rect_mut(canvas, card, Rgba([lighter[0].saturating_add(24), lighter[1].saturating_add(24), lighter[2].saturating_add(24), 255]));
}
