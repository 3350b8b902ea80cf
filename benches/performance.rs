use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use tile_inspector::compositor::RegionCompositor;
use tile_inspector::mask::Mask;
use tile_inspector::renderer::{self, RenderMode, Scene};
use tile_inspector::{PixelSource, SeamOverlay, Settings, ViewState};

fn gradient_texture(size: u32) -> PixelSource {
    let img = RgbaImage::from_fn(size, size, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]));
    PixelSource::new(img).unwrap()
}

fn bench_seam_analysis(c: &mut Criterion) {
    let settings = Settings::default();
    let texture = gradient_texture(1024);

    c.bench_function("seam_analysis_1024x1024", |b| {
        b.iter(|| SeamOverlay::analyze(black_box(&texture), &settings.seams))
    });
}

fn bench_tile_view(c: &mut Criterion) {
    let settings = Settings::default();
    let texture = gradient_texture(256);
    let overlay = SeamOverlay::analyze(&texture, &settings.seams);
    let view = ViewState { scale: 1.3, offset_x: 12.0, offset_y: -7.0, rotation: 0.2 };

    c.bench_function("tile_view_3x3_with_seams_1920x1080", |b| {
        b.iter(|| {
            let scene = Scene {
                mode: RenderMode::TileView,
                texture: Some(&texture),
                tiles: 3,
                view,
                seams: Some(&overlay),
                preview: None,
                settings: &settings,
            };
            black_box(renderer::render(&scene, 1920, 1080))
        })
    });
}

fn bench_region_compositor(c: &mut Criterion) {
    let settings = Settings::default();
    let texture = gradient_texture(128);
    let photo = PixelSource::solid(1600, 1200, [90, 90, 90, 255]).unwrap();
    let label = PixelSource::new(RgbaImage::from_fn(800, 600, |_, y| {
        if y < 300 {
            Rgba([0, 0, 255, 255])
        } else {
            Rgba([0, 255, 0, 255])
        }
    }))
    .unwrap();
    let mask = Mask::classify(&label, &settings.preview.regions).unwrap();
    let compositor = RegionCompositor::new(&photo, &mask, &settings.preview.regions);

    c.bench_function("region_compositor_1920x1080", |b| {
        b.iter(|| {
            let mut canvas = RgbaImage::new(1920, 1080);
            compositor.render(&mut canvas, Some(&texture), &ViewState::default());
            black_box(canvas)
        })
    });
}

criterion_group!(benches, bench_seam_analysis, bench_tile_view, bench_region_compositor);
criterion_main!(benches);
