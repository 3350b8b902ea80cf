//! All inspector state plus the "mark dirty, then render once" contract.
//!
//! Every mutating method sets the dirty flag; [`Inspector::render_if_dirty`]
//! produces at most one frame per batch of input and never paints
//! incrementally.

use crate::assets::{AssetKind, AssetLoader, LoaderMessage, Waker};
use crate::errors::{InspectorError, Result};
use crate::gesture::{GestureConfig, GestureRouter, GestureState, InputEvent};
use crate::image_loader::{PixelSource, SeamOverlay};
use crate::mask::Mask;
use crate::renderer::{self, RenderMode, Scene};
use crate::settings::Settings;
use crate::viewport::ViewState;
use image::RgbaImage;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
enum AssetSlot<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> AssetSlot<T> {
    fn ready(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewStatus {
    /// Preview never requested.
    Inactive,
    Loading,
    Ready,
    Failed(String),
}

pub struct Inspector {
    settings: Settings,

    // Texture
    texture: Option<PixelSource>,
    texture_path: Option<PathBuf>,
    texture_loading: bool,
    seams: Option<SeamOverlay>,
    last_error: Option<String>,

    // Grid and overlay
    tiles: u32,
    show_seams: bool,
    mode: RenderMode,

    // View
    view: ViewState,
    gestures: GestureRouter,

    // Photo preview
    photo: AssetSlot<PixelSource>,
    mask: AssetSlot<Mask>,

    loader: AssetLoader,

    // Redraw scheduling
    dirty: bool,
    last_size: Option<(u32, u32)>,
}

impl Inspector {
    pub fn new(settings: Settings) -> Self {
        let gestures = GestureRouter::new(GestureConfig::from_settings(&settings));
        Self {
            tiles: settings.default_tiles.max(1),
            show_seams: settings.show_seams_on_start,
            settings,
            texture: None,
            texture_path: None,
            texture_loading: false,
            seams: None,
            last_error: None,
            mode: RenderMode::TileView,
            view: ViewState::default(),
            gestures,
            photo: AssetSlot::Idle,
            mask: AssetSlot::Idle,
            loader: AssetLoader::new(),
            dirty: true,
            last_size: None,
        }
    }

    pub fn set_waker(&mut self, waker: Waker) {
        self.loader.set_waker(waker);
    }

    // --- accessors ---------------------------------------------------------

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    pub fn tiles(&self) -> u32 {
        self.tiles
    }

    pub fn show_seams(&self) -> bool {
        self.show_seams
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn texture(&self) -> Option<&PixelSource> {
        self.texture.as_ref()
    }

    pub fn texture_path(&self) -> Option<&Path> {
        self.texture_path.as_deref()
    }

    pub fn is_loading_texture(&self) -> bool {
        self.texture_loading
    }

    pub fn seam_overlay(&self) -> Option<&SeamOverlay> {
        self.seams.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Region names of the loaded mask, in compositing order.
    pub fn preview_regions(&self) -> &[String] {
        self.mask.ready().map(Mask::region_names).unwrap_or(&[])
    }

    pub fn preview_status(&self) -> PreviewStatus {
        match (&self.photo, &self.mask) {
            (AssetSlot::Failed(e), _) | (_, AssetSlot::Failed(e)) => PreviewStatus::Failed(e.clone()),
            (AssetSlot::Ready(_), AssetSlot::Ready(_)) => PreviewStatus::Ready,
            (AssetSlot::Idle, AssetSlot::Idle) => PreviewStatus::Inactive,
            _ => PreviewStatus::Loading,
        }
    }

    // --- view --------------------------------------------------------------

    pub fn handle_input(&mut self, event: &InputEvent) {
        let next = self.gestures.handle(self.view, event);
        if next != self.view {
            self.view = next;
            self.dirty = true;
        }
    }

    /// Forgets every active pointer, e.g. when the pointer leaves the window.
    pub fn cancel_gestures(&mut self) {
        self.gestures.cancel();
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
        self.dirty = true;
    }

    /// Rotates by `steps` configured increments (negative turns the other way).
    pub fn rotate_step(&mut self, steps: f32) {
        self.view.rotate_by(self.settings.rotate_step() * steps);
        self.dirty = true;
    }

    // --- grid / overlay / mode ---------------------------------------------

    pub fn set_tiles(&mut self, tiles: u32) -> Result<()> {
        if tiles == 0 || tiles > self.settings.max_tiles {
            return Err(InspectorError::InvalidTileCount { count: tiles });
        }
        if tiles != self.tiles {
            self.tiles = tiles;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn set_show_seams(&mut self, show: bool) {
        if show != self.show_seams {
            self.show_seams = show;
            self.dirty = true;
        }
    }

    pub fn toggle_seams(&mut self) {
        self.set_show_seams(!self.show_seams);
    }

    pub fn toggle_preview(&mut self) -> RenderMode {
        let next = match self.mode {
            RenderMode::TileView => RenderMode::PhotoPreview,
            RenderMode::PhotoPreview => RenderMode::TileView,
        };
        self.set_mode(next);
        next
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode == RenderMode::PhotoPreview {
            self.ensure_preview_assets();
        }
        if mode != self.mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    /// Starts loading the photo and mask the first time only.
    fn ensure_preview_assets(&mut self) {
        if matches!(self.photo, AssetSlot::Idle) {
            self.loader.request(AssetKind::Photo, self.settings.preview.photo_path.clone());
            self.photo = AssetSlot::Loading;
        }
        if matches!(self.mask, AssetSlot::Idle) {
            self.loader.request(AssetKind::Mask, self.settings.preview.mask_path.clone());
            self.mask = AssetSlot::Loading;
        }
    }

    // --- assets ------------------------------------------------------------

    pub fn open_texture(&mut self, path: PathBuf) {
        self.loader.request(AssetKind::Texture, path);
        self.texture_loading = true;
    }

    /// Installs a decoded texture: recomputes the seam overlay and resets the view.
    pub fn set_texture(&mut self, source: PixelSource, path: Option<PathBuf>) {
        let seams = SeamOverlay::analyze(&source, &self.settings.seams);
        log::info!(
            "Texture {}x{} ready, seam tone {:?}",
            source.width(),
            source.height(),
            seams.color().tone
        );
        self.seams = Some(seams);
        self.texture = Some(source);
        self.texture_path = path;
        self.texture_loading = false;
        self.last_error = None;
        self.view.reset();
        self.gestures.cancel();
        self.dirty = true;
    }

    pub fn set_photo(&mut self, photo: PixelSource) {
        self.photo = AssetSlot::Ready(photo);
        self.dirty = true;
    }

    /// Classifies `label` into region channels. A failed classification leaves
    /// the preview on its placeholder.
    pub fn set_mask_label(&mut self, label: &PixelSource) -> Result<()> {
        match Mask::classify(label, &self.settings.preview.regions) {
            Ok(mask) => {
                self.mask = AssetSlot::Ready(mask);
                self.dirty = true;
                Ok(())
            }
            Err(e) => {
                self.mask = AssetSlot::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Installs already decoded preview assets, bypassing the loader.
    pub fn set_preview_assets(&mut self, photo: PixelSource, label: &PixelSource) -> Result<()> {
        self.set_photo(photo);
        self.set_mask_label(label)
    }

    /// Applies finished background loads. Returns true if anything changed.
    pub fn poll_assets(&mut self) -> bool {
        let messages = self.loader.drain();
        let changed = !messages.is_empty();
        for msg in messages {
            self.apply_message(msg);
        }
        changed
    }

    fn apply_message(&mut self, msg: LoaderMessage) {
        match msg {
            LoaderMessage::Loaded { kind: AssetKind::Texture, path, source, .. } => {
                self.set_texture(source, Some(path));
            }
            LoaderMessage::Loaded { kind: AssetKind::Photo, source, .. } => {
                self.set_photo(source);
            }
            LoaderMessage::Loaded { kind: AssetKind::Mask, path, source, .. } => {
                if let Err(e) = self.set_mask_label(&source) {
                    log::warn!("Mask {} unusable: {}", path.display(), e);
                }
            }
            LoaderMessage::Failed { kind, path, message, .. } => {
                log::warn!("Failed to load {:?} {}: {}", kind, path.display(), message);
                match kind {
                    AssetKind::Texture => {
                        self.texture_loading = false;
                        self.last_error = Some(message);
                    }
                    AssetKind::Photo => self.photo = AssetSlot::Failed(message),
                    AssetKind::Mask => self.mask = AssetSlot::Failed(message),
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn wait_for_assets(&mut self, count: usize, timeout: std::time::Duration) {
        for _ in 0..count {
            match self.loader.wait(timeout) {
                Some(msg) => self.apply_message(msg),
                None => break,
            }
        }
    }

    // --- rendering ---------------------------------------------------------

    /// Paints the full frame from current state.
    pub fn render(&self, width: u32, height: u32) -> RgbaImage {
        let preview = match (self.photo.ready(), self.mask.ready()) {
            (Some(photo), Some(mask)) => Some((photo, mask)),
            _ => None,
        };
        let scene = Scene {
            mode: self.mode,
            texture: self.texture.as_ref(),
            tiles: self.tiles,
            view: self.view,
            seams: if self.show_seams { self.seams.as_ref() } else { None },
            preview,
            settings: &self.settings,
        };
        renderer::render(&scene, width, height)
    }

    /// Renders only if state changed or the surface was resized since the last frame.
    pub fn render_if_dirty(&mut self, width: u32, height: u32) -> Option<RgbaImage> {
        if !self.dirty && self.last_size == Some((width, height)) {
            return None;
        }
        let started = std::time::Instant::now();
        let frame = self.render(width, height);
        tracing::trace!(width, height, elapsed_us = started.elapsed().as_micros() as u64, "frame rendered");
        self.dirty = false;
        self.last_size = Some((width, height));
        Some(frame)
    }
}
