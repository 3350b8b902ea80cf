//! Background decoding of textures and preview assets.
//!
//! Each request runs on its own thread and reports back over a channel. Every
//! kind carries a generation counter; a completion whose generation is no
//! longer the latest for its kind is dropped, so a slow decode can never
//! overwrite a newer one.

use crate::image_loader::{self, PixelSource};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Photo,
    Mask,
}

pub enum LoaderMessage {
    Loaded {
        kind: AssetKind,
        generation: u64,
        path: PathBuf,
        source: PixelSource,
    },
    Failed {
        kind: AssetKind,
        generation: u64,
        path: PathBuf,
        message: String,
    },
}

impl LoaderMessage {
    pub fn kind(&self) -> AssetKind {
        match self {
            LoaderMessage::Loaded { kind, .. } | LoaderMessage::Failed { kind, .. } => *kind,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            LoaderMessage::Loaded { generation, .. } | LoaderMessage::Failed { generation, .. } => *generation,
        }
    }
}

/// Called from the loader thread after a message was sent.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct AssetLoader {
    tx: Sender<LoaderMessage>,
    rx: Receiver<LoaderMessage>,
    generations: HashMap<AssetKind, u64>,
    waker: Option<Waker>,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            generations: HashMap::new(),
            waker: None,
        }
    }

    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    /// Starts decoding `path` and returns the generation tag of the request.
    pub fn request(&mut self, kind: AssetKind, path: PathBuf) -> u64 {
        let generation = self.generations.entry(kind).or_insert(0);
        *generation += 1;
        let generation = *generation;

        log::info!("Loading {:?} from {} (generation {})", kind, path.display(), generation);
        self.spawn_loader(move || match image_loader::load_pixel_source(&path) {
            Ok(source) => LoaderMessage::Loaded { kind, generation, path, source },
            Err(e) => LoaderMessage::Failed { kind, generation, path, message: e.to_string() },
        });
        generation
    }

    fn spawn_loader<F>(&self, f: F)
    where
        F: FnOnce() -> LoaderMessage + Send + 'static,
    {
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        std::thread::spawn(move || {
            let _ = tx.send(f());
            if let Some(waker) = waker {
                waker();
            }
        });
    }

    pub fn is_current(&self, kind: AssetKind, generation: u64) -> bool {
        self.generations.get(&kind).copied() == Some(generation)
    }

    /// Non-blocking. Returns completions of the latest request per kind only.
    pub fn drain(&mut self) -> Vec<LoaderMessage> {
        let mut current = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            if self.is_current(msg.kind(), msg.generation()) {
                current.push(msg);
            } else {
                log::debug!(
                    "Discarding stale {:?} completion (generation {})",
                    msg.kind(),
                    msg.generation()
                );
            }
        }
        current
    }

    /// Blocks until a current completion arrives or `timeout` passes.
    #[cfg(test)]
    pub(crate) fn wait(&mut self, timeout: std::time::Duration) -> Option<LoaderMessage> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let left = deadline.checked_duration_since(std::time::Instant::now())?;
            let msg = self.rx.recv_timeout(left).ok()?;
            if self.is_current(msg.kind(), msg.generation()) {
                return Some(msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn write_png(dir: &std::path::Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255])).save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_completes_and_wakes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "a.png", 3, 5);

        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let mut loader = AssetLoader::new();
        loader.set_waker(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let generation = loader.request(AssetKind::Texture, path);
        match loader.wait(Duration::from_secs(10)) {
            Some(LoaderMessage::Loaded { source, generation: g, .. }) => {
                assert_eq!(g, generation);
                assert_eq!(source.dimensions(), (3, 5));
            }
            _ => panic!("expected a loaded texture"),
        }
        // The waker runs right after the send
        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stale_completion_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_png(dir.path(), "first.png", 2, 2);
        let second = write_png(dir.path(), "second.png", 7, 7);

        let mut loader = AssetLoader::new();
        let old = loader.request(AssetKind::Texture, first);
        let new = loader.request(AssetKind::Texture, second);
        assert!(!loader.is_current(AssetKind::Texture, old));
        assert!(loader.is_current(AssetKind::Texture, new));

        let msg = loader.wait(Duration::from_secs(10)).expect("second load");
        assert_eq!(msg.generation(), new);

        // Give the first thread time to finish; it must not surface
        std::thread::sleep(Duration::from_millis(100));
        assert!(loader.drain().is_empty());
    }

    #[test]
    fn test_failure_is_reported() {
        let mut loader = AssetLoader::new();
        loader.request(AssetKind::Mask, PathBuf::from("/no/such/mask.png"));
        match loader.wait(Duration::from_secs(10)) {
            Some(LoaderMessage::Failed { kind, message, .. }) => {
                assert_eq!(kind, AssetKind::Mask);
                assert!(message.contains("File not found"));
            }
            _ => panic!("expected a failure"),
        }
    }

    #[test]
    fn test_kinds_have_independent_generations() {
        let mut loader = AssetLoader::new();
        let t = loader.request(AssetKind::Texture, PathBuf::from("/missing/t.png"));
        let p = loader.request(AssetKind::Photo, PathBuf::from("/missing/p.png"));
        assert_eq!(t, 1);
        assert_eq!(p, 1);
        assert!(loader.is_current(AssetKind::Texture, 1));
        assert!(loader.is_current(AssetKind::Photo, 1));
    }
}
