// SPDX-License-Identifier: GPL-3.0-only

//! Frame sources for the decoding engine

use crate::errors::{EngineError, EngineResult};
use image::GrayImage;
use std::path::PathBuf;
use tracing::debug;

/// Supplies grayscale frames to the engine's capture loop.
///
/// The source owns whatever camera or file handle backs the frames:
/// `open` acquires it, `close` releases it. `close` must be idempotent —
/// the engine calls it on every shutdown path.
pub trait FrameSource: Send {
    /// Acquire the backing resource. `device_id` is the session's
    /// selected device, or `None` for the source default.
    fn open(&mut self, device_id: Option<&str>) -> EngineResult<()>;

    /// Next frame, or `None` when the source is exhausted
    fn next_frame(&mut self) -> EngineResult<Option<GrayImage>>;

    /// Release the backing resource
    fn close(&mut self);
}

/// Frame source that decodes still images from disk, in path order.
///
/// Stands in for a live camera pipeline when scanning files (CLI input,
/// tests). Each file yields exactly one frame; after the last file the
/// source reports exhaustion.
pub struct ImageFileSource {
    paths: Vec<PathBuf>,
    cursor: usize,
    open: bool,
}

impl ImageFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            cursor: 0,
            open: false,
        }
    }
}

impl FrameSource for ImageFileSource {
    fn open(&mut self, device_id: Option<&str>) -> EngineResult<()> {
        debug!(files = self.paths.len(), ?device_id, "Opening image file source");
        self.cursor = 0;
        self.open = true;
        Ok(())
    }

    fn next_frame(&mut self) -> EngineResult<Option<GrayImage>> {
        if !self.open {
            return Err(EngineError::SourceFailed("source not open".to_string()));
        }
        let Some(path) = self.paths.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;

        let img = image::open(path)
            .map_err(|err| EngineError::SourceFailed(format!("{}: {}", path.display(), err)))?;
        debug!(path = %path.display(), "Loaded frame");
        Ok(Some(img.to_luma8()))
    }

    fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &std::path::Path, name: &str, luma: u8) -> PathBuf {
        let path = dir.join(name);
        let img = GrayImage::from_pixel(4, 4, image::Luma([luma]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_yields_frames_in_path_order_then_ends() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_png(dir.path(), "a.png", 10);
        let second = write_png(dir.path(), "b.png", 200);

        let mut source = ImageFileSource::new(vec![first, second]);
        source.open(None).unwrap();

        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.get_pixel(0, 0).0[0], 10);
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.get_pixel(0, 0).0[0], 200);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_next_frame_requires_open() {
        let mut source = ImageFileSource::new(Vec::new());
        assert!(source.next_frame().is_err());

        source.open(None).unwrap();
        assert!(source.next_frame().unwrap().is_none());

        source.close();
        assert!(source.next_frame().is_err());
    }
}
