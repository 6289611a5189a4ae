use crate::config::Config;
use gdk_pixbuf::{Pixbuf, PixbufAnimation, PixbufAnimationIter};
use std::path::Path;
use std::time::SystemTime;

/// An image file, possibly animated (GIF). Still images are a single frame.
pub struct Image {
    frames: PixbufAnimationIter,
}

impl Image {
    pub fn load(path: &Path) -> Option<Self> {
        PixbufAnimation::from_file(path)
            .inspect_err(|e| log::warn!("Failed to load image {}: {}", path.display(), e))
            .ok()
            .map(|animation| Self {
                frames: animation.iter(Some(SystemTime::now())),
            })
    }

    /// Frame to show right now.
    pub fn frame(&self) -> Pixbuf {
        self.frame_at(SystemTime::now())
    }

    fn frame_at(&self, time: SystemTime) -> Pixbuf {
        self.frames.advance(time);
        self.frames.pixbuf()
    }
}

/// Images drawn on top of the wheel. Missing files are logged and skipped.
pub struct Assets {
    pub center: Option<Image>,
    pub pointer: Option<Image>,
}

impl Assets {
    pub fn load(config: &Config) -> Self {
        let load = |file: Option<&Path>| file.and_then(|f| Image::load(&config.resolve(f)));
        Self {
            center: load(config.center.file.as_deref()),
            pointer: load(config.pointer.file.as_deref()),
        }
    }
}
