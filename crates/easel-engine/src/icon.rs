use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::coords::Size;

/// Immutable RGBA8 image handle used as a window icon.
///
/// Cloning shares the pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    size: Size,
    rgba: Arc<[u8]>,
}

impl Icon {
    /// Wraps straight-alpha RGBA8 pixels, row-major.
    pub fn from_rgba(rgba: Vec<u8>, size: Size) -> Result<Self> {
        anyhow::ensure!(!size.is_empty(), "icon has zero size");
        anyhow::ensure!(
            rgba.len() == size.area() * 4,
            "icon buffer holds {} bytes, {size} RGBA needs {}",
            rgba.len(),
            size.area() * 4
        );

        Ok(Self {
            size,
            rgba: rgba.into(),
        })
    }

    /// Decodes an image file (PNG, BMP, ICO) into an icon.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("failed to decode icon {}", path.display()))?
            .into_rgba8();

        let size = Size::new(img.width(), img.height());
        Self::from_rgba(img.into_raw(), size)
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}
