use std::path::Path;

use crate::AssetError;

/// Decoded 8-bit RGBA image, rows top to bottom.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Decode an image file. Grey, RGB and RGBA sources all expand to RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::info!(path = %path.display(), width, height, "loaded texture");
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Single opaque white texel.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey.png");
        let img = image::GrayImage::from_pixel(3, 2, image::Luma([128]));
        img.save(&path).unwrap();

        let tex = TextureData::load(&path).unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        assert_eq!(tex.rgba.len(), 3 * 2 * 4);
        assert_eq!(&tex.rgba[..4], &[128, 128, 128, 255]);
    }

    #[test]
    fn garbage_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(matches!(
            TextureData::load(&path),
            Err(AssetError::Image { .. })
        ));
    }

    #[test]
    fn white_is_one_texel() {
        let tex = TextureData::white();
        assert_eq!(tex.rgba, vec![255, 255, 255, 255]);
    }
}
