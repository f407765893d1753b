// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::Context;
use image::load_from_memory;
use platform::{GfxTextureDesc, PixelFormat};
use tracing::debug;

pub fn load(image_path: &Path) -> anyhow::Result<GfxTextureDesc> {
    let image_bytes = fs::read(image_path).context("Failed to open texture file for importing")?;
    let image = load_from_memory(&image_bytes)
        .context("Failed to read image file as an image (unsupported format?)")?;
    debug!(
        "Read a {}x{} {:?} image from {}.",
        image.width(),
        image.height(),
        image.color(),
        image_path.display(),
    );

    let image = image.into_rgba8();
    Ok(GfxTextureDesc {
        width: image.width(),
        height: image.height(),
        format: PixelFormat::Rgba,
        pixels: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use platform::PixelFormat;

    use super::load;

    #[test]
    fn images_are_converted_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let image = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8 * 100, y as u8 * 100, 7]));
        image.save(&path).unwrap();

        let texture = load(&path).unwrap();
        assert_eq!((3, 2), (texture.width, texture.height));
        assert_eq!(PixelFormat::Rgba, texture.format);
        assert_eq!(texture.pixel_data_size(), texture.pixels.len());
        // The last pixel, (2, 1)
        assert_eq!(&[200, 100, 7, 255], &texture.pixels[20..24]);
    }

    #[test]
    fn other_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, "hello").unwrap();
        assert!(load(&path).is_err());
    }
}
