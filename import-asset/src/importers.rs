// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use engine::resources::{AssetLoaders, LoadError};
use platform::{AudioBufferDesc, GfxShaderDesc, GfxTextureDesc};

pub mod audio;
pub mod shader;
pub mod texture;

/// Loads assets from files on disk, based on their contents (and file
/// extensions, where that helps figuring out the format).
pub struct FileLoaders;

impl AssetLoaders for FileLoaders {
    fn load_texture(&mut self, path: &Path) -> Result<GfxTextureDesc, LoadError> {
        Ok(texture::load(path)?)
    }

    fn load_shader(&mut self, path: &Path) -> Result<GfxShaderDesc, LoadError> {
        Ok(shader::load(path)?)
    }

    fn load_audio(&mut self, path: &Path) -> Result<AudioBufferDesc, LoadError> {
        Ok(audio::load(path)?)
    }
}
