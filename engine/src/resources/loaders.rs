// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{error::Error, path::Path};

use platform::{AudioBufferDesc, GfxShaderDesc, GfxTextureDesc};

/// The error type loaders return. Boxed so that loaders can use whatever
/// error handling their decoders use.
pub type LoadError = Box<dyn Error + Send + Sync>;

/// Format-specific loaders which turn source files into descriptors for the
/// package builder.
///
/// The engine doesn't decode any media formats itself, these are implemented
/// by the tool doing the packaging (see the import-asset crate).
pub trait AssetLoaders {
    fn load_texture(&mut self, path: &Path) -> Result<GfxTextureDesc, LoadError>;
    fn load_shader(&mut self, path: &Path) -> Result<GfxShaderDesc, LoadError>;
    fn load_audio(&mut self, path: &Path) -> Result<AudioBufferDesc, LoadError>;
}
