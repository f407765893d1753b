// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashMap;

use platform::{AudioBufferRef, BufferRef, Platform, ShaderRef, TextureRef};
use tracing::{trace, warn};

use super::{AssetError, AssetGroupId, AssetId, AssetType, ShaderContext};

/// The name every group maps to [`AssetId`]s which don't refer to any asset.
pub const INVALID_ASSET_NAME: &str = "invalid";

/// A named collection of backend resources which are created and destroyed
/// together. Each asset type has its own pool, and assets are only ever
/// appended to the pools, so the index of an asset stays valid until the
/// whole group is destroyed.
#[derive(Debug)]
pub struct AssetGroup {
    pub(super) id: AssetGroupId,
    pub(super) name: String,
    pub(super) buffers: Vec<BufferRef>,
    pub(super) textures: Vec<TextureRef>,
    pub(super) shaders: Vec<ShaderRef>,
    pub(super) audio_buffers: Vec<AudioBufferRef>,
    /// Shader contexts are boxed so that references to them stay small when
    /// passed around by draw code.
    pub(super) shader_contexts: Vec<Box<ShaderContext>>,
    names: HashMap<String, AssetId>,
}

impl AssetGroup {
    pub(super) fn new(id: AssetGroupId, name: &str) -> AssetGroup {
        let mut names = HashMap::new();
        names.insert(INVALID_ASSET_NAME.to_string(), AssetId::invalid_in(id));
        AssetGroup {
            id,
            name: name.to_string(),
            buffers: Vec::new(),
            textures: Vec::new(),
            shaders: Vec::new(),
            audio_buffers: Vec::new(),
            shader_contexts: Vec::new(),
            names,
        }
    }

    /// The amount of assets of the given type in the group. Types without a
    /// pool always have zero assets.
    pub fn asset_count(&self, asset_type: AssetType) -> usize {
        match asset_type {
            AssetType::Buffer => self.buffers.len(),
            AssetType::Texture => self.textures.len(),
            AssetType::Shader => self.shaders.len(),
            AssetType::ShaderContext => self.shader_contexts.len(),
            AssetType::AudioBuffer => self.audio_buffers.len(),
            AssetType::Animation | AssetType::Font | AssetType::Invalid => 0,
        }
    }

    /// Returns the id the next asset of the given type will get, or an error
    /// if the pool can't be indexed with an [`AssetId`] anymore.
    pub(super) fn next_id(&self, asset_type: AssetType) -> Result<AssetId, AssetError> {
        let index = i16::try_from(self.asset_count(asset_type)).map_err(|_| AssetError::PoolFull {
            group: self.id,
            asset_type,
        })?;
        Ok(AssetId::new(asset_type, self.id, index))
    }

    /// Maps `name` to `id`. The `"invalid"` name is reserved for the group's
    /// sentinel id, so it's never remapped.
    pub(super) fn name_asset(&mut self, id: AssetId, name: &str) {
        if name == INVALID_ASSET_NAME {
            warn!(
                "Not naming {id:?} {name:?} in group {:?}, the name is reserved for missing assets.",
                self.name,
            );
            return;
        }
        if let Some(previous) = self.names.insert(name.to_string(), id) {
            warn!(
                "Asset name {name:?} was already used in group {:?} by {previous:?}, it now refers to {id:?}.",
                self.name,
            );
        }
    }

    pub(super) fn lookup(&self, name: &str) -> Option<AssetId> {
        self.names.get(name).copied()
    }

    /// The id of the `"invalid"` entry of this group.
    pub(super) fn invalid_id(&self) -> AssetId {
        self.names
            .get(INVALID_ASSET_NAME)
            .copied()
            .unwrap_or(AssetId::invalid_in(self.id))
    }

    /// Releases every backend resource of the group. Compound assets go first,
    /// as they refer to the others.
    pub(super) fn destroy(self, platform: &dyn Platform) {
        let AssetGroup {
            id,
            name,
            buffers,
            textures,
            shaders,
            audio_buffers,
            shader_contexts,
            names: _,
        } = self;

        trace!(
            "Dropping {} shader contexts of group {id} ({name:?}).",
            shader_contexts.len()
        );
        drop(shader_contexts);

        for buffer in buffers {
            platform.destroy_buffer(buffer);
        }
        for texture in textures {
            platform.destroy_texture(texture);
        }
        for shader in shaders {
            platform.destroy_shader(shader);
        }
        for audio_buffer in audio_buffers {
            platform.destroy_audio_buffer(audio_buffer);
        }
    }
}
