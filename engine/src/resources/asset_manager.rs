// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{collections::HashMap, path::Path};

use platform::{
    AudioBufferDesc, AudioBufferRef, BufferRef, GfxBufferDesc, GfxShaderDesc, GfxTextureDesc,
    Platform, ShaderRef, TextureRef,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::{
    package::{self, PackageError, PackagedAsset},
    AssetGroup, AssetGroupId, AssetId, AssetLoaders, AssetType, ShaderContext,
};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset group {0} does not exist")]
    UnknownGroup(AssetGroupId),
    #[error("the backend failed to create a {asset_type} for group {group}")]
    Backend {
        group: AssetGroupId,
        asset_type: AssetType,
    },
    #[error("group {group} has no room for more {asset_type} assets")]
    PoolFull {
        group: AssetGroupId,
        asset_type: AssetType,
    },
    #[error("{shader:?} is not a shader of group {group}")]
    InvalidShader {
        group: AssetGroupId,
        shader: AssetId,
    },
    #[error(transparent)]
    Package(#[from] PackageError),
}

/// The registry of every [`AssetGroup`].
///
/// Groups are identified by [`AssetGroupId`]s handed out from a counter, so
/// the id of a destroyed group is never reused. Every function that creates or
/// destroys backend resources takes the [`Platform`] that owns them.
///
/// Groups must be destroyed with [`AssetManager::destroy_group`] or
/// [`AssetManager::destroy_all`], dropping the manager doesn't release
/// anything.
#[derive(Debug, Default)]
pub struct AssetManager {
    groups: HashMap<AssetGroupId, AssetGroup>,
    next_group_id: i32,
}

macro_rules! gen_asset_pool_code {
    (
        $asset_type:expr,
        $desc_type:ty,
        $ref_type:ty,
        $field:ident,
        $create_fn:ident,
        $push_fn:ident,
        $get_fn:ident
    ) => {
        impl AssetManager {
            #[doc = concat!("Creates a backend resource with [`Platform::", stringify!($create_fn), "`]")]
            /// and adds it to the group. The returned id is the index of the
            /// new asset within the group.
            pub fn $push_fn(
                &mut self,
                platform: &dyn Platform,
                group: AssetGroupId,
                desc: &$desc_type,
            ) -> Result<AssetId, AssetError> {
                let group = self.group_mut(group)?;
                let id = group.next_id($asset_type)?;
                let Some(resource) = platform.$create_fn(desc) else {
                    error!(
                        "Failed to create a {} for group {}: the backend returned nothing.",
                        $asset_type, group.id,
                    );
                    return Err(AssetError::Backend {
                        group: group.id,
                        asset_type: $asset_type,
                    });
                };
                group.$field.push(resource);
                debug!("Created {id:?} in group {:?}.", group.name);
                Ok(id)
            }

            /// Returns the backend resource `id` refers to. Returns None (and
            /// panics in debug builds) if the id is of the wrong type, out of
            /// bounds, or its group has been destroyed.
            pub fn $get_fn(&self, id: AssetId) -> Option<$ref_type> {
                let group = self.group_of(id, $asset_type)?;
                let resource = id.index().and_then(|i| group.$field.get(i)).copied();
                debug_assert!(resource.is_some(), "{id:?} is out of bounds");
                resource
            }
        }
    };
}

gen_asset_pool_code!(
    AssetType::Buffer,
    GfxBufferDesc,
    BufferRef,
    buffers,
    create_buffer,
    push_buffer,
    get_buffer
);

gen_asset_pool_code!(
    AssetType::Texture,
    GfxTextureDesc,
    TextureRef,
    textures,
    create_texture,
    push_texture,
    get_texture
);

gen_asset_pool_code!(
    AssetType::Shader,
    GfxShaderDesc,
    ShaderRef,
    shaders,
    create_shader,
    push_shader,
    get_shader
);

gen_asset_pool_code!(
    AssetType::AudioBuffer,
    AudioBufferDesc,
    AudioBufferRef,
    audio_buffers,
    create_audio_buffer,
    push_audio_buffer,
    get_audio_buffer
);

impl AssetManager {
    pub fn new() -> AssetManager {
        AssetManager::default()
    }

    /// Creates a new, empty asset group.
    pub fn create_group(&mut self, name: &str) -> AssetGroupId {
        let id = AssetGroupId::new(self.next_group_id);
        self.next_group_id += 1;
        self.groups.insert(id, AssetGroup::new(id, name));
        info!("Created asset group {id} ({name:?}).");
        id
    }

    /// Destroys every resource in the group and forgets the group. Any
    /// [`AssetId`]s of the group are invalid afterwards.
    pub fn destroy_group(&mut self, platform: &dyn Platform, id: AssetGroupId) {
        debug_assert!(
            self.groups.contains_key(&id),
            "tried to destroy nonexistent asset group {id}",
        );
        let Some(group) = self.groups.remove(&id) else {
            warn!("Tried to destroy asset group {id}, which doesn't exist.");
            return;
        };
        let name = group.name.clone();
        let counts = AssetType::ALL.map(|asset_type| group.asset_count(asset_type));
        group.destroy(platform);
        info!(
            "Destroyed asset group {id} ({name:?}) with {} assets.",
            counts.iter().sum::<usize>(),
        );
    }

    /// Destroys every group, e.g. when shutting down.
    pub fn destroy_all(&mut self, platform: &dyn Platform) {
        let mut ids: Vec<AssetGroupId> = self.groups.keys().copied().collect();
        ids.sort();
        for id in ids {
            self.destroy_group(platform, id);
        }
    }

    /// Creates a [`ShaderContext`] for an existing shader, caching the
    /// locations of its uniforms. The shader must be in the same group as the
    /// context, so that the context can't outlive it.
    pub fn push_shader_context(
        &mut self,
        platform: &dyn Platform,
        group_id: AssetGroupId,
        shader: AssetId,
    ) -> Result<AssetId, AssetError> {
        let group = self.group_mut(group_id)?;
        if shader.group() != group_id || shader.asset_type() != AssetType::Shader {
            error!(
                "Failed to create a shader context: {shader:?} is not a shader of group {:?}.",
                group.name,
            );
            return Err(AssetError::InvalidShader {
                group: group_id,
                shader,
            });
        }
        let Some(shader_ref) = shader.index().and_then(|i| group.shaders.get(i)).copied() else {
            error!("Failed to create a shader context: {shader:?} is out of bounds.");
            return Err(AssetError::InvalidShader {
                group: group_id,
                shader,
            });
        };
        let id = group.next_id(AssetType::ShaderContext)?;
        let context = ShaderContext::new(shader, platform.shader_uniforms(shader_ref));
        debug!(
            "Created {id:?} with {} uniforms in group {:?}.",
            context.uniforms().len(),
            group.name,
        );
        group.shader_contexts.push(Box::new(context));
        Ok(id)
    }

    /// Creates a shader from `desc` and a [`ShaderContext`] for it, returning
    /// the id of the context.
    pub fn push_shader_context_from_desc(
        &mut self,
        platform: &dyn Platform,
        group: AssetGroupId,
        desc: &GfxShaderDesc,
    ) -> Result<AssetId, AssetError> {
        let shader = self.push_shader(platform, group, desc)?;
        self.push_shader_context(platform, group, shader)
    }

    pub fn get_shader_context(&self, id: AssetId) -> Option<&ShaderContext> {
        let group = self.group_of(id, AssetType::ShaderContext)?;
        let context = id.index().and_then(|i| group.shader_contexts.get(i));
        debug_assert!(context.is_some(), "{id:?} is out of bounds");
        context.map(|context| &**context)
    }

    /// Makes the asset findable with [`AssetManager::get_id`]. If the name is
    /// already taken in the group, it will refer to `id` from now on. The
    /// `"invalid"` name is reserved, and naming an asset that is ignored with a
    /// warning.
    pub fn name_asset(&mut self, id: AssetId, name: &str) -> Result<(), AssetError> {
        let group = self.group_mut(id.group())?;
        group.name_asset(id, name);
        Ok(())
    }

    /// Looks up an asset by name. If there's no such asset, the error is
    /// logged, and the group's `"invalid"` id is returned. Panics in debug
    /// builds if the group doesn't exist.
    pub fn get_id(&self, group: AssetGroupId, name: &str) -> AssetId {
        debug_assert!(
            self.groups.contains_key(&group),
            "tried to look up {name:?} from nonexistent asset group {group}",
        );
        let Some(group) = self.groups.get(&group) else {
            error!("Tried to look up asset {name:?} from asset group {group}, which doesn't exist.");
            return AssetId::INVALID;
        };
        group.lookup(name).unwrap_or_else(|| {
            error!("Asset group {:?} has no asset called {name:?}.", group.name);
            group.invalid_id()
        })
    }

    /// Reads the package at `path` and adds every asset in it to the group,
    /// named after the files they were packaged from. Returns the amount of
    /// assets added.
    ///
    /// If this fails partway through, the assets added before the failure
    /// stay in the group.
    pub fn load_package(
        &mut self,
        platform: &dyn Platform,
        group: AssetGroupId,
        path: &Path,
    ) -> Result<usize, AssetError> {
        self.group_mut(group)?;
        let records = package::read_file(path)?;
        let count = records.len();
        for record in records {
            let id = match &record.asset {
                PackagedAsset::Texture(texture) => self.push_texture(platform, group, texture)?,
                PackagedAsset::Shader(shader) => self.push_shader(platform, group, shader)?,
                PackagedAsset::Audio(audio) => self.push_audio_buffer(platform, group, audio)?,
            };
            self.name_asset(id, &record.name)?;
        }
        info!("Loaded {count} assets from {} into group {group}.", path.display());
        Ok(count)
    }

    /// Builds a package from a manifest for this group to load later. Errors
    /// are logged, and reported as `false`.
    pub fn build_package(
        &self,
        group: AssetGroupId,
        manifest: &Path,
        output: &Path,
        loaders: &mut dyn AssetLoaders,
    ) -> bool {
        debug_assert!(
            self.groups.contains_key(&group),
            "tried to build a package for nonexistent asset group {group}",
        );
        match package::build(manifest, output, loaders) {
            Ok(summary) => {
                debug!(
                    "Built package {} for group {group} with {} assets.",
                    output.display(),
                    summary.total_written(),
                );
                true
            }
            Err(err) => {
                error!(
                    "Failed to build package {} from {} for group {group}: {err}",
                    output.display(),
                    manifest.display(),
                );
                false
            }
        }
    }

    pub fn group_name(&self, group: AssetGroupId) -> Option<&str> {
        self.groups.get(&group).map(|group| group.name.as_str())
    }

    /// The amount of assets of the given type in the group, or zero if the
    /// group doesn't exist.
    pub fn asset_count(&self, group: AssetGroupId, asset_type: AssetType) -> usize {
        self.groups
            .get(&group)
            .map_or(0, |group| group.asset_count(asset_type))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn group_mut(&mut self, id: AssetGroupId) -> Result<&mut AssetGroup, AssetError> {
        self.groups.get_mut(&id).ok_or_else(|| {
            error!("Asset group {id} does not exist.");
            AssetError::UnknownGroup(id)
        })
    }

    /// Returns the group of `id` if it exists and `id` is of the right type.
    fn group_of(&self, id: AssetId, asset_type: AssetType) -> Option<&AssetGroup> {
        debug_assert_eq!(asset_type, id.asset_type(), "{id:?} is not a {asset_type}");
        if id.asset_type() != asset_type {
            return None;
        }
        let group = self.groups.get(&id.group());
        debug_assert!(group.is_some(), "the group of {id:?} has been destroyed");
        group
    }
}
