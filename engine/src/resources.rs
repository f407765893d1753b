// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Asset groups and the packages they're loaded from.

mod asset_group;
mod asset_id;
mod asset_manager;
mod deserialize;
mod loaders;
pub mod package;
mod serialize;
mod shader_context;

pub use asset_group::{AssetGroup, INVALID_ASSET_NAME};
pub use asset_id::{AssetGroupId, AssetId, AssetType};
pub use asset_manager::{AssetError, AssetManager};
pub use deserialize::DeserializeError;
pub use loaders::{AssetLoaders, LoadError};
pub use shader_context::{
    ShaderContext, UniformLocation, MAX_SHADER_UNIFORMS, UNIFORM_NAME_LENGTH,
};
