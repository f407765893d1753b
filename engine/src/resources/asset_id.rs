// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Display};

use enum_map::Enum;

/// The kinds of assets an [`AssetGroup`](super::AssetGroup) can hold.
///
/// [`AssetType::Invalid`] is only used by sentinel [`AssetId`]s. The amount of
/// actual asset types is [`AssetType::COUNT`], and per-type tables are
/// [`enum_map::EnumMap`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum AssetType {
    Buffer,
    Texture,
    Shader,
    ShaderContext,
    Animation,
    Font,
    AudioBuffer,
    Invalid,
}

impl AssetType {
    /// The amount of asset types, not counting [`AssetType::Invalid`].
    pub const COUNT: usize = 7;

    /// Every asset type except [`AssetType::Invalid`], in tag order.
    pub const ALL: [AssetType; AssetType::COUNT] = [
        AssetType::Buffer,
        AssetType::Texture,
        AssetType::Shader,
        AssetType::ShaderContext,
        AssetType::Animation,
        AssetType::Font,
        AssetType::AudioBuffer,
    ];

    /// The byte this type is written as in packages.
    pub const fn tag(self) -> u8 {
        match self {
            AssetType::Buffer => 0,
            AssetType::Texture => 1,
            AssetType::Shader => 2,
            AssetType::ShaderContext => 3,
            AssetType::Animation => 4,
            AssetType::Font => 5,
            AssetType::AudioBuffer => 6,
            AssetType::Invalid => 0xFF,
        }
    }

    /// Inverse of [`AssetType::tag`]. Returns None for bytes that aren't the
    /// tag of any asset type, including the tag of [`AssetType::Invalid`].
    pub fn from_tag(tag: u8) -> Option<AssetType> {
        AssetType::ALL.get(tag as usize).copied()
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetType::Buffer => "buffer",
            AssetType::Texture => "texture",
            AssetType::Shader => "shader",
            AssetType::ShaderContext => "shader context",
            AssetType::Animation => "animation",
            AssetType::Font => "font",
            AssetType::AudioBuffer => "audio buffer",
            AssetType::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// Identifies one asset group within an
/// [`AssetManager`](super::AssetManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetGroupId(i32);

impl AssetGroupId {
    pub const INVALID: AssetGroupId = AssetGroupId(-1);

    pub(crate) fn new(id: i32) -> AssetGroupId {
        AssetGroupId(id)
    }

    pub fn inner(self) -> i32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl Display for AssetGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to one asset in one asset group.
///
/// The `id` is the index of the asset in its group's pool for `asset_type`.
/// The handle doesn't own anything, and it's only meaningful for the group it
/// was created by: once that group is destroyed, resolving the handle asserts
/// in debug builds and returns None in release builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId {
    asset_type: AssetType,
    group: AssetGroupId,
    id: i16,
}

impl AssetId {
    pub const INVALID: AssetId = AssetId {
        asset_type: AssetType::Invalid,
        group: AssetGroupId::INVALID,
        id: -1,
    };

    pub(crate) fn new(asset_type: AssetType, group: AssetGroupId, id: i16) -> AssetId {
        AssetId {
            asset_type,
            group,
            id,
        }
    }

    /// The sentinel returned for failed lookups within `group`.
    pub(crate) fn invalid_in(group: AssetGroupId) -> AssetId {
        AssetId {
            group,
            ..AssetId::INVALID
        }
    }

    pub fn asset_type(self) -> AssetType {
        self.asset_type
    }

    pub fn group(self) -> AssetGroupId {
        self.group
    }

    pub fn id(self) -> i16 {
        self.id
    }

    pub fn is_valid(self) -> bool {
        self.id >= 0 && self.asset_type != AssetType::Invalid && self.group.is_valid()
    }

    /// The pool index, if the id isn't the sentinel.
    pub(crate) fn index(self) -> Option<usize> {
        usize::try_from(self.id).ok()
    }
}
