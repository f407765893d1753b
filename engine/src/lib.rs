// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The asset pipeline of the engine: [`manifest`]s list the source files of
//! assets, which are built into packages, which are loaded into the
//! [`resources::AssetGroup`]s of an [`resources::AssetManager`].

pub mod manifest;
pub mod resources;

#[cfg(test)]
mod test_platform;
