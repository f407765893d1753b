// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::BuildCommand;

/// The import settings file containing the package builds of past
/// import-asset invocations, so that they can be repeated with the `rebuild`
/// command.
///
/// Has enum variants for breaking changes in the format of the settings file,
/// but [`read`] always returns the newest variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "settings_file_version", rename_all = "snake_case")]
pub enum ImportSettings {
    V1 { builds: Vec<BuildCommand> },
}

impl ImportSettings {
    pub fn builds(&self) -> &[BuildCommand] {
        match self {
            ImportSettings::V1 { builds } => builds,
        }
    }

    /// Adds the build to the settings, unless it's already there.
    pub fn record_build(&mut self, build: BuildCommand) {
        match self {
            ImportSettings::V1 { builds } => {
                if !builds.contains(&build) {
                    builds.push(build);
                }
            }
        }
    }
}

pub fn read(settings: &Path) -> anyhow::Result<ImportSettings> {
    let settings = if settings.exists() {
        let settings =
            fs::read_to_string(settings).context("Failed to open the import settings file")?;
        serde_json::from_str(&settings).context("Failed to parse the import settings file")?
    } else {
        debug!("No import settings file at {}, starting from scratch.", settings.display());
        ImportSettings::V1 { builds: Vec::new() }
    };

    // NOTE: When there's new versions of ImportSettings, convert to the newest
    // here (the rest of import-asset assumes it)

    Ok(settings)
}

pub fn write(path: &Path, settings: &ImportSettings) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(settings)
        .context("Failed to serialize the import settings")?;
    fs::write(path, json).context("Failed to write the import settings file")?;
    Ok(())
}
