// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use anyhow::Context;
use cli::{BuildCommand, Command};
use engine::resources::{
    package::{self, PackageRecord, PackagedAsset},
    AssetType,
};
use enum_map::EnumMap;
use importers::FileLoaders;
use platform::GfxShaderDesc;
use settings::ImportSettings;
use tracing::{info, warn};

mod cli;
mod importers;
mod settings;

fn main() -> anyhow::Result<()> {
    let opts = cli::options().run();

    tracing_subscriber::fmt()
        .with_max_level(opts.verbosity_level)
        .with_writer(std::io::stderr)
        .init();

    match opts.command {
        Command::Build(build) => {
            run_build(&build)?;
            let mut settings = settings::read(&opts.settings_path)?;
            settings.record_build(build);
            settings::write(&opts.settings_path, &settings)?;
        }
        Command::Inspect { package } => inspect(&package)?,
        Command::Rebuild => {
            let settings = settings::read(&opts.settings_path)?;
            rebuild(&settings)?;
        }
    }

    Ok(())
}

fn run_build(build: &BuildCommand) -> anyhow::Result<()> {
    package::build(&build.manifest, &build.output, &mut FileLoaders).with_context(|| {
        format!(
            "Failed to build {} from {}",
            build.output.display(),
            build.manifest.display(),
        )
    })?;
    Ok(())
}

fn rebuild(settings: &ImportSettings) -> anyhow::Result<()> {
    if settings.builds().is_empty() {
        warn!("The import settings file doesn't have any builds to repeat.");
    }
    for build in settings.builds() {
        info!("Rebuilding {}.", build.output.display());
        run_build(build)?;
    }
    Ok(())
}

fn inspect(package_path: &Path) -> anyhow::Result<()> {
    let records = package::read_file(package_path)
        .with_context(|| format!("Failed to inspect {}", package_path.display()))?;

    for record in &records {
        match &record.asset {
            PackagedAsset::Texture(texture) => info!(
                "texture {:?}: {}x{} {:?}, {} bytes",
                record.name,
                texture.width,
                texture.height,
                texture.format,
                texture.pixels.len(),
            ),
            PackagedAsset::Shader(shader) => {
                let (kind, source_len) = match shader {
                    GfxShaderDesc::Graphics { vertex, pixel } => {
                        ("graphics", vertex.len() + pixel.len())
                    }
                    GfxShaderDesc::Compute { compute } => ("compute", compute.len()),
                };
                info!("shader {:?}: {kind}, {source_len} bytes of source", record.name);
            }
            PackagedAsset::Audio(audio) => info!(
                "audio buffer {:?}: {} channels, {} Hz, {:?}, {} frames",
                record.name,
                audio.channels,
                audio.sample_rate,
                audio.format,
                audio.frames(),
            ),
        }
    }

    for (asset_type, count) in count_by_type(&records) {
        if count > 0 {
            info!("{count} {asset_type} assets in total.");
        }
    }
    Ok(())
}

fn count_by_type(records: &[PackageRecord]) -> EnumMap<AssetType, usize> {
    let mut counts = EnumMap::default();
    for record in records {
        counts[record.asset.asset_type()] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use engine::resources::{
        package::{PackageRecord, PackagedAsset},
        AssetType,
    };
    use platform::{AudioBufferDesc, GfxShaderDesc};

    use super::count_by_type;

    #[test]
    fn records_are_counted_per_type() {
        let shader = |name: &str| PackageRecord {
            name: name.to_string(),
            asset: PackagedAsset::Shader(GfxShaderDesc::Compute {
                compute: String::new(),
            }),
        };
        let records = [
            shader("a.comp"),
            shader("b.comp"),
            PackageRecord {
                name: String::from("hit.wav"),
                asset: PackagedAsset::Audio(AudioBufferDesc::from_s16_samples(1, 8000, &[0])),
            },
        ];
        let counts = count_by_type(&records);
        assert_eq!(2, counts[AssetType::Shader]);
        assert_eq!(1, counts[AssetType::AudioBuffer]);
        assert_eq!(0, counts[AssetType::Texture]);
    }
}
