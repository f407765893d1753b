// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Writing and reading FRPKG packages.
//!
//! A package starts with a version byte, followed by one run per packaged
//! manifest section: the asset type tag, the amount of records, and the
//! records themselves. Each record is a name, the size of its descriptor, and
//! the descriptor. The sizes allow readers to skip records of asset types they
//! don't know how to decode.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use enum_map::EnumMap;
use platform::{AudioBufferDesc, GfxShaderDesc, GfxTextureDesc};
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::manifest::{load_manifest, ManifestError};

use super::{
    deserialize::{deserialize, Deserialize, DeserializeError},
    loaders::{AssetLoaders, LoadError},
    serialize::{serialize_to_vec, Serialize},
    AssetType,
};

/// The first byte of every package written by [`build`].
pub const PACKAGE_VERSION: u8 = 1;

/// A record in a package: an asset and the name it can be looked up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAsset<T> {
    pub name: String,
    pub asset: T,
}

/// The start of a run of records of one asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunHeader {
    pub asset_type: AssetType,
    pub count: u32,
}

/// A decoded record of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    /// The file name of the source file the asset was loaded from.
    pub name: String,
    pub asset: PackagedAsset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagedAsset {
    Texture(GfxTextureDesc),
    Shader(GfxShaderDesc),
    Audio(AudioBufferDesc),
}

impl PackagedAsset {
    pub fn asset_type(&self) -> AssetType {
        match self {
            PackagedAsset::Texture(_) => AssetType::Texture,
            PackagedAsset::Shader(_) => AssetType::Shader,
            PackagedAsset::Audio(_) => AssetType::AudioBuffer,
        }
    }
}

/// Record counts of a finished [`build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSummary {
    pub written: EnumMap<AssetType, u32>,
    /// Assets listed in sections which aren't packaged.
    pub skipped: EnumMap<AssetType, u32>,
}

impl PackageSummary {
    pub fn total_written(&self) -> u32 {
        self.written.values().sum()
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("failed to create package file {}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write package file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to load asset {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
    #[error("texture {} has {actual} bytes of pixels, its dimensions need {expected}", path.display())]
    InvalidTexture {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("package is empty")]
    Empty,
    #[error("package version {0} is not supported (expected {})", PACKAGE_VERSION)]
    UnsupportedVersion(u8),
    #[error("package is corrupt at byte {offset}")]
    Corrupt {
        offset: usize,
        #[source]
        source: DeserializeError,
    },
    #[error("failed to read package file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Builds a package out of the assets listed in the manifest at `manifest`,
/// loading them with `loaders`, and writes it to `output`.
///
/// Texture, shader and audio sections are packaged, other sections are
/// skipped with a warning. If any asset fails to load, the build is aborted,
/// and whatever was written to `output` so far should not be used.
pub fn build(
    manifest: &Path,
    output: &Path,
    loaders: &mut dyn AssetLoaders,
) -> Result<PackageSummary, BuildError> {
    let context = load_manifest(manifest)?;

    let file = File::create(output).map_err(|source| {
        error!("Failed to create package file {}: {source}", output.display());
        BuildError::CreateOutput {
            path: output.to_path_buf(),
            source,
        }
    })?;
    let mut writer = PackageWriter {
        writer: BufWriter::new(file),
        path: output,
    };
    writer.write(&[PACKAGE_VERSION])?;

    let mut summary = PackageSummary::default();
    for section in &context.sections {
        if section.assets.is_empty() {
            debug!("Skipping an empty {} section.", section.asset_type);
            continue;
        }

        let paths = &section.assets;
        let written = match section.asset_type {
            AssetType::Texture => writer.write_section(AssetType::Texture, paths, |path| {
                let texture = loaders.load_texture(path)?;
                if texture.pixels.len() != texture.pixel_data_size() {
                    return Err(BuildError::InvalidTexture {
                        path: path.to_path_buf(),
                        expected: texture.pixel_data_size(),
                        actual: texture.pixels.len(),
                    }
                    .into());
                }
                Ok(texture)
            })?,
            AssetType::Shader => writer.write_section(AssetType::Shader, paths, |path| {
                Ok(loaders.load_shader(path)?)
            })?,
            AssetType::AudioBuffer => writer.write_section(AssetType::AudioBuffer, paths, |path| {
                Ok(loaders.load_audio(path)?)
            })?,
            asset_type => {
                warn!(
                    "Skipping {} assets in a {asset_type} section, {asset_type} assets can't be packaged.",
                    section.assets.len(),
                );
                summary.skipped[asset_type] += section.assets.len() as u32;
                continue;
            }
        };
        summary.written[section.asset_type] += written;
    }

    writer.flush()?;

    info!(
        "Wrote {} assets into {}: {} textures, {} shaders, {} audio buffers.",
        summary.total_written(),
        output.display(),
        summary.written[AssetType::Texture],
        summary.written[AssetType::Shader],
        summary.written[AssetType::AudioBuffer],
    );
    Ok(summary)
}

/// Errors from the per-asset closures of [`PackageWriter::write_section`]. Loader errors don't
/// know their path yet, other errors do.
enum LoadFailure {
    Loader(LoadError),
    Build(BuildError),
}

impl From<LoadError> for LoadFailure {
    fn from(err: LoadError) -> Self {
        LoadFailure::Loader(err)
    }
}

impl From<BuildError> for LoadFailure {
    fn from(err: BuildError) -> Self {
        LoadFailure::Build(err)
    }
}

struct PackageWriter<'a> {
    writer: BufWriter<File>,
    path: &'a Path,
}

impl PackageWriter<'_> {
    /// Writes a run of records for the assets at `paths`, loading them with
    /// `load`. Each asset is dropped as soon as its record is written, so only
    /// one of them is in memory at a time.
    fn write_section<S, F>(
        &mut self,
        asset_type: AssetType,
        paths: &[PathBuf],
        mut load: F,
    ) -> Result<u32, BuildError>
    where
        S: Serialize,
        F: FnMut(&Path) -> Result<S, LoadFailure>,
    {
        // Failed loads abort the whole build, so the count is known up front.
        let count = u32::try_from(paths.len()).map_err(|_| {
            self.error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "too many assets in one section",
            ))
        })?;
        self.write(&serialize_to_vec(&RunHeader { asset_type, count }))?;

        for path in paths {
            let asset = load(path).map_err(|failure| {
                let err = match failure {
                    LoadFailure::Loader(source) => BuildError::Load {
                        path: path.clone(),
                        source,
                    },
                    LoadFailure::Build(err) => err,
                };
                error!("Failed to build package: {err}");
                err
            })?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            trace!("Writing {asset_type} {name} from {}.", path.display());
            self.write(&serialize_to_vec(&NamedAsset { name, asset }))?;
        }
        Ok(count)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), BuildError> {
        self.writer.write_all(bytes).map_err(|err| self.error(err))
    }

    fn flush(&mut self) -> Result<(), BuildError> {
        self.writer.flush().map_err(|err| self.error(err))
    }

    fn error(&self, source: io::Error) -> BuildError {
        error!("Failed to write package file {}: {source}", self.path.display());
        BuildError::Write {
            path: self.path.to_path_buf(),
            source,
        }
    }
}

/// Descriptor of an asset type that isn't decoded, consuming the whole
/// descriptor without looking at it.
struct SkippedDescriptor;

impl Deserialize for SkippedDescriptor {
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        Ok((SkippedDescriptor, src.len()))
    }
}

/// Decodes the records of a package.
///
/// Records of asset types that can't be packaged by [`build`] are skipped
/// with a warning.
pub fn read(bytes: &[u8]) -> Result<Vec<PackageRecord>, PackageError> {
    let Some((&version, _)) = bytes.split_first() else {
        error!("Failed to read package: it's empty.");
        return Err(PackageError::Empty);
    };
    if version != PACKAGE_VERSION {
        error!("Failed to read package: unsupported version {version}.");
        return Err(PackageError::UnsupportedVersion(version));
    }

    let mut records = Vec::new();
    let mut cursor = 1;
    while cursor < bytes.len() {
        let RunHeader { asset_type, count } = read_at::<RunHeader>(bytes, &mut cursor)?;
        debug!("Reading {count} {asset_type} records.");
        for _ in 0..count {
            let record = match asset_type {
                AssetType::Texture => {
                    read_record(bytes, &mut cursor, PackagedAsset::Texture)?
                }
                AssetType::Shader => read_record(bytes, &mut cursor, PackagedAsset::Shader)?,
                AssetType::AudioBuffer => read_record(bytes, &mut cursor, PackagedAsset::Audio)?,
                _ => {
                    let skipped = read_at::<NamedAsset<SkippedDescriptor>>(bytes, &mut cursor)?;
                    warn!("Skipping {asset_type} {:?}, it can't be loaded from packages.", skipped.name);
                    continue;
                }
            };
            trace!("Read {asset_type} {:?}.", record.name);
            records.push(record);
        }
    }
    Ok(records)
}

/// Reads the file at `path` and decodes it with [`read`].
pub fn read_file(path: &Path) -> Result<Vec<PackageRecord>, PackageError> {
    let bytes = fs::read(path).map_err(|source| {
        error!("Failed to read package file {}: {source}", path.display());
        PackageError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    read(&bytes)
}

fn read_record<D: Deserialize>(
    bytes: &[u8],
    cursor: &mut usize,
    wrap: fn(D) -> PackagedAsset,
) -> Result<PackageRecord, PackageError> {
    let NamedAsset { name, asset } = read_at::<NamedAsset<D>>(bytes, cursor)?;
    Ok(PackageRecord {
        name,
        asset: wrap(asset),
    })
}

fn read_at<D: Deserialize>(bytes: &[u8], cursor: &mut usize) -> Result<D, PackageError> {
    let offset = *cursor;
    deserialize::<D>(bytes, cursor).map_err(|source| {
        error!("Failed to read package: {source} (at byte {offset}).");
        PackageError::Corrupt { offset, source }
    })
}
