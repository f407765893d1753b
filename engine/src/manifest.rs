// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The FRList manifest language, which lists the source files of assets
//! grouped into sections by asset type:
//!
//! ```text
//! # Everything under sprites/ and one loose texture.
//! ::texture
//! $ sprites
//! player.png
//! enemies/
//!
//! ::shader
//! shaders/sprite.glsl
//! ```
//!
//! `::<type>` starts a section, `$ <dir>` pushes a directory onto the
//! section's local directory, `#` comments out the rest of the line, and any
//! other word is a path relative to the local directory. Paths that refer to
//! directories are expanded into all the files in them, recursively.

mod lexer;
mod parser;

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, error};

use crate::resources::AssetType;

pub use lexer::{tokenize, LexError, ListToken, TokenKind};
pub use parser::{parse, ParseError};

/// The file extension manifests must have.
pub const MANIFEST_EXTENSION: &str = "frlist";

/// The asset files listed under one `::<type>` line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSection {
    pub asset_type: AssetType,
    /// The directory relative paths are currently resolved against. Starts
    /// out as the manifest's directory, and each `$` line appends to it.
    pub local: PathBuf,
    /// The resolved paths of the asset files, in manifest order, with
    /// directories expanded.
    pub assets: Vec<PathBuf>,
}

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListContext {
    /// The directory the manifest is in.
    pub parent_dir: PathBuf,
    pub sections: Vec<ListSection>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{} is not a .{} file", path.display(), MANIFEST_EXTENSION)]
    WrongExtension { path: PathBuf },
    #[error("failed to read manifest {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Reads, tokenizes and parses the manifest at `path`.
///
/// Relative paths in the manifest are resolved relative to the manifest's
/// directory. Every failure is logged where it happens, so callers don't need
/// to log the returned error again.
pub fn load_manifest(path: &Path) -> Result<ListContext, ManifestError> {
    if path.extension() != Some(OsStr::new(MANIFEST_EXTENSION)) {
        error!(
            "Refusing to load {} as a manifest, only .{MANIFEST_EXTENSION} files are supported.",
            path.display(),
        );
        return Err(ManifestError::WrongExtension {
            path: path.to_path_buf(),
        });
    }

    let source = fs::read_to_string(path).map_err(|source| {
        error!("Failed to read manifest {}: {source}", path.display());
        ManifestError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let tokens = tokenize(&source)?;
    let parent_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let context = parse(&tokens, &parent_dir)?;

    debug!(
        "Loaded manifest {} with {} sections and {} assets.",
        path.display(),
        context.sections.len(),
        context
            .sections
            .iter()
            .map(|section| section.assets.len())
            .sum::<usize>(),
    );
    Ok(context)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::resources::AssetType;

    use super::{load_manifest, ManifestError};

    #[test]
    fn rejects_other_extensions_before_reading() {
        let result = load_manifest("does/not/exist.txt".as_ref());
        assert!(
            matches!(result, Err(ManifestError::WrongExtension { .. })),
            "expected an extension error, got {result:?}",
        );
    }

    #[test]
    fn missing_manifest_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_manifest(&dir.path().join("missing.frlist"));
        assert!(matches!(result, Err(ManifestError::Read { .. })));
    }

    #[test]
    fn local_directory_is_relative_to_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sprites")).unwrap();
        fs::write(dir.path().join("sprites/player.png"), b"").unwrap();
        let manifest_path = dir.path().join("assets.frlist");
        fs::write(&manifest_path, "::texture\n$ sprites\nplayer.png\n").unwrap();

        let context = load_manifest(&manifest_path).unwrap();
        assert_eq!(dir.path(), context.parent_dir);
        assert_eq!(1, context.sections.len());
        let section = &context.sections[0];
        assert_eq!(AssetType::Texture, section.asset_type);
        assert_eq!(vec![dir.path().join("sprites/player.png")], section.assets);
    }

    #[test]
    fn lexing_errors_are_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("broken.frlist");
        fs::write(&manifest_path, "::texture\n:oops\n").unwrap();
        assert!(matches!(
            load_manifest(&manifest_path),
            Err(ManifestError::Lex(_)),
        ));
    }
}
