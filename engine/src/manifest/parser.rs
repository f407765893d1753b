// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    fs, io,
    path::{Path, PathBuf},
    slice,
};

use thiserror::Error;
use tracing::{debug, error, trace, warn};

use crate::resources::AssetType;

use super::{ListContext, ListSection, ListToken, TokenKind};

/// The section keywords. Both spellings of a keyword are listed explicitly,
/// other capitalizations are not accepted.
const SECTION_KEYWORDS: [(&str, AssetType); 8] = [
    ("texture", AssetType::Texture),
    ("TEXTURE", AssetType::Texture),
    ("shader", AssetType::Shader),
    ("SHADER", AssetType::Shader),
    ("font", AssetType::Font),
    ("FONT", AssetType::Font),
    ("audio", AssetType::AudioBuffer),
    ("AUDIO", AssetType::AudioBuffer),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: u32,
        expected: &'static str,
        found: String,
    },
    #[error("manifest has {errors} error(s), see the log for details")]
    Grammar { errors: usize },
}

/// What paths and `$` lines currently apply to.
enum CurrentSection {
    /// No `::` line has been seen yet.
    None,
    /// The latest `::` line had an unknown asset type, so its contents are
    /// ignored until the next one.
    Skipped,
    /// Index into [`ListContext::sections`].
    Index(usize),
}

/// Builds a [`ListContext`] out of the tokens of a manifest located in
/// `parent_dir`.
///
/// Grammar errors which only affect one section (unknown asset types, paths
/// outside of any section) are logged and parsing continues, to report as many
/// of them as possible in one go, but the result is still an error.
/// Structural errors (e.g. `::` without an asset type after it) stop parsing
/// immediately.
pub fn parse(tokens: &[ListToken], parent_dir: &Path) -> Result<ListContext, ParseError> {
    let mut context = ListContext {
        parent_dir: parent_dir.to_path_buf(),
        sections: Vec::new(),
    };
    let mut current = CurrentSection::None;
    let mut errors = 0;

    let mut tokens = tokens.iter();
    while let Some(token) = tokens.next() {
        match &token.kind {
            TokenKind::Section => {
                let keyword = expect_literal(&mut tokens, token, "an asset type after '::'")?;
                if let Some(asset_type) = asset_type_for_keyword(keyword) {
                    debug!("Line {}: starting a {asset_type} section.", token.line);
                    current = CurrentSection::Index(context.sections.len());
                    context.sections.push(ListSection {
                        asset_type,
                        local: parent_dir.to_path_buf(),
                        assets: Vec::new(),
                    });
                } else {
                    error!(
                        "Line {}: unknown asset type {keyword:?}, skipping the section.",
                        token.line,
                    );
                    errors += 1;
                    current = CurrentSection::Skipped;
                }
            }

            TokenKind::Local => {
                let fragment = expect_literal(&mut tokens, token, "a directory after '$'")?;
                match current {
                    CurrentSection::Index(i) => context.sections[i].local.push(fragment),
                    CurrentSection::Skipped => {}
                    CurrentSection::None => {
                        error!(
                            "Line {}: '$ {fragment}' appears before any section.",
                            token.line,
                        );
                        errors += 1;
                    }
                }
            }

            TokenKind::StringLiteral(path) => match current {
                CurrentSection::Index(i) => {
                    let section = &mut context.sections[i];
                    let resolved = section.local.join(path);
                    if resolved.is_dir() {
                        if let Err(err) = expand_directory(&resolved, &mut section.assets) {
                            error!(
                                "Line {}: failed to list the files in {}: {err}",
                                token.line,
                                resolved.display(),
                            );
                            errors += 1;
                        }
                    } else {
                        trace!("Line {}: {}", token.line, resolved.display());
                        section.assets.push(resolved);
                    }
                }
                CurrentSection::Skipped => {
                    trace!("Line {}: skipping {path:?}.", token.line);
                }
                CurrentSection::None => {
                    error!(
                        "Line {}: {path:?} appears before any section.",
                        token.line
                    );
                    errors += 1;
                }
            },

            TokenKind::Comment | TokenKind::Eof => {}
        }
    }

    if errors > 0 {
        return Err(ParseError::Grammar { errors });
    }
    Ok(context)
}

fn asset_type_for_keyword(keyword: &str) -> Option<AssetType> {
    SECTION_KEYWORDS
        .iter()
        .find(|(candidate, _)| *candidate == keyword)
        .map(|(_, asset_type)| *asset_type)
}

fn expect_literal<'a>(
    tokens: &mut slice::Iter<'a, ListToken>,
    previous: &ListToken,
    expected: &'static str,
) -> Result<&'a str, ParseError> {
    match tokens.next() {
        Some(ListToken {
            kind: TokenKind::StringLiteral(text),
            ..
        }) => Ok(text),
        other => {
            let (line, found) = match other {
                Some(token) => (token.line, token.kind.to_string()),
                None => (previous.line, TokenKind::Eof.to_string()),
            };
            let err = ParseError::UnexpectedToken {
                line,
                expected,
                found,
            };
            error!("Failed to parse manifest: {err}");
            Err(err)
        }
    }
}

/// Appends every file under `dir` to `assets`, depth-first. Entries are
/// visited in file name order so that packages are reproducible.
fn expand_directory(dir: &Path, assets: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<io::Result<Vec<PathBuf>>>()?;
    entries.sort();

    if entries.is_empty() {
        warn!("Directory {} has no files to add.", dir.display());
    }

    for path in entries {
        if path.is_dir() {
            expand_directory(&path, assets)?;
        } else {
            trace!("Found {} in {}", path.display(), dir.display());
            assets.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, fs, path::Path};

    use crate::{
        manifest::{tokenize, ListSection},
        resources::AssetType,
    };

    use super::{parse, ParseError};

    fn parse_str(source: &str, parent_dir: &Path) -> Result<Vec<ListSection>, ParseError> {
        let tokens = tokenize(source).unwrap();
        parse(&tokens, parent_dir).map(|context| context.sections)
    }

    #[test]
    fn sections_collect_their_paths() {
        let root = Path::new("root");
        let sections = parse_str(
            "::texture\na.png\nb.png\n::AUDIO\n# music\nsong.ogg\n",
            root,
        )
        .unwrap();
        assert_eq!(
            vec![
                ListSection {
                    asset_type: AssetType::Texture,
                    local: root.to_path_buf(),
                    assets: vec![root.join("a.png"), root.join("b.png")],
                },
                ListSection {
                    asset_type: AssetType::AudioBuffer,
                    local: root.to_path_buf(),
                    assets: vec![root.join("song.ogg")],
                },
            ],
            sections,
        );
    }

    #[test]
    fn locals_stack_within_a_section_and_reset_between_sections() {
        let root = Path::new("root");
        let sections = parse_str(
            "::shader\n$ shaders\n$ sprite\nbasic.glsl\n::font\nmono.ttf\n",
            root,
        )
        .unwrap();
        assert_eq!(
            vec![root.join("shaders/sprite/basic.glsl")],
            sections[0].assets
        );
        assert_eq!(vec![root.join("mono.ttf")], sections[1].assets);
    }

    #[test]
    fn mixed_case_keywords_are_unknown() {
        assert_eq!(
            Err(ParseError::Grammar { errors: 1 }),
            parse_str("::Texture\na.png\n", Path::new("")),
        );
    }

    #[test]
    fn unknown_sections_are_skipped_and_every_error_is_counted() {
        // Two unknown sections, and a path outside of any section.
        let result = parse_str(
            "stray.png\n::meshes\n$ models\ncube.obj\n::texture\nok.png\n::music\n",
            Path::new(""),
        );
        assert_eq!(Err(ParseError::Grammar { errors: 3 }), result);
    }

    #[test]
    fn local_before_any_section_is_an_error() {
        assert_eq!(
            Err(ParseError::Grammar { errors: 1 }),
            parse_str("$ sprites\n::texture\na.png\n", Path::new("")),
        );
    }

    #[test]
    fn section_without_type_aborts() {
        assert_eq!(
            Err(ParseError::UnexpectedToken {
                line: 1,
                expected: "an asset type after '::'",
                found: String::from("'$'"),
            }),
            parse_str("::$ sprites\n", Path::new("")),
        );
        assert!(matches!(
            parse_str("::texture\n$", Path::new("")),
            Err(ParseError::UnexpectedToken { .. }),
        ));
    }

    #[test]
    fn directories_expand_to_their_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sprites/enemies")).unwrap();
        fs::write(dir.path().join("sprites/a.png"), b"").unwrap();
        fs::write(dir.path().join("sprites/b.png"), b"").unwrap();
        fs::write(dir.path().join("sprites/enemies/c.png"), b"").unwrap();

        let sections = parse_str("::texture\nsprites\n", dir.path()).unwrap();
        let found: HashSet<_> = sections[0].assets.iter().cloned().collect();
        let expected: HashSet<_> = ["sprites/a.png", "sprites/b.png", "sprites/enemies/c.png"]
            .into_iter()
            .map(|path| dir.path().join(path))
            .collect();
        assert_eq!(expected, found);
        assert_eq!(3, sections[0].assets.len(), "some file was listed twice");
    }

    #[test]
    fn directory_with_two_files_expands_to_exactly_two_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("ui")).unwrap();
        fs::write(dir.path().join("ui/a.png"), b"").unwrap();
        fs::write(dir.path().join("ui/b.png"), b"").unwrap();

        let sections = parse_str("::texture\n$ ui\n.\n", dir.path()).unwrap();
        let found: HashSet<_> = sections[0]
            .assets
            .iter()
            .map(|path| path.file_name().unwrap().to_owned())
            .collect();
        assert_eq!(2, sections[0].assets.len());
        assert!(found.contains(std::ffi::OsStr::new("a.png")));
        assert!(found.contains(std::ffi::OsStr::new("b.png")));
    }
}
