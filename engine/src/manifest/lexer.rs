// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Display};

use thiserror::Error;
use tracing::{error, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `::`, followed by the asset type of the section.
    Section,
    /// `$`, followed by a directory to append to the local directory.
    Local,
    /// `#` and the rest of the line. The text itself is discarded.
    Comment,
    /// A path or a keyword.
    StringLiteral(String),
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Section => f.write_str("'::'"),
            TokenKind::Local => f.write_str("'$'"),
            TokenKind::Comment => f.write_str("a comment"),
            TokenKind::StringLiteral(text) => write!(f, "{text:?}"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListToken {
    pub kind: TokenKind,
    /// The line the token starts on, starting from 1.
    pub line: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("line {line}: expected '::', found ':' followed by {}", describe(.found))]
    MalformedSection { line: u32, found: Option<char> },
    #[error("line {line}: unrecognized character {found:?}")]
    UnrecognizedCharacter { line: u32, found: char },
}

fn describe(c: &Option<char>) -> String {
    match c {
        Some(c) => format!("{c:?}"),
        None => String::from("end of file"),
    }
}

/// Characters which can start a [`TokenKind::StringLiteral`].
fn is_path_like(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '\\')
}

/// Splits manifest source text into tokens, ending with a
/// [`TokenKind::Eof`].
///
/// String literals start with a path-like character and extend up to the next
/// whitespace character, so they may contain any non-whitespace characters
/// after the first one.
pub fn tokenize(source: &str) -> Result<Vec<ListToken>, LexError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut chars = source.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let kind = match c {
            ' ' | '\t' | '\r' => continue,
            '\n' => {
                line += 1;
                continue;
            }
            ':' => match chars.next() {
                Some((_, ':')) => TokenKind::Section,
                other => {
                    let err = LexError::MalformedSection {
                        line,
                        found: other.map(|(_, c)| c),
                    };
                    error!("Failed to tokenize manifest: {err}");
                    return Err(err);
                }
            },
            '$' => TokenKind::Local,
            '#' => {
                // The newline is left for the loop to count.
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                TokenKind::Comment
            }
            c if is_path_like(c) => {
                let mut end = start + c.len_utf8();
                while let Some((i, c)) = chars.next_if(|&(_, c)| !c.is_whitespace()) {
                    end = i + c.len_utf8();
                }
                TokenKind::StringLiteral(source[start..end].to_string())
            }
            found => {
                let err = LexError::UnrecognizedCharacter { line, found };
                error!("Failed to tokenize manifest: {err}");
                return Err(err);
            }
        };
        trace!("Line {line}: {kind}");
        tokens.push(ListToken { kind, line });
    }

    tokens.push(ListToken {
        kind: TokenKind::Eof,
        line,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::{tokenize, LexError, ListToken, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn literal(text: &str) -> TokenKind {
        TokenKind::StringLiteral(text.to_string())
    }

    #[test]
    fn tokenizes_every_kind() {
        assert_eq!(
            vec![
                TokenKind::Section,
                literal("texture"),
                TokenKind::Local,
                literal("sprites"),
                literal("player.png"),
                TokenKind::Comment,
                TokenKind::Eof,
            ],
            kinds("::texture\n$ sprites\nplayer.png # the hero\n"),
        );
    }

    #[test]
    fn records_lines() {
        let tokens = tokenize("::shader\n\n# comment\r\nbasic.glsl").unwrap();
        let lines: Vec<u32> = tokens.iter().map(|token| token.line).collect();
        assert_eq!(vec![1, 1, 3, 4, 4], lines);
    }

    #[test]
    fn literals_end_at_whitespace() {
        assert_eq!(
            vec![
                literal("a-b.png"),
                literal("dir\\c.png"),
                literal("./x"),
                TokenKind::Eof
            ],
            kinds("a-b.png\tdir\\c.png\r\n./x"),
        );
    }

    #[test]
    fn section_sigil_needs_two_colons() {
        assert_eq!(
            Err(LexError::MalformedSection {
                line: 2,
                found: Some('t'),
            }),
            tokenize("# first line\n:texture"),
        );
        assert_eq!(
            Err(LexError::MalformedSection {
                line: 1,
                found: None,
            }),
            tokenize(":"),
        );
    }

    #[test]
    fn unrecognized_characters_abort() {
        assert_eq!(
            Err(LexError::UnrecognizedCharacter {
                line: 1,
                found: '-',
            }),
            tokenize("::texture -flag"),
        );
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(
            Ok(vec![ListToken {
                kind: TokenKind::Eof,
                line: 1,
            }]),
            tokenize(""),
        );
    }
}
