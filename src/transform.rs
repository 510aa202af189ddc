//! Text algorithms behind the editing commands.
//!
//! Everything here works on in-memory strings; reading and writing documents
//! is the evaluator's job.

use std::num::NonZeroU64;

use regex::RegexBuilder;

use crate::ast::{Limit, Sensitivity};

/// Result of a replace/overwrite/enumerate pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Occurrences of the term that were seen
    pub matches: u64,
    /// Occurrences that were actually rewritten
    pub replaced: u64,
}

impl Rewrite {
    fn unchanged(content: &str) -> Self {
        Rewrite {
            text: content.to_string(),
            matches: 0,
            replaced: 0,
        }
    }
}

/// Counts non-overlapping occurrences of `term`.
pub fn count_occurrences(
    content: &str,
    term: &str,
    sensitivity: Sensitivity,
) -> Result<usize, regex::Error> {
    match sensitivity {
        Sensitivity::Sensitive => Ok(content.matches(term).count()),
        Sensitivity::Insensitive => {
            let re = RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()?;
            Ok(re.find_iter(content).count())
        }
    }
}

/// `trim(first) + "\n\n" + separator + "\n\n" + trim(second)`
pub fn fuse(first: &str, second: &str, separator: &str) -> String {
    format!("{}\n\n{}\n\n{}", first.trim(), separator, second.trim())
}

fn selected(match_index: u64, frequency: NonZeroU64) -> bool {
    (match_index - 1) % frequency.get() == 0
}

/// Replaces every `frequency`-th occurrence of `original` (starting with the
/// first), stopping after `limit` replacements.
pub fn replace(
    content: &str,
    original: &str,
    new: &str,
    frequency: NonZeroU64,
    limit: Limit,
) -> Rewrite {
    if original.is_empty() {
        return Rewrite::unchanged(content);
    }

    let mut parts = content.split(original);
    let mut text = String::with_capacity(content.len());
    text.push_str(parts.next().unwrap_or_default());

    let mut matches = 0;
    let mut replaced = 0;
    for part in parts {
        matches += 1;
        if limit.allows(replaced) && selected(matches, frequency) {
            text.push_str(new);
            replaced += 1;
        } else {
            text.push_str(original);
        }
        text.push_str(part);
    }

    Rewrite {
        text,
        matches,
        replaced,
    }
}

/// Byte offset `chars` characters after `from`, clamped to the end.
fn advance_chars(content: &str, from: usize, chars: usize) -> usize {
    content[from..]
        .char_indices()
        .nth(chars)
        .map(|(offset, _)| from + offset)
        .unwrap_or(content.len())
}

/// Overwrite mode: on a selected occurrence the new term is emitted and the
/// scan resumes `len(new)` characters past the start of the match, so a
/// longer new term swallows the characters after the match and a shorter one
/// leaves the tail of the match to be copied. An empty new term deletes the
/// match.
///
/// The text after the last scanned position is only kept when the scan ran
/// out of occurrences. Reaching `limit` drops it.
pub fn overwrite(
    content: &str,
    original: &str,
    new: &str,
    frequency: NonZeroU64,
    limit: Limit,
) -> Rewrite {
    if original.is_empty() {
        return Rewrite::unchanged(content);
    }

    let new_len = new.chars().count();
    let mut text = String::with_capacity(content.len());
    let mut cursor = 0;
    let mut matches = 0;
    let mut replaced = 0;

    while limit.allows(replaced) {
        let Some(offset) = content[cursor..].find(original) else {
            text.push_str(&content[cursor..]);
            break;
        };
        let pos = cursor + offset;
        matches += 1;
        text.push_str(&content[cursor..pos]);

        if selected(matches, frequency) {
            text.push_str(new);
            cursor = if new_len == 0 {
                pos + original.len()
            } else {
                advance_chars(content, pos, new_len)
            };
            replaced += 1;
        } else {
            text.push_str(original);
            cursor = pos + original.len();
        }
    }

    Rewrite {
        text,
        matches,
        replaced,
    }
}

/// Number of values in the inclusive run between `start` and `end`.
pub fn sequence_len(start: u64, end: u64) -> u128 {
    u128::from(start.abs_diff(end)) + 1
}

/// The `k`-th (0-based) value of the run from `start` to `end`, wrapping
/// around when `k` passes the end of the run.
pub fn sequence_at(start: u64, end: u64, k: u64) -> u64 {
    // the remainder is below sequence_len, which fits in u64 unless the run
    // spans the whole u64 range, where k itself is the remainder
    let offset = (u128::from(k) % sequence_len(start, end)) as u64;
    if start <= end {
        start + offset
    } else {
        start - offset
    }
}

/// Replaces the K-th occurrence of `term` with the K-th value of the
/// sequence `start..=end` (descending when `start > end`), cycling through
/// the sequence when there are more occurrences than values.
pub fn enumerate(content: &str, term: &str, start: u64, end: u64) -> Rewrite {
    if term.is_empty() {
        return Rewrite::unchanged(content);
    }

    let mut parts = content.split(term);
    let mut text = String::with_capacity(content.len());
    text.push_str(parts.next().unwrap_or_default());

    let mut matches = 0;
    for part in parts {
        text.push_str(&sequence_at(start, end, matches).to_string());
        text.push_str(part);
        matches += 1;
    }

    Rewrite {
        text,
        matches,
        replaced: matches,
    }
}

/// Splits `content` on `delimiter` into the bodies of the fragment files.
///
/// Blank pieces are dropped. A piece that is not the final piece of the split
/// is trimmed and followed by `"\n" + delimiter + "\n"`; the final piece is
/// only right-trimmed.
pub fn fragment(content: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        return Vec::new();
    }

    let pieces: Vec<&str> = content.split(delimiter).collect();
    let last = pieces.len() - 1;

    pieces
        .iter()
        .enumerate()
        .filter(|(_, piece)| !piece.trim().is_empty())
        .map(|(i, piece)| {
            if i < last {
                format!("{}\n{}\n", piece.trim(), delimiter)
            } else {
                piece.trim_end().to_string()
            }
        })
        .collect()
}

/// Text listing of extracted pages: a `--- Página N ---` header over each
/// page's text. Pages without text are left out.
pub fn page_listing(pages: &[(usize, String)]) -> String {
    pages
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(number, text)| format!("--- Página {} ---\n{}\n", number, text))
        .collect::<Vec<_>>()
        .join("\n")
}
