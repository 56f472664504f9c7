//! Raw file discovery and dimension token parsing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::corpus::{Corpus, CorpusEntry, CorpusOptions};
use crate::error::{Error, Result};

/// Split a raw file stem into `(case_name, width, height)`.
///
/// The dimension token is the last hyphen-delimited segment of the stem,
/// e.g. `gradient-64x32` yields `("gradient", 64, 32)`. Returns a
/// human-readable reason on failure.
pub fn parse_dimension_token(stem: &str) -> std::result::Result<(&str, u32, u32), String> {
    let (name, token) = stem
        .rsplit_once('-')
        .ok_or_else(|| format!("no '-<width>x<height>' suffix in '{stem}'"))?;

    if name.is_empty() {
        return Err(format!("empty case name in '{stem}'"));
    }

    let (w, h) = token
        .split_once('x')
        .ok_or_else(|| format!("token '{token}' is not <width>x<height>"))?;

    let width = parse_dimension(w, "width", token)?;
    let height = parse_dimension(h, "height", token)?;

    Ok((name, width, height))
}

fn parse_dimension(value: &str, axis: &str, token: &str) -> std::result::Result<u32, String> {
    // u32::from_str accepts a leading '+', which a filename token never has.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid {axis} '{value}' in token '{token}'"));
    }
    match value.parse::<u32>() {
        Ok(0) => Err(format!("zero {axis} in token '{token}'")),
        Ok(v) => Ok(v),
        Err(e) => Err(format!("invalid {axis} '{value}' in token '{token}': {e}")),
    }
}

pub(super) fn resolve_corpus(
    raw_dir: &Path,
    reference_dir: &Path,
    options: &CorpusOptions,
) -> Result<Corpus> {
    if !raw_dir.exists() {
        return Err(Error::Corpus(format!("Path does not exist: {}", raw_dir.display())));
    }

    if !raw_dir.is_dir() {
        return Err(Error::Corpus(format!("Path is not a directory: {}", raw_dir.display())));
    }

    let raw_files = list_raw_files(raw_dir, &options.raw_extension)?;
    if raw_files.is_empty() {
        return Err(Error::EmptyCorpus {
            dir: raw_dir.to_path_buf(),
            extension: options.raw_extension.clone(),
        });
    }

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut entries = Vec::with_capacity(raw_files.len());

    for raw_path in raw_files {
        let stem = raw_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::MalformedDimensions {
                path: raw_path.clone(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;

        let (name, width, height) =
            parse_dimension_token(stem).map_err(|reason| Error::MalformedDimensions {
                path: raw_path.clone(),
                reason,
            })?;

        if let Some(first) = seen.get(name) {
            return Err(Error::DuplicateCase {
                name: name.to_string(),
                first: first.clone(),
                second: raw_path,
            });
        }

        let reference_path =
            find_reference(reference_dir, name, stem, &options.reference_extension);
        debug!(
            case = name,
            width,
            height,
            reference = ?reference_path,
            "resolved corpus entry"
        );

        seen.insert(name.to_string(), raw_path.clone());
        entries.push(CorpusEntry {
            name: name.to_string(),
            width,
            height,
            raw_path,
            reference_path,
        });
    }

    Ok(Corpus {
        raw_dir: raw_dir.to_path_buf(),
        reference_dir: reference_dir.to_path_buf(),
        raw_extension: options.raw_extension.clone(),
        entries,
    })
}

/// List raw files sorted by file name.
fn list_raw_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::Corpus(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::Corpus(format!("Failed to read entry in {}: {}", dir.display(), e))
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // Skip hidden files
        if path
            .file_name()
            .and_then(|s| s.to_str())
            .map_or(false, |s| s.starts_with('.'))
        {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|s| s.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Locate `<case-name>.<ext>`, falling back to `<full-stem>.<ext>`.
fn find_reference(dir: &Path, name: &str, stem: &str, extension: &str) -> Option<PathBuf> {
    let by_name = dir.join(format!("{name}.{extension}"));
    if by_name.is_file() {
        return Some(by_name);
    }

    let by_stem = dir.join(format!("{stem}.{extension}"));
    if by_stem.is_file() {
        warn!(
            case = name,
            path = %by_stem.display(),
            "reference found under full raw stem rather than case name"
        );
        return Some(by_stem);
    }

    None
}
