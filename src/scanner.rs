use globset::{Glob, GlobSet};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A literal class attribute value found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassListSite {
    pub path: PathBuf,
    /// 1-based line of the attribute name.
    pub line: usize,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub sites: Vec<ClassListSite>,
    pub files_scanned: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScanError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanGlobOptions {
    pub base_path: PathBuf,
    pub respect_gitignore: bool,
    pub include_node_modules: bool,
}

impl Default for ScanGlobOptions {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            respect_gitignore: true,
            include_node_modules: false,
        }
    }
}

pub fn scan_files(paths: &[PathBuf]) -> Result<ScanResult, ScanError> {
    let mut sites = Vec::new();
    let mut files_scanned = 0;

    for path in paths {
        if !path.is_file() {
            return Err(ScanError {
                message: format!("path not found: {}", path.display()),
            });
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "skipping unreadable file");
                continue;
            }
        };
        files_scanned += 1;
        for (line, value) in extract_class_lists(&text) {
            sites.push(ClassListSite {
                path: path.clone(),
                line,
                value,
            });
        }
    }

    Ok(ScanResult {
        sites,
        files_scanned,
    })
}

pub fn scan_globs_with_options(
    patterns: &[String],
    ignore_patterns: &[String],
    options: &ScanGlobOptions,
) -> Result<ScanResult, ScanError> {
    if patterns.is_empty() {
        return Err(ScanError {
            message: "scan requires at least one pattern".to_string(),
        });
    }

    let globset = build_globset(patterns)?;
    let ignore_set = build_globset(ignore_patterns)?;
    let mut paths = Vec::new();
    let mut seen = HashSet::new();

    let mut builder = WalkBuilder::new(&options.base_path);
    builder
        .hidden(false)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore);

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let relative_path = path.strip_prefix(&options.base_path).unwrap_or(path);
        if !globset.is_match(relative_path) && !globset.is_match(path) {
            continue;
        }
        if ignore_set.is_match(relative_path) || ignore_set.is_match(path) {
            continue;
        }
        if should_skip_file(path, options) {
            continue;
        }
        if seen.insert(path.to_path_buf()) {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    scan_files(&paths)
}

fn should_skip_file(path: &Path, options: &ScanGlobOptions) -> bool {
    if !options.include_node_modules
        && path
            .components()
            .any(|component| component.as_os_str() == "node_modules")
    {
        return true;
    }

    path.extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .is_some_and(|ext| is_binary_extension(&ext))
}

fn is_binary_extension(ext: &str) -> bool {
    matches!(
        ext,
        "png"
            | "jpg"
            | "jpeg"
            | "gif"
            | "webp"
            | "ico"
            | "avif"
            | "mp4"
            | "webm"
            | "mp3"
            | "zip"
            | "gz"
            | "pdf"
            | "woff"
            | "woff2"
            | "ttf"
            | "otf"
    )
}

/// Finds quoted `class` and `className` attribute values with their lines.
///
/// Only literal strings count; bound or interpolated values are skipped
/// since their final class list is not known statically.
pub fn extract_class_lists(text: &str) -> Vec<(usize, String)> {
    const ATTRS: [&str; 2] = ["className", "class"];
    let mut out = Vec::new();

    for attr in ATTRS {
        for (idx, _) in text.match_indices(attr) {
            if !is_attr_boundary(text, idx, attr.len()) {
                continue;
            }
            let mut pos = skip_whitespace(text, idx + attr.len());
            if !text[pos..].starts_with('=') {
                continue;
            }
            pos = skip_whitespace(text, pos + 1);
            let Some(quote) = text[pos..]
                .chars()
                .next()
                .filter(|&ch| ch == '"' || ch == '\'')
            else {
                continue;
            };
            let Some(value) = parse_quoted_value(text, pos + quote.len_utf8(), quote) else {
                continue;
            };
            if value.contains("${") || value.contains("{{") {
                continue;
            }
            out.push((line_number(text, idx), value));
        }
    }

    out.sort_by_key(|(line, _)| *line);
    out
}

fn is_attr_boundary(text: &str, idx: usize, len: usize) -> bool {
    let prev = text[..idx].chars().last();
    let next = text[idx + len..].chars().next();

    let prev_ok = prev.is_none_or(char::is_whitespace);
    let next_ok = next.is_none_or(|c| c.is_whitespace() || c == '=');

    prev_ok && next_ok
}

fn skip_whitespace(text: &str, idx: usize) -> usize {
    let rest = &text[idx..];
    idx + (rest.len() - rest.trim_start().len())
}

fn parse_quoted_value(text: &str, start: usize, quote: char) -> Option<String> {
    let rest = &text[start..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}

fn line_number(text: &str, idx: usize) -> usize {
    text[..idx].matches('\n').count() + 1
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|err| ScanError {
            message: format!("invalid glob pattern '{}': {}", pattern, err),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|err| ScanError {
        message: format!("failed to build glob set: {}", err),
    })
}
