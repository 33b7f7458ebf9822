use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::ReelResult;

/// Longest headline fragment kept in a file name.
pub const HEADLINE_MAX_CHARS: usize = 20;

/// Keep ASCII letters only, truncated to [`HEADLINE_MAX_CHARS`].
pub fn clean_headline(headline: &str) -> String {
    headline
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(HEADLINE_MAX_CHARS)
        .collect()
}

/// `YYYYMMDD_HHMMSS_<headline>.mp4`, or `YYYYMMDD_HHMMSS_video.mp4` without a usable headline.
pub fn output_file_name(headline: Option<&str>, now: chrono::NaiveDateTime) -> String {
    let stamp = now.format("%Y%m%d_%H%M%S");
    let part = headline.map(clean_headline).unwrap_or_default();
    if part.is_empty() {
        format!("{stamp}_video.mp4")
    } else {
        format!("{stamp}_{part}.mp4")
    }
}

/// [`output_file_name`] for the current local time, placed in `dir`.
pub fn output_path_now(dir: &Path, headline: Option<&str>) -> PathBuf {
    dir.join(output_file_name(
        headline,
        chrono::Local::now().naive_local(),
    ))
}

/// First `*_<headline>.mp4` in `dir` (by name), if any.
///
/// A missing directory or a headline with no letters yields `None`.
pub fn find_existing_video(dir: &Path, headline: &str) -> ReelResult<Option<PathBuf>> {
    let part = clean_headline(headline);
    if part.is_empty() || !dir.is_dir() {
        return Ok(None);
    }
    let suffix = format!("_{part}.mp4");

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read_dir '{}'", dir.display()))? {
        let entry = entry.with_context(|| format!("read_dir entry in '{}'", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with('.') || !name.ends_with(&suffix) {
            continue;
        }
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            found.push(entry.path());
        }
    }
    found.sort();

    if let Some(p) = found.first() {
        tracing::debug!(path = %p.display(), "found existing video for headline");
    }
    Ok(found.into_iter().next())
}

#[cfg(test)]
#[path = "../tests/unit/output.rs"]
mod tests;
