use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Finds the media file for `video_id` in `media_dir`: the first regular file
/// whose stem equals the identifier, in name order.
pub fn resolve(media_dir: &Path, video_id: &str) -> Result<PathBuf> {
    if video_id.is_empty() {
        bail!("No video identifier given");
    }

    let entries = fs::read_dir(media_dir)
        .with_context(|| format!("Failed to read media directory {}", media_dir.display()))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.file_stem().and_then(|s| s.to_str()) == Some(video_id))
        .collect();
    candidates.sort();

    match candidates.into_iter().next() {
        Some(path) => Ok(path),
        None => bail!("No media for '{}' in {}", video_id, media_dir.display()),
    }
}
