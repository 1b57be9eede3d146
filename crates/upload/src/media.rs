//! Media file discovery for batch uploads.

use std::io;
use std::path::{Path, PathBuf};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "webm", "avi", "m4v", "3gp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "oga", "flac", "opus"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic"];

/// Maps a file extension to the record `media_type`.
pub fn infer_media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let ext = ext.as_str();
    if VIDEO_EXTENSIONS.contains(&ext) {
        Some("video")
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        Some("audio")
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        Some("image")
    } else {
        None
    }
}

/// Finds uploadable media under `root`.
///
/// A regular file is returned as-is when its type is recognized. A
/// directory is walked recursively; hidden entries (leading `.`) are
/// skipped. The result is sorted by path.
pub fn scan_media_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root)?;
    let mut files = Vec::new();

    if metadata.is_file() {
        if infer_media_type(root).is_some() {
            files.push(root.to_path_buf());
        }
        return Ok(files);
    }

    walk_dir(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(current: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            walk_dir(&path, files)?;
        } else if metadata.is_file() && infer_media_type(&path).is_some() {
            files.push(path);
        }
    }
    Ok(())
}
