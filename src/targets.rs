//! Target resolution and file enumeration.
//!
//! Maps each caller-supplied target onto the list of files to scan: an
//! existing file scans directly, a directory is walked recursively, and
//! anything else is a resolution failure the caller reports and skips.
//! Known-binary media files are skipped by MIME type before scanning.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::engine::{FindingStore, ScanEngine};
use crate::error::{DefoggerError, Result};

/// MIME prefixes and types that are never worth scanning as text.
const SKIP_MIME_FRAGMENTS: [&str; 3] = ["audio", "video", "x-msdownload"];

/// Resolve a target to the files it denotes.
pub fn resolve_target(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if target.is_dir() {
        let mut files = Vec::new();
        for entry in WalkDir::new(target) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        return Ok(files);
    }
    Err(DefoggerError::TargetResolution(target.to_path_buf()))
}

/// True when the file's MIME type marks it as known-binary media.
pub fn should_skip(path: &Path) -> bool {
    if let Some(mime) = mime_guess::from_path(path).first() {
        let mime = mime.to_string();
        if SKIP_MIME_FRAGMENTS.iter().any(|frag| mime.contains(frag)) {
            debug!(path = %path.display(), mime = %mime, "skipping by MIME type");
            return true;
        }
    }
    false
}

/// Scan every file under a target, accumulating into one store.
pub fn scan_target(engine: &ScanEngine, target: &Path) -> Result<FindingStore> {
    let mut store = FindingStore::new();
    for file in resolve_target(target)? {
        if should_skip(&file) {
            continue;
        }
        let bytes = match std::fs::read(&file) {
            Ok(b) => b,
            Err(e) => {
                warn!(path = %file.display(), error = %e, "cannot read file, skipping");
                continue;
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        engine.scan_into(&file.display().to_string(), &text, &mut store);
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use std::fs;

    #[test]
    fn file_resolves_to_itself() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.txt");
        fs::write(&file, "contents").unwrap();
        assert_eq!(resolve_target(&file).unwrap(), vec![file]);
    }

    #[test]
    fn directory_resolves_to_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("sub/b.txt"), "b").unwrap();
        let files = resolve_target(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn missing_target_fails_resolution() {
        let err = resolve_target(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, DefoggerError::TargetResolution(_)));
    }

    #[test]
    fn media_files_are_skipped() {
        assert!(should_skip(Path::new("song.mp3")));
        assert!(should_skip(Path::new("clip.mp4")));
        assert!(should_skip(Path::new("setup.exe")));
        assert!(!should_skip(Path::new("notes.txt")));
        assert!(!should_skip(Path::new("no_extension")));
    }

    #[test]
    fn scan_target_reads_and_scans() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("payload.txt");
        fs::write(&file, "token: aGVsbG8td29ybGQtdGVzdA==").unwrap();
        let engine = ScanEngine::new(EngineConfig::default());
        let store = scan_target(&engine, dir.path()).unwrap();
        assert_eq!(store.strings().count(), 1);
    }
}
