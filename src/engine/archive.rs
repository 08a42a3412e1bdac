//! Archive detection and in-memory expansion.
//!
//! The engine itself never implements container formats; it asks an
//! [`ArchiveProbe`] whether a byte buffer is a known container and, if so,
//! for its entries. The built-in probe combines content sniffing via
//! `infer` with fast magic-prefix checks, and expands zip, gzip and tar
//! entirely in memory. Intermediate buffers never touch disk; the probe
//! sits inside a recursive, latency-sensitive loop.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Cursor, Read};
use tracing::{debug, warn};

use crate::error::{DefoggerError, Result};

/// Container formats the probe can recognize.
///
/// Not every recognized format is extractable; see
/// [`ArchiveProbe::extract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ArchiveKind {
    Zip,
    Gzip,
    Tar,
    SevenZip,
    Xz,
    Bzip2,
    Zstd,
    Lz4,
    Rar,
    Cpio,
    Ar,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::Gzip => "gzip",
            ArchiveKind::Tar => "tar",
            ArchiveKind::SevenZip => "7z",
            ArchiveKind::Xz => "xz",
            ArchiveKind::Bzip2 => "bzip2",
            ArchiveKind::Zstd => "zstd",
            ArchiveKind::Lz4 => "lz4",
            ArchiveKind::Rar => "rar",
            ArchiveKind::Cpio => "cpio",
            ArchiveKind::Ar => "ar",
        };
        write!(f, "{}", name)
    }
}

/// One expanded archive entry: full path inside the container plus content.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// External collaborator boundary for container handling.
///
/// `sniff` answers the "known container?" predicate; `extract` enumerates
/// entries fully materialized in memory.
pub trait ArchiveProbe {
    /// Identify the container format of `data`, if any.
    fn sniff(&self, data: &[u8]) -> Option<ArchiveKind>;

    /// Expand `data` into its entries.
    ///
    /// Fails for formats that are recognized but not expandable here.
    fn extract(&self, kind: ArchiveKind, data: &[u8]) -> Result<Vec<ArchiveEntry>>;
}

/// Built-in probe: `infer`-based sniffing plus magic prefixes, with zip,
/// gzip and tar expansion.
#[derive(Debug, Default)]
pub struct BuiltinArchiveProbe;

impl BuiltinArchiveProbe {
    fn kind_from_infer(data: &[u8]) -> Option<ArchiveKind> {
        let kind = infer::get(data)?;
        match kind.extension() {
            "zip" => Some(ArchiveKind::Zip),
            "gz" => Some(ArchiveKind::Gzip),
            "tar" => Some(ArchiveKind::Tar),
            "7z" => Some(ArchiveKind::SevenZip),
            "xz" => Some(ArchiveKind::Xz),
            "bz2" => Some(ArchiveKind::Bzip2),
            "zst" => Some(ArchiveKind::Zstd),
            "lz4" => Some(ArchiveKind::Lz4),
            "rar" => Some(ArchiveKind::Rar),
            "ar" => Some(ArchiveKind::Ar),
            _ => None,
        }
    }

    /// Magic-prefix fallback for formats infer misses on small buffers.
    fn kind_from_magic(data: &[u8]) -> Option<ArchiveKind> {
        if data.len() >= 4 && &data[..4] == b"PK\x03\x04" {
            return Some(ArchiveKind::Zip);
        }
        if data.len() >= 2 && data[0] == 0x1F && data[1] == 0x8B {
            return Some(ArchiveKind::Gzip);
        }
        if data.len() > 262 && &data[257..262] == b"ustar" {
            return Some(ArchiveKind::Tar);
        }
        if data.len() >= 6 && data[..6] == [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C] {
            return Some(ArchiveKind::SevenZip);
        }
        if data.len() >= 6 && data[..6] == [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00] {
            return Some(ArchiveKind::Xz);
        }
        if data.len() >= 3 && &data[..3] == b"BZh" {
            return Some(ArchiveKind::Bzip2);
        }
        if data.len() >= 4 && data[..4] == [0x28, 0xB5, 0x2F, 0xFD] {
            return Some(ArchiveKind::Zstd);
        }
        if data.len() >= 4 && data[..4] == [0x04, 0x22, 0x4D, 0x18] {
            return Some(ArchiveKind::Lz4);
        }
        if data.len() >= 7 && data[..7] == [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00] {
            return Some(ArchiveKind::Rar);
        }
        if data.len() >= 8 && data[..8] == [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x01, 0x00] {
            return Some(ArchiveKind::Rar);
        }
        if data.len() >= 6 && (data[..6] == *b"070701" || data[..6] == *b"070702") {
            return Some(ArchiveKind::Cpio);
        }
        if data.len() >= 8 && &data[..8] == b"!<arch>\n" {
            return Some(ArchiveKind::Ar);
        }
        None
    }

    fn extract_zip(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| DefoggerError::ArchiveExtraction(e.to_string()))?;
        debug!(entries = archive.len(), "expanding zip archive");
        let mut out = Vec::new();
        for i in 0..archive.len() {
            let mut entry = match archive.by_index(i) {
                Ok(e) => e,
                Err(e) => {
                    warn!(index = i, error = %e, "skipping unreadable zip entry");
                    continue;
                }
            };
            if entry.is_dir() {
                continue;
            }
            let path = entry
                .enclosed_name()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry.name().to_string());
            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                warn!(entry = %path, error = %e, "skipping zip entry with bad content");
                continue;
            }
            out.push(ArchiveEntry { path, bytes });
        }
        Ok(out)
    }

    fn extract_gzip(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let mut decoder = flate2::read::GzDecoder::new(Cursor::new(data));
        let mut bytes = Vec::new();
        decoder
            .read_to_end(&mut bytes)
            .map_err(|e| DefoggerError::ArchiveExtraction(e.to_string()))?;
        // Header is only available once the stream has been read
        let path = decoder
            .header()
            .and_then(|h| h.filename())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .unwrap_or_else(|| "gzip-content".to_string());
        Ok(vec![ArchiveEntry { path, bytes }])
    }

    fn extract_tar(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let mut archive = tar::Archive::new(Cursor::new(data));
        let entries = archive
            .entries()
            .map_err(|e| DefoggerError::ArchiveExtraction(e.to_string()))?;
        let mut out = Vec::new();
        for entry in entries {
            let mut entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable tar entry");
                    continue;
                }
            };
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let path = match entry.path() {
                Ok(p) => p.to_string_lossy().into_owned(),
                Err(_) => continue,
            };
            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                warn!(entry = %path, error = %e, "skipping tar entry with bad content");
                continue;
            }
            out.push(ArchiveEntry { path, bytes });
        }
        Ok(out)
    }
}

impl ArchiveProbe for BuiltinArchiveProbe {
    fn sniff(&self, data: &[u8]) -> Option<ArchiveKind> {
        Self::kind_from_infer(data).or_else(|| Self::kind_from_magic(data))
    }

    fn extract(&self, kind: ArchiveKind, data: &[u8]) -> Result<Vec<ArchiveEntry>> {
        match kind {
            ArchiveKind::Zip => Self::extract_zip(data),
            ArchiveKind::Gzip => Self::extract_gzip(data),
            ArchiveKind::Tar => Self::extract_tar(data),
            other => Err(DefoggerError::ArchiveExtraction(format!(
                "no expander for {} archives",
                other
            ))),
        }
    }
}
