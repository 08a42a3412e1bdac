//! Reporting: JSON serialization of findings and payload persistence.
//!
//! The engine only accumulates findings; this layer turns them into a
//! machine-readable report and, on request, writes Binary/Archive/Blob
//! payloads out to disk under synthetic `{kind}-{sequence}` names.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::engine::{Finding, FindingStore};
use crate::error::Result;

/// A complete scan report, ready for serialization.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub findings: &'a [Finding],
}

impl<'a> ScanReport<'a> {
    pub fn new(store: &'a FindingStore) -> Self {
        Self {
            generated_at: Utc::now(),
            total: store.len(),
            findings: store.as_slice(),
        }
    }
}

/// Serialize the findings of one scan as pretty JSON.
pub fn write_json<W: Write>(store: &FindingStore, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &ScanReport::new(store))?;
    Ok(())
}

/// Persist payload-bearing findings to `dir`.
///
/// Each Binary/Archive/Blob payload is written under a synthetic name of
/// the form `{kind}-{sequence}`, with an independent sequence per kind.
/// String findings carry no payload and are not persisted.
pub fn persist_payloads(store: &FindingStore, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut sequences: HashMap<&'static str, usize> = HashMap::new();
    let mut written = Vec::new();
    for finding in store.iter() {
        let Some(payload) = finding.payload() else {
            continue;
        };
        let kind = finding.kind_label();
        let seq = sequences.entry(kind).or_insert(0);
        let path = dir.join(format!("{}-{}", kind, seq));
        *seq += 1;
        std::fs::write(&path, payload)?;
        written.push(path);
    }
    info!(count = written.len(), dir = %dir.display(), "persisted payloads");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ArchiveKind, Encoding, ExecutableType};

    fn sample_store() -> FindingStore {
        let mut store = FindingStore::new();
        store.record(Finding::String {
            source: "a.txt".into(),
            encoded: "QUIxMi1DRDM0".into(),
            encoding: Encoding::Base64,
            decoded: "AB12-CD34".into(),
        });
        store.record(Finding::Binary {
            source: "a.txt".into(),
            encoded: "TVqQAA==".into(),
            executable: ExecutableType::Windows,
            bytes: vec![0x4D, 0x5A, 0x90, 0x00],
        });
        store.record(Finding::Archive {
            source: "a.txt".into(),
            encoded: "UEsDBA==".into(),
            archive: ArchiveKind::Zip,
            bytes: vec![0x50, 0x4B, 0x03, 0x04],
        });
        store.record(Finding::Binary {
            source: "b.txt".into(),
            encoded: "f0VMRg==".into(),
            executable: ExecutableType::Linux,
            bytes: vec![0x7F, 0x45, 0x4C, 0x46],
        });
        store
    }

    #[test]
    fn json_report_has_all_findings() {
        let store = sample_store();
        let mut buf = Vec::new();
        write_json(&store, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total"], 4);
        assert_eq!(value["findings"].as_array().unwrap().len(), 4);
        assert_eq!(value["findings"][0]["kind"], "string");
    }

    #[test]
    fn payloads_use_per_kind_sequences() {
        let store = sample_store();
        let dir = tempfile::tempdir().unwrap();
        let written = persist_payloads(&store, dir.path()).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        // Strings are skipped; binaries count independently of archives
        assert_eq!(names, vec!["binary-0", "archive-0", "binary-1"]);
        assert_eq!(
            std::fs::read(dir.path().join("binary-1")).unwrap(),
            vec![0x7F, 0x45, 0x4C, 0x46]
        );
    }
}
