//! The recursive scan driver: match, decode, classify, then record,
//! expand, or recurse.
//!
//! Recursion is an explicit depth-tracked worklist rather than call-stack
//! recursion. Decoded content is always smaller than its encoding, so any
//! one decode chain shrinks; the depth cap bounds adversarial fan-out of
//! short mutually-decodable tokens that the shrinking property alone does
//! not exclude.

use tracing::{debug, info, warn};

use crate::engine::archive::{ArchiveEntry, ArchiveProbe, BuiltinArchiveProbe};
use crate::engine::classify::classify_bytes;
use crate::engine::codec::{base64_decode_verified, hex_decode};
use crate::engine::config::EngineConfig;
use crate::engine::filter::{has_nonspace_control, is_interesting};
use crate::engine::findings::{Encoding, Finding, FindingStore};
use crate::engine::patterns::Matchers;
use crate::error::Result;

/// Separator between links of a provenance chain.
const SOURCE_SEP: &str = " > ";

/// One unit of work: a buffer under a provenance label at some depth.
#[derive(Debug)]
struct ScanUnit {
    path: String,
    text: String,
    depth: usize,
}

/// Detection engine for one configuration.
///
/// Owns its compiled matchers; construction fixes all behavior. A
/// different configuration means constructing a new engine.
pub struct ScanEngine {
    config: EngineConfig,
    matchers: Matchers,
    probe: Box<dyn ArchiveProbe>,
}

impl ScanEngine {
    /// Build an engine with the built-in archive probe.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_probe(config, Box::new(BuiltinArchiveProbe))
    }

    /// Build an engine with a caller-supplied archive probe.
    pub fn with_probe(config: EngineConfig, probe: Box<dyn ArchiveProbe>) -> Self {
        let matchers = Matchers::new(&config);
        Self {
            config,
            matchers,
            probe,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scan one buffer and return the findings it produced.
    pub fn scan(&self, path: &str, text: &str) -> FindingStore {
        let mut store = FindingStore::new();
        self.scan_into(path, text, &mut store);
        store
    }

    /// Scan one buffer, appending findings to an existing store.
    ///
    /// Never fails: failures local to one candidate are contained and
    /// logged, and the remaining candidates keep processing.
    pub fn scan_into(&self, path: &str, text: &str, store: &mut FindingStore) {
        info!(path = %path, bytes = text.len(), "scanning");
        let mut work = vec![ScanUnit {
            path: path.to_string(),
            text: text.to_string(),
            depth: 0,
        }];
        while let Some(unit) = work.pop() {
            if unit.depth >= self.config.max_depth {
                warn!(
                    path = %unit.path,
                    depth = unit.depth,
                    "recursion depth cap reached, dropping unit"
                );
                continue;
            }
            self.scan_unit(&unit, store, &mut work);
        }
    }

    fn scan_unit(&self, unit: &ScanUnit, store: &mut FindingStore, work: &mut Vec<ScanUnit>) {
        for token in self.matchers.base64_candidates(&unit.text) {
            if let Err(e) = self.process_base64(unit, token, store, work) {
                warn!(path = %unit.path, error = %e, "base64 candidate failed, continuing");
            }
        }
        for token in self.matchers.hex_candidates(&unit.text) {
            if let Err(e) = self.process_hex(unit, token, store, work) {
                warn!(path = %unit.path, error = %e, "hex candidate failed, continuing");
            }
        }
    }

    fn process_base64(
        &self,
        unit: &ScanUnit,
        token: &str,
        store: &mut FindingStore,
        work: &mut Vec<ScanUnit>,
    ) -> Result<()> {
        // Round trip first: only canonical encodings count as authentic
        let bytes = match base64_decode_verified(token) {
            Some(b) => b,
            None => {
                debug!(path = %unit.path, "base64-shaped token failed round trip");
                return Ok(());
            }
        };

        let executable = classify_bytes(&bytes);
        if executable.is_executable() {
            info!(path = %unit.path, %executable, "encoded executable");
            store.record(Finding::Binary {
                source: unit.path.clone(),
                encoded: token.to_string(),
                executable,
                bytes,
            });
            return Ok(());
        }

        if let Some(kind) = self.probe.sniff(&bytes) {
            match self.probe.extract(kind, &bytes) {
                Ok(entries) => {
                    info!(path = %unit.path, archive = %kind, entries = entries.len(), "encoded archive");
                    store.record(Finding::Archive {
                        source: unit.path.clone(),
                        encoded: token.to_string(),
                        archive: kind,
                        bytes: bytes.clone(),
                    });
                    let archive_path = chain(&unit.path, token);
                    for entry in entries {
                        self.process_entry(&archive_path, entry, unit.depth, store, work);
                    }
                    return Ok(());
                }
                Err(e) => {
                    // Not an archive usable for a finding; treat the bytes
                    // as an unclassified blob and keep going
                    warn!(path = %unit.path, archive = %kind, error = %e, "archive expansion failed");
                }
            }
        }

        let decoded = String::from_utf8_lossy(&bytes).into_owned();
        self.dispose_text(unit, token, decoded, Encoding::Base64, store, work);
        Ok(())
    }

    fn process_hex(
        &self,
        unit: &ScanUnit,
        token: &str,
        store: &mut FindingStore,
        work: &mut Vec<ScanUnit>,
    ) -> Result<()> {
        let bytes = match hex_decode(token) {
            Some(b) => b,
            None => {
                debug!(path = %unit.path, "hex-shaped token failed to decode");
                return Ok(());
            }
        };
        // Hex never takes the binary/archive branch; invalid UTF-8 is
        // simply not an interesting string
        let decoded = match String::from_utf8(bytes) {
            Ok(t) => t,
            Err(_) => {
                debug!(path = %unit.path, "hex candidate decoded to non-text bytes");
                return Ok(());
            }
        };
        self.dispose_text(unit, token, decoded, Encoding::Hex, store, work);
        Ok(())
    }

    /// Record-or-drop for decoded text, queuing a rescan when recorded.
    fn dispose_text(
        &self,
        unit: &ScanUnit,
        token: &str,
        decoded: String,
        encoding: Encoding,
        store: &mut FindingStore,
        work: &mut Vec<ScanUnit>,
    ) {
        let child_path = chain(&unit.path, token);
        if has_nonspace_control(&decoded) {
            store.record(Finding::Blob {
                source: unit.path.clone(),
                encoded: token.to_string(),
                text: decoded.clone(),
            });
            // May itself be a further layer of encoded content
            work.push(ScanUnit {
                path: child_path,
                text: decoded,
                depth: unit.depth + 1,
            });
        } else if is_interesting(&decoded, &self.config) {
            debug!(path = %unit.path, %encoding, "decoded string accepted");
            store.record(Finding::String {
                source: unit.path.clone(),
                encoded: token.to_string(),
                encoding,
                decoded: decoded.clone(),
            });
            work.push(ScanUnit {
                path: child_path,
                text: decoded,
                depth: unit.depth + 1,
            });
        } else {
            debug!(path = %unit.path, %encoding, "decoded string rejected as noise");
        }
    }

    /// Classify one extracted archive entry, recursing on text content.
    fn process_entry(
        &self,
        archive_path: &str,
        entry: ArchiveEntry,
        depth: usize,
        store: &mut FindingStore,
        work: &mut Vec<ScanUnit>,
    ) {
        let entry_source = chain(archive_path, &entry.path);
        let executable = classify_bytes(&entry.bytes);
        if executable.is_executable() {
            info!(entry = %entry_source, %executable, "executable archive entry");
            store.record(Finding::Binary {
                source: entry_source,
                encoded: entry.path,
                executable,
                bytes: entry.bytes,
            });
            return;
        }
        let text = String::from_utf8_lossy(&entry.bytes).into_owned();
        work.push(ScanUnit {
            path: entry_source,
            text,
            depth: depth + 1,
        });
    }
}

fn chain(parent: &str, label: &str) -> String {
    format!("{}{}{}", parent, SOURCE_SEP, label)
}
