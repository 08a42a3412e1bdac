//! Typed findings and the append-only store that accumulates them.
//!
//! One ordered sequence of a tagged union replaces parallel per-kind
//! lists; downstream reporting filters by variant when it needs to.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::archive::ArchiveKind;
use crate::engine::classify::ExecutableType;

/// Which codec produced a decoded string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Encoding {
    Base64,
    Hex,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Base64 => write!(f, "base64"),
            Encoding::Hex => write!(f, "hex"),
        }
    }
}

/// One reported result of a scan.
///
/// Every variant carries provenance: `source` is the origin chain (the
/// scanned path extended with each encoded token along the way) and
/// `encoded` is the proximate origin of the payload — the matched token,
/// or the entry path for content lifted out of an archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Decoded, human-readable text that passed the interestingness filter.
    String {
        source: String,
        encoded: String,
        encoding: Encoding,
        decoded: String,
    },
    /// Decoded bytes with a recognized executable signature.
    Binary {
        source: String,
        encoded: String,
        executable: ExecutableType,
        bytes: Vec<u8>,
    },
    /// Decoded bytes in a known container format.
    Archive {
        source: String,
        encoded: String,
        archive: ArchiveKind,
        bytes: Vec<u8>,
    },
    /// Decoded content with non-whitespace control characters: not safely
    /// a string, but still potentially interesting.
    Blob {
        source: String,
        encoded: String,
        text: String,
    },
}

impl Finding {
    /// The origin chain this finding was observed under.
    pub fn source(&self) -> &str {
        match self {
            Finding::String { source, .. }
            | Finding::Binary { source, .. }
            | Finding::Archive { source, .. }
            | Finding::Blob { source, .. } => source,
        }
    }

    /// Short label used for report file naming.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Finding::String { .. } => "string",
            Finding::Binary { .. } => "binary",
            Finding::Archive { .. } => "archive",
            Finding::Blob { .. } => "blob",
        }
    }

    /// Payload bytes for findings that persist raw content.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Finding::Binary { bytes, .. } | Finding::Archive { bytes, .. } => Some(bytes),
            Finding::Blob { text, .. } => Some(text.as_bytes()),
            Finding::String { .. } => None,
        }
    }
}

/// Append-only accumulator for one top-level scan invocation.
#[derive(Debug, Default, Serialize)]
pub struct FindingStore {
    findings: Vec<Finding>,
}

impl FindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one finding. Findings are never removed or merged.
    pub fn record(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }

    pub fn strings(&self) -> impl Iterator<Item = &Finding> {
        self.iter().filter(|f| matches!(f, Finding::String { .. }))
    }

    pub fn binaries(&self) -> impl Iterator<Item = &Finding> {
        self.iter().filter(|f| matches!(f, Finding::Binary { .. }))
    }

    pub fn archives(&self) -> impl Iterator<Item = &Finding> {
        self.iter().filter(|f| matches!(f, Finding::Archive { .. }))
    }

    pub fn blobs(&self) -> impl Iterator<Item = &Finding> {
        self.iter().filter(|f| matches!(f, Finding::Blob { .. }))
    }

    pub fn as_slice(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_vec(self) -> Vec<Finding> {
        self.findings
    }
}
