//! Recursive encoded-content detection pipeline.
//!
//! The pipeline scans text for Base64- and hex-shaped candidate tokens,
//! verifies and decodes them, classifies the decoded bytes (executable,
//! archive, or text), and recurses into anything that may hold further
//! layers of encoding.

pub mod archive;
pub mod classify;
pub mod codec;
pub mod config;
pub mod filter;
pub mod findings;
pub mod patterns;
pub mod scan;

// Re-export the types most callers need
pub use archive::{ArchiveEntry, ArchiveKind, ArchiveProbe, BuiltinArchiveProbe};
pub use classify::ExecutableType;
pub use config::EngineConfig;
pub use findings::{Encoding, Finding, FindingStore};
pub use scan::ScanEngine;
