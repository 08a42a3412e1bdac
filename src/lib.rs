//! defogger: recursive detection of encoded content in text.
//!
//! Scans arbitrary text for Base64- or hex-encoded substrings, decodes
//! and classifies them, expands encoded archives, and recurses into
//! decoded content to catch nested layers of encoding.

pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod targets;

pub use engine::{EngineConfig, Finding, FindingStore, ScanEngine};
pub use error::{DefoggerError, Result};
