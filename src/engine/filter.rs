//! Heuristic filter deciding whether decoded text is worth reporting.
//!
//! Applied only to decoded text that was not classified as an executable
//! or an archive. Known benign shapes are suppressed first; after that,
//! short-but-structured tokens and long strings are accepted, everything
//! else is noise.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::config::EngineConfig;

/// Artifact-id strings from package metadata, e.g. `12345:ReleaseAsset678`.
static RE_RELEASE_ARTIFACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+:(?:ReleaseAsset|Release)\d+$").expect("valid release artifact regex")
});

/// Short tokens that are still structured: alphanumerics plus dash/colon
/// only, no spaces or punctuation.
static RE_STRUCTURED_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-:]+$").expect("valid structured token regex"));

/// True when `text` contains a control character other than whitespace.
///
/// Such content is not safely treated as a string; the driver reports it
/// as a blob instead of running it through [`is_interesting`].
pub fn has_nonspace_control(text: &str) -> bool {
    text.chars().any(|c| c.is_control() && !c.is_whitespace())
}

/// Known benign shapes that decode cleanly but carry no signal.
fn is_known_false_positive(text: &str) -> bool {
    let trimmed = text.trim_start();

    // JavaScript source maps: JSON with "version" plus mapping fields
    if trimmed.starts_with('{')
        && text.contains("\"version\"")
        && (text.contains("\"sourceRoot\"")
            || text.contains("\"sourcesContent\"")
            || text.contains("\"names\""))
    {
        return true;
    }

    // Inline SVG documents, bare or with an XML prolog
    if trimmed.starts_with("<svg ")
        || (trimmed.starts_with("<?xml version=\"1.0\"") && text.contains("<svg "))
    {
        return true;
    }

    // Package metadata artifact ids
    if RE_RELEASE_ARTIFACT.is_match(trimmed) {
        return true;
    }

    false
}

/// Decide whether decoded text should be reported as a string finding.
pub fn is_interesting(text: &str, config: &EngineConfig) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    if is_known_false_positive(text) {
        return false;
    }
    let len = text.chars().count();
    if len >= config.min_string_length && RE_STRUCTURED_TOKEN.is_match(text) {
        return true;
    }
    if len < config.min_string_length {
        return false;
    }
    // Long strings are reported regardless of character set
    len > config.long_string_length
}
