//! Configurable matchers that locate Base64-like and hex-like runs in text.
//!
//! Patterns are intentionally conservative to avoid catastrophic
//! backtracking. A match here is only a candidate: Base64 candidates must
//! still survive round-trip verification and hex candidates must decode,
//! so the matchers err on the permissive side within their length gates.

use regex::Regex;

use crate::engine::config::EngineConfig;

/// Compiled candidate matchers for one engine instance.
///
/// Built once from an [`EngineConfig`] and never mutated; a different
/// configuration means a different engine with its own matchers.
#[derive(Debug)]
pub struct Matchers {
    base64: Regex,
    hex: Regex,
}

impl Matchers {
    /// Compile both matchers from the configured length thresholds.
    pub fn new(config: &EngineConfig) -> Self {
        // Runs of 4-char groups, optionally closed by a 2+2 or 3+1 padding
        // group. Greedy repetition keeps the padded tail inside the match.
        let base64 = Regex::new(&format!(
            r"(?i)(?:[a-z0-9+/]{{4}}){{{groups},}}(?:[a-z0-9+/]{{2}}==|[a-z0-9+/]{{3}}=)?",
            groups = config.base64_run_groups()
        ))
        .expect("valid base64 matcher regex");

        // Either an unbroken digit run (optional 0x prefix) or a dash
        // separated run of 2-digit byte groups.
        let hex = Regex::new(&format!(
            r"(?i)(?:(?:0x)?[0-9a-f]{{{digits},}}|(?:[0-9a-f]{{2}}-){{{groups},}}[0-9a-f]{{2}})",
            digits = config.hex_run_digits(),
            groups = config.hex_run_groups()
        ))
        .expect("valid hex matcher regex");

        Self { base64, hex }
    }

    /// All Base64-shaped candidate tokens in `text`, in match order.
    pub fn base64_candidates<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.base64.find_iter(text).map(|m| m.as_str())
    }

    /// All hex-shaped candidate tokens in `text`, in match order.
    pub fn hex_candidates<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.hex.find_iter(text).map(|m| m.as_str())
    }
}
