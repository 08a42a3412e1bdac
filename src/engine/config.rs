//! Configuration for the detection engine.
//!
//! All knobs are fixed at engine construction; nothing here is mutated
//! afterwards. The matchers are compiled once from these values.

use serde::{Deserialize, Serialize};

/// Immutable configuration for a detection engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum decoded-equivalent length before a Base64 run is considered.
    /// Scaled by 4 to a character-run threshold when the matcher is built.
    pub min_base64_length: usize,
    /// Minimum decoded byte length before a hex run is considered.
    /// Scaled by 2 to a hex-digit-run threshold when the matcher is built.
    pub min_hex_length: usize,
    /// Shortest decoded text worth reporting at all.
    pub min_string_length: usize,
    /// Decoded text longer than this is reported regardless of character set.
    pub long_string_length: usize,
    /// Hard bound on nesting depth for recursive rescans.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_base64_length: 1,
            min_hex_length: 8,
            min_string_length: 8,
            long_string_length: 24,
            max_depth: 16,
        }
    }
}

impl EngineConfig {
    /// Group-count threshold for the Base64 matcher (each group is 4 chars).
    pub fn base64_run_groups(&self) -> usize {
        self.min_base64_length.max(1)
    }

    /// Digit-run threshold for the unbroken hex matcher.
    pub fn hex_run_digits(&self) -> usize {
        self.min_hex_length.saturating_mul(2).max(2)
    }

    /// Group-count threshold for the dash-separated hex matcher.
    pub fn hex_run_groups(&self) -> usize {
        self.min_hex_length.saturating_mul(2).saturating_sub(1).max(1)
    }
}
