// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pipeline configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! arena_alignment = 64
//! enable_profiling = true
//! ```

use std::path::Path;

/// Configuration for a [`crate::Pipeline`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    /// Byte alignment of arena leases (non-zero power of two).
    #[serde(default = "default_alignment")]
    pub arena_alignment: usize,
    /// Whether to collect per-step timing metrics.
    #[serde(default = "default_true")]
    pub enable_profiling: bool,
}

fn default_alignment() -> usize {
    64
}

fn default_true() -> bool {
    true
}

impl PipelineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, super::PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            super::PipelineError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, super::PipelineError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| super::PipelineError::Config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, super::PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| super::PipelineError::Config(format!("TOML serialise error: {e}")))
    }

    /// Checks field constraints.
    pub fn validate(&self) -> Result<(), super::PipelineError> {
        if self.arena_alignment == 0 || !self.arena_alignment.is_power_of_two() {
            return Err(super::PipelineError::Config(format!(
                "arena_alignment {} is not a non-zero power of two",
                self.arena_alignment
            )));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            arena_alignment: default_alignment(),
            enable_profiling: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_toml() {
        let config = PipelineConfig::from_toml(
            "arena_alignment = 128\nenable_profiling = false\n",
        )
        .unwrap();
        assert_eq!(config.arena_alignment, 128);
        assert!(!config.enable_profiling);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config.arena_alignment, 64);
        assert!(config.enable_profiling);
    }

    #[test]
    fn test_rejects_bad_alignment() {
        assert!(PipelineConfig::from_toml("arena_alignment = 48\n").is_err());
        assert!(PipelineConfig::from_toml("arena_alignment = 0\n").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::default();
        let reparsed = PipelineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(reparsed.arena_alignment, config.arena_alignment);
        assert_eq!(reparsed.enable_profiling, config.enable_profiling);
    }

    #[test]
    fn test_missing_file() {
        assert!(PipelineConfig::from_file(Path::new("/nonexistent/pipeline.toml")).is_err());
    }
}
