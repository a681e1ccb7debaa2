// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defaults loaded from environment variables.

use citylod_citygml::EnvelopeMode;
use std::path::PathBuf;

/// CLI defaults; command-line flags override every field.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Level of detail to build.
    pub lod: i64,
    /// EPSG code of the output reference system.
    pub epsg: u32,
    /// Directory for outputs when `--output` is not given.
    pub output_dir: PathBuf,
    /// Root envelope mode.
    pub envelope: EnvelopeMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lod: 2,
            epsg: 4326,
            output_dir: PathBuf::from("."),
            envelope: EnvelopeMode::FixedDefault,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            lod: lookup("CITYLOD_LOD")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.lod),
            epsg: lookup("CITYLOD_EPSG")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.epsg),
            output_dir: lookup("CITYLOD_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            envelope: lookup("CITYLOD_ENVELOPE")
                .and_then(|v| parse_envelope(&v))
                .unwrap_or(defaults.envelope),
        }
    }
}

/// `fixed` or `computed` (case-insensitive)
pub fn parse_envelope(value: &str) -> Option<EnvelopeMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "fixed" | "fixed_default" => Some(EnvelopeMode::FixedDefault),
        "computed" => Some(EnvelopeMode::Computed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_with(&[]), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("CITYLOD_LOD", "4"),
            ("CITYLOD_EPSG", "25832"),
            ("CITYLOD_OUTPUT_DIR", "/tmp/out"),
            ("CITYLOD_ENVELOPE", "Computed"),
        ]);
        assert_eq!(config.lod, 4);
        assert_eq!(config.epsg, 25832);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.envelope, EnvelopeMode::Computed);
    }

    #[test]
    fn test_out_of_range_lod_kept() {
        assert_eq!(config_with(&[("CITYLOD_LOD", "-3")]).lod, -3);
        assert_eq!(config_with(&[("CITYLOD_LOD", "300")]).lod, 300);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config_with(&[("CITYLOD_LOD", "high"), ("CITYLOD_ENVELOPE", "tight")]);
        assert_eq!(config.lod, 2);
        assert_eq!(config.envelope, EnvelopeMode::FixedDefault);
    }
}
