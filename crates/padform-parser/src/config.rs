use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Everything an expansion reads besides the footprint itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExpandConfig {
    pub distances: Distances,
    pub stack: StackConfig,
}

/// Tolerances applied when deriving soldermask/solderpaste shapes from a pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Distances {
    pub soldermask: SheetDistances,
    pub solderpaste: SheetDistances,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SheetDistances {
    pub path_scale: f64,
    pub rect_buffer: f64,
    pub circle_buffer: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StackConfig {
    /// Number of copper layers between `top` and `bottom`.
    pub internal_layers: usize,
}

impl Default for Distances {
    fn default() -> Self {
        Self {
            soldermask: SheetDistances {
                path_scale: 1.05,
                rect_buffer: 0.05,
                circle_buffer: 0.05,
            },
            solderpaste: SheetDistances {
                path_scale: 0.9,
                rect_buffer: -0.1,
                circle_buffer: -0.1,
            },
        }
    }
}

impl ExpandConfig {
    /// Parse from YAML (JSON documents are accepted too).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg = ExpandConfig::from_yaml_str(
            r#"
distances:
  soldermask:
    path-scale: 1.2
    rect-buffer: 0.1
    circle-buffer: 0.2
stack:
  internal-layers: 2
"#,
        )
        .unwrap();
        assert_abs_diff_eq!(cfg.distances.soldermask.rect_buffer, 0.1);
        assert_abs_diff_eq!(cfg.distances.soldermask.path_scale, 1.2);
        assert_eq!(cfg.distances.solderpaste, Distances::default().solderpaste);
        assert_eq!(cfg.stack.internal_layers, 2);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ExpandConfig::from_yaml_str("  \n").unwrap(), ExpandConfig::default());
    }

    #[test]
    fn json_config() {
        let cfg = ExpandConfig::from_json_str(
            r#"{"distances":{"solderpaste":{"path-scale":0.8,"rect-buffer":-0.2,"circle-buffer":-0.3}}}"#,
        )
        .unwrap();
        assert_abs_diff_eq!(cfg.distances.solderpaste.circle_buffer, -0.3);
        assert_eq!(cfg.stack.internal_layers, 0);
    }

    #[test]
    fn incomplete_sheet_distances_are_rejected() {
        let err = ExpandConfig::from_yaml_str("distances: {soldermask: {rect-buffer: 0.1}}")
            .unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }
}
