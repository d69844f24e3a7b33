use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use hf_layout::LayoutParams;
use hf_network::RelaxationConfig;

use crate::error::Result;

/// Everything a run can be configured with. Missing fields take their
/// defaults, and command-line flags override the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopfoldConfig {
    pub network: RelaxationConfig,
    pub layout: LayoutParams,
    /// Relaxation epochs before pruning.
    pub epochs: usize,
    /// Layout steps before rendering.
    pub steps: usize,
    /// Layout time step.
    pub dt: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for HopfoldConfig {
    fn default() -> Self {
        Self {
            network: RelaxationConfig::default(),
            layout: LayoutParams::default(),
            epochs: 20,
            steps: 600,
            dt: 1.0 / 30.0,
            width: 800.0,
            height: 800.0,
        }
    }
}

impl HopfoldConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hopfold.json");
        fs::write(&path, r#"{
            "epochs": 50,
            "network": { "allow_wobble": true, "weights": { "rc_inhibit": -0.1, "knot_inhibit": -0.05, "diag_stim": 0.5 } },
            "layout": { "damping": 0.9 }
        }"#).unwrap();

        let config = HopfoldConfig::load(&path).unwrap();
        assert_eq!(config.epochs, 50);
        assert_eq!(config.steps, 600);
        assert!(config.network.allow_wobble);
        assert_eq!(config.network.learning_rate, 0.4);
        assert_eq!(config.network.weights.map(|w| w.diag_stim), Some(0.5));
        assert_eq!(config.layout.damping, 0.9);
        assert_eq!(config.layout.rest_length, 30.0);
    }

    #[test]
    fn test_default_roundtrip() {
        let text = serde_json::to_string(&HopfoldConfig::default()).unwrap();
        let config: HopfoldConfig = serde_json::from_str(&text).unwrap();
        let default = HopfoldConfig::default();
        assert_eq!(config.network, default.network);
        assert_eq!(config.layout, default.layout);
        assert_eq!((config.epochs, config.steps), (default.epochs, default.steps));
        assert!((config.dt - default.dt).abs() < 1e-12);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(HopfoldConfig::load(&dir.path().join("nope.json")), Err(CliError::Io(_))));
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ epochs: }").unwrap();
        assert!(matches!(HopfoldConfig::load(&path), Err(CliError::Json(_))));
    }
}
