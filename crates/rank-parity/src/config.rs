//! ハーネス設定（TOML）
//!
//! すべての項目に既定値があり、設定ファイルなしでも Python vs R の既定マトリクスで動く。
//!
//! ```toml
//! timeout_secs = 600
//!
//! [left]
//! label = "Python"
//! runtime = "python3"
//! script = "run_python_parameterized.py"
//! artifact = "temp_python_output.csv"
//!
//! [[scenarios]]
//! dataset = "letters"
//! full = false
//! N = 15
//! description = "Letters, full=False, N=15"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::invoke::Implementation;
use crate::scenario::{Scenario, default_matrix};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// 比較される側
    #[serde(default = "Implementation::python")]
    pub left: Implementation,
    /// 参照順序側
    #[serde(default = "Implementation::r")]
    pub right: Implementation,
    /// 外部プロセス 1 回あたりの上限秒数。未指定なら無制限
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_matrix")]
    pub scenarios: Vec<Scenario>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            left: Implementation::python(),
            right: Implementation::r(),
            timeout_secs: None,
            scenarios: default_matrix(),
        }
    }
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }
        if let Some(index) = self.scenarios.iter().position(|s| s.dataset.trim().is_empty()) {
            return Err(ConfigError::EmptyDataset { index });
        }
        if self.left.label.trim().is_empty() || self.right.label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel);
        }
        if self.left.artifact == self.right.artifact {
            return Err(ConfigError::ArtifactCollision(self.left.artifact.clone()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|&s| s > 0).map(Duration::from_secs)
    }
}
