//! Service configuration
//!
//! A [`ServiceConfig`] names the engine behavior, the models a boundary should
//! offer, and the default log level. It is read from JSON, either from a
//! string, a file, or the file named by the `MT_BRIDGE_CONFIG` environment
//! variable.
//!
//! ```json
//! {
//!     "engine": { "mode": "suffix" },
//!     "models": [
//!         { "name": "enfr", "source": "en", "target": "fr" },
//!         { "name": "csen", "source": "cs", "target": "en" }
//!     ],
//!     "log_level": "debug"
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::{MockMode, TranslationModel};
use crate::error::{BridgeError, BridgeResult};

/// Environment variable holding the path of the configuration file
pub const CONFIG_ENV_VAR: &str = "MT_BRIDGE_CONFIG";

/// One model entry in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Behavior of the built-in engine
    pub engine: MockMode,
    pub models: Vec<ModelConfig>,
    /// Default tracing filter for binaries, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            engine: MockMode::default(),
            models: Vec::new(),
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_json_str(json: &str) -> BridgeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| BridgeError::Config(format!("Failed to parse configuration: {}", e)))
    }

    pub fn from_file(path: &Path) -> BridgeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Load the file named by `MT_BRIDGE_CONFIG`, or defaults when it is unset
    pub fn from_env() -> BridgeResult<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Build every configured model, keyed by name
    pub fn build_models(&self) -> BridgeResult<HashMap<String, Arc<TranslationModel>>> {
        let mut models = HashMap::with_capacity(self.models.len());
        for entry in &self.models {
            let model = TranslationModel::new(entry.name.clone(), &entry.source, &entry.target)?;
            if models.insert(entry.name.clone(), Arc::new(model)).is_some() {
                return Err(BridgeError::Config(format!(
                    "Duplicate model name '{}'",
                    entry.name
                )));
            }
        }
        Ok(models)
    }
}
