//! Engine configuration
//!
//! Loaded from an optional TOML file plus `SETTLEMENT_*` environment
//! overrides, with compiled-in defaults. The cancellation policy is the
//! one behavioral switch: the engine applies whichever policy is
//! configured uniformly across all cancellation paths.

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::amount::input_tolerance;
use core_kernel::CoreError;

/// How `cancel` treats a transaction whose journal entry is still POSTED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Reverse the posted entry automatically, then cancel
    #[default]
    AutoReverse,
    /// Refuse with PRECONDITION_FAILED until the caller reverses explicitly
    Block,
}

/// Settlement engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Policy for canceling transactions with a posted journal entry
    #[serde(default)]
    pub cancellation_policy: CancellationPolicy,
    /// Tolerance applied to client-supplied manual entry totals
    #[serde(default = "input_tolerance")]
    pub balance_tolerance: Decimal,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            cancellation_policy: CancellationPolicy::default(),
            balance_tolerance: input_tolerance(),
        }
    }
}

impl SettlementConfig {
    /// Loads settings from `path` (optional) and the environment
    ///
    /// Environment variables use the `SETTLEMENT_` prefix, e.g.
    /// `SETTLEMENT_CANCELLATION_POLICY=block`.
    pub fn load(path: Option<&str>) -> Result<Self, CoreError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        builder
            .add_source(Environment::with_prefix("SETTLEMENT"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CoreError::internal(format!("configuration error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    // Loader tests share the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = SettlementConfig::default();
        assert_eq!(config.cancellation_policy, CancellationPolicy::AutoReverse);
        assert_eq!(config.balance_tolerance, dec!(0.001));
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let config = SettlementConfig::load(None).unwrap();
        assert_eq!(config.cancellation_policy, CancellationPolicy::AutoReverse);
    }

    #[test]
    fn test_policy_deserializes_from_snake_case() {
        let config: SettlementConfig =
            serde_json::from_str(r#"{ "cancellation_policy": "block" }"#).unwrap();
        assert_eq!(config.cancellation_policy, CancellationPolicy::Block);
        assert_eq!(config.balance_tolerance, dec!(0.001));
    }

    #[test]
    fn test_file_source_overrides_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let path = std::env::temp_dir().join("settlement_config_file_test.toml");
        std::fs::write(&path, "cancellation_policy = \"block\"\n").unwrap();

        let config = SettlementConfig::load(path.to_str()).unwrap();
        assert_eq!(config.cancellation_policy, CancellationPolicy::Block);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let path = std::env::temp_dir().join("settlement_config_env_test.toml");
        std::fs::write(&path, "cancellation_policy = \"auto_reverse\"\n").unwrap();

        std::env::set_var("SETTLEMENT_CANCELLATION_POLICY", "block");
        let config = SettlementConfig::load(path.to_str()).unwrap();
        std::env::remove_var("SETTLEMENT_CANCELLATION_POLICY");

        assert_eq!(config.cancellation_policy, CancellationPolicy::Block);
        std::fs::remove_file(&path).ok();
    }
}
