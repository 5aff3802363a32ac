//! Verifier configuration.
//!
//! Defaults match the SS1 protocol; the environment can override them.

use chrono::TimeDelta;
use tracing::warn;

/// Default tolerated distance between the request date and the verifier clock (24h).
pub const DEFAULT_MAX_CLOCK_SKEW_MS: u64 = 86_400_000;

/// Configuration for [`Verifier`](crate::verifier::Verifier).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierConfig {
    /// Maximum allowed `|request date - now|`, in milliseconds.
    pub max_clock_skew_ms: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_clock_skew_ms: DEFAULT_MAX_CLOCK_SKEW_MS,
        }
    }
}

impl VerifierConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SS1_MAX_CLOCK_SKEW_MS` | `86400000` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("SS1_MAX_CLOCK_SKEW_MS") {
            match v.parse() {
                Ok(ms) => config.max_clock_skew_ms = ms,
                Err(_) => warn!(value = %v, "ignoring invalid SS1_MAX_CLOCK_SKEW_MS"),
            }
        }

        config
    }

    /// The skew window as a duration.
    #[must_use]
    pub fn max_clock_skew(&self) -> TimeDelta {
        i64::try_from(self.max_clock_skew_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX)
    }
}
