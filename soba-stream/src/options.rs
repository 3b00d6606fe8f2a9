//! Stream adapter options.

use serde::{Deserialize, Serialize};

use crate::error::StreamError;
use crate::strategy::EmitStrategyKind;

/// Capacity of the pending-lines queue. Overflow drops the oldest line
/// and surfaces an error to the host.
pub const MAX_PENDING: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Emission timing strategy.
    #[serde(default)]
    pub strategy: EmitStrategyKind,
    /// Pending-lines queue capacity for the polling surface.
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

fn default_max_pending() -> usize {
    MAX_PENDING
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            strategy: EmitStrategyKind::default(),
            max_pending: MAX_PENDING,
        }
    }
}

impl StreamOptions {
    pub fn validate(&self) -> Result<(), StreamError> {
        match self.strategy {
            EmitStrategyKind::FixedTimeout { timeout_ms } if timeout_ms == 0 => {
                return Err(StreamError::InvalidOptions(
                    "timeout_ms must be nonzero".to_string(),
                ));
            }
            EmitStrategyKind::StatefulTimeout {
                volatile_timeout_ms,
                stable_timeout_ms,
            } if volatile_timeout_ms == 0 || stable_timeout_ms == 0 => {
                return Err(StreamError::InvalidOptions(
                    "volatile_timeout_ms and stable_timeout_ms must be nonzero".to_string(),
                ));
            }
            _ => {}
        }
        if self.max_pending == 0 {
            return Err(StreamError::InvalidOptions(
                "max_pending must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert!(StreamOptions::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let options = StreamOptions {
            strategy: EmitStrategyKind::FixedTimeout { timeout_ms: 0 },
            ..StreamOptions::default()
        };
        assert!(options.validate().is_err());

        let options = StreamOptions {
            strategy: EmitStrategyKind::StatefulTimeout {
                volatile_timeout_ms: 0,
                stable_timeout_ms: 200,
            },
            ..StreamOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let options = StreamOptions {
            max_pending: 0,
            ..StreamOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
