//! Estimation configuration
//!
//! Every tunable of the pipeline in one serde struct. Missing JSON fields
//! fall back to the defaults of the 10-second, one-hour half-life setup.

use chrono::NaiveTime;
use impact_core::{BucketTime, ImpactKernel};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::decay::decay_factor;
use crate::error::{EstimationError, Result};

/// Root configuration for impact estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// Width of one time bucket in seconds
    #[serde(default = "default_bucket_width_secs")]
    pub bucket_width_secs: u32,

    /// Half-life of the impact/volume decay in seconds
    #[serde(default = "default_half_life_secs")]
    pub half_life_secs: f64,

    /// Horizon over which impact changes explain returns, in seconds
    #[serde(default = "default_explanation_horizon_secs")]
    pub explanation_horizon_secs: u32,

    /// Lookback of the scaling-factor moving averages, in trading days
    #[serde(default = "default_rolling_window_days")]
    pub rolling_window_days: usize,

    /// First bucket label included in the regression (skips the open auction)
    #[serde(default = "default_cutoff_time")]
    pub cutoff_time: BucketTime,

    /// Ridge penalty (0 = ordinary least squares)
    #[serde(default)]
    pub ridge_lambda: f64,

    /// Buckets in a full trading session, used to scale volatility
    #[serde(default = "default_buckets_per_session")]
    pub buckets_per_session: usize,

    /// Kernels to estimate
    #[serde(default = "default_kernels")]
    pub kernels: Vec<ImpactKernel>,
}

fn default_bucket_width_secs() -> u32 {
    10
}

fn default_half_life_secs() -> f64 {
    3600.0
}

fn default_explanation_horizon_secs() -> u32 {
    60
}

fn default_rolling_window_days() -> usize {
    20
}

fn default_cutoff_time() -> BucketTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_buckets_per_session() -> usize {
    // 6.5 hours of 10-second buckets
    2340
}

fn default_kernels() -> Vec<ImpactKernel> {
    ImpactKernel::ALL.to_vec()
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            bucket_width_secs: default_bucket_width_secs(),
            half_life_secs: default_half_life_secs(),
            explanation_horizon_secs: default_explanation_horizon_secs(),
            rolling_window_days: default_rolling_window_days(),
            cutoff_time: default_cutoff_time(),
            ridge_lambda: 0.0,
            buckets_per_session: default_buckets_per_session(),
            kernels: default_kernels(),
        }
    }
}

impl EstimationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| EstimationError::ConfigIo {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EstimationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket_width_secs == 0 {
            return Err(EstimationError::InvalidConfig(
                "bucket_width_secs must be positive".to_string(),
            ));
        }
        if !(self.half_life_secs > 0.0 && self.half_life_secs.is_finite()) {
            return Err(EstimationError::InvalidConfig(format!(
                "half_life_secs must be positive, got {}",
                self.half_life_secs
            )));
        }
        if self.explanation_horizon_secs == 0
            || self.explanation_horizon_secs % self.bucket_width_secs != 0
        {
            return Err(EstimationError::InvalidConfig(format!(
                "explanation_horizon_secs ({}) must be a positive multiple of bucket_width_secs ({})",
                self.explanation_horizon_secs, self.bucket_width_secs
            )));
        }
        if self.rolling_window_days == 0 {
            return Err(EstimationError::InvalidConfig(
                "rolling_window_days must be at least 1".to_string(),
            ));
        }
        if !(self.ridge_lambda >= 0.0 && self.ridge_lambda.is_finite()) {
            return Err(EstimationError::InvalidConfig(format!(
                "ridge_lambda must be non-negative, got {}",
                self.ridge_lambda
            )));
        }
        if self.buckets_per_session == 0 {
            return Err(EstimationError::InvalidConfig(
                "buckets_per_session must be positive".to_string(),
            ));
        }
        if self.kernels.is_empty() {
            return Err(EstimationError::InvalidConfig(
                "at least one kernel must be selected".to_string(),
            ));
        }
        Ok(())
    }

    /// Explanation horizon in buckets
    pub fn horizon_buckets(&self) -> usize {
        (self.explanation_horizon_secs / self.bucket_width_secs.max(1)) as usize
    }

    /// Per-bucket decay of the impact and volume recursions
    pub fn decay_factor(&self) -> f64 {
        decay_factor(self.half_life_secs, f64::from(self.bucket_width_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EstimationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon_buckets(), 6);
        assert_eq!(config.cutoff_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(config.kernels.len(), 3);
        assert!(config.decay_factor() > 0.99 && config.decay_factor() < 1.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EstimationConfig::from_json(
            r#"{"half_life_secs": 60.0, "cutoff_time": "09:45:00", "kernels": ["linear"]}"#,
        )
        .unwrap();
        assert_eq!(config.half_life_secs, 60.0);
        assert_eq!(config.bucket_width_secs, 10);
        assert_eq!(config.cutoff_time, NaiveTime::from_hms_opt(9, 45, 0).unwrap());
        assert_eq!(config.kernels, vec![ImpactKernel::Linear]);
    }

    #[test]
    fn test_invalid_horizon_rejected() {
        let err = EstimationConfig::from_json(r#"{"explanation_horizon_secs": 25}"#).unwrap_err();
        assert!(matches!(err, EstimationError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_kernel_rejected() {
        assert!(EstimationConfig::from_json(r#"{"kernels": ["cubic"]}"#).is_err());
    }

    #[test]
    fn test_negative_lambda_rejected() {
        let config = EstimationConfig {
            ridge_lambda: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = EstimationConfig::from_file("/nonexistent/impact.json").unwrap_err();
        assert!(matches!(err, EstimationError::ConfigIo { .. }));
    }
}
