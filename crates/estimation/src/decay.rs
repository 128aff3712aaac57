//! Exponential decay shared by the volume smoother and the impact engine
//!
//! Both recursions use the same per-bucket decay `d = exp(-ln2 / H × W)`
//! and the same bias pre-correction: every bucket after the first is
//! divided by `1 - d` before the EWMA
//!
//! ```text
//! s[0] = u[0]
//! s[t] = d × s[t-1] + (1 - d) × u[t]
//! ```
//!
//! so that `s[t] = Σ d^(t-k) × v[k]`, a decayed running sum of the raw input.

use std::f64::consts::LN_2;

/// Per-bucket decay for a half-life and bucket width (both in seconds)
///
/// Lies strictly inside (0, 1) for positive finite arguments.
#[inline]
pub fn decay_factor(half_life_secs: f64, bucket_width_secs: f64) -> f64 {
    (-LN_2 / half_life_secs * bucket_width_secs).exp()
}

/// Exponentially weighted mean without start-up adjustment
///
/// NaN inputs are skipped: the previous value is carried and its weight
/// keeps decaying across the gap. Leading NaNs stay NaN until the first
/// observation.
pub fn ewma(values: &[f64], decay: f64) -> Vec<f64> {
    let gain = 1.0 - decay;
    let mut out = Vec::with_capacity(values.len());
    let mut weighted = f64::NAN;
    let mut old_weight = 1.0;

    for &value in values {
        let observed = !value.is_nan();
        if weighted.is_nan() {
            if observed {
                weighted = value;
                old_weight = 1.0;
            }
        } else {
            old_weight *= decay;
            if observed {
                if weighted != value {
                    weighted = (old_weight * weighted + gain * value) / (old_weight + gain);
                }
                old_weight = 1.0;
            }
        }
        out.push(weighted);
    }
    out
}

/// Bias pre-correction followed by the EWMA: the decayed running sum
pub fn decayed_recursion(values: &[f64], decay: f64) -> Vec<f64> {
    let gain = 1.0 - decay;
    let corrected: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == 0 { v } else { v / gain })
        .collect();
    ewma(&corrected, decay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_decay_factor_in_unit_interval() {
        for (half_life, width) in [(60.0, 10.0), (3600.0, 10.0), (1.0, 10.0), (10.0, 0.5)] {
            let d = decay_factor(half_life, width);
            assert!(d > 0.0 && d < 1.0, "decay {d} for H={half_life} W={width}");
        }
        assert_relative_eq!(decay_factor(60.0, 10.0), 0.890_898_718, epsilon = 1e-9);
        // One half-life of buckets halves the weight
        assert_relative_eq!(decay_factor(60.0, 10.0).powi(6), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_ewma_matches_recursion() {
        let d = 0.8;
        let out = ewma(&[1.0, 2.0, 3.0], d);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 0.8 * 1.0 + 0.2 * 2.0, epsilon = 1e-12);
        assert_relative_eq!(out[2], 0.8 * out[1] + 0.2 * 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ewma_carries_over_gaps() {
        let d = 0.5;
        let out = ewma(&[f64::NAN, 4.0, f64::NAN, 8.0], d);
        assert!(out[0].is_nan());
        assert_eq!(out[1], 4.0);
        assert_eq!(out[2], 4.0);
        // Old weight decayed twice: (0.25 × 4 + 0.5 × 8) / 0.75
        assert_relative_eq!(out[3], (0.25 * 4.0 + 0.5 * 8.0) / 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_decayed_recursion_is_running_sum() {
        let d = decay_factor(60.0, 10.0);
        let flow = [10.0, 5.0, 0.0];
        let out = decayed_recursion(&flow, d);

        assert_relative_eq!(out[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(out[1], d * 10.0 + 5.0, epsilon = 1e-9);
        assert_relative_eq!(out[2], d * (d * 10.0 + 5.0), epsilon = 1e-9);
    }

    #[test]
    fn test_all_nan_stays_nan() {
        let out = decayed_recursion(&[f64::NAN; 4], 0.9);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
