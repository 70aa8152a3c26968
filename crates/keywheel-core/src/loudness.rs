//! ReplayGain to LUFS approximation.

/// ReplayGain reference level in dBFS.
pub const REPLAY_GAIN_REFERENCE_DB: f64 = -18.0;

/// Approximates an integrated loudness figure from a ReplayGain value.
///
/// Computes `-18.0 - replay_gain`: the gain is treated as a direct offset from
/// the ReplayGain reference level. This is an approximation only. It ignores
/// the K-weighting and gating that EBU R128 applies, so results typically sit
/// around 5 dB away from a true LUFS measurement. Downstream consumers depend
/// on this scale, so the constant must stay as it is.
///
/// No range checks are performed; any finite or non-finite input is passed
/// through the arithmetic unchanged.
///
/// ```
/// use keywheel_core::loudness::approximate_lufs;
///
/// assert_eq!(approximate_lufs(0.0), -18.0);
/// assert_eq!(approximate_lufs(3.0), -21.0);
/// ```
pub fn approximate_lufs(replay_gain: f64) -> f64 {
    REPLAY_GAIN_REFERENCE_DB - replay_gain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(approximate_lufs(0.0), -18.0);
        assert_eq!(approximate_lufs(3.0), -21.0);
        assert_eq!(approximate_lufs(-6.0), -12.0);
    }

    #[test]
    fn test_fractional_gain() {
        assert!((approximate_lufs(1.25) - (-19.25)).abs() < 1e-12);
    }

    #[test]
    fn test_no_range_validation() {
        assert_eq!(approximate_lufs(100.0), -118.0);
        assert!(approximate_lufs(f64::NAN).is_nan());
        assert_eq!(approximate_lufs(f64::INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let first = approximate_lufs(-4.5);
        assert!((0..10).all(|_| approximate_lufs(-4.5) == first));
    }
}
