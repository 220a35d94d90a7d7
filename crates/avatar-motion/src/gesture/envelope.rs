//! Fade-in/fade-out envelope over a session

use std::f64::consts::PI;

/// Fraction of the session elapsed
///
/// A non-positive duration counts as already complete.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms > 0.0 {
        elapsed_ms / duration_ms
    } else {
        1.0
    }
}

/// Envelope value at a given progress
///
/// `sin(progress * π)`: zero at both ends, one at the midpoint. Outside
/// `[0, 1]` the envelope is zero.
pub fn intensity(progress: f64) -> f64 {
    if (0.0..=1.0).contains(&progress) {
        (progress * PI).sin().max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_progress() {
        assert!((progress(1500.0, 3000.0) - 0.5).abs() < 1e-12);
        assert!((progress(0.0, 3000.0)).abs() < 1e-12);
        assert!((progress(10.0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_intensity_shape() {
        assert!(intensity(0.0).abs() < 1e-12);
        assert!((intensity(0.5) - 1.0).abs() < 1e-12);
        assert!(intensity(1.0).abs() < 1e-12);
        assert!((intensity(125.0 / 3000.0) - 0.130_526).abs() < 1e-5);
    }

    #[test]
    fn test_intensity_outside_session() {
        assert_eq!(intensity(-0.1), 0.0);
        assert_eq!(intensity(1.5), 0.0);
        assert_eq!(intensity(f64::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn prop_intensity_bounded(p in 0.0f64..1.0) {
            let value = intensity(p);
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn prop_intensity_peaks_at_midpoint(p in 0.0f64..1.0) {
            prop_assert!(intensity(p) <= intensity(0.5) + 1e-12);
        }

        #[test]
        fn prop_intensity_symmetric(p in 0.0f64..=0.5) {
            prop_assert!((intensity(p) - intensity(1.0 - p)).abs() < 1e-9);
        }
    }
}
