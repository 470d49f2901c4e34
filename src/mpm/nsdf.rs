use crate::error::PitchError;

/// Computes m' defined in eq (6), using the incremental subtraction
/// algorithm described in section 6 - Efficient calculation of SDF.
///
/// `result[t]` is the sum of the squared samples that overlap at lag `t`,
/// counted once for each of the two signal copies.
pub fn m_prime_incremental(window: &[f32], autocorr_at_lag_0: f32, result: &mut [f32]) {
    let lag_count = result.len().min(window.len());
    if lag_count == 0 {
        return;
    }
    let window_size = window.len();

    result[0] = 2.0 * autocorr_at_lag_0;
    for i in 1..lag_count {
        let v1 = window[window_size - i];
        let v2 = window[i - 1];
        result[i] = result[i - 1] - v1 * v1 - v2 * v2;
    }
}

/// Computes the normalized square difference function (NSDF) from the
/// autocorrelation of `window`, writing one value per lag to `result`.
///
/// The NSDF at lag `t` is `2 * r(t) / m'(t)`, i.e the autocorrelation normalized
/// by the energy of the samples overlapping at that lag. This compensates
/// for the tapering of the linear autocorrelation as the lag grows, and
/// makes the NSDF independent of the signal level.
///
/// `autocorr` and `result` must have the same length, at most `window.len()`.
///
/// Fails with [`PitchError::CouldNotDetectPitch`] if the window carries no
/// energy, in which case the NSDF is undefined.
pub fn square_difference(
    autocorr: &[f32],
    window: &[f32],
    result: &mut [f32],
) -> Result<(), PitchError> {
    debug_assert_eq!(autocorr.len(), result.len());
    debug_assert!(window.len() >= autocorr.len());

    let lag_count = autocorr.len().min(result.len()).min(window.len());
    let autocorr_at_lag_0 = match autocorr.first() {
        Some(value) if value.is_finite() && *value > 0.0 => *value,
        _ => return Err(PitchError::CouldNotDetectPitch),
    };

    let result = &mut result[..lag_count];
    m_prime_incremental(window, autocorr_at_lag_0, result);

    // Below this, m' is rounding error left over from the incremental
    // subtraction and the overlap carries no energy.
    let min_m_prime = result[0] * f32::EPSILON;
    for (value, autocorr_value) in result.iter_mut().zip(autocorr.iter()) {
        let m_prime = *value;
        *value = if m_prime > min_m_prime {
            2.0 * autocorr_value / m_prime
        } else {
            0.0
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{autocorr_conv, linear_autocorrelation};

    // Computes m', defined in eq (6), as a naive inefficient summation.
    // Only used for testing purposes.
    fn m_prime_sum(window: &[f32], result: &mut [f32]) {
        let window_size = window.len();
        for tau in 0..result.len() {
            let mut sum: f32 = 0.0;
            for j in 0..window_size - tau {
                let xj = window[j];
                let xj_plus_tau = window[j + tau];
                sum += xj * xj + xj_plus_tau * xj_plus_tau;
            }
            result[tau] = sum;
        }
    }

    #[test]
    fn test_incremental_m_prime() {
        let signal: Vec<f32> = vec![
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0,
        ];
        let lag_count: usize = 4;

        let mut m_prime_naive: Vec<f32> = vec![0.0; lag_count];
        m_prime_sum(&signal[..], &mut m_prime_naive[..]);

        let mut autocorr: Vec<f32> = vec![0.0; lag_count];
        autocorr_conv(&signal[..], &mut autocorr[..]);
        let mut m_prime_incr: Vec<f32> = vec![0.0; lag_count];
        m_prime_incremental(&signal[..], autocorr[0], &mut m_prime_incr[..]);

        for (naive, incr) in m_prime_naive.iter().zip(m_prime_incr.iter()) {
            assert!((*naive - *incr).abs() <= f32::EPSILON);
        }
    }

    #[test]
    fn test_nsdf_matches_definition() {
        let window: Vec<f32> = (0..64).map(|i| (0.3 * i as f32).sin() + 0.1).collect();
        let mut autocorr = vec![0.0; window.len()];
        autocorr_conv(&window[..], &mut autocorr[..]);
        let mut m_prime = vec![0.0; window.len()];
        m_prime_sum(&window[..], &mut m_prime[..]);

        let mut nsdf = vec![0.0; window.len()];
        square_difference(&autocorr[..], &window[..], &mut nsdf[..]).unwrap();

        assert!((nsdf[0] - 1.0).abs() <= 1e-6);
        for lag in 0..window.len() - 1 {
            let expected = 2.0 * autocorr[lag] / m_prime[lag];
            assert!((nsdf[lag] - expected).abs() <= 1e-3);
            assert!(nsdf[lag] <= 1.0 + 1e-3 && nsdf[lag] >= -1.0 - 1e-3);
        }
    }

    #[test]
    fn test_silence_is_an_error() {
        let window = [0.0_f32; 16];
        let autocorr = [0.0_f32; 16];
        let mut nsdf = [0.0_f32; 16];
        assert_eq!(
            square_difference(&autocorr[..], &window[..], &mut nsdf[..]),
            Err(PitchError::CouldNotDetectPitch)
        );
        assert!(nsdf.iter().all(|value| value.is_finite()));

        let empty: [f32; 0] = [];
        assert_eq!(
            square_difference(&empty[..], &empty[..], &mut []),
            Err(PitchError::CouldNotDetectPitch)
        );
    }

    #[test]
    fn test_energy_exhausted_before_last_lag() {
        // An impulse at index 3 does not overlap itself at lags 5 and up.
        let mut window = [0.0_f32; 8];
        window[3] = 1.0;
        let mut autocorr = [0.0_f32; 8];
        autocorr_conv(&window[..], &mut autocorr[..]);
        let mut nsdf = [0.0_f32; 8];
        square_difference(&autocorr[..], &window[..], &mut nsdf[..]).unwrap();
        assert_eq!(nsdf[0], 1.0);
        assert!(nsdf.iter().all(|value| value.is_finite()));
        assert!(nsdf[5..].iter().all(|value| *value == 0.0));
    }

    #[test]
    fn test_nsdf_is_independent_of_level() {
        let sine: Vec<f32> = (0..1024)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();

        let mut reference = vec![0.0; sine.len()];
        {
            let autocorr = linear_autocorrelation(&sine[..]);
            square_difference(&autocorr[..], &sine[..], &mut reference[..]).unwrap();
        }

        for scale in [1e-3_f32, 1e-6].iter() {
            let window: Vec<f32> = sine.iter().map(|x| x * scale).collect();
            let autocorr = linear_autocorrelation(&window[..]);
            let mut nsdf = vec![0.0; window.len()];
            square_difference(&autocorr[..], &window[..], &mut nsdf[..]).unwrap();
            // The tail is dominated by rounding error at any level
            for (scaled, unscaled) in nsdf.iter().zip(reference.iter()).take(900) {
                assert!((scaled - unscaled).abs() <= 1e-2);
            }
            assert!(nsdf.iter().all(|value| value.is_finite()));
        }
    }
}
