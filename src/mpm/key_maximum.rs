/// A key maximum, i.e an NSDF maximum that may or may not correspond
/// to the pitch period.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeyMaximum {
    /// The index into the NSDF array corresponding to this maximum
    pub lag_index: usize,
    /// The NSDF value at `lag_index` for this maximum
    pub value_at_lag_index: f32,
    /// The lag, in samples, for this maximum, approximated using parabolic interpolation.
    pub lag: f32,
    /// The NSDF value for this maximum, approximated using parabolic interpolation.
    pub value: f32,
}

impl KeyMaximum {
    /// Creates the key maximum at `lag_index` of `nsdf`.
    pub fn new(nsdf: &[f32], lag_index: usize) -> Self {
        let mut maximum = KeyMaximum {
            lag_index: 0,
            value_at_lag_index: 0.0,
            lag: 0.0,
            value: 0.0,
        };
        maximum.set(nsdf, lag_index);
        maximum
    }

    fn set(&mut self, nsdf: &[f32], lag_index: usize) {
        self.lag_index = lag_index;
        let value_at_lag_index = nsdf[lag_index];
        self.value_at_lag_index = value_at_lag_index;

        // Maxima without two neighbors are not refined
        if lag_index == 0 || lag_index + 1 >= nsdf.len() {
            self.value = value_at_lag_index;
            self.lag = lag_index as f32;
            return;
        }

        // Use parabolic interpolation to approximate
        // the true maximum using the left and right neighbors
        let left = nsdf[lag_index - 1];
        let right = nsdf[lag_index + 1];

        // Compute coefficients of a parabola ax^2 + bx + c passing through
        // (-1, left), (0, max), (1, right)
        let a = 0.5 * (right - 2.0 * value_at_lag_index + left);
        let b = 0.5 * (right - left);
        let c = value_at_lag_index;
        // Find the x value where the derivative is zero, i.e where the parabola has its maximum.
        // A maximum has a < 0, anything else is not refined.
        let x_max = if a < 0.0 { (-b / (2.0 * a)).clamp(-0.5, 0.5) } else { 0.0 };

        self.value = a * x_max * x_max + b * x_max + c;
        self.lag = (lag_index as f32) + x_max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_maximum_interpolation() {
        {
            let nsdf: [f32; 4] = [0.0, 0.0, 3.0, 0.0];
            let key_max = KeyMaximum::new(&nsdf, 2);
            assert!((key_max.lag - 2.0).abs() <= f32::EPSILON);
            assert!((key_max.value - 3.0).abs() <= f32::EPSILON);
            assert_eq!(key_max.lag_index, 2);
            assert_eq!(key_max.value_at_lag_index, 3.0);
        }

        {
            let nsdf: [f32; 3] = [-2.0, 0.0, -1.0];
            let key_max = KeyMaximum::new(&nsdf, 1);
            assert!((key_max.lag - 1.1666666_f32).abs() <= f32::EPSILON);
            assert!(key_max.value > 0.0);
        }
    }

    #[test]
    fn key_maximum_at_the_edges() {
        let nsdf: [f32; 3] = [1.0, 0.5, 0.9];
        let first = KeyMaximum::new(&nsdf, 0);
        assert_eq!(first.lag, 0.0);
        let last = KeyMaximum::new(&nsdf, 2);
        assert_eq!(last.lag, 2.0);
        assert_eq!(last.value, 0.9);
    }
}
