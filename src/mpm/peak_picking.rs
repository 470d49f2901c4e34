use super::key_maximum::KeyMaximum;

/// Gathers the key maxima of `nsdf` into `key_maxima`, in ascending lag order.
///
/// A key maximum is the largest strict local maximum between a positive
/// zero crossing and the following negative zero crossing. The region
/// around lag 0 is never entered, and a region still open at the last lag
/// yields no key maximum.
pub fn collect_key_maxima(nsdf: &[f32], key_maxima: &mut Vec<KeyMaximum>) {
    key_maxima.clear();
    if nsdf.len() < 3 {
        return;
    }

    let mut is_detecting = false;
    let mut maximum_index: Option<usize> = None;
    for lag in 1..nsdf.len() - 1 {
        let prev = nsdf[lag - 1];
        let curr = nsdf[lag];
        let next = nsdf[lag + 1];

        if prev <= 0.0 && curr > 0.0 {
            // Positive zero crossing, start looking for a key maximum
            is_detecting = true;
            maximum_index = None;
        } else if prev > 0.0 && curr <= 0.0 {
            // Negative zero crossing, store the key maximum of the region
            if is_detecting {
                if let Some(index) = maximum_index.take() {
                    key_maxima.push(KeyMaximum::new(nsdf, index));
                }
            }
            is_detecting = false;
        }

        if is_detecting && curr > prev && curr > next {
            let is_new_maximum = match maximum_index {
                Some(index) => curr > nsdf[index],
                None => true,
            };
            if is_new_maximum {
                maximum_index = Some(lag);
            }
        }
    }
}

/// Returns the first key maximum, in ascending lag order, whose NSDF value
/// exceeds `threshold`.
///
/// Picking the first rather than the largest candidate favors the
/// fundamental over its harmonics.
pub fn select_key_maximum(key_maxima: &[KeyMaximum], threshold: f32) -> Option<&KeyMaximum> {
    key_maxima
        .iter()
        .find(|key_max| key_max.value_at_lag_index > threshold)
}
