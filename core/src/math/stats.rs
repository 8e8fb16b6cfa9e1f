pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Largest value, ignoring NaN entries.
    pub fn max(values: &[f64]) -> Option<f64> {
        values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    /// Index of the largest value, ignoring NaN entries.
    pub fn argmax(values: &[f64]) -> Option<usize> {
        let max = Self::max(values)?;
        values.iter().position(|&v| v == max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::mean(&[1.0, 3.0]), 2.0);
    }

    #[test]
    fn max_skips_nan() {
        assert_eq!(StatsHelper::max(&[]), None);
        assert_eq!(StatsHelper::max(&[1.0, f64::NAN, 4.0, 2.0]), Some(4.0));
        assert_eq!(StatsHelper::argmax(&[1.0, f64::NAN, 4.0, 2.0]), Some(2));
    }
}
