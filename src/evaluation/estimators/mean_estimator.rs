use crate::evaluation::estimators::Estimator;

/// Streaming arithmetic mean.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MeanEstimator {
    count: u64,
    sum: f64,
}

impl Estimator for MeanEstimator {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.count += 1;
        self.sum += v;
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }

    #[inline]
    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mean_is_nan() {
        let e = MeanEstimator::default();
        assert!(e.estimation().is_nan());
        assert_eq!(e.count(), 0);
    }

    #[test]
    fn nan_is_skipped() {
        let mut e = MeanEstimator::default();
        for v in [1.0, f64::NAN, 0.0, 1.0, 0.0] {
            e.add(v);
        }
        assert_eq!(e.count(), 4);
        assert_eq!(e.estimation(), 0.5);
    }
}
