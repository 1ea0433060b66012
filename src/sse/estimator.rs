use crate::chain::spin_value;
use crate::error::SseError;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Means of the estimators over one bin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BinStats {
    /// Mean of `-n / beta`.
    pub energy: f64,
    /// Mean of `s_0 s_j` for each site `j`.
    pub corr_s0_sj: Vec<f64>,
    /// Number of measurements in the bin.
    pub measurements: usize,
}

/// Running sums for a single bin.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    energy: f64,
    corr_s0_sj: Vec<f64>,
    nmeasure: usize,
}

impl Estimator {
    /// Accumulators for a chain of `nsites`.
    pub fn new(nsites: usize) -> Self {
        Self {
            energy: 0.0,
            corr_s0_sj: vec![0.0; nsites],
            nmeasure: 0,
        }
    }

    /// Zero the accumulators for a new bin.
    pub fn reset(&mut self) {
        self.corr_s0_sj.iter_mut().for_each(|c| *c = 0.0);
        self.energy = 0.0;
        self.nmeasure = 0;
    }

    /// Add one sample: `n` ops at inverse temperature `beta` with spins `state`.
    pub fn measure(&mut self, n: usize, beta: f64, state: &[bool]) {
        let s0 = spin_value(state[0]);
        self.corr_s0_sj
            .iter_mut()
            .zip(state.iter())
            .for_each(|(c, s)| *c += s0 * spin_value(*s));
        self.energy += -(n as f64) / beta;
        self.nmeasure += 1;
    }

    /// Number of samples in the current bin.
    pub fn get_nmeasure(&self) -> usize {
        self.nmeasure
    }

    /// Means of the current bin. The sums are left untouched, so this may be called again
    /// after further measurements.
    pub fn statisticize(&self) -> Result<BinStats, SseError> {
        if self.nmeasure == 0 {
            return Err(SseError::EmptyBin);
        }
        let norm = self.nmeasure as f64;
        Ok(BinStats {
            energy: self.energy / norm,
            corr_s0_sj: self.corr_s0_sj.iter().map(|c| c / norm).collect(),
            measurements: self.nmeasure,
        })
    }
}

#[cfg(test)]
mod estimator_tests {
    use super::*;

    #[test]
    fn test_means() {
        let mut est = Estimator::new(3);
        est.measure(4, 2.0, &[true, true, false]);
        est.measure(8, 2.0, &[false, true, false]);
        let stats = est.statisticize().unwrap();
        assert_eq!(stats.measurements, 2);
        assert!((stats.energy + 3.0).abs() < 1e-12);
        assert_eq!(stats.corr_s0_sj, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_statisticize_twice() {
        let mut est = Estimator::new(2);
        est.measure(2, 1.0, &[true, false]);
        est.measure(4, 1.0, &[true, true]);
        let first = est.statisticize().unwrap();
        assert_eq!(est.statisticize().unwrap(), first);
        assert!((first.energy + 3.0).abs() < 1e-12);
        est.measure(6, 1.0, &[true, true]);
        let second = est.statisticize().unwrap();
        assert_eq!(second.measurements, 3);
        assert!((second.energy + 4.0).abs() < 1e-12);
        assert!((second.corr_s0_sj[1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_bin() {
        let mut est = Estimator::new(2);
        assert!(est.statisticize().is_err());
        est.measure(1, 1.0, &[true, true]);
        est.reset();
        assert_eq!(est.get_nmeasure(), 0);
        assert!(matches!(est.statisticize(), Err(SseError::EmptyBin)));
    }
}
