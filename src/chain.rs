use crate::error::SseError;
use crate::random::RandomSource;
use rand::Rng;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A bond between two sites.
pub type Edge = (usize, usize);

/// Parameters of the ferromagnetic chain `H = -J sum_b s_i s_j - h sum_i X_i`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ChainParams {
    /// Number of sites `L`.
    pub length: usize,
    /// Inverse temperature.
    pub beta: f64,
    /// Ising coupling `J`.
    pub coupling: f64,
    /// Transverse field `h`.
    pub field: f64,
}

impl ChainParams {
    /// Check that the parameters describe a chain the sampler can handle.
    pub fn validate(&self) -> Result<(), SseError> {
        if self.length < 2 {
            return Err(SseError::InvalidParameter(format!(
                "chain length must be at least 2, got {}",
                self.length
            )));
        }
        if !(self.beta > 0.0) {
            return Err(SseError::InvalidParameter(format!(
                "beta must be positive, got {}",
                self.beta
            )));
        }
        if !(self.coupling >= 0.0) || !(self.field >= 0.0) {
            return Err(SseError::InvalidParameter(format!(
                "J and h must be non-negative, got J={} h={}",
                self.coupling, self.field
            )));
        }
        if self.coupling == 0.0 && self.field == 0.0 {
            return Err(SseError::InvalidParameter(
                "at least one of J and h must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Maps each bond index to the pair of sites it couples.
///
/// Bonds wrap around: bond `b` couples `(b, (b + 1) % L)`, so the table describes a ring of
/// `L` bonds. This is the topology the sampler has always used even where it was labelled an
/// open chain; an open chain would have `L - 1` bonds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondTable {
    nsites: usize,
    edges: Vec<Edge>,
}

impl BondTable {
    /// Build the periodic chain on `l` sites.
    pub fn periodic_chain(l: usize) -> Self {
        Self {
            nsites: l,
            edges: (0..l).map(|b| (b, (b + 1) % l)).collect(),
        }
    }

    /// Number of sites.
    pub fn get_nsites(&self) -> usize {
        self.nsites
    }

    /// Number of bonds.
    pub fn get_nbonds(&self) -> usize {
        self.edges.len()
    }

    /// Sites coupled by bond `b`.
    pub fn sites(&self, b: usize) -> Edge {
        self.edges[b]
    }

    /// All bonds in order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Make a random spin state of `nvars` spins.
pub fn random_spin_state<R: Rng>(nvars: usize, rng: &mut R) -> Vec<bool> {
    (0..nvars).map(|_| rng.coin()).collect()
}

/// The value (+1 or -1) of a stored spin.
#[inline]
pub fn spin_value(s: bool) -> f64 {
    if s {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod chain_tests {
    use super::*;

    #[test]
    fn test_periodic_bonds() {
        let bonds = BondTable::periodic_chain(4);
        assert_eq!(bonds.get_nbonds(), 4);
        assert_eq!(bonds.edges(), &[(0, 1), (1, 2), (2, 3), (3, 0)]);
    }

    #[test]
    fn test_validate() {
        let good = ChainParams {
            length: 4,
            beta: 1.0,
            coupling: 1.0,
            field: 1.0,
        };
        assert!(good.validate().is_ok());
        assert!(ChainParams { length: 1, ..good }.validate().is_err());
        assert!(ChainParams { beta: 0.0, ..good }.validate().is_err());
        assert!(ChainParams { field: -1.0, ..good }.validate().is_err());
        assert!(ChainParams {
            coupling: 0.0,
            field: 0.0,
            ..good
        }
        .validate()
        .is_err());
        assert!(ChainParams { field: 0.0, ..good }.validate().is_ok());
    }
}
