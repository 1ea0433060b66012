use crate::chain::{BondTable, ChainParams};
use crate::random::RandomSource;
use crate::sse::qmc_traits::op_container::*;
use crate::sse::qmc_types::Op;
use log::trace;
use rand::Rng;

/// Insertion and removal weights for the diagonal update of the TFIM chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagonalWeights {
    /// `beta * (nsites * h + 2 * J * nbonds)`.
    pub add_factor: f64,
    /// `1 / add_factor`.
    pub remove_factor: f64,
    /// Probability that an accepted insertion is a site op rather than a bond op.
    pub selection_prob: f64,
}

impl DiagonalWeights {
    /// Weights for a chain with `nbonds` bonds.
    pub fn new(params: &ChainParams, nbonds: usize) -> Self {
        let site_weight = params.length as f64 * params.field;
        let bond_weight = 2.0 * params.coupling * nbonds as f64;
        let add_factor = params.beta * (site_weight + bond_weight);
        Self {
            add_factor,
            remove_factor: 1.0 / add_factor,
            selection_prob: site_weight / (bond_weight + site_weight),
        }
    }
}

/// Perform diagonal updates to an op container.
pub trait DiagonalUpdater: OpContainer {
    /// Sweep p = 0..cutoff, inserting and removing diagonal ops while propagating `state`
    /// through offdiagonal ops. On return `state` is again the state at p=0.
    fn make_diagonal_update_with_rng<R: Rng>(
        &mut self,
        weights: &DiagonalWeights,
        state: &mut [bool],
        bonds: &BondTable,
        rng: &mut R,
    ) {
        let cutoff = self.get_cutoff();
        let nsites = state.len();
        for p in 0..cutoff {
            match self.get_pth(p) {
                None => {
                    let n = self.get_n();
                    // This is based on equations 19a and 19b of arXiv:1909.10591v1
                    if rng.rand_prob() * ((cutoff - n) as f64) < weights.add_factor {
                        if rng.rand_prob() < weights.selection_prob {
                            let site = rng.rand_index(nsites);
                            self.set_pth(p, Some(Op::DiagSite(site)));
                        } else {
                            let bond = rng.rand_index(bonds.get_nbonds());
                            let (s0, s1) = bonds.sites(bond);
                            if state[s0] == state[s1] {
                                self.set_pth(p, Some(Op::DiagBond(bond)));
                            }
                        }
                    }
                }
                Some(op) if !op.is_diagonal() => op
                    .get_vars(bonds)
                    .iter()
                    .for_each(|s| state[*s] = !state[*s]),
                Some(_) => {
                    let n = self.get_n();
                    if weights.remove_factor * ((cutoff - n + 1) as f64) > rng.rand_prob() {
                        self.set_pth(p, None);
                    }
                }
            }
        }
        trace!("diagonal update left n={} of cutoff={}", self.get_n(), cutoff);
        self.post_diagonal_update_hook();
    }

    /// Called after an update.
    fn post_diagonal_update_hook(&mut self) {}
}

#[cfg(test)]
mod diagonal_tests {
    use super::*;
    use crate::sse::simple_ops::OpString;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn params(field: f64) -> ChainParams {
        ChainParams {
            length: 4,
            beta: 1.0,
            coupling: 1.0,
            field,
        }
    }

    #[test]
    fn test_weights() {
        let w = DiagonalWeights::new(&params(1.0), 4);
        assert!((w.add_factor - 12.0).abs() < 1e-12);
        assert!((w.selection_prob - 1.0 / 3.0).abs() < 1e-12);
        assert!((w.add_factor * w.remove_factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_always_insert_then_remove() {
        // A stream of zeros accepts every insertion as a site op on site 0, then every removal.
        let bonds = BondTable::periodic_chain(4);
        let w = DiagonalWeights::new(&params(1.0), 4);
        let mut ops = OpString::new(6);
        let mut state = vec![true, false, true, false];
        let mut rng = StepRng::new(0, 0);
        ops.make_diagonal_update_with_rng(&w, &mut state, &bonds, &mut rng);
        assert_eq!(ops.get_n(), 6);
        assert!(ops.ops().iter().all(|op| *op == Some(Op::DiagSite(0))));
        ops.make_diagonal_update_with_rng(&w, &mut state, &bonds, &mut rng);
        assert_eq!(ops.get_n(), 0);
        assert_eq!(state, vec![true, false, true, false]);
    }

    #[test]
    fn test_bond_needs_equal_spins() {
        // No field: every accepted insertion is a bond op on bond 0, which couples unequal spins.
        let bonds = BondTable::periodic_chain(4);
        let w = DiagonalWeights::new(&params(0.0), 4);
        let mut ops = OpString::new(5);
        let mut state = vec![true, false, true, true];
        ops.make_diagonal_update_with_rng(&w, &mut state, &bonds, &mut StepRng::new(0, 0));
        assert_eq!(ops.get_n(), 0);
    }

    #[test]
    fn test_offdiagonal_propagates() {
        let bonds = BondTable::periodic_chain(2);
        let w = DiagonalWeights::new(&params(1.0), 2);
        let mut ops = OpString::from_ops(vec![
            Some(Op::OffDiagSite(1)),
            Some(Op::OffDiagSite(1)),
        ]);
        let mut state = vec![true, true];
        ops.make_diagonal_update_with_rng(&w, &mut state, &bonds, &mut StepRng::new(0, 0));
        assert_eq!(ops.get_n(), 2);
        assert_eq!(state, vec![true, true]);
    }

    #[test]
    fn test_random_updates_stay_legal() {
        let bonds = BondTable::periodic_chain(6);
        let p = ChainParams {
            length: 6,
            beta: 2.0,
            coupling: 1.0,
            field: 0.5,
        };
        let w = DiagonalWeights::new(&p, 6);
        let mut ops = OpString::new(40);
        let mut state = vec![true; 6];
        let mut rng = SmallRng::seed_from_u64(1234);
        for _ in 0..200 {
            ops.make_diagonal_update_with_rng(&w, &mut state, &bonds, &mut rng);
            assert!(ops.get_n() <= ops.get_cutoff());
            assert_eq!(ops.get_n(), ops.count_ops());
            assert!(ops.verify(&state, &bonds));
        }
    }
}
