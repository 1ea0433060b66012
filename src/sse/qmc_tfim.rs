use crate::chain::{random_spin_state, BondTable, ChainParams};
use crate::error::SseError;
use crate::sse::qmc_traits::*;
use crate::sse::qmc_types::{Leg, Op};
use crate::sse::simple_ops::OpString;
use crate::sse::vertex_list::VertexList;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Cutoff a fresh chain starts from.
pub const INITIAL_CUTOFF: usize = 20;

/// A container to run SSE on the transverse-field Ising chain.
#[derive(Debug, Clone)]
pub struct TfimChain<R: Rng> {
    params: ChainParams,
    bonds: BondTable,
    weights: DiagonalWeights,
    state: Vec<bool>,
    op_manager: OpString,
    vertices: VertexList,
    vertices_current: bool,
    // Reused by every cluster trace
    stack: Vec<Leg>,
    rng: R,
}

/// Build a new chain seeded from `seed`, or from system entropy if None.
pub fn new_tfim(
    params: ChainParams,
    seed: Option<u64>,
) -> Result<TfimChain<SmallRng>, SseError> {
    let rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    TfimChain::new_with_rng(params, rng)
}

impl<R: Rng> TfimChain<R> {
    /// Make a new chain with a random initial state and an empty op string.
    pub fn new_with_rng(params: ChainParams, mut rng: R) -> Result<Self, SseError> {
        params.validate()?;
        let state = random_spin_state(params.length, &mut rng);
        Self::new_with_state(params, state, rng)
    }

    /// Make a new chain starting from `state` with an empty op string.
    pub fn new_with_state(
        params: ChainParams,
        state: Vec<bool>,
        rng: R,
    ) -> Result<Self, SseError> {
        Self::new_with_ops(params, state, OpString::new(INITIAL_CUTOFF), rng)
    }

    /// Make a new chain from an explicit state and op string, which must be consistent. Op
    /// strings shorter than `INITIAL_CUTOFF` are padded with identities, since `n + n/3` cannot
    /// grow a cutoff of two or less.
    pub fn new_with_ops(
        params: ChainParams,
        state: Vec<bool>,
        mut ops: OpString,
        rng: R,
    ) -> Result<Self, SseError> {
        params.validate()?;
        if state.len() != params.length {
            return Err(SseError::InvalidParameter(format!(
                "state has {} spins but the chain has {} sites",
                state.len(),
                params.length
            )));
        }
        let bonds = BondTable::periodic_chain(params.length);
        let out_of_range = ops.ops().iter().flatten().any(|op| match *op {
            Op::DiagBond(b) => b >= bonds.get_nbonds(),
            Op::DiagSite(s) | Op::OffDiagSite(s) => s >= params.length,
        });
        if out_of_range || !ops.verify(&state, &bonds) {
            return Err(SseError::InvalidParameter(
                "op string is inconsistent with the state".to_string(),
            ));
        }
        if ops.get_cutoff() < INITIAL_CUTOFF {
            ops.set_cutoff(INITIAL_CUTOFF);
        }
        let weights = DiagonalWeights::new(&params, bonds.get_nbonds());
        let cutoff = ops.get_cutoff();
        Ok(Self {
            params,
            bonds,
            weights,
            state,
            op_manager: ops,
            vertices: VertexList::new(),
            vertices_current: false,
            stack: Vec::with_capacity(8 * cutoff),
            rng,
        })
    }

    /// Insert and remove diagonal ops in a single sweep over the op string.
    pub fn diagonal_update(&mut self) {
        self.op_manager.make_diagonal_update_with_rng(
            &self.weights,
            &mut self.state,
            &self.bonds,
            &mut self.rng,
        );
        self.vertices_current = false;
    }

    /// Build the vertex list for the current op string.
    pub fn make_vertex_list(&mut self) {
        self.vertices.build(&self.op_manager, &self.bonds);
        self.vertices_current = true;
    }

    /// Flip clusters of the current op string, building the vertex list first if needed.
    pub fn cluster_update(&mut self) {
        if !self.vertices_current {
            self.make_vertex_list();
        }
        self.op_manager.flip_each_cluster_rng(
            &mut self.vertices,
            &mut self.stack,
            &mut self.rng,
            &mut self.state,
        );
        self.vertices_current = false;
    }

    /// Grow the cutoff to `n + n/3` if the op string has grown past it. Returns true if the
    /// cutoff changed.
    pub fn adjust_cutoff(&mut self) -> bool {
        let n = self.op_manager.get_n();
        let new_cutoff = n + n / 3;
        let old_cutoff = self.op_manager.get_cutoff();
        if old_cutoff < new_cutoff {
            debug!("growing cutoff from {} to {} (n={})", old_cutoff, new_cutoff, n);
            self.op_manager.set_cutoff(new_cutoff);
            self.stack.reserve(8 * new_cutoff);
            self.vertices_current = false;
            true
        } else {
            false
        }
    }

    /// Constant shift between `-<n>/beta` and the energy of the Hamiltonian.
    pub fn get_energy_offset(&self) -> f64 {
        self.bonds.get_nbonds() as f64 * self.params.coupling
            + self.params.length as f64 * self.params.field
    }

    /// Parameters of the chain.
    pub fn get_params(&self) -> &ChainParams {
        &self.params
    }

    /// The bond table.
    pub fn get_bonds(&self) -> &BondTable {
        &self.bonds
    }

    /// Get the number of sites.
    pub fn get_nvars(&self) -> usize {
        self.state.len()
    }

    /// Get the cutoff used for qmc calculations (M).
    pub fn get_cutoff(&self) -> usize {
        self.op_manager.get_cutoff()
    }

    /// Get a reference to the op manager.
    pub fn get_manager_ref(&self) -> &OpString {
        &self.op_manager
    }

    /// Get a reference to the vertex list, as left by the last build or cluster update.
    pub fn get_vertex_list_ref(&self) -> &VertexList {
        &self.vertices
    }

    /// Clone the state at p=0.
    pub fn clone_state(&self) -> Vec<bool> {
        self.state.clone()
    }

    /// Convert the state to a vector.
    pub fn into_vec(self) -> Vec<bool> {
        self.state
    }

    /// Verify the integrity of the op string against the state.
    pub fn verify(&self) -> bool {
        self.op_manager.get_n() <= self.op_manager.get_cutoff()
            && self.op_manager.verify(&self.state, &self.bonds)
    }

    /// Render the op string, one propagation step per line.
    pub fn debug_string(&self) -> String {
        self.op_manager.debug_string(&self.bonds)
    }
}

impl<R: Rng> QmcStepper for TfimChain<R> {
    fn timestep(&mut self) -> &[bool] {
        self.diagonal_update();
        self.make_vertex_list();
        self.cluster_update();
        &self.state
    }

    fn get_n(&self) -> usize {
        self.op_manager.get_n()
    }

    fn get_beta(&self) -> f64 {
        self.params.beta
    }

    fn state_ref(&self) -> &[bool] {
        &self.state
    }
}

#[cfg(test)]
mod tfim_tests {
    use super::*;

    fn params(length: usize) -> ChainParams {
        ChainParams {
            length,
            beta: 1.0,
            coupling: 1.0,
            field: 1.0,
        }
    }

    #[test]
    fn test_fresh_chain() {
        let g = new_tfim(params(4), Some(1234)).unwrap();
        assert_eq!(g.get_cutoff(), INITIAL_CUTOFF);
        assert_eq!(g.get_n(), 0);
        assert_eq!(g.get_nvars(), 4);
        assert!(g.verify());
    }

    #[test]
    fn test_rejects_bad_state() {
        let rng = SmallRng::seed_from_u64(1234);
        assert!(TfimChain::new_with_state(params(4), vec![true; 3], rng).is_err());
    }

    #[test]
    fn test_rejects_illegal_ops() {
        let ops = OpString::from_ops(vec![Some(Op::DiagBond(0))]);
        let rng = SmallRng::seed_from_u64(1234);
        assert!(TfimChain::new_with_ops(params(2), vec![true, false], ops, rng).is_err());
        let ops = OpString::from_ops(vec![Some(Op::DiagSite(5))]);
        let rng = SmallRng::seed_from_u64(1234);
        assert!(TfimChain::new_with_ops(params(2), vec![true, false], ops, rng).is_err());
    }

    #[test]
    fn test_short_op_string_is_padded() {
        let rng = SmallRng::seed_from_u64(1234);
        let mut g =
            TfimChain::new_with_ops(params(4), vec![true; 4], OpString::new(0), rng).unwrap();
        assert_eq!(g.get_cutoff(), INITIAL_CUTOFF);
        let mut saw_ops = false;
        for _ in 0..20 {
            g.timestep();
            g.adjust_cutoff();
            saw_ops |= g.get_n() > 0;
        }
        assert!(saw_ops);

        let ops = OpString::from_ops(vec![None, Some(Op::DiagSite(1))]);
        let rng = SmallRng::seed_from_u64(1234);
        let g = TfimChain::new_with_ops(params(2), vec![true, false], ops, rng).unwrap();
        assert_eq!(g.get_cutoff(), INITIAL_CUTOFF);
        assert_eq!(g.get_manager_ref().get_pth(1), Some(Op::DiagSite(1)));
        assert_eq!(g.get_n(), 1);
    }

    #[test]
    fn test_timesteps_stay_consistent() {
        let mut g = new_tfim(params(6), Some(1234)).unwrap();
        for _ in 0..500 {
            g.timestep();
            g.adjust_cutoff();
            assert!(g.verify());
            assert!(g.get_vertex_list_ref().len() <= 4 * g.get_cutoff());
        }
    }

    #[test]
    fn test_cutoff_grows_only() {
        let mut g = new_tfim(
            ChainParams {
                length: 8,
                beta: 8.0,
                coupling: 1.0,
                field: 1.0,
            },
            Some(1234),
        )
        .unwrap();
        let mut last = g.get_cutoff();
        let mut grew = false;
        for _ in 0..200 {
            g.timestep();
            grew |= g.adjust_cutoff();
            assert!(g.get_cutoff() >= last);
            assert!(g.get_n() + g.get_n() / 3 <= g.get_cutoff());
            last = g.get_cutoff();
        }
        assert!(grew);
    }
}
