use crate::chain::BondTable;
use crate::sse::qmc_types::Op;

/// Contain and manage ops.
pub trait OpContainer {
    /// Get the cutoff (number of propagation steps) for this container.
    fn get_cutoff(&self) -> usize;
    /// Grow the cutoff, new slots are identities. Never shrinks.
    fn set_cutoff(&mut self, cutoff: usize);
    /// Get the number of non-identity ops.
    fn get_n(&self) -> usize;
    /// Get the pth op, None is identity.
    fn get_pth(&self, p: usize) -> Option<Op>;
    /// Set the pth op, returning the previous one.
    fn set_pth(&mut self, p: usize, op: Option<Op>) -> Option<Op>;

    /// Verify the integrity of the ops against the state at p=0: every bond op must sit between
    /// equal spins and the state propagated through the whole string must return to itself.
    fn verify(&self, state: &[bool], bonds: &BondTable) -> bool {
        let mut rolling_state = state.to_vec();
        for p in 0..self.get_cutoff() {
            match self.get_pth(p) {
                Some(Op::DiagBond(b)) => {
                    let (s0, s1) = bonds.sites(b);
                    if rolling_state[s0] != rolling_state[s1] {
                        return false;
                    }
                }
                Some(Op::OffDiagSite(s)) => rolling_state[s] = !rolling_state[s],
                Some(Op::DiagSite(_)) | None => {}
            }
        }
        rolling_state == state
    }

    /// Count the non-identity ops by walking the whole string.
    fn count_ops(&self) -> usize {
        (0..self.get_cutoff())
            .filter(|p| self.get_pth(*p).is_some())
            .count()
    }
}
