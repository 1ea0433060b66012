use crate::random::RandomSource;
use crate::sse::qmc_traits::op_container::*;
use crate::sse::qmc_types::*;
use crate::sse::vertex_list::{LegState, VertexList};
use log::trace;
use rand::Rng;

/// Swendsen-Wang style cluster updates in imaginary time.
///
/// Site ops are cluster edges: their input and output legs belong to different clusters, and
/// flipping the cluster on one side swaps the op between its diagonal and offdiagonal forms.
/// Bond ops join all four of their legs into one cluster.
pub trait ClusterUpdater: OpContainer {
    /// Swap the site op at `p` between diagonal and offdiagonal.
    fn toggle_site_op_at(&mut self, p: usize);

    /// Trace every cluster of `vertices`, flip each with probability 1/2, and apply the
    /// decisions to the ops and to `state`. Sites without ops are flipped with probability 1/2.
    ///
    /// `vertices` must have been built from the current ops, and is consumed: afterwards every
    /// live leg is marked as visited.
    fn flip_each_cluster_rng<R: Rng>(
        &mut self,
        vertices: &mut VertexList,
        stack: &mut Vec<Leg>,
        rng: &mut R,
        state: &mut [bool],
    ) {
        stack.clear();
        let mut nclusters = 0;
        for v in (0..vertices.len()).step_by(2) {
            // Identity or already in some cluster.
            if !vertices.is_live(v) {
                continue;
            }
            let flip = rng.coin();
            nclusters += 1;
            stack.push(v);
            while let Some(leg) = stack.pop() {
                self.expand_cluster_leg(vertices, stack, leg, flip);
            }
        }
        trace!("cluster update traced {} clusters", nclusters);

        state.iter_mut().enumerate().for_each(|(site, spin)| {
            let flip = match vertices.first_leg(site) {
                Some(leg) => matches!(vertices.get(leg), LegState::Visited { flip: true }),
                None => rng.coin(),
            };
            if flip {
                *spin = !*spin;
            }
        });
        self.post_cluster_update_hook();
    }

    /// Consume a single leg from the cluster stack.
    fn expand_cluster_leg(
        &mut self,
        vertices: &mut VertexList,
        stack: &mut Vec<Leg>,
        leg: Leg,
        flip: bool,
    ) {
        // Legs are pushed more than once when a cluster reaches them from both ends.
        let next = match vertices.partner(leg) {
            Some(next) => next,
            None => return,
        };
        if !vertices.is_visited(next) {
            stack.push(next);
        }

        let p = vertex_of(leg);
        if flip {
            self.toggle_site_op_at(p);
        }
        if self.get_pth(p).map_or(false, |op| !op.is_site()) {
            other_bond_legs(leg)
                .iter()
                .filter(|other| vertices.is_live(**other))
                .for_each(|other| stack.push(*other));
        }
        vertices.mark_visited(leg, flip);
    }

    /// Called after an update.
    fn post_cluster_update_hook(&mut self) {}
}
