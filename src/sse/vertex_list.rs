use crate::chain::BondTable;
use crate::sse::qmc_traits::OpContainer;
use crate::sse::qmc_types::*;

/// State of a single leg in the vertex list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegState {
    /// Leg of an identity, or a column a site op does not use.
    Unlinked,
    /// Live leg, joined to the temporally adjacent leg on the same site.
    Linked(Leg),
    /// Consumed by the cluster update, with the decision for its cluster.
    Visited {
        /// Whether the cluster was flipped.
        flip: bool,
    },
}

/// Links between legs of neighbouring ops on each site, closed periodically in imaginary time.
///
/// Rebuilt from the op string each step and consumed by the cluster update.
#[derive(Clone, Debug, Default)]
pub struct VertexList {
    links: Vec<LegState>,
    first: Vec<Option<Leg>>,
    last: Vec<Option<Leg>>,
}

impl VertexList {
    /// An empty list, sized on the first build.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the links for `ops`, reusing the existing allocations.
    pub fn build<C: OpContainer + ?Sized>(&mut self, ops: &C, bonds: &BondTable) {
        let nsites = bonds.get_nsites();
        self.links.clear();
        self.links
            .resize(LEGS_PER_VERTEX * ops.get_cutoff(), LegState::Unlinked);
        self.first.clear();
        self.first.resize(nsites, None);
        self.last.clear();
        self.last.resize(nsites, None);

        for p in 0..ops.get_cutoff() {
            match ops.get_pth(p) {
                None => {}
                Some(Op::DiagBond(b)) => {
                    let (s0, s1) = bonds.sites(b);
                    self.attach(s0, p, 0);
                    self.attach(s1, p, 1);
                }
                Some(Op::DiagSite(s)) | Some(Op::OffDiagSite(s)) => self.attach(s, p, 0),
            }
        }

        // Close each site's chain around imaginary time.
        for (first, last) in self.first.iter().zip(self.last.iter()) {
            if let (Some(first), Some(last)) = (first, last) {
                self.links[*first] = LegState::Linked(*last);
                self.links[*last] = LegState::Linked(*first);
            }
        }
    }

    fn attach(&mut self, site: usize, p: usize, relvar: usize) {
        let input = in_leg(p, relvar);
        match self.last[site] {
            Some(prev) => {
                self.links[prev] = LegState::Linked(input);
                self.links[input] = LegState::Linked(prev);
            }
            None => self.first[site] = Some(input),
        }
        self.last[site] = Some(out_leg(p, relvar));
    }

    /// Total number of legs (`4 * cutoff`).
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True if there are no legs.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// State of a leg.
    pub fn get(&self, leg: Leg) -> LegState {
        self.links[leg]
    }

    /// The partner of a live leg.
    pub fn partner(&self, leg: Leg) -> Option<Leg> {
        match self.links[leg] {
            LegState::Linked(other) => Some(other),
            _ => None,
        }
    }

    /// True if the leg is linked and not yet consumed.
    pub fn is_live(&self, leg: Leg) -> bool {
        matches!(self.links[leg], LegState::Linked(_))
    }

    /// True if the leg has been consumed by a cluster.
    pub fn is_visited(&self, leg: Leg) -> bool {
        matches!(self.links[leg], LegState::Visited { .. })
    }

    /// Mark a leg as consumed by a cluster.
    pub fn mark_visited(&mut self, leg: Leg, flip: bool) {
        self.links[leg] = LegState::Visited { flip };
    }

    /// The first leg on `site` in propagation order, None if the site has no ops.
    pub fn first_leg(&self, site: usize) -> Option<Leg> {
        self.first[site]
    }

    /// The last leg on `site` in propagation order, None if the site has no ops.
    pub fn last_leg(&self, site: usize) -> Option<Leg> {
        self.last[site]
    }

    /// Check that every live leg's partner links back to it.
    pub fn is_symmetric(&self) -> bool {
        self.links.iter().enumerate().all(|(leg, state)| match state {
            LegState::Linked(other) => self.links[*other] == LegState::Linked(leg),
            _ => true,
        })
    }
}
