use crate::chain::BondTable;
use crate::error::SseError;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Sites touched by a single op.
pub type Vars = SmallVec<[usize; 2]>;

/// A non-identity op in the operator string. Identity slots are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Op {
    /// Transverse field term which flips the spin on a site.
    OffDiagSite(usize),
    /// Constant part of the transverse field term on a site.
    DiagSite(usize),
    /// Ising coupling on a bond, only allowed between equal spins.
    DiagBond(usize),
}

impl Op {
    /// Check if the op is diagonal (makes no state changes).
    pub fn is_diagonal(&self) -> bool {
        !matches!(self, Op::OffDiagSite(_))
    }

    /// Check if the op acts on a single site.
    pub fn is_site(&self) -> bool {
        matches!(self, Op::OffDiagSite(_) | Op::DiagSite(_))
    }

    /// Get the set of sites used for this op, in leg order.
    pub fn get_vars(&self, bonds: &BondTable) -> Vars {
        match *self {
            Op::OffDiagSite(s) | Op::DiagSite(s) => smallvec![s],
            Op::DiagBond(b) => {
                let (s0, s1) = bonds.sites(b);
                smallvec![s0, s1]
            }
        }
    }

    /// Swap a site op between its diagonal and offdiagonal forms. Bond ops are unchanged.
    pub fn toggle_site(self) -> Self {
        match self {
            Op::OffDiagSite(s) => Op::DiagSite(s),
            Op::DiagSite(s) => Op::OffDiagSite(s),
            bond => bond,
        }
    }
}

const PACK_OFFDIAG_SITE: usize = 1;
const PACK_DIAG_SITE: usize = 2;
const PACK_DIAG_BOND: usize = 3;

/// Pack a slot into a single integer: `0` is the identity, otherwise `4 * index + kind` with
/// kind 1 (offdiagonal site), 2 (diagonal site), 3 (diagonal bond).
pub fn pack(op: Option<Op>) -> usize {
    match op {
        None => 0,
        Some(Op::OffDiagSite(s)) => 4 * s + PACK_OFFDIAG_SITE,
        Some(Op::DiagSite(s)) => 4 * s + PACK_DIAG_SITE,
        Some(Op::DiagBond(b)) => 4 * b + PACK_DIAG_BOND,
    }
}

/// Inverse of [`pack`].
pub fn unpack(code: usize) -> Result<Option<Op>, SseError> {
    let index = code / 4;
    match code % 4 {
        0 if code == 0 => Ok(None),
        PACK_OFFDIAG_SITE => Ok(Some(Op::OffDiagSite(index))),
        PACK_DIAG_SITE => Ok(Some(Op::DiagSite(index))),
        PACK_DIAG_BOND => Ok(Some(Op::DiagBond(index))),
        _ => Err(SseError::InvalidPackedOp(code)),
    }
}

/// Each op at propagation step `p` owns the four legs `4p..4p+3`.
///
/// ```text
///   out:  4p+2   4p+3
///         [   op    ]
///   in:   4p+0   4p+1
/// ```
/// Column 0 is the first site of the op, column 1 the second site of a bond op. Site ops only
/// use column 0.
pub type Leg = usize;

/// Number of legs per vertex.
pub const LEGS_PER_VERTEX: usize = 4;

/// The propagation step owning `leg`.
#[inline]
pub fn vertex_of(leg: Leg) -> usize {
    leg / LEGS_PER_VERTEX
}

/// The input leg of the `relvar`th site of the op at `p`.
#[inline]
pub fn in_leg(p: usize, relvar: usize) -> Leg {
    LEGS_PER_VERTEX * p + relvar
}

/// The output leg of the `relvar`th site of the op at `p`.
#[inline]
pub fn out_leg(p: usize, relvar: usize) -> Leg {
    in_leg(p, relvar) + 2
}

/// The leg on the same site and opposite side of the vertex (in <-> out).
#[inline]
pub fn same_site_partner(leg: Leg) -> Leg {
    leg ^ 2
}

/// The leg on the same side of the vertex but the other site.
#[inline]
pub fn paired_leg(leg: Leg) -> Leg {
    leg ^ 1
}

/// The three other legs of a bond vertex.
#[inline]
pub fn other_bond_legs(leg: Leg) -> [Leg; 3] {
    let partner = same_site_partner(leg);
    [paired_leg(leg), partner, paired_leg(partner)]
}
