use crate::chain::BondTable;
use crate::error::SseError;
use crate::sse::qmc_traits::*;
use crate::sse::qmc_types::{pack, unpack, Op};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// The operator string: one optional op per propagation step, plus the running count of
/// non-identity ops.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct OpString {
    ops: Vec<Option<Op>>,
    n: usize,
}

impl OpString {
    /// An all-identity string with `cutoff` slots.
    pub fn new(cutoff: usize) -> Self {
        Self {
            ops: vec![None; cutoff],
            n: 0,
        }
    }

    /// Build from explicit slots.
    pub fn from_ops(ops: Vec<Option<Op>>) -> Self {
        let n = ops.iter().filter(|op| op.is_some()).count();
        Self { ops, n }
    }

    /// Build from packed integer codes.
    pub fn from_packed(codes: &[usize]) -> Result<Self, SseError> {
        let ops = codes
            .iter()
            .map(|code| unpack(*code))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_ops(ops))
    }

    /// Packed integer codes for each slot.
    pub fn to_packed(&self) -> Vec<usize> {
        self.ops.iter().map(|op| pack(*op)).collect()
    }

    /// All slots in propagation order.
    pub fn ops(&self) -> &[Option<Op>] {
        &self.ops
    }

    /// Swap the site op at `p` between diagonal and offdiagonal. Identities and bonds are left
    /// alone.
    pub fn toggle_site_op(&mut self, p: usize) {
        if let Some(op) = self.ops[p].as_mut() {
            *op = op.toggle_site();
        }
    }

    /// Print the string one step per line, `X` for offdiagonal and `O` for diagonal site ops,
    /// `=` for both sites of a bond.
    pub fn debug_string(&self, bonds: &BondTable) -> String {
        let nvars = bonds.get_nsites();
        self.ops
            .iter()
            .enumerate()
            .map(|(p, op)| {
                let mut line = vec!['|'; nvars];
                if let Some(op) = op {
                    let c = match op {
                        Op::OffDiagSite(_) => 'X',
                        Op::DiagSite(_) => 'O',
                        Op::DiagBond(_) => '=',
                    };
                    op.get_vars(bonds).iter().for_each(|v| line[*v] = c);
                }
                format!("{:>5}\t{}\t{}", p, line.into_iter().collect::<String>(), pack(*op))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OpContainer for OpString {
    fn get_cutoff(&self) -> usize {
        self.ops.len()
    }

    fn set_cutoff(&mut self, cutoff: usize) {
        if self.ops.len() < cutoff {
            self.ops.resize(cutoff, None)
        }
    }

    fn get_n(&self) -> usize {
        self.n
    }

    fn get_pth(&self, p: usize) -> Option<Op> {
        self.ops[p]
    }

    fn set_pth(&mut self, p: usize, op: Option<Op>) -> Option<Op> {
        let old = std::mem::replace(&mut self.ops[p], op);
        match (old.is_some(), op.is_some()) {
            (false, true) => self.n += 1,
            (true, false) => self.n -= 1,
            _ => {}
        }
        old
    }
}

impl DiagonalUpdater for OpString {}

impl ClusterUpdater for OpString {
    fn toggle_site_op_at(&mut self, p: usize) {
        self.toggle_site_op(p)
    }
}
