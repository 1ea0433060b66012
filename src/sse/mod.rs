//! The SSE engine for the transverse-field Ising chain.

pub use estimator::{BinStats, Estimator};
pub use qmc_tfim::{new_tfim, TfimChain};
pub use qmc_traits::*;
pub use runner::{run, BinSink, DataFiles, RunParams};
pub use simple_ops::OpString;
pub use vertex_list::{LegState, VertexList};

/// Independent runs across threads.
#[cfg(feature = "parallel-runs")]
pub mod ensemble;

/// Per-bin estimator accumulation.
pub mod estimator;

/// The TFIM chain container.
pub mod qmc_tfim;

/// Traits which, when implemented, run SSE.
pub mod qmc_traits;

/// Ops, their packed form, and leg arithmetic.
pub mod qmc_types;

/// Thermalization and measurement schedule, and bin output.
pub mod runner;

/// The operator string.
pub mod simple_ops;

/// Links between op legs.
pub mod vertex_list;

#[cfg(feature = "parallel-runs")]
pub use ensemble::*;
