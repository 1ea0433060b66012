/// Cluster updates in imaginary time.
pub mod cluster;
/// Diagonal update moves.
pub mod diagonal;
/// Holding and manipulating ops.
pub mod op_container;
/// QMC timesteps and analysis.
pub mod qmc_stepper;

pub use cluster::*;
pub use diagonal::*;
pub use op_container::*;
pub use qmc_stepper::*;
