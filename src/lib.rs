#![deny(
    missing_docs,
    unreachable_pub,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

//! `tfim_sse` samples the ferromagnetic transverse-field Ising chain
//! `H = -J sum_i Z_i Z_{i+1} - h sum_i X_i` with stochastic series expansion.
//!
//! Each step is a diagonal update (inserting and removing diagonal ops), a rebuild of the
//! vertex list linking op legs along imaginary time, and a cluster update which flips whole
//! clusters of ops and spins.
//!
//! It also offers a few feature gated additions:
//! - independent runs across threads using the `parallel-runs` feature.
//! - serialization of parameters, ops, and bins using serde with the `serialize` feature.
//!
//! # Basic Example
//! ```
//! use tfim_sse::chain::ChainParams;
//! use tfim_sse::sse::*;
//!
//! let params = ChainParams {
//!     length: 8,
//!     beta: 1.0,
//!     coupling: 1.0,
//!     field: 1.0,
//! };
//! let mut g = new_tfim(params, Some(1234)).unwrap();
//!
//! // Thermalize, letting the cutoff grow.
//! for _ in 0..100 {
//!     g.timestep();
//!     g.adjust_cutoff();
//! }
//!
//! // Take timesteps and get the average of -n/beta.
//! let energy = g.timesteps(100);
//! assert!(energy <= 0.0);
//! ```

/// The chain geometry and model parameters.
pub mod chain;
/// Error type.
pub mod error;
/// Random draws used by the updates.
pub mod random;
/// SSE algorithms and traits.
pub mod sse;

pub use error::SseError;
