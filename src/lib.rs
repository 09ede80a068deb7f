/**
 * Relativistic magnetohydrodynamics finite-volume core: given cell-centered
 * conserved variables on a 1D/2D/3D structured grid, produces their time
 * derivative dU/dt.
 *
 * The four coupled pieces are primitive-variable recovery ([`variables`]),
 * the characteristic-wavespeed quartic ([`quartic`], [`flux`]), the
 * reconstruction + Riemann + flux-derivative pipeline ([`limiter`],
 * [`reconstruct`], [`riemann`], [`sweep`], [`ct`]), and the state machine
 * binding grid geometry to allocated scratch buffers ([`grid`],
 * [`solver`]). I/O, checkpoint formats, domain decomposition, time
 * integration, and visualization are the caller's concern, not this
 * crate's.
 */
pub mod config;
pub mod ct;
pub mod eos;
pub mod error;
pub mod flux;
pub mod grid;
pub mod limiter;
pub mod quartic;
pub mod reconstruct;
pub mod riemann;
pub mod solver;
pub mod sweep;
pub mod variables;

pub use config::Config;
pub use error::RmhdError;
pub use grid::{Axis, Grid};
pub use solver::Solver;
pub use variables::{cons_to_prim, prim_to_cons, Conserved, Primitive};
