//! Transient conduction solver for stacked rectangular material blocks.
//!
//! Estimates thermal impedance and time-to-steady-state of layered material
//! assemblies (e.g. electronic packages) with an explicit finite-difference
//! mesh.
//!
//! # Architecture
//!
//! ```text
//! Material + Block declarations ──► ThermalStack::mesh() ──► Grid3 + MeshNode graph
//!                                          │
//!                                   ThermalStack::solve()
//!                                          │
//!                           Solution (tau, steady state, impedance)
//! ```
//!
//! Blocks stack along Z in declaration order, each centered in X and Y.  The
//! mesh is a flat arena of cubic/rectangular elements; face-adjacent active
//! elements are linked by conduction nodes, and the solver marches explicit
//! time steps (all nodes compute, then all elements commit) until the
//! monitored block's bulk temperature stops rising.

pub mod block;
pub mod material;
pub mod mesh;
pub mod report;
pub mod stack;

pub use block::Block;
pub use material::Material;
pub use mesh::{Grid3, MeshElement, MeshNode};
pub use stack::{Solution, StackConfig, ThermalStack};
