//! Volumetric mesh primitives for the stack solver.
//!
//! ```text
//! Block stackup ──► Grid3 (flat element arena) ──► MeshNode graph
//!                        │                              │
//!                  MeshElement state            conduction links
//! ```
//!
//! The solver sees only elements and nodes; coordinates exist solely during
//! mesh generation, funneled through the bounds-checked [`Grid3`] addressing.

pub mod element;
pub mod grid;
pub mod node;

pub use element::MeshElement;
pub use grid::{Grid3, FACE_NEIGHBOR_OFFSETS};
pub use node::MeshNode;
