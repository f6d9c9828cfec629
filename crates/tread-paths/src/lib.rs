//! Path search over terrain grids.
//!
//! - **Fine A\*** at full resolution ([`SearchSpace::astar_path`] with a
//!   [`TerrainPather`], or the one-shot [`find_path`])
//! - **Scaled A\*** on a coarsened grid with roughness-augmented edge costs,
//!   mapped back to fine guide points ([`ScaledSearch::guide_path`], or the
//!   one-shot [`guide_path`])
//!
//! Searches run in a [`SearchSpace`], which owns and reuses the node array so
//! repeated queries on the same extent incur no allocations after warm-up.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | edge costs, `None` for blocked edges |
//! | [`AstarPather`] : [`WeightedPather`] | admissible heuristic for A* |

mod astar;
mod distance;
mod scaled;
mod space;
mod traits;

pub use astar::{TerrainPather, find_path, path_cost};
pub use distance::{euclidean, manhattan};
pub use scaled::{CoarsePather, ScaledSearch, guide_path};
pub use space::SearchSpace;
pub use traits::{AstarPather, Pather, WeightedPather};
