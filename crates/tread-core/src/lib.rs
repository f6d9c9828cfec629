//! **tread-core**: core types for footstep planning over uneven terrain.
//!
//! This crate provides the foundational types shared by the search and
//! stance crates: grid coordinates and their explicit conversions, the
//! [`TerrainGrid`] with tagged obstacle cells and block coarsening, the
//! roughness score used to penalise jagged ground, and the configuration
//! sections for every planning stage.
//!
//! Everything here is synchronous and side-effect free; a grid is built once
//! by the caller's loader and then only read.

pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod roughness;

pub use config::{
    PlaneFitConfig, PlannerConfig, RoughnessConfig, SearchConfig, SlideConfig, SmootherConfig,
};
pub use error::{GridError, Result};
pub use geom::{Coord, Point3, Position};
pub use grid::{Aggregate, Terrain, TerrainGrid};
pub use roughness::RoughnessEvaluator;
