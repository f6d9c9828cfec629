//! Footprint stability over terrain grids.
//!
//! - [`PlaneFitter`] fits an upward contact plane to the cells under a foot;
//!   its tilt from vertical is the stand angle (0 is level).
//! - [`FootShape::cover`] turns a foot pose into the cells it covers.
//! - [`Slider`] translates a footprint along its plane's downhill axis when a
//!   nearby placement is strictly flatter.
//! - [`Smoother`] collapses a guide sequence into one aim point with
//!   geometric-decay weights.
//! - [`clamp_step`] limits a step target to one stride.
//!
//! Every query is bounded: plane refinement by an iteration cap, sliding by
//! a step cap.

mod fit;
mod footprint;
mod plane;
mod slide;
mod smoother;
mod step;

pub use fit::{PlaneFitter, normal, stand_angle};
pub use footprint::FootShape;
pub use plane::{Plane, Side};
pub use slide::{SlideResult, Slider, slide};
pub use smoother::{Smoother, aim_point, geometric_decay, geometric_sum};
pub use step::{clamp_position, clamp_step};
