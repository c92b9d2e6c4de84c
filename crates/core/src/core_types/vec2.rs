//! Vector type alias for 2D screen-space positions and velocities.

use nalgebra::Vector2;

/// 2D vector type for particle positions and velocities.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`. Units are destination
/// pixels (positions) and pixels per simulation step (velocities), with `+y`
/// pointing down the screen.
pub type Vec2 = Vector2<f32>;
