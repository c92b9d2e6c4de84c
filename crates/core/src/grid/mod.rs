//! Paper grid: scalar fields and the fire spread rule

pub mod field;
pub mod fire_grid;

pub use field::FieldData;
pub use fire_grid::{FireGrid, GridCoord, GridParams, Ignition};
