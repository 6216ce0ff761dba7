pub mod constants;
pub mod geometry;

pub use geometry::{Point, Rect};
