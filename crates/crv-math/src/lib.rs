pub mod hull;
pub mod vector;

pub use glam::{DVec2, DVec3};
pub use hull::{convex_hull, polygon_area};
pub use vector::VectorSpace;

pub type Point2 = DVec2;
