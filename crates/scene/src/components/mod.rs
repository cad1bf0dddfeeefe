pub mod geometry;
pub mod layer;
pub mod paint;
pub mod shape;
pub mod visibility;

pub use geometry::*;
pub use layer::*;
pub use paint::*;
pub use shape::*;
pub use visibility::*;
