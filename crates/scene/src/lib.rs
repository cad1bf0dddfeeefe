pub mod components;
pub mod entity;
pub mod picking;
pub mod prefabs;
pub mod selection;
pub mod visibility;
pub mod world;

pub use world::*;
