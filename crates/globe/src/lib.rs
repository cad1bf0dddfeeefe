//! Orthographic globe engine: camera and tweens, projection, orbital
//! simulation, scene rendering, picking and the regional-focus overlay.

pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod focus;
pub mod interaction;
pub mod orbit;
pub mod projection;
pub mod render;
pub mod svg;
pub mod tooltip;
pub mod tween;

pub use camera::{CameraController, CameraState, CameraStep};
pub use config::GlobeConfig;
pub use engine::{EngineEvent, FocusSignal, GlobeEngine, GlobeMount, MountState};
pub use error::GlobeError;
pub use focus::{Legend, ModeState};
pub use interaction::PointerCommand;
pub use projection::{Projection, Viewport};
pub use tooltip::{Tooltip, TooltipContent, TooltipSource};
