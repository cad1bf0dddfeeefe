pub mod animation_loop;
pub mod command_queue;
pub mod event_bus;
pub mod frame;
pub mod metrics;
pub mod perf;

pub use animation_loop::*;
pub use command_queue::*;
pub use event_bus::*;
pub use frame::*;
pub use perf::*;
