mod boundaries;
pub mod command;
pub mod engine;
mod error;
pub mod floating;
pub(crate) mod graph;
pub mod resolver;

pub use command::{Boundaries, BoundariesAction, FocusRequest, FocusTarget};
pub use engine::{FocusEngine, LiveFocus};
pub use error::FocusError;
pub use floating::{FloatingProjection, FloatingWindowData};
pub use graph::{CardinalOrDfsDirection, DfsDirection, Direction, Orientation};
pub use resolver::find_focus_target_recursive;
