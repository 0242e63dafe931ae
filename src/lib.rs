//! Focus navigation for a tiling window manager.
//!
//! Given the focused window and a requested move (a direction, a step through
//! depth-first order, a window id or a depth-first index), [`FocusEngine`]
//! decides which window gets focus next, honoring container layout, monitor
//! geometry and the configured boundary behavior.
//!
//! [`FocusEngine`]: layout_engine::FocusEngine

pub mod common;
pub mod layout_engine;
pub mod model;
pub mod sys;
