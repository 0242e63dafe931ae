use crate::layout_engine::{Boundaries, BoundariesAction, Direction};
use crate::sys::window_server::WindowId;

/// Conditions a focus command reports to the user.
///
/// Hitting a boundary is not an error. It is resolved by the configured
/// boundaries action, which may turn it into a silent `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    #[error("Can't find window with ID {0}")]
    WindowNotFound(WindowId),
    #[error("Can't find window with DFS index {0}")]
    DfsIndexOutOfRange(usize),
    #[error("No window is focused")]
    NoWindowIsFocused,
    #[error("No workspace is focused")]
    NoWorkspaceIsFocused,
    #[error("Can't get index of current window")]
    CurrentWindowNotInTree,
    #[error("Can't find current monitor")]
    CurrentMonitorNotFound,
    #[error("Can't find monitor in direction {0}")]
    NoMonitorInDirection(Direction),
    #[error("Failed to focus window {0}")]
    ActivationFailed(WindowId),
    #[error("{action} and {boundaries} is an invalid combination of values")]
    InvalidBoundaries {
        boundaries: Boundaries,
        action: BoundariesAction,
    },
}
