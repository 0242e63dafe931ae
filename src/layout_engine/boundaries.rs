//! What happens when a focus move runs out of windows in its direction.

use tracing::{debug, trace};

use crate::layout_engine::engine::{FocusEngine, LiveFocus};
use crate::layout_engine::resolver::{dfs_edge, dfs_windows, find_focus_target_recursive};
use crate::layout_engine::{
    Boundaries, BoundariesAction, CardinalOrDfsDirection, FocusError, FocusRequest,
};
use crate::model::monitor::{find_relative_monitor, get_at, get_wrapping, sorted_monitors};
use crate::model::tree::NodeId;
use crate::sys::window_server::WindowServer;

impl<S: WindowServer> FocusEngine<S> {
    pub(super) fn hit_workspace_boundaries(
        &mut self,
        focus: LiveFocus,
        request: &FocusRequest,
        direction: CardinalOrDfsDirection,
    ) -> Result<bool, FocusError> {
        debug!(
            %direction,
            boundaries = %request.boundaries,
            action = %request.boundaries_action,
            "workspace boundary hit"
        );
        match request.boundaries {
            Boundaries::Workspace => match request.boundaries_action {
                BoundariesAction::Stop => Ok(true),
                BoundariesAction::Fail => Ok(false),
                BoundariesAction::WrapAroundTheWorkspace => {
                    self.wrap_around_the_workspace(focus.workspace, focus.window, direction)
                }
                BoundariesAction::WrapAroundAllMonitors => {
                    unreachable!("wrap-around-all-monitors is rejected for workspace boundaries")
                }
            },
            Boundaries::AllMonitorsOuterFrame => {
                let current = self
                    .world()
                    .workspace_monitor(focus.workspace)
                    .ok_or(FocusError::CurrentMonitorNotFound)?;
                let (workspaces, index) = match direction {
                    CardinalOrDfsDirection::Dfs(dfs) => {
                        let monitors = sorted_monitors(self.world().monitors());
                        let current_index = monitors
                            .iter()
                            .position(|m| m.id == current)
                            .ok_or(FocusError::CurrentMonitorNotFound)?;
                        let workspaces: Vec<_> =
                            monitors.iter().map(|m| m.active_workspace).collect();
                        (workspaces, current_index as isize + dfs.focus_offset())
                    }
                    CardinalOrDfsDirection::Cardinal(cardinal) => {
                        let (monitors, index) =
                            find_relative_monitor(self.world().monitors(), current, cardinal)
                                .ok_or(FocusError::NoMonitorInDirection(cardinal))?;
                        (monitors.iter().map(|m| m.active_workspace).collect(), index)
                    }
                };

                if let Some(&workspace) = get_at(&workspaces, index) {
                    debug!(?workspace, "crossing to neighbouring monitor");
                    self.seed_entry_point(workspace, direction);
                    return self.focus_workspace(workspace);
                }
                let Some(&wrapped) = get_wrapping(&workspaces, index) else {
                    return Ok(false);
                };
                self.hit_all_monitors_outer_frame(focus, request, direction, wrapped)
            }
        }
    }

    /// Boundary handling at the outer edge of all monitors, scoped to the
    /// active workspace of the monitor on the opposite edge.
    fn hit_all_monitors_outer_frame(
        &mut self,
        focus: LiveFocus,
        request: &FocusRequest,
        direction: CardinalOrDfsDirection,
        wrapped: NodeId,
    ) -> Result<bool, FocusError> {
        debug!(?wrapped, action = %request.boundaries_action, "outer frame hit");
        match request.boundaries_action {
            BoundariesAction::Stop => Ok(true),
            BoundariesAction::Fail => Ok(false),
            BoundariesAction::WrapAroundTheWorkspace => {
                self.wrap_around_the_workspace(wrapped, focus.window, direction)
            }
            BoundariesAction::WrapAroundAllMonitors => {
                self.seed_entry_point(wrapped, direction);
                self.focus_workspace(wrapped)
            }
        }
    }

    /// Focuses the window on the far edge of `workspace`, opposite to the
    /// direction of travel.
    pub(super) fn wrap_around_the_workspace(
        &mut self,
        workspace: NodeId,
        current: Option<NodeId>,
        direction: CardinalOrDfsDirection,
    ) -> Result<bool, FocusError> {
        let Some(target) = self.entry_point(workspace, direction) else {
            return Err(FocusError::NoWindowIsFocused);
        };
        if Some(target) == current {
            trace!(?target, "already on the far edge");
            return Ok(true);
        }
        self.focus_window(target)
    }

    /// Window a move in `direction` enters `workspace` at.
    fn entry_point(&self, workspace: NodeId, direction: CardinalOrDfsDirection) -> Option<NodeId> {
        match direction {
            CardinalOrDfsDirection::Dfs(dfs) => {
                dfs_edge(&dfs_windows(self.world(), workspace), dfs.is_positive())
            }
            CardinalOrDfsDirection::Cardinal(cardinal) => {
                find_focus_target_recursive(self.world(), workspace, cardinal.opposite())
            }
        }
    }

    /// Makes the entry point of `workspace` its most recent window, so that
    /// focusing the workspace lands there.
    fn seed_entry_point(&mut self, workspace: NodeId, direction: CardinalOrDfsDirection) {
        if let Some(window) = self.entry_point(workspace, direction) {
            self.world_mut().mark_as_most_recent_child(window);
        }
    }
}
