use tracing::{debug, instrument, trace};

use crate::common::config::OuterGaps;
use crate::layout_engine::floating::FloatingProjection;
use crate::layout_engine::resolver::{closest_parent, dfs_windows, find_focus_target_recursive};
use crate::layout_engine::{CardinalOrDfsDirection, FocusError, FocusRequest, FocusTarget};
use crate::model::World;
use crate::model::tree::NodeId;
use crate::sys::cmd_io::CmdIo;
use crate::sys::window_server::WindowServer;

/// Focus as it was when the command started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveFocus {
    pub workspace: NodeId,
    pub window: Option<NodeId>,
}

/// Resolves focus commands against a [`World`], activating windows through
/// a [`WindowServer`].
pub struct FocusEngine<S> {
    world: World,
    server: S,
    gaps: OuterGaps,
}

impl<S: WindowServer> FocusEngine<S> {
    pub fn new(world: World, server: S, gaps: OuterGaps) -> Self {
        FocusEngine { world, server, gaps }
    }

    pub fn world(&self) -> &World { &self.world }

    pub fn world_mut(&mut self) -> &mut World { &mut self.world }

    pub fn server(&self) -> &S { &self.server }

    pub fn server_mut(&mut self) -> &mut S { &mut self.server }

    pub fn into_parts(self) -> (World, S) { (self.world, self.server) }

    /// Runs one focus command. Errors are reported through `io` and turn
    /// into `false`.
    #[instrument(level = "debug", skip(self, io), fields(target = ?request.target))]
    pub fn resolve_focus_target(&mut self, request: &FocusRequest, io: &mut impl CmdIo) -> bool {
        match self.run(request) {
            Ok(focused) => {
                debug!(focused, "focus command finished");
                focused
            }
            Err(err) => {
                debug!(%err, "focus command failed");
                io.err(&err.to_string())
            }
        }
    }

    fn run(&mut self, request: &FocusRequest) -> Result<bool, FocusError> {
        request.validate()?;
        let workspace = self.world.focused_workspace().ok_or(FocusError::NoWorkspaceIsFocused)?;
        let focus = LiveFocus {
            workspace,
            window: self.world.focused_window(),
        };
        if request.floating_as_tiling {
            self.with_floating_as_tiling(workspace, |this| this.navigate(focus, request))
        } else {
            self.navigate(focus, request)
        }
    }

    /// Runs `f` with the workspace's floating windows bound into its tiling
    /// tree, restoring them however `f` returns.
    pub fn with_floating_as_tiling<T>(
        &mut self,
        workspace: NodeId,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let projection =
            FloatingProjection::begin(&mut self.world, &self.server, &self.gaps, workspace);
        let result = f(self);
        projection.end(&mut self.world);
        result
    }

    fn navigate(&mut self, focus: LiveFocus, request: &FocusRequest) -> Result<bool, FocusError> {
        match request.target {
            FocusTarget::Direction(direction) => {
                let found = focus
                    .window
                    .and_then(|window| closest_parent(&self.world, window, direction));
                let Some((parent, own_index)) = found else {
                    return self.hit_workspace_boundaries(
                        focus,
                        request,
                        CardinalOrDfsDirection::Cardinal(direction),
                    );
                };
                let sibling_index = (own_index as isize + direction.focus_offset()) as usize;
                let target = parent
                    .nth_child(self.world.map(), sibling_index)
                    .and_then(|sibling| {
                        find_focus_target_recursive(&self.world, sibling, direction.opposite())
                    });
                match target {
                    Some(window) => self.focus_window(window),
                    None => Ok(false),
                }
            }
            FocusTarget::WindowId(id) => match self.world.window_node(id) {
                Some(window) => self.focus_window(window),
                None => Err(FocusError::WindowNotFound(id)),
            },
            FocusTarget::DfsIndex(index) => {
                match dfs_windows(&self.world, focus.workspace).get(index) {
                    Some(&window) => self.focus_window(window),
                    None => Err(FocusError::DfsIndexOutOfRange(index)),
                }
            }
            FocusTarget::DfsRelative(direction) => {
                let Some(window) = focus.window else {
                    return self.hit_workspace_boundaries(
                        focus,
                        request,
                        CardinalOrDfsDirection::Dfs(direction),
                    );
                };
                let windows = dfs_windows(&self.world, focus.workspace);
                let current = windows
                    .iter()
                    .position(|&w| w == window)
                    .ok_or(FocusError::CurrentWindowNotInTree)?;
                let target = current as isize + direction.focus_offset();
                match usize::try_from(target).ok().and_then(|i| windows.get(i)) {
                    Some(&window) => self.focus_window(window),
                    None => self.hit_workspace_boundaries(
                        focus,
                        request,
                        CardinalOrDfsDirection::Dfs(direction),
                    ),
                }
            }
        }
    }

    /// Activates `window` and records it as focused, switching workspace and
    /// monitor if it lives elsewhere.
    pub fn focus_window(&mut self, window: NodeId) -> Result<bool, FocusError> {
        let Some(id) = self.world.window_id(window) else {
            unreachable!("focus target {window:?} is not a window");
        };
        let workspace = self.world.workspace_of(window).ok_or(FocusError::WindowNotFound(id))?;
        if !self.server.focus_window(id) {
            return Err(FocusError::ActivationFailed(id));
        }
        self.world.mark_as_most_recent_child(window);
        if let Some(monitor) = self.world.workspace_monitor(workspace) {
            self.world.show_workspace(monitor, workspace);
        }
        self.world.set_focus(workspace, Some(window));
        trace!(?id, ?workspace, "window focused");
        Ok(true)
    }

    /// Shows `workspace` on its monitor and focuses its most recent window.
    pub fn focus_workspace(&mut self, workspace: NodeId) -> Result<bool, FocusError> {
        if let Some(monitor) = self.world.workspace_monitor(workspace) {
            self.world.show_workspace(monitor, workspace);
        }
        match self.world.most_recent_window_recursive(workspace) {
            Some(window) => self.focus_window(window),
            None => {
                trace!(?workspace, "focused empty workspace");
                self.world.set_focus(workspace, None);
                Ok(true)
            }
        }
    }
}
