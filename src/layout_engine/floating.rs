use tracing::{debug, trace};

use crate::common::config::OuterGaps;
use crate::layout_engine::Orientation;
use crate::model::World;
use crate::model::tree::{BindIndex, NodeId};
use crate::sys::geometry::{Point, Rect};
use crate::sys::window_server::WindowServer;

/// A floating window temporarily bound into the tiling tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingWindowData {
    pub window: NodeId,
    pub center: Point,
    /// Tiling container the window is bound into.
    pub parent: NodeId,
    pub orientation: Orientation,
    /// Weight the window had as a floating window.
    pub weight: f64,
    pub index: usize,
}

/// Floating windows of one workspace, bound into its tiling tree so
/// directional and DFS navigation can reach them.
///
/// Must be undone with [`FloatingProjection::end`] before the command
/// returns.
#[must_use]
#[derive(Debug)]
pub struct FloatingProjection {
    workspace: NodeId,
    windows: Vec<FloatingWindowData>,
    /// Most recent window of the workspace before projection.
    mru_before: Option<NodeId>,
    /// Most-recent pointers of every container before projection.
    recorded: Vec<(NodeId, Option<NodeId>)>,
    ended: bool,
}

impl FloatingProjection {
    /// Binds every floating window of `workspace` next to the tiling window
    /// under its center.
    ///
    /// Windows whose center is unknown, or that land outside every tiling
    /// window, keep floating for this command.
    pub fn begin(
        world: &mut World,
        server: &impl WindowServer,
        gaps: &OuterGaps,
        workspace: NodeId,
    ) -> FloatingProjection {
        let mru_before = world.most_recent_window_recursive(workspace);
        let recorded = world.recorded_children(workspace);
        let mut windows = Vec::new();
        let bounds = world
            .workspace_monitor(workspace)
            .and_then(|id| world.monitor(id))
            .map(|monitor| monitor.visible_rect_padded(gaps));

        if let Some(bounds) = bounds {
            let root = world.root_tiling_container(workspace);
            for window in world.floating_windows(workspace) {
                let Some(mut data) = project(world, server, root, window, bounds) else {
                    trace!(?window, "floating window not projected");
                    continue;
                };
                if let Some(binding) = world.unbind(window) {
                    data.weight = binding.weight;
                }
                windows.push(data);
            }
        } else {
            debug!(?workspace, "workspace has no monitor; floating windows not projected");
        }

        windows.sort_by(|a, b| {
            a.center.projection(a.orientation).total_cmp(&b.center.projection(b.orientation))
        });
        windows.reverse();
        // Descending order keeps the earlier computed indices valid.
        for data in &windows {
            world.bind(data.window, data.parent, 1.0, BindIndex::At(data.index));
        }

        if let Some(mru) = mru_before {
            world.mark_as_most_recent_child(mru);
        }
        debug!(?workspace, projected = windows.len(), "floating windows seen as tiling");
        FloatingProjection {
            workspace,
            windows,
            mru_before,
            recorded,
            ended: false,
        }
    }

    pub fn windows(&self) -> &[FloatingWindowData] { &self.windows }

    /// Returns every projected window to the workspace's floating set with
    /// its original weight, and puts every most-recent pointer back. A window
    /// focused in the meantime stays the most recent one.
    pub fn end(mut self, world: &mut World) {
        let mru_now = world.most_recent_window_recursive(self.workspace);
        for data in &self.windows {
            world.bind(data.window, self.workspace, data.weight, BindIndex::Last);
        }
        world.restore_recorded_children(&self.recorded);
        if let Some(mru) = mru_now.filter(|&mru| Some(mru) != self.mru_before) {
            world.mark_as_most_recent_child(mru);
        }
        trace!(
            workspace = ?self.workspace,
            restored = self.windows.len(),
            "floating windows restored"
        );
        self.ended = true;
    }
}

impl Drop for FloatingProjection {
    fn drop(&mut self) {
        if cfg!(debug_assertions) && !self.ended && !std::thread::panicking() {
            panic!(
                "FloatingProjection for {:?} dropped without FloatingProjection::end being called",
                self.workspace
            );
        }
    }
}

fn project(
    world: &World,
    server: &impl WindowServer,
    root: NodeId,
    window: NodeId,
    bounds: Rect,
) -> Option<FloatingWindowData> {
    let center = server.window_center(world.window_id(window)?)?;
    let target = world.find_window_at(root, center.coerce_in(bounds))?;
    let target_center = server.window_center(world.window_id(target)?)?;
    let parent = target.parent(world.map())?;
    let orientation = world.orientation(parent)?;
    let own_index = target.own_index(world.map())?;
    let index = if center.projection(orientation) >= target_center.projection(orientation) {
        own_index + 1
    } else {
        own_index
    };
    Some(FloatingWindowData {
        window,
        center,
        parent,
        orientation,
        weight: 1.0,
        index,
    })
}
