use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use tracing::trace;

use crate::common::collections::HashMap;
use crate::layout_engine::Orientation;
use crate::model::monitor::{Monitor, MonitorId};
use crate::model::mru::{Mru, TreeEvent};
use crate::model::tree::{BindIndex, NodeId, NodeMap, Observer, Tree};
use crate::sys::geometry::{Point, Rect};
use crate::sys::window_server::WindowId;

/// What a node in the window tree is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Window(WindowId),
    TilingContainer(Orientation),
    /// Root of a tree. Its children are one root tiling container, the
    /// floating windows, and any special containers.
    Workspace { name: String, monitor: MonitorId },
    Special(SpecialContainer),
}

/// Containers holding windows that directional navigation never enters.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display
)]
#[strum(serialize_all = "kebab-case")]
pub enum SpecialContainer {
    Minimized,
    Fullscreen,
    HiddenApps,
    Popup,
}

/// Where a node was bound before it was unbound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BindingData {
    pub weight: f64,
    pub index: usize,
}

/// Data attached to tree nodes, kept in sync with the tree structure.
#[derive(Default, Serialize, Deserialize)]
pub struct Components {
    kind: SecondaryMap<NodeId, NodeKind>,
    weight: SecondaryMap<NodeId, f64>,
    frame: SecondaryMap<NodeId, Rect>,
    windows: HashMap<WindowId, NodeId>,
    mru: Mru,
}

impl Observer for Components {
    fn added_to_forest(&mut self, map: &NodeMap, node: NodeId) {
        self.mru.handle_event(map, TreeEvent::AddedToForest(node));
    }

    fn added_to_parent(&mut self, map: &NodeMap, node: NodeId) {
        self.mru.handle_event(map, TreeEvent::AddedToParent(node));
    }

    fn removing_from_parent(&mut self, map: &NodeMap, node: NodeId) {
        self.weight.remove(node);
        self.mru.handle_event(map, TreeEvent::RemovingFromParent(node));
    }

    fn removed_from_forest(&mut self, map: &NodeMap, node: NodeId) {
        if let Some(NodeKind::Window(id)) = self.kind.remove(node) {
            self.windows.remove(&id);
        }
        self.weight.remove(node);
        self.frame.remove(node);
        self.mru.handle_event(map, TreeEvent::RemovedFromForest(node));
    }
}

/// Everything the focus engine navigates: the window trees of all
/// workspaces, the monitors showing them, and the current focus.
#[derive(Default, Serialize, Deserialize)]
pub struct World {
    tree: Tree<Components>,
    workspaces: Vec<NodeId>,
    monitors: Vec<Monitor>,
    focused_workspace: Option<NodeId>,
    focused_window: Option<NodeId>,
}

impl Default for Tree<Components> {
    fn default() -> Self { Tree::with_observer(Components::default()) }
}

impl World {
    pub fn new() -> World { World::default() }

    pub fn map(&self) -> &NodeMap { &self.tree.map }

    /// Adds a monitor showing a new workspace named `workspace`, and returns
    /// that workspace. The first workspace created gets focus.
    pub fn add_monitor(
        &mut self,
        id: MonitorId,
        frame: Rect,
        visible_frame: Rect,
        workspace: &str,
    ) -> NodeId {
        let active_workspace = self.add_workspace(workspace, id);
        self.monitors.push(Monitor { id, frame, visible_frame, active_workspace });
        active_workspace
    }

    /// Creates a workspace with an empty horizontal root tiling container.
    pub fn add_workspace(&mut self, name: &str, monitor: MonitorId) -> NodeId {
        let workspace = self.tree.mk_node();
        self.tree.data.kind.insert(
            workspace,
            NodeKind::Workspace { name: name.to_owned(), monitor },
        );
        self.new_container(Orientation::Horizontal, workspace, BindIndex::Last);
        self.workspaces.push(workspace);
        if self.focused_workspace.is_none() {
            self.focused_workspace = Some(workspace);
        }
        workspace
    }

    pub fn workspaces(&self) -> &[NodeId] { &self.workspaces }

    pub fn workspace_by_name(&self, name: &str) -> Option<NodeId> {
        self.workspaces.iter().copied().find(|&ws| self.workspace_name(ws) == Some(name))
    }

    pub fn workspace_name(&self, workspace: NodeId) -> Option<&str> {
        match self.tree.data.kind.get(workspace) {
            Some(NodeKind::Workspace { name, .. }) => Some(name),
            _ => None,
        }
    }

    pub fn workspace_monitor(&self, workspace: NodeId) -> Option<MonitorId> {
        match self.tree.data.kind.get(workspace) {
            Some(NodeKind::Workspace { monitor, .. }) => Some(*monitor),
            _ => None,
        }
    }

    /// Makes `workspace` the active workspace of `monitor`.
    pub fn show_workspace(&mut self, monitor: MonitorId, workspace: NodeId) {
        if let Some(NodeKind::Workspace { monitor: bound, .. }) =
            self.tree.data.kind.get_mut(workspace)
        {
            *bound = monitor;
        }
        if let Some(m) = self.monitors.iter_mut().find(|m| m.id == monitor) {
            m.active_workspace = workspace;
        }
    }

    pub fn new_container(
        &mut self,
        orientation: Orientation,
        parent: NodeId,
        index: BindIndex,
    ) -> NodeId {
        let node = self.tree.mk_node();
        self.tree.data.kind.insert(node, NodeKind::TilingContainer(orientation));
        self.bind(node, parent, 1.0, index);
        node
    }

    /// Creates a window node. Binding directly under a workspace makes it
    /// floating.
    #[track_caller]
    pub fn new_window(&mut self, id: WindowId, parent: NodeId, index: BindIndex) -> NodeId {
        assert!(
            !self.tree.data.windows.contains_key(&id),
            "window {id} already exists"
        );
        let node = self.tree.mk_node();
        self.tree.data.kind.insert(node, NodeKind::Window(id));
        self.tree.data.windows.insert(id, node);
        self.bind(node, parent, 1.0, index);
        node
    }

    pub fn new_special(&mut self, kind: SpecialContainer, workspace: NodeId) -> NodeId {
        let node = self.tree.mk_node();
        self.tree.data.kind.insert(node, NodeKind::Special(kind));
        self.bind(node, workspace, 1.0, BindIndex::Last);
        node
    }

    /// Moves `node` under `parent`, unbinding it first if needed.
    ///
    /// Like any bind in the window manager, this marks the node as the most
    /// recent child up its new ancestor chain.
    #[track_caller]
    pub fn bind(&mut self, node: NodeId, parent: NodeId, weight: f64, index: BindIndex) {
        assert!(
            !matches!(self.tree.data.kind.get(parent), Some(NodeKind::Window(_))),
            "cannot bind {node:?} under window {parent:?}"
        );
        self.unbind(node);
        self.tree.link(node, parent, index);
        self.tree.data.weight.insert(node, weight);
        self.tree.data.mru.mark(&self.tree.map, node);
    }

    /// Detaches `node` from its parent and returns the weight and index it
    /// had there.
    pub fn unbind(&mut self, node: NodeId) -> Option<BindingData> {
        node.parent(&self.tree.map)?;
        let weight = self.tree.data.weight.get(node).copied().unwrap_or(1.0);
        let index = self.tree.unlink(node)?;
        Some(BindingData { weight, index })
    }

    /// Removes `node` and everything under it from the world.
    pub fn remove(&mut self, node: NodeId) {
        let removed: Vec<_> = node.traverse_preorder(&self.tree.map).collect();
        self.tree.remove(node);
        if self.focused_window.is_some_and(|w| removed.contains(&w)) {
            self.focused_window = None;
        }
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind { &self.tree.data.kind[node] }

    pub fn weight(&self, node: NodeId) -> Option<f64> { self.tree.data.weight.get(node).copied() }

    pub fn set_frame(&mut self, node: NodeId, frame: Rect) {
        self.tree.data.frame.insert(node, frame);
    }

    /// The last frame the layout pass assigned to `node`.
    pub fn frame(&self, node: NodeId) -> Option<Rect> { self.tree.data.frame.get(node).copied() }

    pub fn window_id(&self, node: NodeId) -> Option<WindowId> {
        match self.tree.data.kind.get(node) {
            Some(NodeKind::Window(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn window_node(&self, id: WindowId) -> Option<NodeId> {
        self.tree.data.windows.get(&id).copied()
    }

    pub fn windows(&self) -> impl Iterator<Item = (WindowId, NodeId)> + '_ {
        self.tree.data.windows.iter().map(|(&id, &node)| (id, node))
    }

    pub fn orientation(&self, node: NodeId) -> Option<Orientation> {
        match self.tree.data.kind.get(node) {
            Some(NodeKind::TilingContainer(orientation)) => Some(*orientation),
            _ => None,
        }
    }

    pub fn is_window(&self, node: NodeId) -> bool { self.window_id(node).is_some() }

    /// The workspace whose tree contains `node`.
    pub fn workspace_of(&self, node: NodeId) -> Option<NodeId> {
        let root = node.root(&self.tree.map);
        matches!(self.tree.data.kind.get(root), Some(NodeKind::Workspace { .. })).then_some(root)
    }

    #[track_caller]
    pub fn root_tiling_container(&self, workspace: NodeId) -> NodeId {
        workspace
            .children(&self.tree.map)
            .find(|&child| self.orientation(child).is_some())
            .unwrap_or_else(|| panic!("workspace {workspace:?} has no root tiling container"))
    }

    /// Windows bound directly to the workspace, outside the tiling tree.
    pub fn floating_windows(&self, workspace: NodeId) -> Vec<NodeId> {
        workspace.children(&self.tree.map).filter(|&child| self.is_window(child)).collect()
    }

    pub fn is_floating(&self, node: NodeId) -> bool {
        self.is_window(node)
            && node.parent(&self.tree.map).is_some_and(|parent| {
                matches!(self.tree.data.kind.get(parent), Some(NodeKind::Workspace { .. }))
            })
    }

    /// Windows under `node` in depth-first, left-to-right order.
    pub fn all_leaf_windows_recursive(&self, node: NodeId) -> Vec<NodeId> {
        node.traverse_preorder(&self.tree.map).filter(|&n| self.is_window(n)).collect()
    }

    pub fn mark_as_most_recent_child(&mut self, node: NodeId) {
        self.tree.data.mru.mark(&self.tree.map, node);
    }

    pub fn most_recent_child(&self, node: NodeId) -> Option<NodeId> {
        self.tree.data.mru.most_recent_child(&self.tree.map, node)
    }

    /// The window reached by following most-recent pointers down from `node`.
    ///
    /// Special containers are passed over: their windows are not focusable by
    /// navigation.
    pub fn most_recent_window_recursive(&self, node: NodeId) -> Option<NodeId> {
        let map = &self.tree.map;
        let mut node = node;
        loop {
            let child = self
                .most_recent_child(node)
                .filter(|&child| !self.is_special(child))
                .or_else(|| node.children(map).find(|&child| !self.is_special(child)));
            match child {
                Some(child) => node = child,
                None => break,
            }
        }
        self.is_window(node).then_some(node)
    }

    fn is_special(&self, node: NodeId) -> bool {
        matches!(self.tree.data.kind.get(node), Some(NodeKind::Special(_)))
    }

    /// Recorded most-recent child of `node` and of every container under it.
    pub fn recorded_children(&self, node: NodeId) -> Vec<(NodeId, Option<NodeId>)> {
        let mru = &self.tree.data.mru;
        node.traverse_preorder(&self.tree.map)
            .filter(|&n| !self.is_window(n))
            .map(|n| (n, mru.recorded_child(n)))
            .collect()
    }

    /// Puts back pointers saved by [`World::recorded_children`]. Entries whose
    /// container is gone, or whose child has moved elsewhere, are skipped.
    pub fn restore_recorded_children(&mut self, saved: &[(NodeId, Option<NodeId>)]) {
        for &(node, child) in saved {
            if !self.tree.map.contains(node) {
                continue;
            }
            if child.is_some_and(|child| child.parent(&self.tree.map) != Some(node)) {
                continue;
            }
            self.tree.data.mru.set_recorded(node, child);
        }
    }

    /// Finds the window whose recorded layout frame contains `point`,
    /// descending from the tiling container `container`. Does not mutate
    /// anything.
    pub fn find_window_at(&self, container: NodeId, point: Point) -> Option<NodeId> {
        let mut node = container;
        loop {
            let target = node
                .children(&self.tree.map)
                .find(|&child| self.frame(child).is_some_and(|frame| frame.contains(point)))?;
            match self.kind(target) {
                NodeKind::Window(_) => return Some(target),
                NodeKind::TilingContainer(_) => node = target,
                NodeKind::Workspace { .. } | NodeKind::Special(_) => return None,
            }
        }
    }

    pub fn monitors(&self) -> &[Monitor] { &self.monitors }

    pub fn monitor(&self, id: MonitorId) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.id == id)
    }

    pub fn focused_workspace(&self) -> Option<NodeId> { self.focused_workspace }

    pub fn focused_window(&self) -> Option<NodeId> { self.focused_window }

    /// Records `window` (if any) as focused on `workspace`.
    pub fn set_focus(&mut self, workspace: NodeId, window: Option<NodeId>) {
        trace!(?workspace, ?window, "focus changed");
        self.focused_workspace = Some(workspace);
        self.focused_window = window;
    }

    pub fn draw_tree(&self, node: NodeId) -> String {
        let tree = self.get_ascii_tree(node);
        let mut out = String::new();
        match ascii_tree::write_tree(&mut out, &tree) {
            Ok(()) => out,
            Err(_) => format!("{node:?}"),
        }
    }

    fn get_ascii_tree(&self, node: NodeId) -> ascii_tree::Tree {
        let status = match node.parent(&self.tree.map) {
            None => "",
            Some(parent) if self.tree.data.mru.recorded_child(parent) == Some(node) => "☒ ",
            _ => "☐ ",
        };
        let focus = if self.focused_window == Some(node) { " *" } else { "" };
        let desc = match self.kind(node) {
            NodeKind::Window(id) => format!("{status}window {id}{focus}"),
            NodeKind::TilingContainer(orientation) => format!("{status}{orientation:?}"),
            NodeKind::Workspace { name, monitor } => {
                format!("workspace {name} (monitor {monitor})")
            }
            NodeKind::Special(kind) => format!("{status}{kind}"),
        };
        let children: Vec<_> =
            node.children(&self.tree.map).map(|c| self.get_ascii_tree(c)).collect();
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            ascii_tree::Tree::Node(desc, children)
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        Ok(ron::from_str(&buf)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(path)?.write_all(self.serialize_to_string()?.as_bytes())?;
        Ok(())
    }

    pub fn serialize_to_string(&self) -> anyhow::Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        world: World,
        ws: NodeId,
        root: NodeId,
        a: NodeId,
        v: NodeId,
        b: NodeId,
        c: NodeId,
        floating: NodeId,
    }

    /// ```text
    /// workspace 1
    /// ├─ H
    /// │  ├─ a
    /// │  └─ V
    /// │     ├─ b
    /// │     └─ c
    /// └─ floating
    /// ```
    fn fixture() -> Fixture {
        let mut world = World::new();
        let screen = Rect::from_xywh(0.0, 0.0, 1000.0, 1000.0);
        let ws = world.add_monitor(MonitorId::new(1), screen, screen, "1");
        let root = world.root_tiling_container(ws);
        let a = world.new_window(WindowId::new(1), root, BindIndex::Last);
        let v = world.new_container(Orientation::Vertical, root, BindIndex::Last);
        let b = world.new_window(WindowId::new(2), v, BindIndex::Last);
        let c = world.new_window(WindowId::new(3), v, BindIndex::Last);
        let floating = world.new_window(WindowId::new(4), ws, BindIndex::Last);
        Fixture { world, ws, root, a, v, b, c, floating }
    }

    #[test]
    fn structure_queries() {
        let f = fixture();
        let w = &f.world;
        assert_eq!(Some(f.ws), w.focused_workspace());
        assert_eq!(vec![f.a, f.b, f.c], w.all_leaf_windows_recursive(f.root));
        assert_eq!(vec![f.floating], w.floating_windows(f.ws));
        assert!(w.is_floating(f.floating));
        assert!(!w.is_floating(f.b));
        assert_eq!(Some(f.ws), w.workspace_of(f.c));
        assert_eq!(Some(f.c), w.window_node(WindowId::new(3)));
        assert_eq!(Some(Orientation::Vertical), w.orientation(f.v));
        assert_eq!(Some(MonitorId::new(1)), w.workspace_monitor(f.ws));
        assert_eq!(Some(f.ws), w.workspace_by_name("1"));
    }

    #[test]
    fn unbind_returns_weight_and_index() {
        let mut f = fixture();
        f.world.bind(f.b, f.v, 2.5, BindIndex::At(1));
        assert_eq!(Some(f.c), f.v.first_child(f.world.map()));
        let data = f.world.unbind(f.b).unwrap();
        assert_eq!(BindingData { weight: 2.5, index: 1 }, data);
        assert_eq!(None, f.world.weight(f.b));
        assert_eq!(None, f.world.unbind(f.b));

        f.world.bind(f.b, f.ws, data.weight, BindIndex::Last);
        assert!(f.world.is_floating(f.b));
        assert_eq!(Some(2.5), f.world.weight(f.b));
    }

    #[test]
    fn bind_marks_most_recent() {
        let mut f = fixture();
        assert_eq!(Some(f.floating), f.world.most_recent_window_recursive(f.ws));
        f.world.bind(f.a, f.v, 1.0, BindIndex::At(0));
        assert_eq!(Some(f.a), f.world.most_recent_window_recursive(f.ws));
        f.world.mark_as_most_recent_child(f.c);
        assert_eq!(Some(f.c), f.world.most_recent_window_recursive(f.ws));
        assert_eq!(Some(f.v), f.world.most_recent_child(f.root));
    }

    #[test]
    fn most_recent_window_of_empty_workspace() {
        let mut world = World::new();
        let screen = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let ws = world.add_monitor(MonitorId::new(1), screen, screen, "1");
        assert_eq!(None, world.most_recent_window_recursive(ws));
    }

    #[test]
    fn most_recent_window_passes_over_special_containers() {
        let mut f = fixture();
        f.world.mark_as_most_recent_child(f.a);
        let minimized = f.world.new_special(SpecialContainer::Minimized, f.ws);
        let hidden = f.world.new_window(WindowId::new(9), minimized, BindIndex::Last);
        assert_eq!(Some(minimized), f.world.most_recent_child(f.ws));
        assert_eq!(Some(f.a), f.world.most_recent_window_recursive(f.ws));
        assert_eq!(Some(hidden), f.world.most_recent_window_recursive(minimized));
    }

    #[test]
    fn recorded_children_round_trip() {
        let mut f = fixture();
        f.world.mark_as_most_recent_child(f.b);
        let saved = f.world.recorded_children(f.ws);
        f.world.mark_as_most_recent_child(f.c);
        f.world.mark_as_most_recent_child(f.floating);
        f.world.restore_recorded_children(&saved);
        assert_eq!(Some(f.b), f.world.most_recent_child(f.v));
        assert_eq!(Some(f.b), f.world.most_recent_window_recursive(f.ws));
        assert_eq!(saved, f.world.recorded_children(f.ws));
    }

    #[test]
    fn binding_under_window_panics() {
        let mut f = fixture();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            f.world.bind(f.c, f.a, 1.0, BindIndex::Last);
        }));
        assert!(result.is_err());
    }

    #[test]
    fn find_window_at_uses_recorded_frames() {
        let mut f = fixture();
        let w = &mut f.world;
        w.set_frame(f.a, Rect::from_xywh(0.0, 0.0, 500.0, 1000.0));
        w.set_frame(f.v, Rect::from_xywh(500.0, 0.0, 500.0, 1000.0));
        w.set_frame(f.b, Rect::from_xywh(500.0, 0.0, 500.0, 500.0));
        w.set_frame(f.c, Rect::from_xywh(500.0, 500.0, 500.0, 500.0));

        assert_eq!(Some(f.a), w.find_window_at(f.root, Point::new(100.0, 100.0)));
        assert_eq!(Some(f.c), w.find_window_at(f.root, Point::new(700.0, 800.0)));
        assert_eq!(None, w.find_window_at(f.root, Point::new(2000.0, 800.0)));
    }

    #[test]
    fn remove_clears_focus_and_window_index() {
        let mut f = fixture();
        f.world.set_focus(f.ws, Some(f.c));
        f.world.remove(f.v);
        assert_eq!(None, f.world.focused_window());
        assert_eq!(None, f.world.window_node(WindowId::new(3)));
        assert_eq!(vec![f.a], f.world.all_leaf_windows_recursive(f.root));
    }

    #[test]
    fn draw_tree_lists_every_node() {
        let f = fixture();
        let drawn = f.world.draw_tree(f.ws);
        assert!(drawn.contains("workspace 1 (monitor 1)"));
        assert!(drawn.contains("Vertical"));
        for id in 1..=4 {
            assert!(drawn.contains(&format!("window {id}")), "{drawn}");
        }
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let mut f = fixture();
        f.world.set_focus(f.ws, Some(f.b));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("state.ron");
        f.world.save(&path).unwrap();

        let loaded = World::load(&path).unwrap();
        assert_eq!(Some(f.b), loaded.focused_window());
        assert_eq!(
            f.world.all_leaf_windows_recursive(f.root),
            loaded.all_leaf_windows_recursive(loaded.root_tiling_container(f.ws))
        );
        assert_eq!(
            f.world.most_recent_window_recursive(f.ws),
            loaded.most_recent_window_recursive(f.ws)
        );
    }
}
