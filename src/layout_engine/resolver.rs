//! Direction resolution over the window tree.

use crate::layout_engine::Direction;
use crate::model::tree::NodeId;
use crate::model::{NodeKind, World};

/// Walks up from `node` to the innermost tiling container that is laid out
/// along `direction` and has a child next to `node`'s branch in that
/// direction.
///
/// Returns the container and the index of the branch the walk came from.
/// The walk stops without a result at the workspace or at a special
/// container.
pub fn closest_parent(
    world: &World,
    node: NodeId,
    direction: Direction,
) -> Option<(NodeId, usize)> {
    let map = world.map();
    let mut node = node;
    while let Some(parent) = node.parent(map) {
        match world.kind(parent) {
            NodeKind::TilingContainer(orientation) => {
                let own_index = node.own_index(map)?;
                if *orientation == direction.orientation() {
                    let sibling = own_index as isize + direction.focus_offset();
                    if sibling >= 0 && (sibling as usize) < parent.child_count(map) {
                        return Some((parent, own_index));
                    }
                }
                node = parent;
            }
            NodeKind::Workspace { .. } | NodeKind::Special(_) => return None,
            NodeKind::Window(_) => unreachable!("window {parent:?} has children"),
        }
    }
    None
}

/// Nearest window inside `node` when entering it while travelling against
/// `snapped_to`.
///
/// Containers laid out along the travel axis are entered at the edge facing
/// `snapped_to`. Containers across it are entered through their most recent
/// child.
///
/// # Panics
///
/// Reaching a special container is a bug: no direction or DFS path leads
/// into one.
pub fn find_focus_target_recursive(
    world: &World,
    node: NodeId,
    snapped_to: Direction,
) -> Option<NodeId> {
    let map = world.map();
    let mut node = node;
    loop {
        node = match world.kind(node) {
            NodeKind::Window(_) => return Some(node),
            NodeKind::Workspace { .. } => world.root_tiling_container(node),
            NodeKind::TilingContainer(orientation) if *orientation == snapped_to.orientation() => {
                if snapped_to.is_positive() {
                    node.last_child(map)?
                } else {
                    node.first_child(map)?
                }
            }
            NodeKind::TilingContainer(_) => world.most_recent_child(node)?,
            NodeKind::Special(kind) => {
                panic!("focus target resolution reached the {kind} container {node:?}")
            }
        };
    }
}

/// Windows of the workspace's tiling tree in depth-first order.
pub fn dfs_windows(world: &World, workspace: NodeId) -> Vec<NodeId> {
    world.all_leaf_windows_recursive(world.root_tiling_container(workspace))
}

/// First window when stepping forward, last when stepping back.
pub fn dfs_edge(windows: &[NodeId], positive: bool) -> Option<NodeId> {
    if positive { windows.first().copied() } else { windows.last().copied() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::Orientation;
    use crate::model::tree::BindIndex;
    use crate::model::{MonitorId, SpecialContainer};
    use crate::sys::geometry::Rect;
    use crate::sys::window_server::WindowId;

    struct Fixture {
        world: World,
        ws: NodeId,
        a: NodeId,
        v: NodeId,
        b: NodeId,
        h: NodeId,
        c: NodeId,
        d: NodeId,
        e: NodeId,
    }

    /// ```text
    /// H
    /// ├─ a
    /// ├─ V
    /// │  ├─ b
    /// │  └─ H
    /// │     ├─ c
    /// │     └─ d
    /// └─ e
    /// ```
    fn fixture() -> Fixture {
        let mut world = World::new();
        let screen = Rect::from_xywh(0.0, 0.0, 1000.0, 1000.0);
        let ws = world.add_monitor(MonitorId::new(1), screen, screen, "1");
        let root = world.root_tiling_container(ws);
        let win = |world: &mut World, id, parent| {
            world.new_window(WindowId::new(id), parent, BindIndex::Last)
        };
        let a = win(&mut world, 1, root);
        let v = world.new_container(Orientation::Vertical, root, BindIndex::Last);
        let b = win(&mut world, 2, v);
        let h = world.new_container(Orientation::Horizontal, v, BindIndex::Last);
        let c = win(&mut world, 3, h);
        let d = win(&mut world, 4, h);
        let e = win(&mut world, 5, root);
        Fixture { world, ws, a, v, b, h, c, d, e }
    }

    #[test]
    fn closest_parent_finds_sibling_in_direction() {
        let f = fixture();
        let root = f.world.root_tiling_container(f.ws);
        assert_eq!(Some((root, 0)), closest_parent(&f.world, f.a, Direction::Right));
        assert_eq!(None, closest_parent(&f.world, f.a, Direction::Left));
        assert_eq!(Some((f.v, 0)), closest_parent(&f.world, f.b, Direction::Down));
        assert_eq!(Some((f.h, 1)), closest_parent(&f.world, f.d, Direction::Left));
        // d is the rightmost of the inner row, so the walk reaches the root.
        assert_eq!(Some((root, 1)), closest_parent(&f.world, f.d, Direction::Right));
        assert_eq!(None, closest_parent(&f.world, f.e, Direction::Up));
    }

    #[test]
    fn snapping_along_the_axis_picks_the_edge() {
        let f = fixture();
        assert_eq!(Some(f.a), find_focus_target_recursive(&f.world, f.ws, Direction::Left));
        assert_eq!(Some(f.e), find_focus_target_recursive(&f.world, f.ws, Direction::Right));
        assert_eq!(Some(f.d), find_focus_target_recursive(&f.world, f.h, Direction::Right));
    }

    #[test]
    fn snapping_across_the_axis_follows_most_recent() {
        let mut f = fixture();
        // Entering V from the right lands on its most recent child.
        f.world.mark_as_most_recent_child(f.b);
        assert_eq!(Some(f.b), find_focus_target_recursive(&f.world, f.v, Direction::Right));
        f.world.mark_as_most_recent_child(f.c);
        assert_eq!(Some(f.d), find_focus_target_recursive(&f.world, f.v, Direction::Right));
        assert_eq!(Some(f.c), find_focus_target_recursive(&f.world, f.v, Direction::Left));
    }

    #[test]
    fn empty_workspace_has_no_target() {
        let mut world = World::new();
        let screen = Rect::from_xywh(0.0, 0.0, 1000.0, 1000.0);
        let ws = world.add_monitor(MonitorId::new(1), screen, screen, "1");
        assert_eq!(None, find_focus_target_recursive(&world, ws, Direction::Up));
        assert_eq!(None, find_focus_target_recursive(&world, ws, Direction::Left));
        assert!(dfs_windows(&world, ws).is_empty());
    }

    #[test]
    #[should_panic]
    fn special_container_is_unreachable() {
        let mut f = fixture();
        let minimized = f.world.new_special(SpecialContainer::Minimized, f.ws);
        f.world.new_window(WindowId::new(9), minimized, BindIndex::Last);
        find_focus_target_recursive(&f.world, minimized, Direction::Left);
    }

    #[test]
    fn dfs_order_is_preorder_left_to_right() {
        let f = fixture();
        let windows = dfs_windows(&f.world, f.ws);
        assert_eq!(vec![f.a, f.b, f.c, f.d, f.e], windows);
        assert_eq!(Some(f.a), dfs_edge(&windows, true));
        assert_eq!(Some(f.e), dfs_edge(&windows, false));
        assert_eq!(None, dfs_edge(&[], true));
    }
}
