//! The window service the focus engine drives.
//!
//! The engine never talks to the OS directly. It asks a [`WindowServer`] for
//! a window's on-screen center and to activate a window, and treats both as
//! fallible.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::common::collections::{HashMap, HashSet};
use crate::model::World;
use crate::sys::geometry::Point;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WindowId(u32);

impl WindowId {
    #[inline]
    pub fn new(id: u32) -> Self { Self(id) }

    #[inline]
    pub fn as_u32(self) -> u32 { self.0 }
}

impl From<WindowId> for u32 {
    #[inline]
    fn from(id: WindowId) -> Self { id.0 }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

pub trait WindowServer {
    /// Current on-screen center of the window, if it can be queried.
    fn window_center(&self, id: WindowId) -> Option<Point>;

    /// Raises and activates the window. Returns whether that succeeded.
    fn focus_window(&mut self, id: WindowId) -> bool;
}

/// In-memory window service.
///
/// Centers come from whatever was recorded, typically the frames stored in a
/// [`World`] snapshot. Every activation is logged so callers can see what the
/// engine did.
#[derive(Default, Debug)]
pub struct RecordingWindowServer {
    centers: HashMap<WindowId, Point>,
    refusing: HashSet<WindowId>,
    focused: Vec<WindowId>,
}

impl RecordingWindowServer {
    pub fn new() -> Self { Self::default() }

    /// Seeds window centers from the layout frames recorded in the world.
    pub fn from_world(world: &World) -> Self {
        let mut server = Self::new();
        for (id, node) in world.windows() {
            if let Some(frame) = world.frame(node) {
                server.centers.insert(id, frame.center());
            }
        }
        trace!(windows = server.centers.len(), "seeded window centers");
        server
    }

    pub fn set_center(&mut self, id: WindowId, center: Point) { self.centers.insert(id, center); }

    pub fn forget_center(&mut self, id: WindowId) { self.centers.remove(&id); }

    /// Makes every later activation of `id` fail.
    pub fn refuse_focus(&mut self, id: WindowId) { self.refusing.insert(id); }

    /// Windows activated so far, oldest first.
    pub fn focused(&self) -> &[WindowId] { &self.focused }
}

impl WindowServer for RecordingWindowServer {
    fn window_center(&self, id: WindowId) -> Option<Point> { self.centers.get(&id).copied() }

    fn focus_window(&mut self, id: WindowId) -> bool {
        if self.refusing.contains(&id) {
            debug!(?id, "window refused activation");
            return false;
        }
        self.focused.push(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::BindIndex;
    use crate::model::{MonitorId, World};
    use crate::sys::geometry::Rect;

    #[test]
    fn records_activations_and_refusals() {
        let mut server = RecordingWindowServer::new();
        assert!(server.focus_window(WindowId::new(1)));
        server.refuse_focus(WindowId::new(2));
        assert!(!server.focus_window(WindowId::new(2)));
        assert!(server.focus_window(WindowId::new(3)));
        assert_eq!(&[WindowId::new(1), WindowId::new(3)], server.focused());
    }

    #[test]
    fn centers_come_from_world_frames() {
        let mut world = World::new();
        let screen = Rect::from_xywh(0.0, 0.0, 1000.0, 1000.0);
        let ws = world.add_monitor(MonitorId::new(1), screen, screen, "1");
        let root = world.root_tiling_container(ws);
        let with_frame = world.new_window(WindowId::new(1), root, BindIndex::Last);
        world.set_frame(with_frame, Rect::from_xywh(0.0, 0.0, 500.0, 1000.0));
        world.new_window(WindowId::new(2), root, BindIndex::Last);

        let mut server = RecordingWindowServer::from_world(&world);
        assert_eq!(Some(Point::new(250.0, 500.0)), server.window_center(WindowId::new(1)));
        assert_eq!(None, server.window_center(WindowId::new(2)));

        server.forget_center(WindowId::new(1));
        assert_eq!(None, server.window_center(WindowId::new(1)));
    }
}
