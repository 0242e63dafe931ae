use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::common::config::OuterGaps;
use crate::layout_engine::{Direction, Orientation};
use crate::model::tree::NodeId;
use crate::sys::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MonitorId(u32);

impl MonitorId {
    pub fn new(id: u32) -> MonitorId { MonitorId(id) }

    pub fn get(&self) -> u32 { self.0 }
}

impl std::fmt::Display for MonitorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A display area with exactly one active workspace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: MonitorId,
    /// Full area of the display.
    pub frame: Rect,
    /// Area usable for windows (excludes menu bar and dock).
    pub visible_frame: Rect,
    pub active_workspace: NodeId,
}

impl Monitor {
    pub fn visible_rect_padded(&self, gaps: &OuterGaps) -> Rect {
        self.visible_frame.inset(gaps.top, gaps.left, gaps.bottom, gaps.right)
    }
}

fn compare_top_left(a: &Monitor, b: &Monitor) -> Ordering {
    let (a, b) = (a.frame.top_left_corner(), b.frame.top_left_corner());
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Canonical monitor order: by top-left corner, left to right, then top to
/// bottom.
///
/// Recomputed on every call so topology changes never leave a stale order
/// behind.
pub fn sorted_monitors(monitors: &[Monitor]) -> Vec<&Monitor> {
    let mut sorted: Vec<_> = monitors.iter().collect();
    sorted.sort_by(|a, b| compare_top_left(a, b));
    sorted
}

/// Monitors in line with `current` along `direction`, sorted along its
/// axis, and the index one step from `current` in that direction.
///
/// The index may fall outside the list, which means there is no monitor in
/// that direction. Returns `None` when `current` is unknown.
pub fn find_relative_monitor(
    monitors: &[Monitor],
    current: MonitorId,
    direction: Direction,
) -> Option<(Vec<&Monitor>, isize)> {
    let current = monitors.iter().find(|m| m.id == current)?;
    let orientation = direction.orientation();
    let mut in_line: Vec<_> = monitors
        .iter()
        .filter(|m| m.id == current.id || m.frame.overlaps_across(&current.frame, orientation))
        .collect();
    in_line.sort_by(|a, b| {
        let axis = |m: &Monitor| match orientation {
            Orientation::Horizontal => m.frame.min().x,
            Orientation::Vertical => m.frame.min().y,
        };
        axis(a).total_cmp(&axis(b)).then_with(|| compare_top_left(a, b))
    });
    let index = in_line.iter().position(|m| m.id == current.id)?;
    Some((in_line, index as isize + direction.focus_offset()))
}

/// Element at `index`, or `None` when out of range (negative included).
pub fn get_at<T>(items: &[T], index: isize) -> Option<&T> {
    usize::try_from(index).ok().and_then(|index| items.get(index))
}

/// Element at `index` wrapped around the list length.
pub fn get_wrapping<T>(items: &[T], index: isize) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let wrapped = index.rem_euclid(items.len() as isize);
    items.get(wrapped as usize)
}
