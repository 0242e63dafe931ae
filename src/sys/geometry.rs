//! Plain screen geometry used by the focus engine.
//!
//! Coordinates follow the top-left origin convention: `y` grows downwards.

use serde::{Deserialize, Serialize};

use crate::layout_engine::Orientation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Point { x, y } }

    /// Position of the point along the axis of the given orientation.
    pub fn projection(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    /// Clamps the point into `rect`, edges included.
    pub fn coerce_in(self, rect: Rect) -> Point {
        let min = rect.min();
        let max = rect.max();
        Point {
            x: self.x.max(min.x).min(max.x.max(min.x)),
            y: self.y.max(min.y).min(max.y.max(min.y)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self { Size { width, height } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self { Rect { origin, size } }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn min(&self) -> Point { self.origin }

    pub fn max(&self) -> Point {
        Point::new(self.origin.x + self.size.width, self.origin.y + self.size.height)
    }

    pub fn top_left_corner(&self) -> Point { self.origin }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.min().x..=self.max().x).contains(&point.x)
            && (self.min().y..=self.max().y).contains(&point.y)
    }

    /// Shrinks the rect by the given insets. Never produces a negative size.
    pub fn inset(&self, top: f64, left: f64, bottom: f64, right: f64) -> Rect {
        Rect::from_xywh(
            self.origin.x + left,
            self.origin.y + top,
            (self.size.width - left - right).max(0.0),
            (self.size.height - top - bottom).max(0.0),
        )
    }

    /// Whether the spans of the two rects overlap on the axis perpendicular
    /// to `orientation`. Touching edges do not count.
    pub fn overlaps_across(&self, other: &Rect, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Horizontal => {
                self.min().y < other.max().y && other.min().y < self.max().y
            }
            Orientation::Vertical => self.min().x < other.max().x && other.min().x < self.max().x,
        }
    }
}

pub trait IsWithin {
    fn is_within(&self, how_much: f64, other: Self) -> bool;
}

impl IsWithin for Point {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.x.is_within(how_much, other.x) && self.y.is_within(how_much, other.y)
    }
}

impl IsWithin for f64 {
    fn is_within(&self, how_much: f64, other: Self) -> bool { (self - other).abs() < how_much }
}

pub trait SameAs: IsWithin + Sized {
    fn same_as(&self, other: Self) -> bool { self.is_within(0.1, other) }
}

impl SameAs for Point {}
