//! Drawing-plane primitives.
//!
//! All distances are integer gschem units (1/1000 inch). Nothing here knows
//! about parts or bands; the engine builds on these types.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Snap grid of the drawing plane.
pub const GRID_SPACING: i32 = 100;

/// Largest representable grid multiple.
const GRID_MAX: i32 = i32::MAX - i32::MAX % GRID_SPACING;

/// Round `n` up to the next multiple of [`GRID_SPACING`].
///
/// Negative lengths round toward positive infinity as well, so the result is
/// never smaller than the input. Values past the largest grid multiple saturate to it.
pub fn grid_up(n: i32) -> i32 {
    let rem = n.rem_euclid(GRID_SPACING);
    if rem == 0 {
        return n;
    }
    n.checked_add(GRID_SPACING - rem).unwrap_or(GRID_MAX)
}

/// A point in the drawing plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Uniformly scale both coordinates, truncating toward zero.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: (self.x as f64 * factor) as i32,
            y: (self.y as f64 * factor) as i32,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

/// Position and size of a laid-out element. `x`/`y` is the lower-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Global y coordinate of the top edge.
    pub fn top(&self) -> i32 {
        self.y + self.h
    }

    /// Global x coordinate of the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn middle_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn middle_y(&self) -> i32 {
        self.y + self.h / 2
    }
}

/// Dash pattern of a stroke: gEDA dash style, dash length, dash spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dash {
    pub style: i32,
    pub length: i32,
    pub space: i32,
}

impl Dash {
    pub const fn new(style: i32, length: i32, space: i32) -> Self {
        Self { style, length, space }
    }
}

/// Line width used for glyph and pin art.
pub const ART_LINE_WIDTH: i32 = 10;
/// Line width used for block outlines.
pub const BOX_LINE_WIDTH: i32 = 20;

/// gEDA color index for graphic lines.
const GRAPHIC_COLOR: i32 = 3;
/// Round line caps.
const CAP_STYLE: i32 = 1;

/// A straight line with a width and optional dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    pub p1: Point,
    pub p2: Point,
    pub width: i32,
    pub dash: Option<Dash>,
}

impl Stroke {
    /// A solid stroke at the art line width.
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self {
            p1,
            p2,
            width: ART_LINE_WIDTH,
            dash: None,
        }
    }

    pub fn with_width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    pub fn dashed(mut self, dash: Dash) -> Self {
        self.dash = Some(dash);
        self
    }

    /// The same stroke moved by `offset`.
    pub fn displaced(&self, offset: Point) -> Self {
        Self {
            p1: self.p1 + offset,
            p2: self.p2 + offset,
            ..*self
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            p1: self.p1.scale(factor),
            p2: self.p2.scale(factor),
            ..*self
        }
    }

    /// One `.sym` line record, relative to `offset`.
    ///
    /// `L x1 y1 x2 y2 color width capstyle dashstyle dashlength dashspace`
    pub fn render(&self, offset: Point) -> String {
        let q1 = self.p1 + offset;
        let q2 = self.p2 + offset;
        let dash = self.dash.unwrap_or(Dash::new(0, -1, -1));
        format!(
            "L {} {} {} {} {} {} {} {} {} {}",
            q1.x, q1.y, q2.x, q2.y, GRAPHIC_COLOR, self.width, CAP_STYLE, dash.style, dash.length,
            dash.space
        )
    }
}
