//! Stroke art: canned glyph graphics and pin decorations.

use super::view::{PinView, Placement};
use super::{INVERT_HEIGHT, INVERT_LENGTH};
use crate::geometry::{Point, Stroke};
use crate::model::{GraphicKind, PinFlag, PinTile, PinType};

/// A canned graphic, drawn relative to its glyph's lower-left corner.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GraphicArt {
    pub strokes: &'static [Stroke],
    /// Vertical offset of the art within its box.
    pub base: i32,
    pub height: i32,
    pub width: i32,
}

const fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Stroke {
    Stroke::new(Point::new(x1, y1), Point::new(x2, y2))
}

const TRISTATE: GraphicArt = GraphicArt {
    strokes: &[line(0, 190, 120, 190), line(120, 190, 60, 10), line(60, 10, 0, 190)],
    base: 10,
    height: 180,
    width: 120,
};

const DRIVER: GraphicArt = GraphicArt {
    strokes: &[line(0, 10, 120, 100), line(0, 190, 120, 100), line(0, 10, 0, 190)],
    base: 10,
    height: 180,
    width: 120,
};

const GREATER_EQUAL: GraphicArt = GraphicArt {
    strokes: &[line(0, 90, 90, 60), line(0, 30, 90, 60), line(0, 10, 90, 10)],
    base: 10,
    height: 110,
    width: 90,
};

const TESTBOX: GraphicArt = GraphicArt {
    strokes: &[
        line(0, 0, 0, 100),
        line(400, 0, 400, 100),
        line(0, 0, 400, 100),
        line(0, 100, 400, 0),
    ],
    base: 0,
    height: 100,
    width: 400,
};

pub(crate) fn graphic(kind: GraphicKind) -> GraphicArt {
    match kind {
        GraphicKind::Tristate => TRISTATE,
        GraphicKind::Driver => DRIVER,
        GraphicKind::GreaterEqual => GREATER_EQUAL,
        GraphicKind::Testbox => TESTBOX,
    }
}

/// Art drawn inside the block next to a pin. Only one is drawn per pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsideArt {
    Clock,
    Schmitt,
    Tristate,
}

const CLOCK_WIDTH: i32 = 75;
const SCHMITT_WIDTH: i32 = 100;
const TRISTATE_STEP: i32 = 58;
const TRISTATE_INSET: i32 = 25;
const ARROW_SIZE: i32 = 25;

impl InsideArt {
    pub fn of(pin: &PinTile) -> Option<Self> {
        if pin.has(PinFlag::Clock) {
            Some(InsideArt::Clock)
        } else if pin.has(PinFlag::Schmitt) {
            Some(InsideArt::Schmitt)
        } else if pin.has(PinFlag::Tristate) {
            Some(InsideArt::Tristate)
        } else {
            None
        }
    }

    pub fn width(self) -> i32 {
        match self {
            InsideArt::Clock => CLOCK_WIDTH,
            InsideArt::Schmitt => SCHMITT_WIDTH,
            InsideArt::Tristate => TRISTATE_INSET + 2 * TRISTATE_STEP,
        }
    }
}

/// Signal direction used to pick decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
    InOut,
}

/// Pin geometry shorthand: `near` is the end touching the block.
struct Ends {
    near: i32,
    mid: i32,
    y: i32,
    /// +1 when the block lies toward positive x (left pins).
    inward: i32,
}

impl PinView<'_> {
    fn direction(&self) -> Direction {
        match self.pin_type {
            None if self.is_left() => Direction::In,
            None => Direction::Out,
            Some(PinType::Io) => Direction::InOut,
            Some(PinType::In | PinType::Clk | PinType::Pas | PinType::Pwr) => Direction::In,
            Some(_) => Direction::Out,
        }
    }

    fn ends(&self) -> Option<Ends> {
        let rect = self.rect?;
        let left = self.placement == Placement::Left;
        Some(Ends {
            near: if left { rect.right() } else { rect.x },
            mid: rect.middle_x(),
            y: rect.y,
            inward: if left { 1 } else { -1 },
        })
    }

    /// Decoration strokes of this pin in `package`. Shadow pins draw
    /// nothing.
    pub(crate) fn strokes(&self, package: &str, bidir_style: i64) -> Vec<Stroke> {
        let Some(e) = self.ends() else {
            return Vec::new();
        };
        if self.tile.is_shadow(package) {
            return Vec::new();
        }
        let mut out = Vec::new();
        match InsideArt::of(self.tile) {
            Some(InsideArt::Clock) => clock(&e, &mut out),
            Some(InsideArt::Schmitt) => schmitt(&e, &mut out),
            Some(InsideArt::Tristate) => tristate(&e, &mut out),
            None => {}
        }
        if self.tile.has(PinFlag::Invert) {
            self.invert(&e, bidir_style, &mut out);
        } else {
            if self.tile.has(PinFlag::Bidirectional) && bidir_style == 1 {
                double_arrow(&e, &mut out);
            }
            match (self.pin_type, self.placement) {
                (Some(PinType::In), Placement::Right) => in_arrow(&e, &mut out),
                (Some(PinType::Out), Placement::Left) => out_arrow(&e, &mut out),
                _ => {}
            }
        }
        out
    }

    fn invert(&self, e: &Ends, bidir_style: i64, out: &mut Vec<Stroke>) {
        let Ends { near, y, inward, .. } = *e;
        let far = near - inward * INVERT_LENGTH;
        match self.direction() {
            Direction::In => {
                let p1 = Point::new(far, y);
                let p2 = Point::new(far, y + INVERT_HEIGHT);
                out.push(Stroke::new(p1, p2));
                out.push(Stroke::new(p2, Point::new(near, y)));
            }
            Direction::Out => {
                out.push(Stroke::new(Point::new(near, y + INVERT_HEIGHT), Point::new(far, y)));
            }
            Direction::InOut if bidir_style == 0 || bidir_style == 1 => {
                let (p1, p2, p3, p4) = if inward > 0 {
                    (
                        Point::new(far, y),
                        Point::new(far, y + INVERT_HEIGHT),
                        Point::new(near, y),
                        Point::new(near, y - INVERT_HEIGHT),
                    )
                } else {
                    (
                        Point::new(far, y - INVERT_HEIGHT),
                        Point::new(far, y),
                        Point::new(near, y + INVERT_HEIGHT),
                        Point::new(near, y),
                    )
                };
                out.push(Stroke::new(p1, p2));
                out.push(Stroke::new(p1, p4));
                out.push(Stroke::new(p2, p3));
            }
            Direction::InOut => {}
        }
    }
}

fn clock(e: &Ends, out: &mut Vec<Stroke>) {
    let tip = Point::new(e.near + e.inward * CLOCK_WIDTH, e.y);
    out.push(Stroke::new(Point::new(e.near, e.y - CLOCK_WIDTH), tip));
    out.push(Stroke::new(tip, Point::new(e.near, e.y + CLOCK_WIDTH)));
}

fn schmitt(e: &Ends, out: &mut Vec<Stroke>) {
    let x0 = if e.inward > 0 { e.near } else { e.near - 125 };
    let (x1, x2, x3, x4) = (x0 + 25, x0 + 50, x0 + 75, x0 + 100);
    let (bot, top) = (e.y - 50, e.y + 50);
    out.push(line(x1, bot, x3, bot));
    out.push(line(x2, top, x4, top));
    out.push(line(x2, bot, x2, top));
    out.push(line(x3, bot, x3, top));
}

fn tristate(e: &Ends, out: &mut Vec<Stroke>) {
    let x1 = e.near + e.inward * TRISTATE_INSET;
    let x2 = x1 + e.inward * TRISTATE_STEP;
    let x3 = x2 + e.inward * TRISTATE_STEP;
    let (bot, top) = (e.y - 50, e.y + 50);
    out.push(line(x1, top, x3, top));
    out.push(line(x1, top, x2, bot));
    out.push(line(x3, top, x2, bot));
}

fn arrow_head(tip: Point, dx: i32, out: &mut Vec<Stroke>) {
    out.push(Stroke::new(tip, Point::new(tip.x + dx, tip.y + ARROW_SIZE)));
    out.push(Stroke::new(tip, Point::new(tip.x + dx, tip.y - ARROW_SIZE)));
}

/// Input drawn on the right: arrow pointing into the block.
fn in_arrow(e: &Ends, out: &mut Vec<Stroke>) {
    arrow_head(Point::new(e.mid - ARROW_SIZE, e.y), ARROW_SIZE, out);
}

/// Output drawn on the left: arrow pointing away from the block.
fn out_arrow(e: &Ends, out: &mut Vec<Stroke>) {
    arrow_head(Point::new(e.mid, e.y), ARROW_SIZE, out);
}

/// Arrowheads at both ends of the pin middle, for bidirectional pins.
fn double_arrow(e: &Ends, out: &mut Vec<Stroke>) {
    arrow_head(Point::new(e.mid - 2 * ARROW_SIZE, e.y), ARROW_SIZE, out);
    arrow_head(Point::new(e.mid + 2 * ARROW_SIZE, e.y), -ARROW_SIZE, out);
}
