//! Bands: the horizontal strips a block is stacked from.

use std::collections::BTreeSet;

use super::tile::{PinTile, Tile};
use crate::diagnostics::{Diagnostics, Origin};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BandKind {
    /// Upper edge of the block; carries the refdes.
    Top { center: Tile },
    Bottom,
    Io { left: Tile, center: Tile, right: Tile },
    /// Narrowing of the block, as in the control section of a multi-slot
    /// part.
    Neck { center: Tile },
    Separator { wide: bool },
    Text { center: Tile, up_kerning: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    pub kind: BandKind,
    /// Source line.
    pub line: Option<usize>,
}

impl Band {
    pub fn new(kind: BandKind) -> Self {
        Self { kind, line: None }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn top(center: impl Into<Tile>) -> Self {
        Self::new(BandKind::Top {
            center: center.into(),
        })
    }

    pub fn bottom() -> Self {
        Self::new(BandKind::Bottom)
    }

    pub fn io(left: impl Into<Tile>, center: impl Into<Tile>, right: impl Into<Tile>) -> Self {
        Self::new(BandKind::Io {
            left: left.into(),
            center: center.into(),
            right: right.into(),
        })
    }

    pub fn neck(center: impl Into<Tile>) -> Self {
        Self::new(BandKind::Neck {
            center: center.into(),
        })
    }

    pub fn separator(wide: bool) -> Self {
        Self::new(BandKind::Separator { wide })
    }

    pub fn text(center: impl Into<Tile>, up_kerning: i32) -> Self {
        Self::new(BandKind::Text {
            center: center.into(),
            up_kerning,
        })
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            BandKind::Top { .. } => "top",
            BandKind::Bottom => "bottom",
            BandKind::Io { .. } => "io",
            BandKind::Neck { .. } => "neck",
            BandKind::Separator { .. } => "separator",
            BandKind::Text { .. } => "text",
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self.kind, BandKind::Top { .. })
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self.kind, BandKind::Bottom)
    }

    pub fn is_neck(&self) -> bool {
        matches!(self.kind, BandKind::Neck { .. })
    }

    /// All tiles of the band, left to right.
    pub fn tiles(&self) -> Vec<&Tile> {
        match &self.kind {
            BandKind::Top { center }
            | BandKind::Neck { center }
            | BandKind::Text { center, .. } => vec![center],
            BandKind::Io {
                left,
                center,
                right,
            } => vec![left, center, right],
            BandKind::Bottom | BandKind::Separator { .. } => Vec::new(),
        }
    }

    /// Pin tiles on the block edges, left then right.
    pub fn edge_pins(&self) -> impl Iterator<Item = &PinTile> {
        let (left, right) = match &self.kind {
            BandKind::Io { left, right, .. } => (left.as_pin(), right.as_pin()),
            _ => (None, None),
        };
        left.into_iter().chain(right)
    }

    /// Slot count of the band: the common count of its pin tiles, `Some(0)`
    /// without pins, `None` when the pin tiles disagree.
    pub fn num_slots(&self) -> Option<usize> {
        let mut common = 0;
        for tile in self.tiles() {
            let Tile::Pin(pin) = tile else { continue };
            let n = pin.num_slots()?;
            if common != 0 && n != common {
                return None;
            }
            common = n;
        }
        Some(common)
    }

    /// Physical pins used in `package` by the edge pins, shadow pins
    /// included.
    pub fn pins_used(&self, package: &str) -> BTreeSet<u32> {
        self.edge_pins()
            .flat_map(|p| p.pins_used(package))
            .collect()
    }

    pub fn validate(&self, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        let origin = origin.at_line(self.line);
        let mut valid = true;
        for tile in self.tiles() {
            valid &= tile.validate(sink, origin);
        }
        let centered_pin = match &self.kind {
            BandKind::Top { center }
            | BandKind::Neck { center }
            | BandKind::Text { center, .. }
            | BandKind::Io { center, .. } => center.as_pin(),
            _ => None,
        };
        if let Some(pin) = centered_pin {
            sink.fatal(
                "pin_position",
                format!("Pin '{}' must sit on the left or right of an IO band.", pin.name),
                origin,
            );
            valid = false;
        }
        valid
    }
}
